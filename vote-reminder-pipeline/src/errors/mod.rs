mod tracker;

pub use tracker::TrackerError;
