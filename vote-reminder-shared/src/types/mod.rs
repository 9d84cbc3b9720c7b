mod environment;
mod opt_preference;
mod signal;
mod vote_event;
mod vote_record;

pub use environment::Environment;
pub use opt_preference::OptPreference;
pub use signal::Signal;
pub use vote_event::VoteEvent;
pub use vote_record::VoteRecord;

/// Opaque identifier of the voting entity (user or member id).
pub type SubjectId = String;
