//! SQLite-backed vote store.
//!
//! Each store owns a single-connection pool. One connection is enough for a
//! single-process service, serializes writes at the storage layer, and keeps
//! `:memory:` databases alive for as long as the store is open.

use std::path::Path;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use tracing::{debug, info, instrument};
use vote_reminder_shared::types::{OptPreference, VoteRecord};

use crate::config::StoreConfig;
use crate::errors::VoteStoreError;
use crate::interfaces::VoteStore;
use crate::sqlite::schema::{CREATE_VOTER_OPTIONS_TABLE, CREATE_VOTERS_TABLE};
use crate::types::ExpiredVotes;

/// SQLite implementation of [`VoteStore`].
///
/// The store starts uninitialized; [`VoteStore::init`] opens the database
/// and creates the `voters` and `voterOptions` tables.
pub struct SqliteVoteStore {
    config: StoreConfig,
    pool: RwLock<Option<SqlitePool>>,
}

impl SqliteVoteStore {
    /// Creates an uninitialized store. No I/O happens until `init`.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn pool(&self) -> Result<SqlitePool, VoteStoreError> {
        let guard = self.pool.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone().ok_or(VoteStoreError::NotReady)
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, sqlx::Error> {
        if self.config.is_in_memory() {
            return SqliteConnectOptions::from_str("sqlite::memory:");
        }

        let path = Path::new(&self.config.location);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5)))
    }

    async fn open(&self) -> Result<SqlitePool, VoteStoreError> {
        let options = self
            .connect_options()
            .map_err(VoteStoreError::StorageConnection)?;

        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(VoteStoreError::StorageConnection)
    }

    async fn create_tables(pool: &SqlitePool) -> Result<(), VoteStoreError> {
        sqlx::query(CREATE_VOTERS_TABLE).execute(pool).await?;
        sqlx::query(CREATE_VOTER_OPTIONS_TABLE).execute(pool).await?;
        Ok(())
    }
}

fn to_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

fn decode_vote_row(row: SqliteRow) -> Result<VoteRecord, VoteStoreError> {
    let subject_id: String = row.try_get("id")?;
    let voted_at_ms: i64 = row.try_get("votedAt")?;
    let voted_at = DateTime::from_timestamp_millis(voted_at_ms)
        .ok_or(VoteStoreError::InvalidTimestamp(voted_at_ms))?;

    Ok(VoteRecord {
        subject_id,
        voted_at,
    })
}

#[async_trait]
impl VoteStore for SqliteVoteStore {
    #[instrument(skip(self), fields(location = %self.config.location))]
    async fn init(&self) -> Result<(), VoteStoreError> {
        if self.is_ready() {
            return Ok(());
        }

        let pool = self.open().await?;
        if let Err(e) = Self::create_tables(&pool).await {
            pool.close().await;
            return Err(e);
        }

        let surplus = {
            let mut guard = self.pool.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            if guard.is_none() {
                *guard = Some(pool);
                None
            } else {
                Some(pool)
            }
        };

        match surplus {
            // A concurrent init won the race; its pool stays in use.
            Some(pool) => {
                debug!("Vote store already opened concurrently, closing duplicate pool");
                pool.close().await;
            }
            None => info!(
                reminder_threshold_secs = self.config.reminder_threshold.as_secs(),
                opt_in_default = self.config.opt_in_default,
                "Vote store ready"
            ),
        }
        Ok(())
    }

    async fn close(&self) {
        let pool = self
            .pool
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(pool) = pool {
            pool.close().await;
            info!(location = %self.config.location, "Vote store closed");
        }
    }

    fn is_ready(&self) -> bool {
        self.pool
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or_else(|poisoned| poisoned.into_inner().is_some())
    }

    fn reminder_threshold(&self) -> Duration {
        self.config.reminder_threshold
    }

    fn opt_in_default(&self) -> bool {
        self.config.opt_in_default
    }

    async fn record_vote_at(
        &self,
        subject_id: &str,
        voted_at: DateTime<Utc>,
    ) -> Result<(), VoteStoreError> {
        let pool = self.pool()?;
        sqlx::query(
            "INSERT INTO voters (id, votedAt) VALUES (?1, ?2) ON CONFLICT (id) DO UPDATE SET votedAt = excluded.votedAt",
        )
        .bind(subject_id)
        .bind(voted_at.timestamp_millis())
        .execute(&pool)
        .await?;

        debug!(subject_id = %subject_id, "Recorded vote");
        Ok(())
    }

    async fn remove_vote(&self, subject_id: &str) -> Result<(), VoteStoreError> {
        let pool = self.pool()?;
        sqlx::query("DELETE FROM voters WHERE id = ?1")
            .bind(subject_id)
            .execute(&pool)
            .await?;

        Ok(())
    }

    async fn get_vote(&self, subject_id: &str) -> Result<Option<VoteRecord>, VoteStoreError> {
        let pool = self.pool()?;
        let row = sqlx::query("SELECT id, votedAt FROM voters WHERE id = ?1")
            .bind(subject_id)
            .fetch_optional(&pool)
            .await?;

        row.map(decode_vote_row).transpose()
    }

    async fn list_expired_votes(
        &self,
        older_than: Duration,
    ) -> Result<ExpiredVotes, VoteStoreError> {
        let pool = self.pool()?;
        let cutoff = Utc::now()
            .timestamp_millis()
            .saturating_sub(to_millis(older_than));

        let rows = sqlx::query("SELECT id, votedAt FROM voters WHERE votedAt <= ?1 ORDER BY votedAt")
            .bind(cutoff)
            .fetch_all(&pool)
            .await?;

        Ok(ExpiredVotes::new(rows.into_iter().map(decode_vote_row)))
    }

    async fn set_opt(&self, subject_id: &str, value: bool) -> Result<bool, VoteStoreError> {
        let pool = self.pool()?;
        sqlx::query(
            "INSERT INTO voterOptions (id, optIn) VALUES (?1, ?2) ON CONFLICT (id) DO UPDATE SET optIn = excluded.optIn",
        )
        .bind(subject_id)
        .bind(value)
        .execute(&pool)
        .await?;

        Ok(value)
    }

    async fn get_opt_preference(
        &self,
        subject_id: &str,
    ) -> Result<Option<OptPreference>, VoteStoreError> {
        let pool = self.pool()?;
        let row = sqlx::query("SELECT id, optIn FROM voterOptions WHERE id = ?1")
            .bind(subject_id)
            .fetch_optional(&pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        // A NULL flag carries no preference; the store default applies.
        let opted_in: Option<bool> = row.try_get("optIn")?;
        Ok(opted_in.map(|opted_in| OptPreference {
            subject_id: subject_id.to_string(),
            opted_in,
        }))
    }
}
