//! Data-access seams for the handlers.
//!
//! Handlers only see these traits; `db::PgStore` backs them with PostgreSQL
//! and `MemoryStore` keeps everything in process.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::entry::{MoodEntry, NewMoodEntry};
use crate::models::subscription::Subscription;

pub mod memory;

pub use memory::MemoryStore;

#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Entries for `user_id` dated on or after `since`, most recent first.
    async fn fetch_entries(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<MoodEntry>, sqlx::Error>;

    /// Inserts the entry, or overwrites the user's entry for the same day.
    async fn upsert_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Returns the user's subscription, starting a trial of length `trial`
    /// if none exists yet.
    async fn find_or_start_trial(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        trial: Duration,
    ) -> Result<Subscription, sqlx::Error>;

    /// `None` when the user has no subscription row.
    async fn activate(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        period: Duration,
    ) -> Result<Option<Subscription>, sqlx::Error>;
}
