use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{EntryStore, SubscriptionStore};
use crate::models::entry::{MoodEntry, NewMoodEntry};
use crate::models::subscription::Subscription;

/// In-process store for single-instance runs without a database and for tests.
/// Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<(String, NaiveDate), MoodEntry>>>,
    subscriptions: Arc<Mutex<HashMap<String, Subscription>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    async fn fetch_entries(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<MoodEntry>, sqlx::Error> {
        let entries = self.entries.lock().await;
        let mut found: Vec<MoodEntry> = entries
            .values()
            .filter(|e| e.user_id == user_id && e.entry_date >= since)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
        Ok(found)
    }

    async fn upsert_entry(&self, new: NewMoodEntry) -> Result<MoodEntry, sqlx::Error> {
        let mut entries = self.entries.lock().await;
        let now = Utc::now();
        let key = (new.user_id.clone(), new.entry_date);

        let (id, created_at) = entries
            .get(&key)
            .map(|existing| (existing.id, existing.created_at))
            .unwrap_or_else(|| (Uuid::new_v4(), now));

        let entry = MoodEntry {
            id,
            user_id: new.user_id,
            entry_date: new.entry_date,
            mood: new.mood,
            sleep_hours: new.sleep_hours,
            stress_level: new.stress_level,
            activities: new.activities,
            notes: new.notes,
            created_at,
            updated_at: now,
        };
        entries.insert(key, entry.clone());
        Ok(entry)
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn find_or_start_trial(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        trial: Duration,
    ) -> Result<Subscription, sqlx::Error> {
        let mut subscriptions = self.subscriptions.lock().await;
        let sub = subscriptions
            .entry(user_id.to_string())
            .or_insert_with(|| Subscription::new_trial(user_id, now, trial));
        Ok(sub.clone())
    }

    async fn activate(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        period: Duration,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        let mut subscriptions = self.subscriptions.lock().await;
        Ok(subscriptions.get_mut(user_id).map(|sub| {
            sub.activate(now, period);
            sub.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subscription::SubscriptionStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn new_entry(user: &str, date: NaiveDate, mood: i32) -> NewMoodEntry {
        NewMoodEntry {
            user_id: user.into(),
            entry_date: date,
            mood,
            sleep_hours: 7.0,
            stress_level: 5,
            activities: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_orders_most_recent_first() {
        let store = MemoryStore::new();
        for (d, mood) in [(10, 5), (12, 7), (11, 6)] {
            store.upsert_entry(new_entry("u1", day(d), mood)).await.unwrap();
        }

        let entries = store.fetch_entries("u1", day(1)).await.unwrap();
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.entry_date).collect();
        assert_eq!(dates, vec![day(12), day(11), day(10)]);
    }

    #[tokio::test]
    async fn test_fetch_filters_by_user_and_window() {
        let store = MemoryStore::new();
        store.upsert_entry(new_entry("u1", day(5), 5)).await.unwrap();
        store.upsert_entry(new_entry("u1", day(10), 6)).await.unwrap();
        store.upsert_entry(new_entry("u2", day(10), 7)).await.unwrap();

        let entries = store.fetch_entries("u1", day(10)).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, 6);
    }

    #[tokio::test]
    async fn test_same_day_upsert_overwrites() {
        let store = MemoryStore::new();
        let first = store.upsert_entry(new_entry("u1", day(10), 3)).await.unwrap();
        let second = store.upsert_entry(new_entry("u1", day(10), 9)).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.created_at, second.created_at);

        let entries = store.fetch_entries("u1", day(1)).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mood, 9);
    }

    #[tokio::test]
    async fn test_trial_is_started_once() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let first = store
            .find_or_start_trial("u1", now, Duration::days(2))
            .await
            .unwrap();
        let second = store
            .find_or_start_trial("u1", now + Duration::hours(5), Duration::days(2))
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.trial_end_date, second.trial_end_date);
    }

    #[tokio::test]
    async fn test_activate_unknown_user_returns_none() {
        let store = MemoryStore::new();
        let result = store
            .activate("nobody", Utc::now(), Duration::days(30))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_activate_existing_subscription() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .find_or_start_trial("u1", now, Duration::days(2))
            .await
            .unwrap();
        let sub = store
            .activate("u1", now, Duration::days(30))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.subscription_end_date, Some(now + Duration::days(30)));
    }
}
