use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::entry::{MoodEntry, NewMoodEntry};
use crate::models::subscription::Subscription;
use crate::store::{EntryStore, SubscriptionStore};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryStore for PgStore {
    async fn fetch_entries(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> Result<Vec<MoodEntry>, sqlx::Error> {
        sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1 AND entry_date >= $2
            ORDER BY entry_date DESC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.db)
        .await
    }

    async fn upsert_entry(&self, entry: NewMoodEntry) -> Result<MoodEntry, sqlx::Error> {
        sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries
                (id, user_id, entry_date, mood, sleep_hours, stress_level, activities, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, entry_date) DO UPDATE SET
                mood = EXCLUDED.mood,
                sleep_hours = EXCLUDED.sleep_hours,
                stress_level = EXCLUDED.stress_level,
                activities = EXCLUDED.activities,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&entry.user_id)
        .bind(entry.entry_date)
        .bind(entry.mood)
        .bind(entry.sleep_hours)
        .bind(entry.stress_level)
        .bind(&entry.activities)
        .bind(&entry.notes)
        .fetch_one(&self.db)
        .await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl SubscriptionStore for PgStore {
    async fn find_or_start_trial(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        trial: Duration,
    ) -> Result<Subscription, sqlx::Error> {
        let trial_sub = Subscription::new_trial(user_id, now, trial);

        // No-op when the user already has a row; the SELECT below returns it.
        sqlx::query(
            r#"
            INSERT INTO subscriptions
                (id, user_id, plan, status, trial_start_date, trial_end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(trial_sub.id)
        .bind(&trial_sub.user_id)
        .bind(trial_sub.plan)
        .bind(trial_sub.status)
        .bind(trial_sub.trial_start_date)
        .bind(trial_sub.trial_end_date)
        .execute(&self.db)
        .await?;

        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await
    }

    async fn activate(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        period: Duration,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            UPDATE subscriptions SET
                plan = 'pro',
                status = 'active',
                subscription_start_date = $2,
                subscription_end_date = $3,
                last_payment_date = $2,
                updated_at = $2
            WHERE user_id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(now + period)
        .fetch_optional(&self.db)
        .await
    }
}
