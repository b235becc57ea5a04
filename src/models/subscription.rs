use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: String,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub trial_start_date: Option<DateTime<Utc>>,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "subscription_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPlan {
    Free,
    Pro,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Expired,
}

/// Access derived from a subscription at a point in time. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub has_access: bool,
    pub is_trial: bool,
    pub days_left: i64,
}

impl Subscription {
    /// A fresh free-plan trial running from `now` for `trial`.
    pub fn new_trial(user_id: &str, now: DateTime<Utc>, trial: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            plan: SubscriptionPlan::Free,
            status: SubscriptionStatus::Trial,
            trial_start_date: Some(now),
            trial_end_date: Some(now + trial),
            subscription_start_date: None,
            subscription_end_date: None,
            last_payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the subscription onto the paid plan for `period` starting at `now`.
    pub fn activate(&mut self, now: DateTime<Utc>, period: Duration) {
        self.plan = SubscriptionPlan::Pro;
        self.status = SubscriptionStatus::Active;
        self.subscription_start_date = Some(now);
        self.subscription_end_date = Some(now + period);
        self.last_payment_date = Some(now);
        self.updated_at = now;
    }

    pub fn access_at(&self, now: DateTime<Utc>) -> Access {
        let is_trial = self.status == SubscriptionStatus::Trial;

        let live_until = match self.status {
            SubscriptionStatus::Trial => self.trial_end_date,
            SubscriptionStatus::Active => self.subscription_end_date,
            SubscriptionStatus::Expired => None,
        }
        .filter(|end| now < *end);

        match live_until {
            Some(end) => Access {
                has_access: true,
                is_trial,
                days_left: (end - now).num_days(),
            },
            None => Access {
                has_access: false,
                is_trial,
                days_left: 0,
            },
        }
    }
}
