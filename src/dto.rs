//! # Request/Response DTOs
//!
//! JSON shapes for the HTTP surface that are not plain models.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Query`    → deserialized from query params
//! - `*Response` → serialized to client JSON

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::insights::{Insight, Recommendation, Stats};
use crate::models::entry::{MoodEntry, DEFAULT_USER_ID};
use crate::models::subscription::{Subscription, SubscriptionPlan, SubscriptionStatus};

// ============================================================================
// Entries
// ============================================================================

/// GET /api/entries
#[derive(Debug, Serialize)]
pub struct EntriesResponse {
    pub entries: Vec<MoodEntry>,
}

/// POST /api/entries
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry: MoodEntry,
}

// ============================================================================
// Insights
// ============================================================================

/// GET /api/insights
///
/// With too little data only `message` is set and both lists are empty.
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

// ============================================================================
// Subscription
// ============================================================================

/// GET /api/subscription query params
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionQuery {
    pub user_id: Option<String>,
}

/// GET /api/subscription
#[derive(Debug, Serialize)]
pub struct SubscriptionStatusResponse {
    pub user_id: String,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub has_access: bool,
    pub is_trial: bool,
    pub days_left: i64,
    pub trial_end_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
}

impl SubscriptionStatusResponse {
    pub fn at(sub: Subscription, now: DateTime<Utc>) -> Self {
        let access = sub.access_at(now);
        Self {
            user_id: sub.user_id,
            plan: sub.plan,
            status: sub.status,
            has_access: access.has_access,
            is_trial: access.is_trial,
            days_left: access.days_left,
            trial_end_date: sub.trial_end_date,
            subscription_end_date: sub.subscription_end_date,
        }
    }
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn default_action() -> String {
    "activate".to_string()
}

/// POST /api/subscription
#[derive(Debug, Deserialize)]
pub struct SubscriptionActionRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Only "activate" is supported. Default: "activate"
    #[serde(default = "default_action")]
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct ActivatedSubscription {
    pub id: Uuid,
    pub user_id: String,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub subscription_end_date: Option<DateTime<Utc>>,
}

impl From<Subscription> for ActivatedSubscription {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            user_id: sub.user_id,
            plan: sub.plan,
            status: sub.status,
            subscription_end_date: sub.subscription_end_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscriptionActionResponse {
    pub success: bool,
    pub subscription: ActivatedSubscription,
    pub message: String,
}
