use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};

pub const DEFAULT_USER_ID: &str = "default_user";
pub const MAX_WINDOW_DAYS: i64 = 365;

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

/// One day of a user's mood diary. At most one row per `(user_id, entry_date)`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub mood: i32,
    pub sleep_hours: f64,
    pub stress_level: i32,
    pub activities: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn has_activity(&self, tag: &str) -> bool {
        self.activities.iter().any(|a| a == tag)
    }
}

/// A validated entry ready to be written by an `EntryStore`.
#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub user_id: String,
    pub entry_date: NaiveDate,
    pub mood: i32,
    pub sleep_hours: f64,
    pub stress_level: i32,
    pub activities: Vec<String>,
    pub notes: Option<String>,
}

/// POST /api/entries
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertEntryRequest {
    #[serde(default = "default_user_id")]
    #[validate(length(min = 1, max = 128, message = "user_id must be 1-128 characters"))]
    pub user_id: String,

    /// Default: today (UTC)
    pub entry_date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 10, message = "Mood must be 1-10"))]
    pub mood: i32,

    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be 0-24"))]
    pub sleep_hours: f64,

    #[validate(range(min = 1, max = 10, message = "Stress level must be 1-10"))]
    pub stress_level: i32,

    #[serde(default)]
    #[validate(custom = "validate_activities")]
    pub activities: Vec<String>,

    #[validate(length(max = 2000, message = "Notes must be under 2000 characters"))]
    pub notes: Option<String>,
}

fn validate_activities(activities: &Vec<String>) -> Result<(), ValidationError> {
    if activities.len() > 20 {
        return Err(ValidationError::new("too_many_activities"));
    }
    if activities
        .iter()
        .any(|a| a.trim().is_empty() || a.len() > 64)
    {
        return Err(ValidationError::new("invalid_activity_tag"));
    }
    Ok(())
}

impl UpsertEntryRequest {
    /// Validates the request and normalizes it into a storable entry.
    /// Tags are trimmed and deduplicated in first-seen order.
    pub fn into_new_entry(self, today: NaiveDate) -> AppResult<NewMoodEntry> {
        self.validate()?;

        let mut activities: Vec<String> = Vec::with_capacity(self.activities.len());
        for tag in self.activities {
            let tag = tag.trim().to_string();
            if !activities.contains(&tag) {
                activities.push(tag);
            }
        }

        Ok(NewMoodEntry {
            user_id: self.user_id,
            entry_date: self.entry_date.unwrap_or(today),
            mood: self.mood,
            sleep_hours: self.sleep_hours,
            stress_level: self.stress_level,
            activities,
            notes: self.notes,
        })
    }
}

/// GET /api/entries and GET /api/insights query params
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    pub user_id: Option<String>,
    pub days: Option<i64>,
}

/// Resolved trailing window: entries dated on or after `since`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryWindow {
    pub user_id: String,
    pub since: NaiveDate,
}

impl EntryQuery {
    pub fn window(&self, default_days: i64, today: NaiveDate) -> AppResult<EntryWindow> {
        let days = self.days.unwrap_or(default_days);
        if !(1..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(AppError::Validation(format!(
                "days must be between 1 and {MAX_WINDOW_DAYS}"
            )));
        }

        let user_id = self
            .user_id
            .clone()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(default_user_id);

        Ok(EntryWindow {
            user_id,
            since: today - Duration::days(days),
        })
    }
}
