//! # Mood insights
//!
//! Pure analysis over a user's entries for a trailing window. Callers pass
//! entries ordered by `entry_date` descending and must have at least
//! [`MIN_ENTRIES`] of them; below that the boundary reports
//! [`INSUFFICIENT_DATA_MESSAGE`] instead of calling in here.
//!
//! - [`patterns::analyze`] finds sleep, stress and activity correlations
//! - [`recommendations::recommend`] derives up to four suggestions
//! - [`stats::summarize`] computes descriptive statistics and the trend
//!
//! The three are independent and never fail: a rule whose partition is
//! empty is skipped.

use serde::Serialize;

pub mod patterns;
pub mod recommendations;
pub mod stats;

pub use patterns::analyze;
pub use recommendations::recommend;
pub use stats::summarize;

pub const MIN_ENTRIES: usize = 3;
pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "Not enough data for analysis yet. Add a few more entries.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    SleepMoodCorrelation,
    StressMoodCorrelation,
    ActivityBoost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub metric: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
    pub action: &'static str,
    pub icon: &'static str,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTrend {
    Improving,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub avg_mood: f64,
    pub avg_sleep: f64,
    pub avg_stress: f64,
    pub best_mood: i32,
    pub worst_mood: i32,
    pub total_entries: usize,
    pub mood_trend: MoodTrend,
}

/// Arithmetic mean, or `None` for an empty partition.
pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
