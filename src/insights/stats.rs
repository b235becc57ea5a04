use super::{mean, MoodTrend, Stats, MIN_ENTRIES};
use crate::models::entry::MoodEntry;

/// Descriptive statistics over `entries` (most recent first). `None` when empty.
///
/// The trend is a two-point comparison of the newest and oldest mood in the
/// window, not a regression.
pub fn summarize(entries: &[MoodEntry]) -> Option<Stats> {
    let newest = entries.first()?;
    let oldest = entries.last()?;

    let avg_mood = mean(entries.iter().map(|e| f64::from(e.mood)))?;
    let avg_sleep = mean(entries.iter().map(|e| e.sleep_hours))?;
    let avg_stress = mean(entries.iter().map(|e| f64::from(e.stress_level)))?;

    let best_mood = entries.iter().map(|e| e.mood).max()?;
    let worst_mood = entries.iter().map(|e| e.mood).min()?;

    let mood_trend = if entries.len() >= MIN_ENTRIES && newest.mood > oldest.mood {
        MoodTrend::Improving
    } else {
        MoodTrend::Stable
    };

    Some(Stats {
        avg_mood: round1(avg_mood),
        avg_sleep: round1(avg_sleep),
        avg_stress: round1(avg_stress),
        best_mood,
        worst_mood,
        total_entries: entries.len(),
        mood_trend,
    })
}

/// Rounds to one decimal the same way `{:.1}` displays it, so stats agree
/// with the insight text.
fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
