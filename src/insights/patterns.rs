use super::{mean, Impact, Insight, InsightKind};
use crate::models::entry::MoodEntry;

const GOOD_SLEEP_HOURS: f64 = 8.0;
const POOR_SLEEP_HOURS: f64 = 6.0;
const LOW_STRESS: i32 = 3;
const HIGH_STRESS: i32 = 7;
/// Mood points one group must lead the other by to count as a correlation.
const MIN_MOOD_GAP: f64 = 0.5;
const MIN_ACTIVITY_DAYS: usize = 2;

pub fn analyze(entries: &[MoodEntry]) -> Vec<Insight> {
    [
        sleep_mood(entries),
        stress_mood(entries),
        activity_boost(entries),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Display label for an activity tag; unknown tags are shown as-is.
pub fn activity_label(tag: &str) -> &str {
    match tag {
        "walk" => "Walks",
        "workout" => "Workouts",
        "yoga" => "Yoga",
        "meditation" => "Meditation",
        "reading" => "Reading",
        other => other,
    }
}

fn sleep_mood(entries: &[MoodEntry]) -> Option<Insight> {
    let diff = mood_gap(
        entries,
        |e| e.sleep_hours >= GOOD_SLEEP_HOURS,
        |e| e.sleep_hours < POOR_SLEEP_HOURS,
    )?;

    Some(Insight {
        kind: InsightKind::SleepMoodCorrelation,
        title: "Sleep shapes your mood".into(),
        description: format!(
            "After 8+ hours of sleep your mood is on average {diff:.1} points higher"
        ),
        impact: Impact::Positive,
        metric: format!("+{}%", percent_of_scale(diff)),
    })
}

fn stress_mood(entries: &[MoodEntry]) -> Option<Insight> {
    let diff = mood_gap(
        entries,
        |e| e.stress_level <= LOW_STRESS,
        |e| e.stress_level >= HIGH_STRESS,
    )?;

    Some(Insight {
        kind: InsightKind::StressMoodCorrelation,
        title: "Stress pulls your mood down".into(),
        description: format!("On low-stress days (1-3) your mood is {diff:.1} points higher"),
        impact: Impact::Negative,
        metric: format!("-{}%", percent_of_scale(diff)),
    })
}

fn activity_boost(entries: &[MoodEntry]) -> Option<Insight> {
    // First-seen order keeps tie-breaking reproducible.
    let mut by_tag: Vec<(&str, Vec<f64>)> = Vec::new();
    for entry in entries {
        for tag in &entry.activities {
            let mood = f64::from(entry.mood);
            match by_tag.iter().position(|(t, _)| *t == tag.as_str()) {
                Some(i) => by_tag[i].1.push(mood),
                None => by_tag.push((tag.as_str(), vec![mood])),
            }
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (tag, moods) in &by_tag {
        if moods.len() < MIN_ACTIVITY_DAYS {
            continue;
        }
        let Some(avg) = mean(moods.iter().copied()) else {
            continue;
        };
        if best.map_or(true, |(_, best_avg)| avg > best_avg) {
            best = Some((*tag, avg));
        }
    }

    let (tag, best_avg) = best?;
    let overall = mean(entries.iter().map(|e| f64::from(e.mood)))?;
    if best_avg <= overall {
        return None;
    }

    tracing::trace!(tag, best_avg, overall, "Activity boost found");

    Some(Insight {
        kind: InsightKind::ActivityBoost,
        title: format!("Mood boost: {}", activity_label(tag)),
        description: format!(
            "On days with this activity your mood averages {best_avg:.1}/10"
        ),
        impact: Impact::Positive,
        metric: format!("{best_avg:.1}/10"),
    })
}

/// `mean(mood | upper) - mean(mood | lower)` when both groups are non-empty
/// and the gap exceeds [`MIN_MOOD_GAP`].
fn mood_gap(
    entries: &[MoodEntry],
    upper: impl Fn(&MoodEntry) -> bool,
    lower: impl Fn(&MoodEntry) -> bool,
) -> Option<f64> {
    let upper_mood = mean(entries.iter().filter(|e| upper(e)).map(|e| f64::from(e.mood)))?;
    let lower_mood = mean(entries.iter().filter(|e| lower(e)).map(|e| f64::from(e.mood)))?;
    let diff = upper_mood - lower_mood;
    (diff > MIN_MOOD_GAP).then_some(diff)
}

/// A mood gap as a whole percentage of the 10-point scale, truncated toward zero.
fn percent_of_scale(diff: f64) -> i64 {
    ((diff / 10.0) * 100.0) as i64
}
