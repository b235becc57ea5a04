use super::{mean, Insight, Priority, Recommendation};
use crate::models::entry::MoodEntry;

pub const MAX_RECOMMENDATIONS: usize = 4;

const MIN_AVG_SLEEP_HOURS: f64 = 7.0;
const MAX_AVG_STRESS: f64 = 6.0;

const IMPROVE_SLEEP: Recommendation = Recommendation {
    title: "Improve your sleep hygiene",
    description: "You average under 7 hours of sleep. Try going to bed 30 minutes earlier.",
    action: "sleep_improvement",
    icon: "Moon",
    priority: Priority::High,
};

const REDUCE_STRESS: Recommendation = Recommendation {
    title: "Stress reduction techniques",
    description: "Try the 4-7-8 breathing exercise or a short meditation.",
    action: "stress_reduction",
    icon: "Wind",
    priority: Priority::High,
};

const MORE_WALKS: Recommendation = Recommendation {
    title: "Add more walks",
    description: "Daily walks outdoors lift your mood and lower stress.",
    action: "more_walking",
    icon: "Footprints",
    priority: Priority::Medium,
};

const TRY_MEDITATION: Recommendation = Recommendation {
    title: "Try meditation",
    description: "A 5-minute morning meditation helps you start the day calmly.",
    action: "start_meditation",
    icon: "Brain",
    priority: Priority::Medium,
};

/// Suggestions derived from raw entries, in rule order and capped at
/// [`MAX_RECOMMENDATIONS`]. `_insights` is not consulted by the current rules.
pub fn recommend(_insights: &[Insight], entries: &[MoodEntry]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if mean(entries.iter().map(|e| e.sleep_hours))
        .is_some_and(|avg| avg < MIN_AVG_SLEEP_HOURS)
    {
        recommendations.push(IMPROVE_SLEEP);
    }

    if mean(entries.iter().map(|e| f64::from(e.stress_level)))
        .is_some_and(|avg| avg > MAX_AVG_STRESS)
    {
        recommendations.push(REDUCE_STRESS);
    }

    // Share thresholds compared in integers: walks < 30%, meditation < 20%.
    let total = entries.len();
    if activity_days(entries, "walk") * 10 < total * 3 {
        recommendations.push(MORE_WALKS);
    }
    if activity_days(entries, "meditation") * 5 < total {
        recommendations.push(TRY_MEDITATION);
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

fn activity_days(entries: &[MoodEntry], tag: &str) -> usize {
    entries.iter().filter(|e| e.has_activity(tag)).count()
}
