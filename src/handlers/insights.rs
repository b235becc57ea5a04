use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::dto::InsightsResponse;
use crate::error::AppResult;
use crate::insights::{self, INSUFFICIENT_DATA_MESSAGE, MIN_ENTRIES};
use crate::models::entry::{EntryQuery, MoodEntry};
use crate::AppState;

pub async fn get_insights(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<InsightsResponse>> {
    let window = query.window(state.config.default_window_days, Utc::now().date_naive())?;

    let entries = state
        .entries
        .fetch_entries(&window.user_id, window.since)
        .await?;

    let response = build_insights(&entries);

    tracing::debug!(
        user_id = %window.user_id,
        entries = entries.len(),
        insights = response.insights.len(),
        recommendations = response.recommendations.len(),
        "Insights generated"
    );

    Ok(Json(response))
}

/// Runs the analysis over entries ordered most recent first, or reports
/// insufficient data without analyzing anything.
pub fn build_insights(entries: &[MoodEntry]) -> InsightsResponse {
    if entries.len() < MIN_ENTRIES {
        return InsightsResponse {
            insights: vec![],
            recommendations: vec![],
            stats: None,
            message: Some(INSUFFICIENT_DATA_MESSAGE),
        };
    }

    let found = insights::analyze(entries);
    let recommendations = insights::recommend(&found, entries);

    InsightsResponse {
        insights: found,
        recommendations,
        stats: insights::summarize(entries),
        message: None,
    }
}
