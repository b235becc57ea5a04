use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::dto::{EntriesResponse, EntryResponse};
use crate::error::AppResult;
use crate::models::entry::{EntryQuery, UpsertEntryRequest};
use crate::AppState;

pub async fn upsert_entry(
    State(state): State<AppState>,
    Json(body): Json<UpsertEntryRequest>,
) -> AppResult<Json<EntryResponse>> {
    let new_entry = body.into_new_entry(Utc::now().date_naive())?;
    let entry = state.entries.upsert_entry(new_entry).await?;

    tracing::info!(
        user_id = %entry.user_id,
        entry_date = %entry.entry_date,
        "Mood entry saved"
    );

    Ok(Json(EntryResponse { entry }))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<EntryQuery>,
) -> AppResult<Json<EntriesResponse>> {
    let window = query.window(state.config.default_window_days, Utc::now().date_naive())?;

    let entries = state
        .entries
        .fetch_entries(&window.user_id, window.since)
        .await?;

    Ok(Json(EntriesResponse { entries }))
}
