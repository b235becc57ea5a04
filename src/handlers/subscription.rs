use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};

use crate::dto::{
    SubscriptionActionRequest, SubscriptionActionResponse, SubscriptionQuery,
    SubscriptionStatusResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::entry::DEFAULT_USER_ID;
use crate::AppState;

/// Returns the caller's subscription with derived access, starting a trial
/// on first contact.
pub async fn get_subscription(
    State(state): State<AppState>,
    Query(query): Query<SubscriptionQuery>,
) -> AppResult<Json<SubscriptionStatusResponse>> {
    let user_id = query
        .user_id
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());
    let now = Utc::now();

    let sub = state
        .subscriptions
        .find_or_start_trial(&user_id, now, Duration::days(state.config.trial_days))
        .await?;

    Ok(Json(SubscriptionStatusResponse::at(sub, now)))
}

pub async fn subscription_action(
    State(state): State<AppState>,
    Json(body): Json<SubscriptionActionRequest>,
) -> AppResult<Json<SubscriptionActionResponse>> {
    if body.action != "activate" {
        return Err(AppError::Validation(format!(
            "Unknown subscription action: {}",
            body.action
        )));
    }

    let sub = state
        .subscriptions
        .activate(
            &body.user_id,
            Utc::now(),
            Duration::days(state.config.subscription_days),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".into()))?;

    tracing::info!(
        user_id = %sub.user_id,
        subscription_end_date = ?sub.subscription_end_date,
        "Subscription activated"
    );

    Ok(Json(SubscriptionActionResponse {
        success: true,
        subscription: sub.into(),
        message: "Subscription activated".into(),
    }))
}
