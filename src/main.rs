use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod insights;
mod models;
mod store;

use config::Config;
use store::{EntryStore, MemoryStore, SubscriptionStore};

#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<dyn EntryStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodtrack_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    let state = match &config.database_url {
        Some(database_url) => {
            let db = db::create_pool(database_url)
                .await
                .context("Failed to create database pool")?;

            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations applied");

            let store = Arc::new(db::PgStore::new(db));
            AppState {
                entries: store.clone(),
                subscriptions: store,
                config: config.clone(),
            }
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            let store = Arc::new(MemoryStore::new());
            AppState {
                entries: store.clone(),
                subscriptions: store,
                config: config.clone(),
            }
        }
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route(
            "/api/entries",
            get(handlers::entries::list_entries).post(handlers::entries::upsert_entry),
        )
        .route("/api/insights", get(handlers::insights::get_insights))
        .route(
            "/api/subscription",
            get(handlers::subscription::get_subscription)
                .post(handlers::subscription::subscription_action),
        )
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin unless `FRONTEND_URL` pins the frontend.
fn allowed_origins(config: &Config) -> AllowOrigin {
    let Some(frontend_url) = &config.frontend_url else {
        return AllowOrigin::any();
    };

    let origins: Vec<HeaderValue> = std::iter::once(frontend_url)
        .chain(&config.cors_extra_origins)
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let store = Arc::new(MemoryStore::new());
        build_router(AppState {
            entries: store.clone(),
            subscriptions: store,
            config: Arc::new(Config::default()),
        })
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn days_ago(n: i64) -> String {
        (Utc::now().date_naive() - Duration::days(n)).to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _) = send(&app, get("/readyz")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_entry_upsert_and_list() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_json(
                "/api/entries",
                json!({
                    "user_id": "alice",
                    "entry_date": days_ago(1),
                    "mood": 6,
                    "sleep_hours": 7.5,
                    "stress_level": 4,
                    "activities": ["walk"],
                    "notes": "fine"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entry"]["mood"], 6);
        assert_eq!(body["entry"]["activities"], json!(["walk"]));

        // Same day again overwrites.
        send(
            &app,
            post_json(
                "/api/entries",
                json!({
                    "user_id": "alice",
                    "entry_date": days_ago(1),
                    "mood": 9,
                    "sleep_hours": 8.0,
                    "stress_level": 2
                }),
            ),
        )
        .await;
        send(
            &app,
            post_json(
                "/api/entries",
                json!({"user_id": "alice", "mood": 5, "sleep_hours": 6.5, "stress_level": 5}),
            ),
        )
        .await;

        let (status, body) = send(&app, get("/api/entries?user_id=alice")).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["entry_date"], json!(days_ago(0)));
        assert_eq!(entries[1]["mood"], 9);
    }

    #[tokio::test]
    async fn test_invalid_entry_rejected() {
        let app = test_app();
        let (status, body) = send(
            &app,
            post_json(
                "/api/entries",
                json!({"mood": 12, "sleep_hours": 7.0, "stress_level": 3}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], 422);
    }

    #[tokio::test]
    async fn test_invalid_window_rejected() {
        let app = test_app();
        let (status, _) = send(&app, get("/api/entries?days=0")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_insights_insufficient_data() {
        let app = test_app();
        for n in 0..2 {
            send(
                &app,
                post_json(
                    "/api/entries",
                    json!({
                        "user_id": "bob",
                        "entry_date": days_ago(n),
                        "mood": 5,
                        "sleep_hours": 7.0,
                        "stress_level": 5
                    }),
                ),
            )
            .await;
        }

        let (status, body) = send(&app, get("/api/insights?user_id=bob")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["insights"], json!([]));
        assert_eq!(body["recommendations"], json!([]));
        assert_eq!(body["message"], insights::INSUFFICIENT_DATA_MESSAGE);
        assert!(body.get("stats").is_none());
    }

    #[tokio::test]
    async fn test_insights_for_mixed_days() {
        let app = test_app();
        let rows = [
            (0, 8, 8.5, 2),
            (1, 4, 5.0, 8),
            (2, 7, 7.5, 4),
        ];
        for (n, mood, sleep, stress) in rows {
            send(
                &app,
                post_json(
                    "/api/entries",
                    json!({
                        "user_id": "carol",
                        "entry_date": days_ago(n),
                        "mood": mood,
                        "sleep_hours": sleep,
                        "stress_level": stress
                    }),
                ),
            )
            .await;
        }

        let (status, body) = send(&app, get("/api/insights?user_id=carol&days=7")).await;
        assert_eq!(status, StatusCode::OK);
        let types: Vec<&str> = body["insights"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|i| i["type"].as_str())
            .collect();
        assert_eq!(types, vec!["sleep_mood_correlation", "stress_mood_correlation"]);
        assert_eq!(body["stats"]["mood_trend"], "improving");
        assert_eq!(body["stats"]["total_entries"], 3);
        assert!(body["recommendations"].as_array().unwrap().len() <= 4);
    }

    #[tokio::test]
    async fn test_subscription_trial_then_activate() {
        let app = test_app();

        let (status, body) = send(
            &app,
            post_json("/api/subscription", json!({"user_id": "dave"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 404);

        let (status, body) = send(&app, get("/api/subscription?user_id=dave")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "trial");
        assert_eq!(body["has_access"], true);
        assert_eq!(body["is_trial"], true);

        let (status, body) = send(
            &app,
            post_json("/api/subscription", json!({"user_id": "dave", "action": "activate"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["subscription"]["plan"], "pro");
        assert_eq!(body["subscription"]["status"], "active");

        let (_, body) = send(&app, get("/api/subscription?user_id=dave")).await;
        assert_eq!(body["has_access"], true);
        assert_eq!(body["is_trial"], false);
        let days_left = body["days_left"].as_i64().unwrap();
        assert!((29..=30).contains(&days_left));
    }

    #[tokio::test]
    async fn test_unknown_subscription_action_rejected() {
        let app = test_app();
        let (status, _) = send(
            &app,
            post_json("/api/subscription", json!({"action": "cancel"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
