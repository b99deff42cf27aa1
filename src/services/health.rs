use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::database::connection::DatabaseManager;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub database_ok: bool,
    pub database_response_time_ms: u64,
    pub uptime_seconds: u64,
}

#[derive(Clone)]
struct AppState {
    db: Arc<DatabaseManager>,
    start_time: DateTime<Utc>,
}

pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = AppState {
            db,
            start_time: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/live", get(liveness_check))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        Self { router }
    }
}

async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    let started = std::time::Instant::now();
    let database_ok = sqlx::query("SELECT 1")
        .fetch_one(&state.db.pool)
        .await
        .is_ok();
    let database_response_time_ms = started.elapsed().as_millis() as u64;

    let uptime_seconds = Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;

    let response = HealthResponse {
        status: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        database_ok,
        database_response_time_ms,
        uptime_seconds,
    };

    if database_ok {
        Ok(Json(response))
    } else {
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

async fn liveness_check() -> Json<&'static str> {
    Json("alive")
}
