/// Liveness and readiness probe
///
/// `GET /health` never requires a token and never fails the request: a broken
/// database turns the body into `"degraded"` instead of an error status, so a
/// load balancer can tell "process up" apart from "fully healthy".
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::db::pool;

/// Body of the health probe
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Crate version baked in at compile time
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,
}

/// Reports process and database health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let db_ok = pool::health_check(&state.db).await.is_ok();

    Ok(Json(HealthResponse {
        status: if db_ok { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if db_ok { "connected" } else { "disconnected" }.to_string(),
    }))
}
