//! Health Check Endpoint
//!
//! `/api/health` answers 200 while the datastore responds to a ping and 503
//! otherwise. It never touches the cache.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use arthouse_storage::DocumentStore;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// Always `"OKAY"`
    pub status: String,
    pub uptime_secs: u64,
}

/// GET /api/health - Liveness plus datastore connectivity
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and datastore are up", body = HealthResponse),
        (status = 503, description = "Datastore unreachable", body = crate::error::ApiError),
    ),
))]
pub async fn health(
    State(db): State<Arc<dyn DocumentStore>>,
    State(start_time): State<Instant>,
) -> ApiResult<Json<HealthResponse>> {
    if let Err(e) = db.ping().await {
        tracing::warn!(error = %e, "Health check failed");
        return Err(ApiError::service_unavailable("Datastore unavailable"));
    }
    Ok(Json(HealthResponse {
        status: "OKAY".to_string(),
        uptime_secs: start_time.elapsed().as_secs(),
    }))
}

pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(health))
}
