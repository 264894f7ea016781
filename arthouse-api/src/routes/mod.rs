//! REST API Routes Module
//!
//! Read-only catalog routes, one module per entity, all mounted under `/api`:
//! - `/api/artist`, `/api/artwork`, `/api/exhibition` and their sub-resources
//! - `/api/health`
//! - `/api/openapi.json` (feature `openapi`)

pub mod artist;
pub mod artwork;
pub mod exhibition;
pub mod health;

use axum::{
    http::{header, Method},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::state::AppState;

pub use artist::create_router as artist_router;
pub use artwork::create_router as artwork_router;
pub use exhibition::create_router as exhibition_router;
pub use health::create_router as health_router;

// ============================================================================
// QUERY PARAMETER DOCUMENTATION
// ============================================================================

// Handlers read the raw query string so it can double as a cache key; these
// structs only describe the accepted parameters in the OpenAPI document.

/// Paging and sorting parameters.
#[cfg(feature = "openapi")]
#[allow(dead_code)]
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page size, clamped to the configured range
    limit: Option<i64>,
    /// Records to skip; negative values are ignored
    skip: Option<i64>,
    /// Comma-separated `field:asc|desc` pairs
    sort: Option<String>,
}

/// Paging, sorting and full-text search over artworks.
#[cfg(feature = "openapi")]
#[allow(dead_code)]
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ArtworkListParams {
    /// Page size, clamped to the configured range
    limit: Option<i64>,
    /// Records to skip; negative values are ignored
    skip: Option<i64>,
    /// Comma-separated `field:asc|desc` pairs
    sort: Option<String>,
    /// Text search over artwork titles
    search: Option<String>,
}

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /api/openapi.json.
#[cfg(feature = "openapi")]
async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER
// ============================================================================

/// CORS for browser clients: any origin, read-only methods.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}

/// Create the complete API router.
///
/// Layers, outermost first: CORS, request tracing, then the whole-request
/// timeout from `config.request_timeout`.
pub fn create_api_router(state: AppState, config: &AppConfig) -> Router {
    #[allow(unused_mut)]
    let mut api = Router::new()
        .nest("/artist", artist::create_router())
        .nest("/artwork", artwork::create_router())
        .nest("/exhibition", exhibition::create_router())
        .nest("/health", health::create_router());

    #[cfg(feature = "openapi")]
    {
        api = api.route("/openapi.json", axum::routing::get(openapi_json));
    }

    Router::new()
        .nest("/api", api)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
        .with_state(state)
}
