//! Artwork REST API Routes

use axum::{
    extract::{Path, RawQuery, State},
    routing::get,
    Json, Router,
};

use arthouse_core::Artwork;

use crate::{cached_catalog::CachedCatalog, error::ApiResult, state::AppState};

/// GET /api/artwork - List artworks, optionally by full-text search
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/artwork",
    tag = "Artworks",
    params(super::ArtworkListParams),
    responses(
        (status = 200, description = "A page of artworks with their artists", body = Vec<Artwork>),
        (status = 500, description = "Datastore failure", body = crate::error::ApiError),
    ),
))]
pub async fn list_artworks(
    State(catalog): State<CachedCatalog>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<Artwork>>> {
    let artworks = catalog
        .list_artworks(query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(artworks))
}

/// GET /api/artwork/{id} - Get artwork by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/artwork/{id}",
    tag = "Artworks",
    params(("id" = String, Path, description = "Artwork ObjectId")),
    responses(
        (status = 200, description = "Artwork with its artist", body = Artwork),
        (status = 400, description = "Artwork or its artist not found", body = crate::error::ApiError),
        (status = 422, description = "Malformed ID", body = crate::error::ApiError),
    ),
))]
pub async fn get_artwork(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<String>,
) -> ApiResult<Json<Artwork>> {
    Ok(Json(catalog.artwork(&id).await?))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_artworks))
        .route("/:id", get(get_artwork))
}
