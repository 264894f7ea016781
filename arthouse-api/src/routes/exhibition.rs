//! Exhibition REST API Routes

use axum::{
    extract::{Path, RawQuery, State},
    routing::get,
    Json, Router,
};

use arthouse_core::{Artist, Artwork, Exhibition};

use crate::{cached_catalog::CachedCatalog, error::ApiResult, state::AppState};

/// GET /api/exhibition - List exhibitions
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/exhibition",
    tag = "Exhibitions",
    params(super::ListParams),
    responses(
        (status = 200, description = "A page of exhibitions", body = Vec<Exhibition>),
        (status = 500, description = "Datastore failure", body = crate::error::ApiError),
    ),
))]
pub async fn list_exhibitions(
    State(catalog): State<CachedCatalog>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<Exhibition>>> {
    let exhibitions = catalog
        .list_exhibitions(query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(exhibitions))
}

/// GET /api/exhibition/{id} - Get exhibition by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/exhibition/{id}",
    tag = "Exhibitions",
    params(("id" = String, Path, description = "Exhibition ObjectId")),
    responses(
        (status = 200, description = "Exhibition details", body = Exhibition),
        (status = 400, description = "Exhibition not found", body = crate::error::ApiError),
        (status = 422, description = "Malformed ID", body = crate::error::ApiError),
    ),
))]
pub async fn get_exhibition(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<String>,
) -> ApiResult<Json<Exhibition>> {
    Ok(Json(catalog.exhibition(&id).await?))
}

/// GET /api/exhibition/{id}/artwork - List artworks shown in an exhibition
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/exhibition/{id}/artwork",
    tag = "Exhibitions",
    params(("id" = String, Path, description = "Exhibition ObjectId"), super::ArtworkListParams),
    responses(
        (status = 200, description = "A page of the exhibition's artworks", body = Vec<Artwork>),
        (status = 400, description = "Exhibition not found", body = crate::error::ApiError),
        (status = 422, description = "Malformed ID", body = crate::error::ApiError),
    ),
))]
pub async fn list_exhibition_artworks(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<Artwork>>> {
    let artworks = catalog
        .exhibition_artworks(&id, query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(artworks))
}

/// GET /api/exhibition/{id}/artist - List artists shown in an exhibition
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/exhibition/{id}/artist",
    tag = "Exhibitions",
    params(("id" = String, Path, description = "Exhibition ObjectId"), super::ListParams),
    responses(
        (status = 200, description = "A page of the exhibition's artists", body = Vec<Artist>),
        (status = 400, description = "Exhibition not found", body = crate::error::ApiError),
        (status = 422, description = "Malformed ID", body = crate::error::ApiError),
    ),
))]
pub async fn list_exhibition_artists(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<Artist>>> {
    let artists = catalog
        .exhibition_artists(&id, query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(artists))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exhibitions))
        .route("/:id", get(get_exhibition))
        .route("/:id/artwork", get(list_exhibition_artworks))
        .route("/:id/artist", get(list_exhibition_artists))
}
