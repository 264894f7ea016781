//! Artist REST API Routes

use axum::{
    extract::{Path, RawQuery, State},
    routing::get,
    Json, Router,
};

use arthouse_core::{Artist, Artwork};

use crate::{cached_catalog::CachedCatalog, error::ApiResult, state::AppState};

/// GET /api/artist - List artists
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/artist",
    tag = "Artists",
    params(super::ListParams),
    responses(
        (status = 200, description = "A page of artists", body = Vec<Artist>),
        (status = 500, description = "Datastore failure", body = crate::error::ApiError),
    ),
))]
pub async fn list_artists(
    State(catalog): State<CachedCatalog>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<Artist>>> {
    let artists = catalog
        .list_artists(query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(artists))
}

/// GET /api/artist/{id} - Get artist by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/artist/{id}",
    tag = "Artists",
    params(("id" = String, Path, description = "Artist ObjectId")),
    responses(
        (status = 200, description = "Artist details", body = Artist),
        (status = 400, description = "Artist not found", body = crate::error::ApiError),
        (status = 422, description = "Malformed ID", body = crate::error::ApiError),
    ),
))]
pub async fn get_artist(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<String>,
) -> ApiResult<Json<Artist>> {
    Ok(Json(catalog.artist(&id).await?))
}

/// GET /api/artist/{id}/artwork - List an artist's artworks
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/artist/{id}/artwork",
    tag = "Artists",
    params(("id" = String, Path, description = "Artist ObjectId"), super::ArtworkListParams),
    responses(
        (status = 200, description = "A page of the artist's artworks", body = Vec<Artwork>),
        (status = 400, description = "Artist not found", body = crate::error::ApiError),
        (status = 422, description = "Malformed ID", body = crate::error::ApiError),
    ),
))]
pub async fn list_artist_artworks(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<Vec<Artwork>>> {
    let artworks = catalog
        .artist_artworks(&id, query.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(artworks))
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_artists))
        .route("/:id", get(get_artist))
        .route("/:id/artwork", get(list_artist_artworks))
}
