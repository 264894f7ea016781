//! OpenAPI Specification for the Arthouse API
//!
//! Generated by utoipa from the route annotations and the catalog types.

use utoipa::OpenApi;

use arthouse_core::{Artist, Artwork, Exhibition, Image, ObjectId};

use crate::error::ApiError;
use crate::routes::{artist, artwork, exhibition, health, health::HealthResponse};

/// OpenAPI document for the Arthouse API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Arthouse API",
        version = "0.1.0",
        description = "Read-only catalog of artists, artworks and exhibitions",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local Development")
    ),
    tags(
        (name = "Artists", description = "Artists and the artworks they made"),
        (name = "Artworks", description = "Artworks with their artist embedded"),
        (name = "Exhibitions", description = "Exhibitions and what they show"),
        (name = "Health", description = "Liveness and datastore connectivity")
    ),
    paths(
        artist::list_artists,
        artist::get_artist,
        artist::list_artist_artworks,
        artwork::list_artworks,
        artwork::get_artwork,
        exhibition::list_exhibitions,
        exhibition::get_exhibition,
        exhibition::list_exhibition_artworks,
        exhibition::list_exhibition_artists,
        health::health,
    ),
    components(schemas(
        Artist,
        Artwork,
        Exhibition,
        Image,
        ObjectId,
        ApiError,
        HealthResponse,
    ))
)]
pub struct ApiDoc;
