//! Arthouse API - HTTP Layer
//!
//! An axum service over the art catalog. Every read goes through
//! [`CachedCatalog`], which fronts the entity stores with a read-through
//! cache keyed on the request path and raw query string.

pub mod cached_catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod macros;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod seed;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use cached_catalog::{ApiCache, CachedCatalog};
pub use config::{AppConfig, ConfigError};
pub use db::{StoreConfig, StoreUri};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::{AppState, StartupError};
