//! Error types for catalog reads and bulk loads

use thiserror::Error;

use crate::EntityKind;

/// Datastore and entity-store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Invalid ID: {id:?}")]
    InvalidIdentifier { id: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("Datastore unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Duplicate key in {collection}: {id}")]
    DuplicateKey { collection: String, id: String },

    #[error("Query on {collection} failed: {reason}")]
    Query { collection: String, reason: String },

    #[error("Failed to decode {collection} document: {reason}")]
    Decode { collection: String, reason: String },
}

impl StoreError {
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn unavailable(reason: impl ToString) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn query(collection: &str, reason: impl ToString) -> Self {
        Self::Query {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(collection: &str, reason: impl ToString) -> Self {
        Self::Decode {
            collection: collection.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidLimit {
        field: String,
        value: i64,
        reason: String,
    },
}

impl ConfigError {
    pub fn invalid_limit(field: impl Into<String>, value: i64, reason: impl Into<String>) -> Self {
        Self::InvalidLimit {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Qualify the offending field with the entity kind it belongs to.
    pub fn for_entity(self, entity: EntityKind) -> Self {
        match self {
            Self::InvalidLimit {
                field,
                value,
                reason,
            } => Self::InvalidLimit {
                field: format!("{}.{}", entity, field),
                value,
                reason,
            },
        }
    }
}

/// Result type for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
