//! Page-size bounds for list queries.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::EntityKind;

/// Default page size.
pub const DEFAULT_LIMIT: i64 = 15;
/// Smallest accepted page size.
pub const DEFAULT_MIN_LIMIT: i64 = 1;
/// Largest accepted page size.
pub const DEFAULT_MAX_LIMIT: i64 = 100;

/// `{default, min, max}` page-size triple for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitConfig {
    pub default: i64,
    pub min: i64,
    pub max: i64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_LIMIT,
            min: DEFAULT_MIN_LIMIT,
            max: DEFAULT_MAX_LIMIT,
        }
    }
}

impl LimitConfig {
    pub fn new(default: i64, min: i64, max: i64) -> Self {
        Self { default, min, max }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Check that `min <= default <= max` and that `min` is positive.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min < 1 {
            return Err(ConfigError::invalid_limit("min", self.min, "must be positive"));
        }
        if self.min > self.max {
            return Err(ConfigError::invalid_limit(
                "min",
                self.min,
                format!("exceeds max {}", self.max),
            ));
        }
        if !self.contains(self.default) {
            return Err(ConfigError::invalid_limit(
                "default",
                self.default,
                format!("outside [{}, {}]", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Limit triples for every entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogLimits {
    pub artist: LimitConfig,
    pub artwork: LimitConfig,
    pub exhibition: LimitConfig,
}

impl CatalogLimits {
    pub fn get(&self, entity: EntityKind) -> LimitConfig {
        match entity {
            EntityKind::Artist => self.artist,
            EntityKind::Artwork => self.artwork,
            EntityKind::Exhibition => self.exhibition,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for entity in [EntityKind::Artist, EntityKind::Artwork, EntityKind::Exhibition] {
            self.get(entity)
                .validate()
                .map_err(|e| e.for_entity(entity))?;
        }
        Ok(())
    }
}
