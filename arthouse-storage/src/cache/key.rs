//! Cache key derivation.
//!
//! Keys are plain strings with three shapes:
//!
//! - record: `{namespace}:{id}`
//! - list: `{namespace}?{raw_query}`
//! - related: `{namespace}:{parent_id}:{relation}?{raw_query}`
//!
//! The raw query string is used verbatim, so `?a=1&b=2` and `?b=2&a=1` are
//! different keys.

use std::fmt;

use arthouse_core::EntityKind;

/// A derived cache key. Only constructible through the shape constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a single record.
    pub fn record(namespace: EntityKind, id: &str) -> Self {
        Self(format!("{}:{}", namespace, id))
    }

    /// Key for a list query.
    pub fn list(namespace: EntityKind, raw_query: &str) -> Self {
        Self(format!("{}?{}", namespace, raw_query))
    }

    /// Key for a relationship query. `relation` is the related entity kind,
    /// rendered singular (`artist`, `artwork`).
    pub fn related(
        namespace: EntityKind,
        parent_id: &str,
        relation: EntityKind,
        raw_query: &str,
    ) -> Self {
        Self(format!(
            "{}:{}:{}?{}",
            namespace, parent_id, relation, raw_query
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key() {
        let key = CacheKey::record(EntityKind::Artwork, "65a1b2c3d4e5f60718293a4b");
        assert_eq!(key.as_str(), "artwork:65a1b2c3d4e5f60718293a4b");
    }

    #[test]
    fn test_list_key_uses_raw_query() {
        assert_eq!(
            CacheKey::list(EntityKind::Artist, "limit=5&sort=name:asc").as_str(),
            "artist?limit=5&sort=name:asc"
        );
        assert_eq!(CacheKey::list(EntityKind::Exhibition, "").as_str(), "exhibition?");
        assert_ne!(
            CacheKey::list(EntityKind::Artist, "a=1&b=2"),
            CacheKey::list(EntityKind::Artist, "b=2&a=1")
        );
    }

    #[test]
    fn test_related_key() {
        let key = CacheKey::related(EntityKind::Exhibition, "abc", EntityKind::Artist, "skip=2");
        assert_eq!(key.as_str(), "exhibition:abc:artist?skip=2");
        let key = CacheKey::related(EntityKind::Artist, "abc", EntityKind::Artwork, "");
        assert_eq!(key.as_str(), "artist:abc:artwork?");
    }
}
