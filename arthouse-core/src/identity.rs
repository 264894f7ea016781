//! Object identifiers for catalog records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Length of an object id in bytes.
pub const OBJECT_ID_LEN: usize = 12;

/// 12-byte record identifier, rendered as 24 lowercase hex characters.
///
/// Fresh ids take their leading six bytes from a UUIDv7 timestamp, so ids
/// created later sort after ids created earlier (at millisecond granularity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Generate a new time-ordered id.
    pub fn new() -> Self {
        let uuid = Uuid::now_v7();
        let raw = uuid.as_bytes();
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[..6].copy_from_slice(&raw[..6]);
        bytes[6..].copy_from_slice(&raw[10..16]);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; OBJECT_ID_LEN] {
        self.0
    }

    /// Parse a 24-character hex string (either case).
    pub fn parse(input: &str) -> StoreResult<Self> {
        let invalid = || StoreError::InvalidIdentifier {
            id: input.to_string(),
        };
        if input.len() != OBJECT_ID_LEN * 2 {
            return Err(invalid());
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(input, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .map_err(|_| serde::de::Error::custom(format!("invalid object id: {:?}", raw)))
    }
}

#[cfg(feature = "openapi")]
impl utoipa::ToSchema for ObjectId {
    fn name() -> std::borrow::Cow<'static, str> {
        std::borrow::Cow::Borrowed("ObjectId")
    }
}

#[cfg(feature = "openapi")]
impl utoipa::PartialSchema for ObjectId {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        utoipa::openapi::ObjectBuilder::new()
            .schema_type(utoipa::openapi::schema::SchemaType::Type(
                utoipa::openapi::schema::Type::String,
            ))
            .description(Some("24-character hex object identifier"))
            .pattern(Some("^[0-9a-fA-F]{24}$"))
            .into()
    }
}
