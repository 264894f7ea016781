//! Typed aggregation pipeline stages.
//!
//! A pipeline is an ordered `Vec<Stage>` evaluated left to right against a
//! collection. Stages are plain values; composing a pipeline is just building
//! a vector, so query builders and entity stores can splice stages together
//! without touching a datastore.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// SORT
// ============================================================================

/// Sort direction, encoded as `1` / `-1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    /// Parse the `asc` / `desc` tokens accepted in `sort` parameters.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

impl From<SortDirection> for i32 {
    fn from(direction: SortDirection) -> Self {
        direction.as_i32()
    }
}

impl TryFrom<i32> for SortDirection {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SortDirection::Ascending),
            -1 => Ok(SortDirection::Descending),
            other => Err(format!("invalid sort direction: {}", other)),
        }
    }
}

/// Ordered sort keys. Earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec(Vec<(String, SortDirection)>);

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. A field that is already present keeps its position and
    /// takes the new direction.
    pub fn push(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == field) {
            Some(entry) => entry.1 = direction,
            None => self.0.push((field, direction)),
        }
    }

    pub fn with(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.push(field, direction);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<SortDirection> {
        self.0
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, direction)| *direction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.0.iter().map(|(field, direction)| (field.as_str(), *direction))
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Match predicate for `Stage::Match` and plain finds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    /// `field == value`; an array field matches if any element equals `value`.
    Eq { field: String, value: Value },
    /// `field` equals one of `values`.
    In { field: String, values: Vec<Value> },
    /// Full-text search over the collection's text index.
    Text { search: String },
    /// Every inner filter matches.
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Filter::In {
            field: field.into(),
            values,
        }
    }

    pub fn text(search: impl Into<String>) -> Self {
        Filter::Text {
            search: search.into(),
        }
    }

    pub fn is_all(&self) -> bool {
        match self {
            Filter::All => true,
            Filter::And(inner) => inner.iter().all(Filter::is_all),
            _ => false,
        }
    }
}

// ============================================================================
// FIND OPTIONS
// ============================================================================

/// Options for a plain (non-pipeline) find.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindOptions {
    pub sort: Option<SortSpec>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl FindOptions {
    /// Equivalent pipeline tail: `[sort?, skip?, limit?]`.
    pub fn into_stages(self) -> Vec<Stage> {
        let mut stages = Vec::with_capacity(3);
        if let Some(sort) = self.sort {
            stages.push(Stage::Sort(sort));
        }
        if let Some(skip) = self.skip {
            stages.push(Stage::Skip(skip));
        }
        if let Some(limit) = self.limit {
            stages.push(Stage::Limit(limit));
        }
        stages
    }
}

// ============================================================================
// STAGES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Match(Filter),
    Sort(SortSpec),
    Skip(u64),
    Limit(u64),
    /// Join documents from `from` whose `foreign_field` equals the value (or
    /// any element) of `local_field`, run `pipeline` over the joined set, and
    /// store the result as an array in `as_field`.
    Lookup {
        from: String,
        local_field: String,
        foreign_field: String,
        pipeline: Vec<Stage>,
        as_field: String,
    },
    /// Emit one document per element of the array at `path`. Documents whose
    /// array is missing or empty are dropped unless `preserve_null_and_empty`.
    Unwind {
        path: String,
        preserve_null_and_empty: bool,
    },
}

impl Stage {
    pub fn lookup(
        from: impl Into<String>,
        local_field: impl Into<String>,
        foreign_field: impl Into<String>,
        as_field: impl Into<String>,
    ) -> Self {
        Stage::Lookup {
            from: from.into(),
            local_field: local_field.into(),
            foreign_field: foreign_field.into(),
            pipeline: Vec::new(),
            as_field: as_field.into(),
        }
    }

    /// Inner unwind: rows without a match disappear.
    pub fn unwind(path: impl Into<String>) -> Self {
        Stage::Unwind {
            path: path.into(),
            preserve_null_and_empty: false,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "match",
            Stage::Sort(_) => "sort",
            Stage::Skip(_) => "skip",
            Stage::Limit(_) => "limit",
            Stage::Lookup { .. } => "lookup",
            Stage::Unwind { .. } => "unwind",
        }
    }
}
