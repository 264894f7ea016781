//! Pipeline evaluation over JSON documents.
//!
//! Both document stores load a collection snapshot and run the typed
//! [`Stage`] list through [`evaluate`]. Semantics follow document-database
//! aggregation: stages apply in order, sorts are stable, lookups join against
//! another collection and run a sub-pipeline over the joined set, unwinds fan
//! arrays out into one document per element.

pub mod text;
pub mod value;

use std::cmp::Ordering;

use arthouse_core::{Filter, SortSpec, Stage, StoreError, StoreResult};
use serde_json::{Map, Value};

use self::text::TextQuery;
use self::value::{compare_values, field_matches, get_path};

/// A stored document.
pub type Document = Map<String, Value>;

/// Read access to collections during evaluation.
pub trait CollectionSource {
    /// Every document in `collection`, in natural order. Missing collections
    /// are empty.
    fn load(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Fields covered by the collection's text index, if it has one.
    fn text_fields(&self, collection: &str) -> Option<&[String]>;
}

/// Run `pipeline` over `docs`, which belong to `collection`.
pub fn evaluate(
    source: &dyn CollectionSource,
    collection: &str,
    mut docs: Vec<Document>,
    pipeline: &[Stage],
) -> StoreResult<Vec<Document>> {
    for stage in pipeline {
        docs = match stage {
            Stage::Match(filter) => {
                let matcher = Matcher::compile(source, collection, filter)?;
                docs.into_iter().filter(|doc| matcher.matches(doc)).collect()
            }
            Stage::Sort(spec) => {
                docs.sort_by(|a, b| compare_documents(a, b, spec));
                docs
            }
            Stage::Skip(n) => docs.into_iter().skip(*n as usize).collect(),
            Stage::Limit(0) => {
                return Err(StoreError::query(collection, "limit must be positive"));
            }
            Stage::Limit(n) => {
                docs.truncate(*n as usize);
                docs
            }
            Stage::Lookup {
                from,
                local_field,
                foreign_field,
                pipeline,
                as_field,
            } => {
                let foreign = source.load(from)?;
                let mut joined = Vec::with_capacity(docs.len());
                for mut doc in docs {
                    let keys: Vec<Value> = match get_path(&doc, local_field) {
                        Some(Value::Array(items)) => items.clone(),
                        Some(value) => vec![value.clone()],
                        None => vec![Value::Null],
                    };
                    let matched: Vec<Document> = foreign
                        .iter()
                        .filter(|candidate| {
                            let value = get_path(candidate, foreign_field);
                            keys.iter().any(|key| field_matches(value, key))
                        })
                        .cloned()
                        .collect();
                    let resolved = evaluate(source, from, matched, pipeline)?;
                    doc.insert(
                        as_field.clone(),
                        Value::Array(resolved.into_iter().map(Value::Object).collect()),
                    );
                    joined.push(doc);
                }
                joined
            }
            Stage::Unwind {
                path,
                preserve_null_and_empty,
            } => unwind(docs, path, *preserve_null_and_empty),
        };
    }
    Ok(docs)
}

fn unwind(docs: Vec<Document>, path: &str, preserve: bool) -> Vec<Document> {
    let mut out = Vec::with_capacity(docs.len());
    for mut doc in docs {
        match doc.get(path) {
            Some(Value::Array(items)) if !items.is_empty() => {
                let items = items.clone();
                for item in items {
                    let mut copy = doc.clone();
                    copy.insert(path.to_string(), item);
                    out.push(copy);
                }
            }
            Some(Value::Array(_)) | Some(Value::Null) | None => {
                if preserve {
                    doc.remove(path);
                    out.push(doc);
                }
            }
            Some(_) => out.push(doc),
        }
    }
    out
}

fn compare_documents(a: &Document, b: &Document, spec: &SortSpec) -> Ordering {
    for (field, direction) in spec.iter() {
        let ord = compare_values(get_path(a, field), get_path(b, field));
        let ord = if direction.as_i32() < 0 { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// A filter bound to the collection it runs against.
enum Matcher<'a> {
    All,
    Eq { field: &'a str, value: &'a Value },
    In { field: &'a str, values: &'a [Value] },
    Text { query: TextQuery, fields: &'a [String] },
    And(Vec<Matcher<'a>>),
}

impl<'a> Matcher<'a> {
    fn compile(
        source: &'a dyn CollectionSource,
        collection: &str,
        filter: &'a Filter,
    ) -> StoreResult<Self> {
        Ok(match filter {
            Filter::All => Matcher::All,
            Filter::Eq { field, value } => Matcher::Eq { field, value },
            Filter::In { field, values } => Matcher::In { field, values },
            Filter::Text { search } => {
                let fields = source.text_fields(collection).ok_or_else(|| {
                    StoreError::query(collection, "text index required for text search")
                })?;
                Matcher::Text {
                    query: TextQuery::parse(search),
                    fields,
                }
            }
            Filter::And(inner) => Matcher::And(
                inner
                    .iter()
                    .map(|f| Matcher::compile(source, collection, f))
                    .collect::<StoreResult<_>>()?,
            ),
        })
    }

    fn matches(&self, doc: &Document) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Eq { field, value } => field_matches(get_path(doc, field), value),
            Matcher::In { field, values } => {
                let current = get_path(doc, field);
                values.iter().any(|v| field_matches(current, v))
            }
            Matcher::Text { query, fields } => query.matches(doc, fields),
            Matcher::And(inner) => inner.iter().all(|m| m.matches(doc)),
        }
    }
}
