//! Record store abstraction
//!
//! All persistent state lives in named document collections. A document is a
//! JSON object carrying an opaque unique `id` field; the store provides
//! single-document create/find/update/delete with Mongo-style filters and
//! `$set`/`$inc`-style patches. Cross-document consistency is the caller's
//! problem: the store guarantees atomicity per document only.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single field condition within a filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Ne(Value),
    /// Case-insensitive substring match against a string field.
    Contains(String),
}

/// Conjunction of field conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the generated document identifier.
    pub fn id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.to_string(), Condition::Eq(value.into())));
        self
    }

    pub fn ne(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.to_string(), Condition::Ne(value.into())));
        self
    }

    pub fn contains(mut self, field: &str, needle: &str) -> Self {
        self.conditions
            .push((field.to_string(), Condition::Contains(needle.to_string())));
        self
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    /// Whether a document satisfies every condition of this filter.
    pub fn matches(&self, doc: &Value) -> bool {
        self.conditions.iter().all(|(field, cond)| {
            let actual = doc.get(field);
            match cond {
                Condition::Eq(expected) => actual == Some(expected),
                Condition::Ne(expected) => actual != Some(expected),
                Condition::Contains(needle) => actual
                    .and_then(Value::as_str)
                    .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                    .unwrap_or(false),
            }
        })
    }

    /// Equality fields of the filter, used to seed an upserted document.
    pub fn equality_fields(&self) -> Map<String, Value> {
        self.conditions
            .iter()
            .filter_map(|(field, cond)| match cond {
                Condition::Eq(value) => Some((field.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }
}

/// A single-document patch: partial-field merge plus signed numeric deltas.
///
/// Deltas are applied as unconditional increments. The store does not validate
/// sign or bounds; a caller passing the wrong delta can drive a counter
/// negative (known gap, accepted at this layer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    set: Map<String, Value>,
    inc: Vec<(String, i64)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a merge patch from a whole JSON object.
    pub fn from_object(fields: Map<String, Value>) -> Self {
        Self {
            set: fields,
            inc: Vec::new(),
        }
    }

    pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set.insert(field.to_string(), value.into());
        self
    }

    pub fn inc(mut self, field: &str, delta: i64) -> Self {
        self.inc.push((field.to_string(), delta));
        self
    }

    pub fn set_fields(&self) -> &Map<String, Value> {
        &self.set
    }

    pub fn inc_fields(&self) -> &[(String, i64)] {
        &self.inc
    }

    /// Apply the patch to a document in place.
    pub fn apply(&self, doc: &mut Value) {
        if let Some(obj) = doc.as_object_mut() {
            for (field, value) in &self.set {
                obj.insert(field.clone(), value.clone());
            }
            for (field, delta) in &self.inc {
                let current = obj.get(field).and_then(Value::as_i64).unwrap_or(0);
                obj.insert(field.clone(), Value::from(current + delta));
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Options for `find_many`. The default returns all matches in creation order.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Option<(String, SortOrder)>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some((field.to_string(), order));
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Create a document from the filter's equality fields merged with the
    /// patch when no document matches.
    pub upsert: bool,
}

impl UpdateOptions {
    pub fn upsert() -> Self {
        Self { upsert: true }
    }
}

/// Outcome of an `update_one` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<String>,
}

/// Single-document store over named collections.
///
/// Implementations must preserve creation order for unsorted `find_many`
/// calls; pagination in the catalog relies on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a document, generating an `id` field if the document lacks one.
    /// Returns the document identifier.
    async fn insert_one(&self, collection: &str, doc: Value) -> StoreResult<String>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>>;

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        opts: &FindOptions,
    ) -> StoreResult<Vec<Value>>;

    /// Patch the first matching document. With `upsert`, a miss creates a
    /// document from the filter's equality fields merged with the patch.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
        opts: &UpdateOptions,
    ) -> StoreResult<UpdateReport>;

    /// Delete at most one matching document. Returns the deleted count.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;
}

/// Generate a fresh opaque document identifier.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
