//! In-memory record store
//!
//! Backs the `memory` database backend and the test suite. Collections are
//! insertion-ordered vectors, so unsorted reads come back in creation order.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{
    new_document_id, Filter, FindOptions, Patch, RecordStore, SortOrder, StoreResult,
    UpdateOptions, UpdateReport,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_id(doc: &mut Value) -> String {
    if let Some(id) = doc.get("id").and_then(Value::as_str) {
        return id.to_string();
    }
    let id = new_document_id();
    if let Some(obj) = doc.as_object_mut() {
        obj.insert("id".to_string(), Value::String(id.clone()));
    }
    id
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut doc: Value) -> StoreResult<String> {
        let id = ensure_id(&mut doc);
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(doc);
        Ok(id)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        opts: &FindOptions,
    ) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        let mut matches: Vec<Value> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, order)) = &opts.sort {
            matches.sort_by(|a, b| {
                let ord = compare_field(a, b, field);
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }

        let skipped = matches.into_iter().skip(opts.skip);
        Ok(match opts.limit {
            Some(limit) => skipped.take(limit).collect(),
            None => skipped.collect(),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        patch: &Patch,
        opts: &UpdateOptions,
    ) -> StoreResult<UpdateReport> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| filter.matches(doc)) {
            let before = doc.clone();
            patch.apply(doc);
            return Ok(UpdateReport {
                matched: 1,
                modified: u64::from(*doc != before),
                upserted_id: None,
            });
        }

        if !opts.upsert {
            return Ok(UpdateReport::default());
        }

        let mut doc = Value::Object(filter.equality_fields());
        patch.apply(&mut doc);
        let id = ensure_id(&mut doc);
        docs.push(doc);
        Ok(UpdateReport {
            matched: 0,
            modified: 0,
            upserted_id: Some(id),
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(pos) => {
                docs.remove(pos);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
