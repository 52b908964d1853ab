//! Requisitions repository

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::requisition::{ModeratorStatus, ReaderStatus, Requisition},
    store::{Filter, FindOptions, Patch, RecordStore, UpdateOptions, UpdateReport},
};

use super::{decode, decode_many, encode};

const COLLECTION: &str = "requisitions";

#[derive(Clone)]
pub struct RequisitionsRepository {
    store: Arc<dyn RecordStore>,
}

impl RequisitionsRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Insert a requisition. No natural key; every request opens a new record.
    pub async fn create(&self, requisition: &Requisition) -> AppResult<String> {
        let mut doc = encode(requisition)?;
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("id");
        }
        Ok(self.store.insert_one(COLLECTION, doc).await?)
    }

    pub async fn find_all(&self) -> AppResult<Vec<Requisition>> {
        let docs = self
            .store
            .find_many(COLLECTION, &Filter::new(), &FindOptions::new())
            .await?;
        decode_many(docs)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Requisition>> {
        let doc = self.store.find_one(COLLECTION, &Filter::id(id)).await?;
        doc.map(decode).transpose()
    }

    pub async fn find_by_reader(&self, email: &str) -> AppResult<Vec<Requisition>> {
        let docs = self
            .store
            .find_many(
                COLLECTION,
                &Filter::new().eq("reader_email", email),
                &FindOptions::new(),
            )
            .await?;
        decode_many(docs)
    }

    /// Overwrite the status pair. The raw update has no precondition; callers
    /// must re-check current state first (see the circulation service).
    pub async fn set_statuses(
        &self,
        id: &str,
        moderator: ModeratorStatus,
        reader: ReaderStatus,
    ) -> AppResult<UpdateReport> {
        let patch = Patch::new()
            .set("moderator_status", encode(&moderator)?)
            .set("reader_status", encode(&reader)?);
        let report = self
            .store
            .update_one(COLLECTION, &Filter::id(id), &patch, &UpdateOptions::default())
            .await?;
        Ok(report)
    }
}
