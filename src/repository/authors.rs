//! Authors repository

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
    store::{Filter, FindOptions, Patch, RecordStore, UpdateOptions, UpdateReport},
};

use super::{decode, decode_many, encode, CreateOutcome};

const COLLECTION: &str = "authors";

#[derive(Clone)]
pub struct AuthorsRepository {
    store: Arc<dyn RecordStore>,
}

impl AuthorsRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create an author unless the (name, country) pair exists already.
    pub async fn create(&self, author: CreateAuthor) -> AppResult<CreateOutcome> {
        let filter = Filter::new()
            .eq("name", author.name.as_str())
            .eq("country", author.country.as_str());
        if self.store.find_one(COLLECTION, &filter).await?.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }

        let doc = Author {
            id: String::new(),
            name: author.name,
            country: author.country,
            image: author.image,
        };
        let mut doc = encode(&doc)?;
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("id");
        }

        let id = self.store.insert_one(COLLECTION, doc).await?;
        Ok(CreateOutcome::Created(id))
    }

    pub async fn find_all(&self) -> AppResult<Vec<Author>> {
        let docs = self
            .store
            .find_many(COLLECTION, &Filter::new(), &FindOptions::new())
            .await?;
        decode_many(docs)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Author>> {
        let doc = self.store.find_one(COLLECTION, &Filter::id(id)).await?;
        doc.map(decode).transpose()
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("name", name))
            .await?;
        doc.map(decode).transpose()
    }

    /// Set the author's image by id, creating a stub document if absent.
    pub async fn set_image(&self, id: &str, image: &str) -> AppResult<UpdateReport> {
        let report = self
            .store
            .update_one(
                COLLECTION,
                &Filter::id(id),
                &Patch::new().set("image", image),
                &UpdateOptions::upsert(),
            )
            .await?;
        Ok(report)
    }
}
