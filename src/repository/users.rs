//! Users repository

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    error::AppResult,
    models::user::{CreateUser, Role, User},
    store::{Filter, FindOptions, Patch, RecordStore, UpdateOptions, UpdateReport},
};

use super::{decode, decode_many, encode, CreateOutcome};

const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct UsersRepository {
    store: Arc<dyn RecordStore>,
}

impl UsersRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a user unless the email is already taken. Check-then-insert.
    pub async fn create(&self, user: CreateUser) -> AppResult<CreateOutcome> {
        let filter = Filter::new().eq("email", user.email.as_str());
        if self.store.find_one(COLLECTION, &filter).await?.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }

        // Server-owned fields never come from the catch-all profile map; a
        // flattened duplicate would override the typed value on serialization.
        let mut profile = user.profile;
        for key in ["id", "email", "role", "requisition_count"] {
            profile.remove(key);
        }

        let doc = User {
            id: String::new(),
            email: user.email,
            role: user.role.unwrap_or_default(),
            requisition_count: 0,
            profile,
        };
        let mut doc = encode(&doc)?;
        // The store generates the id.
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("id");
        }

        let id = self.store.insert_one(COLLECTION, doc).await?;
        Ok(CreateOutcome::Created(id))
    }

    pub async fn find_all(&self) -> AppResult<Vec<User>> {
        let docs = self
            .store
            .find_many(COLLECTION, &Filter::new(), &FindOptions::new())
            .await?;
        decode_many(docs)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let doc = self
            .store
            .find_one(COLLECTION, &Filter::new().eq("email", email))
            .await?;
        doc.map(decode).transpose()
    }

    /// Merge profile fields into the user document, creating it if absent.
    pub async fn merge_profile(
        &self,
        email: &str,
        fields: Map<String, Value>,
    ) -> AppResult<UpdateReport> {
        let report = self
            .store
            .update_one(
                COLLECTION,
                &Filter::new().eq("email", email),
                &Patch::from_object(fields),
                &UpdateOptions::upsert(),
            )
            .await?;
        Ok(report)
    }

    /// Set the user's role and return the updated document.
    pub async fn set_role(&self, email: &str, role: Role) -> AppResult<Option<User>> {
        self.store
            .update_one(
                COLLECTION,
                &Filter::new().eq("email", email),
                &Patch::new().set("role", role.as_str()),
                &UpdateOptions::default(),
            )
            .await?;
        self.find_by_email(email).await
    }

    /// Apply a signed delta to the user's requisition count and return the
    /// updated document.
    pub async fn adjust_requisition_count(
        &self,
        email: &str,
        delta: i64,
    ) -> AppResult<Option<User>> {
        self.store
            .update_one(
                COLLECTION,
                &Filter::new().eq("email", email),
                &Patch::new().inc("requisition_count", delta),
                &UpdateOptions::default(),
            )
            .await?;
        self.find_by_email(email).await
    }

    pub async fn delete_by_email(&self, email: &str) -> AppResult<u64> {
        Ok(self
            .store
            .delete_one(COLLECTION, &Filter::new().eq("email", email))
            .await?)
    }
}
