//! User account service

use serde_json::{Map, Value};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
    repository::{CreateOutcome, Repository},
    store::UpdateReport,
};

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
}

impl AccountsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a user. A repeated registration for the same email is a
    /// no-op reported as `AlreadyExists`.
    pub async fn register(&self, user: CreateUser) -> AppResult<CreateOutcome> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.users.create(user).await
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.find_all().await
    }

    pub async fn get(&self, email: &str) -> AppResult<Option<User>> {
        self.repository.users.find_by_email(email).await
    }

    /// Merge-update profile fields, creating the user document if absent.
    pub async fn update_profile(
        &self,
        email: &str,
        fields: Map<String, Value>,
    ) -> AppResult<UpdateReport> {
        self.repository.users.merge_profile(email, fields).await
    }

    pub async fn delete(&self, email: &str) -> AppResult<u64> {
        self.repository.users.delete_by_email(email).await
    }
}
