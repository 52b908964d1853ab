//! Author registry service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor},
    repository::{CreateOutcome, Repository},
    store::UpdateReport,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add_author(&self, author: CreateAuthor) -> AppResult<CreateOutcome> {
        author
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.authors.create(author).await
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.find_all().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Author>> {
        self.repository.authors.find_by_id(id).await
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Author>> {
        self.repository.authors.find_by_name(name).await
    }

    /// Set the author image by id; creates a stub document when the id is
    /// unseen (upsert contract).
    pub async fn set_image(&self, id: &str, image: &str) -> AppResult<UpdateReport> {
        self.repository.authors.set_image(id, image).await
    }
}
