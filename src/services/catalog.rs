//! Book catalog service: creation, lookup, and the read-only listings

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook},
    repository::{CreateOutcome, Repository},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add_book(&self, book: CreateBook) -> AppResult<CreateOutcome> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.create(book).await
    }

    /// Search listing: substring match when a term is given, otherwise the
    /// first page of the catalog.
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<Book>> {
        match search {
            Some(term) if !term.is_empty() => self.repository.books.search_by_title(term).await,
            _ => self.repository.books.first_page().await,
        }
    }

    pub async fn page(&self, page: usize) -> AppResult<Vec<Book>> {
        self.repository.books.page(page).await
    }

    pub async fn featured(&self) -> AppResult<Vec<Book>> {
        self.repository.books.featured().await
    }

    pub async fn ebooks(&self) -> AppResult<Vec<Book>> {
        self.repository.books.ebooks().await
    }

    pub async fn details(&self, id: &str) -> AppResult<Option<Book>> {
        self.repository.books.find_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        self.repository.books.delete_by_id(id).await
    }
}
