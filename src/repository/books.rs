//! Books repository

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::book::{Book, BookFormat, CreateBook},
    store::{Filter, FindOptions, Patch, RecordStore, UpdateOptions},
};

use super::{decode, decode_many, encode, CreateOutcome};

const COLLECTION: &str = "books";

/// Fixed page size for catalog listings.
pub const PAGE_SIZE: usize = 10;

#[derive(Clone)]
pub struct BooksRepository {
    store: Arc<dyn RecordStore>,
}

impl BooksRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Create a book unless the (title, author_id) pair exists already.
    pub async fn create(&self, book: CreateBook) -> AppResult<CreateOutcome> {
        let filter = Filter::new()
            .eq("title", book.title.as_str())
            .eq("author_id", book.author_id.as_str());
        if self.store.find_one(COLLECTION, &filter).await?.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }

        // A flattened duplicate of a typed field would override it on
        // serialization; the extra map never carries these.
        let mut extra = book.extra;
        for key in ["id", "title", "author_id", "format", "qty"] {
            extra.remove(key);
        }

        let doc = Book {
            id: String::new(),
            title: book.title,
            author_id: book.author_id,
            format: book.format,
            qty: book.qty,
            extra,
        };
        let mut doc = encode(&doc)?;
        if let Some(obj) = doc.as_object_mut() {
            obj.remove("id");
        }

        let id = self.store.insert_one(COLLECTION, doc).await?;
        Ok(CreateOutcome::Created(id))
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Book>> {
        let doc = self.store.find_one(COLLECTION, &Filter::id(id)).await?;
        doc.map(decode).transpose()
    }

    /// First page of the catalog in creation order.
    pub async fn first_page(&self) -> AppResult<Vec<Book>> {
        let docs = self
            .store
            .find_many(
                COLLECTION,
                &Filter::new(),
                &FindOptions::new().limit(PAGE_SIZE),
            )
            .await?;
        decode_many(docs)
    }

    /// Case-insensitive substring match on the title.
    pub async fn search_by_title(&self, term: &str) -> AppResult<Vec<Book>> {
        let docs = self
            .store
            .find_many(
                COLLECTION,
                &Filter::new().contains("title", term),
                &FindOptions::new(),
            )
            .await?;
        decode_many(docs)
    }

    /// Offset pagination by 1-based page number, fixed page size.
    pub async fn page(&self, page: usize) -> AppResult<Vec<Book>> {
        let skip = page.max(1).saturating_sub(1) * PAGE_SIZE;
        let docs = self
            .store
            .find_many(
                COLLECTION,
                &Filter::new(),
                &FindOptions::new().skip(skip).limit(PAGE_SIZE),
            )
            .await?;
        decode_many(docs)
    }

    /// Featured listing: every format except ebooks.
    pub async fn featured(&self) -> AppResult<Vec<Book>> {
        let docs = self
            .store
            .find_many(
                COLLECTION,
                &Filter::new().ne("format", BookFormat::Ebook.as_str()),
                &FindOptions::new(),
            )
            .await?;
        decode_many(docs)
    }

    pub async fn ebooks(&self) -> AppResult<Vec<Book>> {
        let docs = self
            .store
            .find_many(
                COLLECTION,
                &Filter::new().eq("format", BookFormat::Ebook.as_str()),
                &FindOptions::new(),
            )
            .await?;
        decode_many(docs)
    }

    /// Apply a signed delta to the quantity and return the updated document.
    /// No clamping: the delta is trusted, negative quantities are possible.
    pub async fn adjust_qty(&self, id: &str, delta: i64) -> AppResult<Option<Book>> {
        self.store
            .update_one(
                COLLECTION,
                &Filter::id(id),
                &Patch::new().inc("qty", delta),
                &UpdateOptions::default(),
            )
            .await?;
        self.find_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        Ok(self.store.delete_one(COLLECTION, &Filter::id(id)).await?)
    }
}
