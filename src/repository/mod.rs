//! Repository layer: typed facades over the record store
//!
//! Each repository owns one collection and enforces its natural-key
//! uniqueness as check-then-insert. That check is not race-free; two
//! concurrent identical creates can both pass it. Best-effort duplicate
//! prevention is the documented contract here, not a store-level constraint.

pub mod authors;
pub mod books;
pub mod requisitions;
pub mod users;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::AppResult,
    store::{RecordStore, StoreError},
};

/// Outcome of a soft-fail create: a natural-key hit is a normal result, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(String),
    AlreadyExists,
}

/// Main repository struct holding the injected store handle
#[derive(Clone)]
pub struct Repository {
    pub users: users::UsersRepository,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub requisitions: requisitions::RequisitionsRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            users: users::UsersRepository::new(store.clone()),
            authors: authors::AuthorsRepository::new(store.clone()),
            books: books::BooksRepository::new(store.clone()),
            requisitions: requisitions::RequisitionsRepository::new(store),
        }
    }
}

fn decode<T: DeserializeOwned>(doc: Value) -> AppResult<T> {
    Ok(serde_json::from_value(doc).map_err(StoreError::from)?)
}

fn decode_many<T: DeserializeOwned>(docs: Vec<Value>) -> AppResult<Vec<T>> {
    docs.into_iter().map(decode).collect()
}

fn encode<T: serde::Serialize>(value: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(value).map_err(StoreError::from)?)
}
