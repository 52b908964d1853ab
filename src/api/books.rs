//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::book::{BookQuery, CreateBook, QtyDelta},
    repository::CreateOutcome,
};

use super::AuthenticatedUser;

/// Create a book if the (title, author_id) pair is unseen
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 200, description = "Book created, or an already-exists message")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<Json<Value>> {
    let body = match state.services.catalog.add_book(request).await? {
        CreateOutcome::Created(id) => json!({"acknowledged": true, "inserted_id": id}),
        CreateOutcome::AlreadyExists => json!({"message": "Book already exist!"}),
    };
    Ok(Json(body))
}

/// Search or list books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books (first ten when no search term)", body = Vec<crate::models::Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<crate::models::Book>>> {
    let books = state.services.catalog.list(query.search.as_deref()).await?;
    Ok(Json(books))
}

/// Paginated listing by 1-based page number, fixed page size of ten
#[utoipa::path(
    get,
    path = "/books/{page}",
    tag = "books",
    params(("page" = usize, Path, description = "1-based page number")),
    responses(
        (status = 200, description = "The requested page", body = Vec<crate::models::Book>)
    )
)]
pub async fn books_page(
    State(state): State<crate::AppState>,
    Path(page): Path<usize>,
) -> AppResult<Json<Vec<crate::models::Book>>> {
    Ok(Json(state.services.catalog.page(page).await?))
}

/// Featured listing: every format except ebooks
#[utoipa::path(
    get,
    path = "/featured-books",
    tag = "books",
    responses(
        (status = 200, description = "Non-ebook books", body = Vec<crate::models::Book>)
    )
)]
pub async fn featured_books(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<crate::models::Book>>> {
    Ok(Json(state.services.catalog.featured().await?))
}

/// List ebook-format books
#[utoipa::path(
    get,
    path = "/ebooks",
    tag = "books",
    responses(
        (status = 200, description = "Ebooks", body = Vec<crate::models::Book>)
    )
)]
pub async fn list_ebooks(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<crate::models::Book>>> {
    Ok(Json(state.services.catalog.ebooks().await?))
}

/// Fetch a book by id
#[utoipa::path(
    get,
    path = "/book-details/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book, or a not-found message")
    )
)]
pub async fn book_details(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let body = match state.services.catalog.details(&id).await? {
        Some(book) => serde_json::to_value(book).unwrap_or_default(),
        None => json!({"message": "Book not found!"}),
    };
    Ok(Json(body))
}

/// Apply a signed delta to a book's quantity
#[utoipa::path(
    patch,
    path = "/book/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book id")),
    request_body = QtyDelta,
    responses(
        (status = 200, description = "The updated book, or a not-found message")
    )
)]
pub async fn adjust_book_qty(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(request): Json<QtyDelta>,
) -> AppResult<Json<Value>> {
    let body = match state
        .services
        .circulation
        .adjust_book_qty(&id, request.delta)
        .await?
    {
        Some(book) => serde_json::to_value(book).unwrap_or_default(),
        None => json!({"message": "Book not found!"}),
    };
    Ok(Json(body))
}

/// Delete a book by id
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "Delete report"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let deleted = state.services.catalog.delete(&id).await?;
    Ok(Json(json!({"acknowledged": true, "deleted_count": deleted})))
}
