//! Author registry endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::author::{AuthorQuery, CreateAuthor, SetAuthorImage},
    repository::CreateOutcome,
};

/// Create an author if the (name, country) pair is unseen
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 200, description = "Author created, or an already-exists message")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateAuthor>,
) -> AppResult<Json<Value>> {
    let body = match state.services.authors.add_author(request).await? {
        CreateOutcome::Created(id) => json!({"acknowledged": true, "inserted_id": id}),
        CreateOutcome::AlreadyExists => json!({"message": "Author already exists!"}),
    };
    Ok(Json(body))
}

/// Set an author's image by id (upsert)
#[utoipa::path(
    patch,
    path = "/authors",
    tag = "authors",
    request_body = SetAuthorImage,
    responses(
        (status = 200, description = "Update report")
    )
)]
pub async fn set_author_image(
    State(state): State<crate::AppState>,
    Json(request): Json<SetAuthorImage>,
) -> AppResult<Json<Value>> {
    let report = state
        .services
        .authors
        .set_image(&request.id, &request.image)
        .await?;
    Ok(Json(json!({
        "acknowledged": true,
        "matched_count": report.matched,
        "modified_count": report.modified,
        "upserted_id": report.upserted_id,
    })))
}

/// List all authors, or look one up by exact name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Authors, a single author, or a not-found message")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Value>> {
    let body = match query.name.as_deref() {
        Some(name) => match state.services.authors.find_by_name(name).await? {
            Some(author) => serde_json::to_value(author).unwrap_or_default(),
            None => json!({"message": "No author found!"}),
        },
        None => serde_json::to_value(state.services.authors.list().await?).unwrap_or_default(),
    };
    Ok(Json(body))
}

/// Fetch an author by id
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 200, description = "The author, or a not-found message")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let body = match state.services.authors.get(&id).await? {
        Some(author) => serde_json::to_value(author).unwrap_or_default(),
        None => json!({"message": "No author found!"}),
    };
    Ok(Json(body))
}
