//! User account endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Map, Value};

use crate::{error::AppResult, models::user::CreateUser, repository::CreateOutcome};

use super::AuthenticatedUser;

/// Create a user if the email is unseen
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "User created, or an already-exists message")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateUser>,
) -> AppResult<Json<Value>> {
    let body = match state.services.accounts.register(request).await? {
        CreateOutcome::Created(id) => json!({"acknowledged": true, "inserted_id": id}),
        CreateOutcome::AlreadyExists => json!({"message": "User already exist!"}),
    };
    Ok(Json(body))
}

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<crate::models::User>)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<crate::models::User>>> {
    Ok(Json(state.services.accounts.list().await?))
}

/// Fetch a user by email
#[utoipa::path(
    get,
    path = "/users/{email}",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The user, or a not-found message")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let body = match state.services.accounts.get(&email).await? {
        Some(user) => serde_json::to_value(user).unwrap_or_default(),
        None => json!({"message": "User not found!"}),
    };
    Ok(Json(body))
}

/// Merge-update user fields, creating the document if absent
#[utoipa::path(
    patch,
    path = "/users/{email}",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Update report")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> AppResult<Json<Value>> {
    let report = state.services.accounts.update_profile(&email, fields).await?;
    Ok(Json(json!({
        "acknowledged": true,
        "matched_count": report.matched,
        "modified_count": report.modified,
        "upserted_id": report.upserted_id,
    })))
}

/// Promote a user to moderator
#[utoipa::path(
    patch,
    path = "/user/{email}",
    tag = "users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The promoted user, or a not-found message")
    )
)]
pub async fn promote_user(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let body = match state.services.circulation.promote_to_moderator(&email).await? {
        Some(user) => serde_json::to_value(user).unwrap_or_default(),
        None => json!({"message": "User not found!"}),
    };
    Ok(Json(body))
}

/// Delete a user by email
#[utoipa::path(
    delete,
    path = "/users/{email}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "Delete report"),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(email): Path<String>,
) -> AppResult<Json<Value>> {
    let deleted = state.services.accounts.delete(&email).await?;
    Ok(Json(json!({"acknowledged": true, "deleted_count": deleted})))
}
