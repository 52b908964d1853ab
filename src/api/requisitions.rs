//! Requisition (borrow workflow) endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::requisition::CreateRequisition,
    models::user::RequisitionCountDelta,
    services::circulation::{RequestOutcome, TransitionOutcome},
};

/// Request a book: opens a requisition and takes one copy out of inventory
#[utoipa::path(
    post,
    path = "/requisition",
    tag = "requisitions",
    request_body = CreateRequisition,
    responses(
        (status = 200, description = "Requisition opened, or a book-not-found message")
    )
)]
pub async fn create_requisition(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateRequisition>,
) -> AppResult<Json<Value>> {
    let outcome = state
        .services
        .circulation
        .request_book(&request.book_id, &request.reader_email)
        .await?;
    let body = match outcome {
        RequestOutcome::Created { requisition_id } => {
            json!({"acknowledged": true, "inserted_id": requisition_id})
        }
        RequestOutcome::BookNotFound => json!({"message": "Book not found!"}),
    };
    Ok(Json(body))
}

/// Apply a signed delta to a reader's requisition count
#[utoipa::path(
    patch,
    path = "/reader/{email}",
    tag = "requisitions",
    params(("email" = String, Path, description = "Reader email")),
    request_body = RequisitionCountDelta,
    responses(
        (status = 200, description = "The updated user, or a not-found message")
    )
)]
pub async fn adjust_reader_count(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
    Json(request): Json<RequisitionCountDelta>,
) -> AppResult<Json<Value>> {
    let body = match state
        .services
        .circulation
        .adjust_requisition_count(&email, request.delta)
        .await?
    {
        Some(user) => serde_json::to_value(user).unwrap_or_default(),
        None => json!({"message": "User not found!"}),
    };
    Ok(Json(body))
}

/// List all requisitions
#[utoipa::path(
    get,
    path = "/requisitions",
    tag = "requisitions",
    responses(
        (status = 200, description = "All requisitions", body = Vec<crate::models::Requisition>)
    )
)]
pub async fn list_requisitions(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<crate::models::Requisition>>> {
    Ok(Json(state.services.circulation.list_requisitions().await?))
}

/// List a reader's requisitions
#[utoipa::path(
    get,
    path = "/delivered/{email}",
    tag = "requisitions",
    params(("email" = String, Path, description = "Reader email")),
    responses(
        (status = 200, description = "The reader's requisitions", body = Vec<crate::models::Requisition>)
    )
)]
pub async fn requisitions_by_reader(
    State(state): State<crate::AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<crate::models::Requisition>>> {
    Ok(Json(state.services.circulation.list_by_reader(&email).await?))
}

fn transition_body(outcome: TransitionOutcome) -> Value {
    match outcome {
        TransitionOutcome::Transitioned(requisition) => {
            serde_json::to_value(requisition).unwrap_or_default()
        }
        // Guarded no-op: the record comes back unchanged.
        TransitionOutcome::Unchanged(requisition) => {
            serde_json::to_value(requisition).unwrap_or_default()
        }
        TransitionOutcome::NotFound => json!({"message": "Requisition not found!"}),
    }
}

/// Mark a requested requisition delivered
#[utoipa::path(
    patch,
    path = "/delivered/{id}",
    tag = "requisitions",
    params(("id" = String, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "The requisition after the (possibly no-op) transition")
    )
)]
pub async fn mark_delivered(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let outcome = state.services.circulation.mark_delivered(&id).await?;
    Ok(Json(transition_body(outcome)))
}

/// Accept the return of a delivered requisition
#[utoipa::path(
    patch,
    path = "/returned/{id}",
    tag = "requisitions",
    params(("id" = String, Path, description = "Requisition id")),
    responses(
        (status = 200, description = "The requisition after the (possibly no-op) transition")
    )
)]
pub async fn mark_returned(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let outcome = state.services.circulation.mark_returned(&id).await?;
    Ok(Json(transition_body(outcome)))
}
