//! Requisition model: a borrow record tracked through delivery and return

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Moderator-side status of a requisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModeratorStatus {
    Pending,
    Delivered,
    Received,
}

/// Reader-side status of a requisition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReaderStatus {
    Requested,
    Received,
    Returned,
}

/// The workflow state derived from the status pair.
///
/// Valid pairs progress (pending, requested) → (delivered, received) →
/// (received, returned) and never regress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequisitionState {
    Requested,
    Delivered,
    Returned,
}

/// Requisition document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Requisition {
    #[serde(default)]
    pub id: String,
    pub book_id: String,
    pub reader_email: String,
    pub moderator_status: ModeratorStatus,
    pub reader_status: ReaderStatus,
    pub created_at: DateTime<Utc>,
}

impl Requisition {
    /// Open a new requisition in the initial state.
    pub fn open(book_id: &str, reader_email: &str) -> Self {
        Self {
            id: String::new(),
            book_id: book_id.to_string(),
            reader_email: reader_email.to_string(),
            moderator_status: ModeratorStatus::Pending,
            reader_status: ReaderStatus::Requested,
            created_at: Utc::now(),
        }
    }

    /// Derive the workflow state. The moderator status is authoritative: the
    /// reader status never advances without it.
    pub fn state(&self) -> RequisitionState {
        match self.moderator_status {
            ModeratorStatus::Pending => RequisitionState::Requested,
            ModeratorStatus::Delivered => RequisitionState::Delivered,
            ModeratorStatus::Received => RequisitionState::Returned,
        }
    }
}

/// Request-book payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequisition {
    pub book_id: String,
    pub reader_email: String,
}
