//! Circulation workflow: the requisition/inventory state machine
//!
//! A requisition progresses requested → delivered → returned and never
//! regresses. The store-level status update is an unconditional overwrite, so
//! every transition here re-reads the current state first and refuses to act
//! outside the expected prior state. Operations that touch both a requisition
//! and a book issue two independent single-document writes; a crash between
//! them leaves a partially-applied state, which is the accepted consistency
//! model at this scale.

use crate::{
    error::AppResult,
    models::{
        book::Book,
        requisition::{ModeratorStatus, ReaderStatus, Requisition, RequisitionState},
        user::{Role, User},
    },
    repository::Repository,
};

/// Outcome of opening a requisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Created { requisition_id: String },
    BookNotFound,
}

/// Outcome of a guarded status transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Transitioned(Requisition),
    /// The requisition was not in the expected prior state; nothing changed.
    Unchanged(Requisition),
    NotFound,
}

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
}

impl CirculationService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Open a requisition for a book and take one copy out of inventory.
    ///
    /// Two writes: the requisition insert and the qty decrement. They are not
    /// atomic together.
    pub async fn request_book(
        &self,
        book_id: &str,
        reader_email: &str,
    ) -> AppResult<RequestOutcome> {
        if self.repository.books.find_by_id(book_id).await?.is_none() {
            return Ok(RequestOutcome::BookNotFound);
        }

        let requisition = Requisition::open(book_id, reader_email);
        let requisition_id = self.repository.requisitions.create(&requisition).await?;
        self.repository.books.adjust_qty(book_id, -1).await?;

        tracing::info!(%requisition_id, book_id, reader_email, "requisition opened");
        Ok(RequestOutcome::Created { requisition_id })
    }

    /// Mark a requested requisition as delivered to its reader.
    pub async fn mark_delivered(&self, requisition_id: &str) -> AppResult<TransitionOutcome> {
        let Some(mut requisition) = self.repository.requisitions.find_by_id(requisition_id).await?
        else {
            return Ok(TransitionOutcome::NotFound);
        };

        if requisition.state() != RequisitionState::Requested {
            tracing::warn!(%requisition_id, state = ?requisition.state(), "deliver refused");
            return Ok(TransitionOutcome::Unchanged(requisition));
        }

        self.repository
            .requisitions
            .set_statuses(
                requisition_id,
                ModeratorStatus::Delivered,
                ReaderStatus::Received,
            )
            .await?;
        requisition.moderator_status = ModeratorStatus::Delivered;
        requisition.reader_status = ReaderStatus::Received;

        tracing::info!(%requisition_id, "requisition delivered");
        Ok(TransitionOutcome::Transitioned(requisition))
    }

    /// Accept the return of a delivered requisition and restore one copy to
    /// inventory. The qty increment only fires on an actual transition, so
    /// repeated calls cannot inflate the count.
    pub async fn mark_returned(&self, requisition_id: &str) -> AppResult<TransitionOutcome> {
        let Some(mut requisition) = self.repository.requisitions.find_by_id(requisition_id).await?
        else {
            return Ok(TransitionOutcome::NotFound);
        };

        if requisition.state() != RequisitionState::Delivered {
            tracing::warn!(%requisition_id, state = ?requisition.state(), "return refused");
            return Ok(TransitionOutcome::Unchanged(requisition));
        }

        self.repository
            .requisitions
            .set_statuses(
                requisition_id,
                ModeratorStatus::Received,
                ReaderStatus::Returned,
            )
            .await?;
        requisition.moderator_status = ModeratorStatus::Received;
        requisition.reader_status = ReaderStatus::Returned;

        // Second, independent write restoring the borrowed copy.
        self.repository
            .books
            .adjust_qty(&requisition.book_id, 1)
            .await?;

        tracing::info!(%requisition_id, book_id = %requisition.book_id, "requisition returned");
        Ok(TransitionOutcome::Transitioned(requisition))
    }

    /// Apply a signed delta to a book's quantity. No clamping.
    pub async fn adjust_book_qty(&self, book_id: &str, delta: i64) -> AppResult<Option<Book>> {
        self.repository.books.adjust_qty(book_id, delta).await
    }

    /// Promote a user to moderator. Idempotent.
    pub async fn promote_to_moderator(&self, email: &str) -> AppResult<Option<User>> {
        self.repository.users.set_role(email, Role::Moderator).await
    }

    /// Apply a signed delta to a user's requisition count.
    pub async fn adjust_requisition_count(
        &self,
        email: &str,
        delta: i64,
    ) -> AppResult<Option<User>> {
        self.repository
            .users
            .adjust_requisition_count(email, delta)
            .await
    }

    pub async fn list_requisitions(&self) -> AppResult<Vec<Requisition>> {
        self.repository.requisitions.find_all().await
    }

    pub async fn list_by_reader(&self, email: &str) -> AppResult<Vec<Requisition>> {
        self.repository.requisitions.find_by_reader(email).await
    }
}
