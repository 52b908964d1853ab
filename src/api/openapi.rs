//! OpenAPI documentation

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::api::{auth, authors, books, health, payments, requisitions, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mobile Library API",
        version = "0.1.0",
        description = "Book Lending System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::issue_token,
        // Users
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::promote_user,
        users::delete_user,
        // Books
        books::create_book,
        books::list_books,
        books::books_page,
        books::featured_books,
        books::list_ebooks,
        books::book_details,
        books::adjust_book_qty,
        books::delete_book,
        // Authors
        authors::create_author,
        authors::set_author_image,
        authors::list_authors,
        authors::get_author,
        // Requisitions
        requisitions::create_requisition,
        requisitions::adjust_reader_count,
        requisitions::list_requisitions,
        requisitions::requisitions_by_reader,
        requisitions::mark_delivered,
        requisitions::mark_returned,
        // Payments
        payments::create_payment_intent,
    ),
    components(
        schemas(
            // Auth
            auth::TokenRequest,
            auth::TokenResponse,
            // Users
            crate::models::user::User,
            crate::models::user::Role,
            crate::models::user::CreateUser,
            crate::models::user::RequisitionCountDelta,
            // Books
            crate::models::book::Book,
            crate::models::book::BookFormat,
            crate::models::book::CreateBook,
            crate::models::book::QtyDelta,
            // Authors
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::SetAuthorImage,
            // Requisitions
            crate::models::requisition::Requisition,
            crate::models::requisition::RequisitionState,
            crate::models::requisition::ModeratorStatus,
            crate::models::requisition::ReaderStatus,
            crate::models::requisition::CreateRequisition,
            // Payments
            payments::PaymentIntentRequest,
            payments::PaymentIntentResponse,
            // Health
            health::HealthResponse,
            // Shared
            crate::api::Message,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Token issuance"),
        (name = "users", description = "User account management"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Author registry"),
        (name = "requisitions", description = "Borrow workflow"),
        (name = "payments", description = "Payment intents")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().route(
        "/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
