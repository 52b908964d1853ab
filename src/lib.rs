//! Mobile Library Server - Book Lending System
//!
//! A Rust REST API server for a book-lending application: user accounts with
//! roles, authors, books, and requisition (borrow) records backed by a
//! document record store.

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Token issuance
        .route("/jwt", post(api::auth::issue_token))
        // Users
        .route(
            "/users",
            post(api::users::create_user).get(api::users::list_users),
        )
        .route(
            "/users/:email",
            get(api::users::get_user)
                .patch(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route("/user/:email", patch(api::users::promote_user))
        // Books
        .route(
            "/books",
            post(api::books::create_book).get(api::books::list_books),
        )
        // GET takes a page number, DELETE a book id.
        .route(
            "/books/:id",
            get(api::books::books_page).delete(api::books::delete_book),
        )
        .route("/featured-books", get(api::books::featured_books))
        .route("/ebooks", get(api::books::list_ebooks))
        .route("/book-details/:id", get(api::books::book_details))
        .route("/book/:id", patch(api::books::adjust_book_qty))
        // Requisitions
        .route("/requisition", post(api::requisitions::create_requisition))
        .route("/reader/:email", patch(api::requisitions::adjust_reader_count))
        .route("/requisitions", get(api::requisitions::list_requisitions))
        // GET lists a reader's requisitions, PATCH marks one delivered.
        .route(
            "/delivered/:key",
            get(api::requisitions::requisitions_by_reader)
                .patch(api::requisitions::mark_delivered),
        )
        .route("/returned/:id", patch(api::requisitions::mark_returned))
        // Authors
        .route(
            "/authors",
            post(api::authors::create_author)
                .patch(api::authors::set_author_image)
                .get(api::authors::list_authors),
        )
        .route("/authors/:id", get(api::authors::get_author))
        // Payments
        .route(
            "/create-payment-intent",
            post(api::payments::create_payment_intent),
        )
        .with_state(state)
        // OpenAPI documentation
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
