//! API integration tests
//!
//! Every test runs the real router over the in-memory store backend and
//! drives it with in-process requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mobile_library_server::{
    config::AppConfig, create_router, repository::Repository, services::Services,
    store::memory::MemoryStore, AppState,
};

fn app() -> Router {
    let config = AppConfig::default();
    let repository = Repository::new(Arc::new(MemoryStore::new()));
    let services = Services::new(repository, config.auth.clone(), config.payments.clone());
    create_router(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_with_token(app, method, uri, body, None).await
}

async fn send_with_token(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

async fn create_book(app: &Router, title: &str, author_id: &str, format: &str, qty: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({"title": title, "author_id": author_id, "format": format, "qty": qty})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["inserted_id"]
        .as_str()
        .unwrap_or_else(|| panic!("book not created: {body}"))
        .to_string()
}

#[tokio::test]
async fn health_check_reports_healthy() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn duplicate_user_email_creates_exactly_one_document() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User already exist!");

    let (_, users) = send(&app, Method::GET, "/users", None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn registration_payload_cannot_seed_the_requisition_count() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"email": "a@x.com", "requisition_count": 9, "phone": "555-0100"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/users/a@x.com", None).await;
    assert_eq!(body["requisition_count"], 0);
    assert_eq!(body["phone"], "555-0100");
}

#[tokio::test]
async fn user_fetch_miss_is_a_message_with_status_200() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/users/nobody@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User not found!");
}

#[tokio::test]
async fn profile_patch_merges_and_upserts() {
    let app = app();
    send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com"}))).await;

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/users/a@x.com",
        Some(json!({"phone": "555-0100"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, user) = send(&app, Method::GET, "/users/a@x.com", None).await;
    assert_eq!(user["phone"], "555-0100");
    assert_eq!(user["email"], "a@x.com");

    // Upsert: patching an unseen email creates the document.
    let (_, report) = send(
        &app,
        Method::PATCH,
        "/users/new@x.com",
        Some(json!({"city": "Lagos"})),
    )
    .await;
    assert!(report["upserted_id"].is_string());
    let (_, user) = send(&app, Method::GET, "/users/new@x.com", None).await;
    assert_eq!(user["city"], "Lagos");
}

#[tokio::test]
async fn promote_to_moderator_is_idempotent() {
    let app = app();
    send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com"}))).await;

    let (status, user) = send(&app, Method::PATCH, "/user/a@x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["role"], "moderator");

    let (_, user) = send(&app, Method::PATCH, "/user/a@x.com", None).await;
    assert_eq!(user["role"], "moderator");
}

#[tokio::test]
async fn delete_user_requires_a_bearer_token() {
    let app = app();
    send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com"}))).await;

    let (status, body) = send(&app, Method::DELETE, "/users/a@x.com", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);

    let (_, issued) = send(&app, Method::POST, "/jwt", Some(json!({"email": "a@x.com"}))).await;
    let token = issued["token"].as_str().expect("token").to_string();

    let (status, body) =
        send_with_token(&app, Method::DELETE, "/users/a@x.com", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_count"], 1);

    let (_, body) = send(&app, Method::GET, "/users/a@x.com", None).await;
    assert_eq!(body["message"], "User not found!");
}

#[tokio::test]
async fn duplicate_author_name_country_creates_exactly_one_document() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/authors",
        Some(json!({"name": "Ursula K. Le Guin", "country": "US"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["acknowledged"], true);

    let (_, body) = send(
        &app,
        Method::POST,
        "/authors",
        Some(json!({"name": "Ursula K. Le Guin", "country": "US"})),
    )
    .await;
    assert_eq!(body["message"], "Author already exists!");

    let (_, authors) = send(&app, Method::GET, "/authors", None).await;
    assert_eq!(authors.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_author_lookup_returns_the_no_author_message() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/authors?name=Unknown", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No author found!");
}

#[tokio::test]
async fn author_image_patch_upserts_by_id() {
    let app = app();
    let (_, created) = send(
        &app,
        Method::POST,
        "/authors",
        Some(json!({"name": "Iain Banks", "country": "UK"})),
    )
    .await;
    let id = created["inserted_id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/authors",
        Some(json!({"id": id, "image": "banks.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, author) = send(&app, Method::GET, &format!("/authors/{id}"), None).await;
    assert_eq!(author["image"], "banks.png");
}

#[tokio::test]
async fn duplicate_book_title_author_pair_is_rejected_softly() {
    let app = app();
    create_book(&app, "Dune", "a1", "hardcover", 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author_id": "a1", "format": "hardcover", "qty": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book already exist!");
}

#[tokio::test]
async fn book_search_matches_title_substrings() {
    let app = app();
    create_book(&app, "The Left Hand of Darkness", "a1", "paperback", 2).await;
    create_book(&app, "The Dispossessed", "a1", "paperback", 2).await;

    let (_, hits) = send(&app, Method::GET, "/books?search=darkness", None).await;
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "The Left Hand of Darkness");
}

#[tokio::test]
async fn book_pagination_is_ten_per_page() {
    let app = app();
    for i in 0..23 {
        create_book(&app, &format!("Book {i:02}"), "a1", "paperback", 1).await;
    }

    // Unfiltered listing caps at the first ten.
    let (_, listing) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(listing.as_array().unwrap().len(), 10);

    let (_, page2) = send(&app, Method::GET, "/books/2", None).await;
    let page2 = page2.as_array().unwrap();
    assert_eq!(page2.len(), 10);
    assert_eq!(page2[0]["title"], "Book 10");
    assert_eq!(page2[9]["title"], "Book 19");

    let (_, page3) = send(&app, Method::GET, "/books/3", None).await;
    assert_eq!(page3.as_array().unwrap().len(), 3);

    let (_, page4) = send(&app, Method::GET, "/books/4", None).await;
    assert!(page4.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn featured_books_exclude_ebooks() {
    let app = app();
    create_book(&app, "Paper", "a1", "paperback", 1).await;
    create_book(&app, "Bytes", "a1", "ebook", 1).await;

    let (_, featured) = send(&app, Method::GET, "/featured-books", None).await;
    let featured = featured.as_array().unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0]["title"], "Paper");

    let (_, ebooks) = send(&app, Method::GET, "/ebooks", None).await;
    let ebooks = ebooks.as_array().unwrap();
    assert_eq!(ebooks.len(), 1);
    assert_eq!(ebooks[0]["title"], "Bytes");
}

#[tokio::test]
async fn requisition_lifecycle_walks_the_states_and_restores_qty() {
    let app = app();
    let book_id = create_book(&app, "Dune", "a1", "hardcover", 5).await;

    // Adjust down and back up by hand first (round trip).
    let (_, book) = send(
        &app,
        Method::PATCH,
        &format!("/book/{book_id}"),
        Some(json!({"delta": -1})),
    )
    .await;
    assert_eq!(book["qty"], 4);
    let (_, book) = send(
        &app,
        Method::PATCH,
        &format!("/book/{book_id}"),
        Some(json!({"delta": 1})),
    )
    .await;
    assert_eq!(book["qty"], 5);

    // Request: opens the requisition and takes a copy.
    let (status, body) = send(
        &app,
        Method::POST,
        "/requisition",
        Some(json!({"book_id": book_id, "reader_email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let requisition_id = body["inserted_id"].as_str().expect("requisition id").to_string();

    let (_, book) = send(&app, Method::GET, &format!("/book-details/{book_id}"), None).await;
    assert_eq!(book["qty"], 4);

    // Deliver.
    let (_, delivered) =
        send(&app, Method::PATCH, &format!("/delivered/{requisition_id}"), None).await;
    assert_eq!(delivered["moderator_status"], "delivered");
    assert_eq!(delivered["reader_status"], "received");

    // Return: restores the copy.
    let (_, returned) =
        send(&app, Method::PATCH, &format!("/returned/{requisition_id}"), None).await;
    assert_eq!(returned["moderator_status"], "received");
    assert_eq!(returned["reader_status"], "returned");

    let (_, book) = send(&app, Method::GET, &format!("/book-details/{book_id}"), None).await;
    assert_eq!(book["qty"], 5);

    // A second return is a no-op and must not inflate qty.
    send(&app, Method::PATCH, &format!("/returned/{requisition_id}"), None).await;
    let (_, book) = send(&app, Method::GET, &format!("/book-details/{book_id}"), None).await;
    assert_eq!(book["qty"], 5);
}

#[tokio::test]
async fn returning_an_undelivered_requisition_changes_nothing() {
    let app = app();
    let book_id = create_book(&app, "Dune", "a1", "hardcover", 5).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/requisition",
        Some(json!({"book_id": book_id, "reader_email": "a@x.com"})),
    )
    .await;
    let requisition_id = body["inserted_id"].as_str().unwrap().to_string();

    let (status, requisition) =
        send(&app, Method::PATCH, &format!("/returned/{requisition_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(requisition["moderator_status"], "pending");
    assert_eq!(requisition["reader_status"], "requested");

    let (_, book) = send(&app, Method::GET, &format!("/book-details/{book_id}"), None).await;
    assert_eq!(book["qty"], 4);
}

#[tokio::test]
async fn requisition_for_a_missing_book_reports_not_found() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/requisition",
        Some(json!({"book_id": "missing", "reader_email": "a@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book not found!");
}

#[tokio::test]
async fn requisitions_list_globally_and_per_reader() {
    let app = app();
    let book_id = create_book(&app, "Dune", "a1", "hardcover", 5).await;

    for reader in ["a@x.com", "b@x.com", "a@x.com"] {
        send(
            &app,
            Method::POST,
            "/requisition",
            Some(json!({"book_id": book_id, "reader_email": reader})),
        )
        .await;
    }

    let (_, all) = send(&app, Method::GET, "/requisitions", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, mine) = send(&app, Method::GET, "/delivered/a@x.com", None).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|r| r["reader_email"] == "a@x.com"));
}

#[tokio::test]
async fn reader_requisition_count_accepts_signed_deltas() {
    let app = app();
    send(&app, Method::POST, "/users", Some(json!({"email": "a@x.com"}))).await;

    let (_, user) = send(
        &app,
        Method::PATCH,
        "/reader/a@x.com",
        Some(json!({"delta": 1})),
    )
    .await;
    assert_eq!(user["requisition_count"], 1);

    let (_, user) = send(
        &app,
        Method::PATCH,
        "/reader/a@x.com",
        Some(json!({"delta": -1})),
    )
    .await;
    assert_eq!(user["requisition_count"], 0);
}

#[tokio::test]
async fn delete_book_requires_a_bearer_token() {
    let app = app();
    let book_id = create_book(&app, "Dune", "a1", "hardcover", 5).await;

    let (status, _) = send(&app, Method::DELETE, &format!("/books/{book_id}"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, issued) = send(&app, Method::POST, "/jwt", Some(json!({"email": "m@x.com"}))).await;
    let token = issued["token"].as_str().unwrap().to_string();

    let (status, body) = send_with_token(
        &app,
        Method::DELETE,
        &format!("/books/{book_id}"),
        None,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_count"], 1);

    let (_, body) = send(&app, Method::GET, &format!("/book-details/{book_id}"), None).await;
    assert_eq!(body["message"], "Book not found!");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app();
    let (status, doc) = send(&app, Method::GET, "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/requisition"].is_object());
}
