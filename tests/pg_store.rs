//! Postgres record store integration tests
//!
//! These need a live database: point DATABASE_URL at one and run with
//! `cargo test -- --ignored`. Each test works in its own throwaway
//! collection, so a shared database stays usable.

use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use mobile_library_server::store::{
    postgres::PgStore, Filter, FindOptions, Patch, RecordStore, SortOrder, UpdateOptions,
};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    PgStore::new(pool)
}

fn collection(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn insert_generates_an_id_and_find_one_returns_the_document() {
    let store = store().await;
    let coll = collection("books");

    let id = store
        .insert_one(&coll, json!({"title": "Dune", "qty": 3}))
        .await
        .expect("insert");
    assert!(!id.is_empty());

    let found = store
        .find_one(&coll, &Filter::id(&id))
        .await
        .expect("find")
        .expect("document");
    assert_eq!(found["title"], "Dune");
    assert_eq!(found["qty"], 3);
    assert_eq!(found["id"], Value::String(id));

    let miss = store
        .find_one(&coll, &Filter::new().eq("title", "Dune II"))
        .await
        .expect("find");
    assert!(miss.is_none());
}

#[tokio::test]
#[ignore]
async fn find_many_preserves_creation_order_with_skip_and_limit() {
    let store = store().await;
    let coll = collection("books");

    for n in 0..5 {
        store
            .insert_one(&coll, json!({"title": format!("Book {n}"), "n": n}))
            .await
            .expect("insert");
    }

    let page = store
        .find_many(&coll, &Filter::new(), &FindOptions::new().skip(1).limit(2))
        .await
        .expect("find");
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["title"], "Book 1");
    assert_eq!(page[1]["title"], "Book 2");

    let sorted = store
        .find_many(
            &coll,
            &Filter::new(),
            &FindOptions::new().sort("n", SortOrder::Descending).limit(1),
        )
        .await
        .expect("find");
    assert_eq!(sorted[0]["title"], "Book 4");
}

#[tokio::test]
#[ignore]
async fn update_merges_fields_and_applies_signed_increments() {
    let store = store().await;
    let coll = collection("books");

    store
        .insert_one(&coll, json!({"title": "Dune", "qty": 5}))
        .await
        .expect("insert");

    let report = store
        .update_one(
            &coll,
            &Filter::new().eq("title", "Dune"),
            &Patch::new().set("format", "hardcover").inc("qty", -1),
            &UpdateOptions::default(),
        )
        .await
        .expect("update");
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 1);
    assert!(report.upserted_id.is_none());

    let doc = store
        .find_one(&coll, &Filter::new().eq("title", "Dune"))
        .await
        .expect("find")
        .expect("document");
    assert_eq!(doc["format"], "hardcover");
    assert_eq!(doc["qty"], 4);

    // Increments are unconditional; counters can go negative.
    store
        .update_one(
            &coll,
            &Filter::new().eq("title", "Dune"),
            &Patch::new().inc("qty", -10),
            &UpdateOptions::default(),
        )
        .await
        .expect("update");
    let doc = store
        .find_one(&coll, &Filter::new().eq("title", "Dune"))
        .await
        .expect("find")
        .expect("document");
    assert_eq!(doc["qty"], -6);
}

#[tokio::test]
#[ignore]
async fn update_reports_unmodified_when_the_patch_changes_nothing() {
    let store = store().await;
    let coll = collection("users");

    store
        .insert_one(&coll, json!({"email": "a@x.com", "role": "reader"}))
        .await
        .expect("insert");

    let patch = Patch::new().set("role", "reader");
    let filter = Filter::new().eq("email", "a@x.com");

    let report = store
        .update_one(&coll, &filter, &patch, &UpdateOptions::default())
        .await
        .expect("update");
    assert_eq!(report.matched, 1);
    assert_eq!(report.modified, 0);

    let report = store
        .update_one(
            &coll,
            &filter,
            &Patch::new().set("role", "moderator"),
            &UpdateOptions::default(),
        )
        .await
        .expect("update");
    assert_eq!(report.modified, 1);
}

#[tokio::test]
#[ignore]
async fn update_miss_with_upsert_seeds_from_equality_fields() {
    let store = store().await;
    let coll = collection("users");

    let report = store
        .update_one(
            &coll,
            &Filter::new().eq("email", "b@x.com"),
            &Patch::new().set("city", "Lagos"),
            &UpdateOptions::upsert(),
        )
        .await
        .expect("update");
    assert_eq!(report.matched, 0);
    assert_eq!(report.modified, 0);
    let id = report.upserted_id.expect("upserted id");

    let doc = store
        .find_one(&coll, &Filter::id(&id))
        .await
        .expect("find")
        .expect("document");
    assert_eq!(doc["email"], "b@x.com");
    assert_eq!(doc["city"], "Lagos");

    // Without upsert a miss stays a miss.
    let report = store
        .update_one(
            &coll,
            &Filter::new().eq("email", "c@x.com"),
            &Patch::new().set("city", "Lagos"),
            &UpdateOptions::default(),
        )
        .await
        .expect("update");
    assert_eq!(report.matched, 0);
    assert!(report.upserted_id.is_none());
}

#[tokio::test]
#[ignore]
async fn update_one_touches_only_the_first_match_in_creation_order() {
    let store = store().await;
    let coll = collection("books");

    store
        .insert_one(&coll, json!({"format": "ebook", "qty": 1}))
        .await
        .expect("insert");
    store
        .insert_one(&coll, json!({"format": "ebook", "qty": 1}))
        .await
        .expect("insert");

    store
        .update_one(
            &coll,
            &Filter::new().eq("format", "ebook"),
            &Patch::new().inc("qty", 1),
            &UpdateOptions::default(),
        )
        .await
        .expect("update");

    let docs = store
        .find_many(&coll, &Filter::new(), &FindOptions::new())
        .await
        .expect("find");
    assert_eq!(docs[0]["qty"], 2);
    assert_eq!(docs[1]["qty"], 1);
}

#[tokio::test]
#[ignore]
async fn contains_treats_like_metacharacters_as_literals() {
    let store = store().await;
    let coll = collection("books");

    for title in ["100% Wool", "100x Wool", "a_b", "axb"] {
        store
            .insert_one(&coll, json!({"title": title}))
            .await
            .expect("insert");
    }

    let docs = store
        .find_many(
            &coll,
            &Filter::new().contains("title", "100%"),
            &FindOptions::new(),
        )
        .await
        .expect("find");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["title"], "100% Wool");

    let docs = store
        .find_many(
            &coll,
            &Filter::new().contains("title", "a_b"),
            &FindOptions::new(),
        )
        .await
        .expect("find");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["title"], "a_b");

    // Still case-insensitive.
    let docs = store
        .find_many(
            &coll,
            &Filter::new().contains("title", "wool"),
            &FindOptions::new(),
        )
        .await
        .expect("find");
    assert_eq!(docs.len(), 2);
}

#[tokio::test]
#[ignore]
async fn delete_one_removes_a_single_document() {
    let store = store().await;
    let coll = collection("books");

    store
        .insert_one(&coll, json!({"format": "ebook"}))
        .await
        .expect("insert");
    store
        .insert_one(&coll, json!({"format": "ebook"}))
        .await
        .expect("insert");

    let deleted = store
        .delete_one(&coll, &Filter::new().eq("format", "ebook"))
        .await
        .expect("delete");
    assert_eq!(deleted, 1);

    let remaining = store
        .find_many(&coll, &Filter::new(), &FindOptions::new())
        .await
        .expect("find");
    assert_eq!(remaining.len(), 1);

    let deleted = store
        .delete_one(&coll, &Filter::new().eq("format", "hardcover"))
        .await
        .expect("delete");
    assert_eq!(deleted, 0);
}
