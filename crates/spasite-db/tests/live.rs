//! Live tests for the Postgres document store using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated database from the sqlx test
//! harness. They need `DATABASE_URL` pointing at a server the harness can
//! create databases on, so they are ignored by default:
//!
//! ```text
//! cargo test -p spasite-db --test live -- --ignored
//! ```

use serde_json::json;
use spasite_db::{
    list_promotions, load_word_blocklist, save_word_blocklist, Document, DocumentStore,
    PgDocumentStore,
};

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn put_then_get_replaces_whole_body(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);

    store
        .put("reviews", "public", json!({"reviews": [1, 2], "extra": true}))
        .await
        .unwrap();
    store
        .put("reviews", "public", json!({"reviews": []}))
        .await
        .unwrap();

    let body = store.get("reviews", "public").await.unwrap().unwrap();
    assert_eq!(body, json!({"reviews": []}));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn list_orders_by_doc_id(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    for id in ["winter", "Autumn", "spring"] {
        store.put("promotions", id, json!({"id": id})).await.unwrap();
    }

    let ids: Vec<String> = store
        .list("promotions")
        .await
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(ids, vec!["Autumn", "spring", "winter"]);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn put_many_commits_every_document(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    let promotion = |id: &str, enabled: bool| {
        json!({
            "id": id,
            "label": id,
            "enabled": enabled,
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-01-31T00:00:00Z",
            "discounts": {}
        })
    };

    store
        .put_many(vec![
            Document::new("promotions", "a", promotion("a", false)),
            Document::new("promotions", "b", promotion("b", true)),
        ])
        .await
        .unwrap();

    let promotions = list_promotions(&store).await.unwrap();
    assert_eq!(promotions.len(), 2);
    assert!(promotions[1].enabled);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn typed_blocklist_round_trip(pool: sqlx::PgPool) {
    let store = PgDocumentStore::new(pool);
    assert!(load_word_blocklist(&store).await.unwrap().is_empty());

    save_word_blocklist(&store, vec!["atom".into(), "refund".into()])
        .await
        .unwrap();
    assert_eq!(
        load_word_blocklist(&store).await.unwrap(),
        vec!["atom".to_string(), "refund".to_string()]
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn ping_succeeds_on_live_pool(pool: sqlx::PgPool) {
    PgDocumentStore::new(pool).ping().await.unwrap();
}
