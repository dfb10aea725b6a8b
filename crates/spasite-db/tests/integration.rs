//! Offline tests for spasite-db pool configuration and the in-memory store.
//! These tests do not require a live database connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde_json::json;
use spasite_core::{AppConfig, Environment, StoreBackend};
use spasite_db::{Document, DocumentStore, MemoryDocumentStore, PoolConfig};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: Some("postgres://example".to_string()),
        store_backend: StoreBackend::Postgres,
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        reviews_url: "http://localhost/reviews".to_string(),
        hours_url: "http://localhost/hours".to_string(),
        upstream_timeout_secs: 10,
        admin_emails: vec!["owner@example.com".to_string()],
        identity_url: None,
        sync_cron: "0 0 9 * * *".to_string(),
        catalog_path: PathBuf::from("./config/catalog.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[tokio::test]
async fn put_many_writes_across_collections() {
    let store = MemoryDocumentStore::new();
    store
        .put_many(vec![
            Document::new("promotions", "a", json!({"enabled": false})),
            Document::new("promotions", "b", json!({"enabled": true})),
            Document::new("services", "swedish", json!({"prices": []})),
        ])
        .await
        .unwrap();

    assert_eq!(store.list("promotions").await.unwrap().len(), 2);
    assert_eq!(
        store.get("services", "swedish").await.unwrap(),
        Some(json!({"prices": []}))
    );
}

#[tokio::test]
async fn store_is_usable_as_trait_object() {
    let store: Box<dyn DocumentStore> = Box::new(MemoryDocumentStore::new());
    store.ping().await.unwrap();
    store.put("hours", "current", json!({})).await.unwrap();
    assert!(store.get("hours", "current").await.unwrap().is_some());
}
