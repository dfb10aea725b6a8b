//! The storage seam every other crate talks to.

use async_trait::async_trait;
use serde_json::Value;

use crate::DbError;

/// One document addressed by `(collection, id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub collection: String,
    pub id: String,
    pub body: Value,
}

impl Document {
    pub fn new(collection: impl Into<String>, id: impl Into<String>, body: Value) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
            body,
        }
    }
}

/// Keyed JSON documents with whole-document writes.
///
/// `put` replaces the stored body entirely. `put_many` applies every write
/// or none of them. `list` returns documents ordered by id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DbError>;

    async fn put(&self, collection: &str, id: &str, body: Value) -> Result<(), DbError>;

    async fn put_many(&self, documents: Vec<Document>) -> Result<(), DbError>;

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, DbError>;

    /// Cheap reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), DbError>;
}
