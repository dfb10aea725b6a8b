use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::store::{Document, DocumentStore};
use crate::DbError;

type Key = (String, String);

/// Process-local store for development and tests. Contents are lost on
/// restart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<BTreeMap<Key, Value>>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DbError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, body: Value) -> Result<(), DbError> {
        let mut documents = self.documents.write().await;
        documents.insert((collection.to_string(), id.to_string()), body);
        Ok(())
    }

    async fn put_many(&self, batch: Vec<Document>) -> Result<(), DbError> {
        let mut documents = self.documents.write().await;
        for doc in batch {
            documents.insert((doc.collection, doc.id), doc.body);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, DbError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((_, id), body)| (id.clone(), body.clone()))
            .collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn put_replaces_whole_document() {
        let store = MemoryDocumentStore::new();
        store
            .put("reviews", "public", json!({"a": 1, "b": 2}))
            .await
            .unwrap();
        store.put("reviews", "public", json!({"c": 3})).await.unwrap();

        let body = store.get("reviews", "public").await.unwrap().unwrap();
        assert_eq!(body, json!({"c": 3}));
    }

    #[tokio::test]
    async fn list_is_scoped_and_ordered_by_id() {
        let store = MemoryDocumentStore::new();
        store.put("promotions", "b", json!(2)).await.unwrap();
        store.put("promotions", "a", json!(1)).await.unwrap();
        store.put("services", "a", json!(0)).await.unwrap();

        let listed = store.list("promotions").await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn missing_document_is_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get("hours", "current").await.unwrap().is_none());
    }
}
