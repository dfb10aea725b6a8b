//! Postgres backend storing each document as a JSONB row in `documents`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::store::{Document, DocumentStore};
use crate::DbError;

const UPSERT: &str = "INSERT INTO documents (collection, doc_id, body, updated_at) \
     VALUES ($1, $2, $3, NOW()) \
     ON CONFLICT (collection, doc_id) DO UPDATE SET \
         body = EXCLUDED.body, \
         updated_at = NOW()";

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DbError> {
        let row: Option<Json<Value>> = sqlx::query_scalar(
            "SELECT body FROM documents WHERE collection = $1 AND doc_id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|Json(body)| body))
    }

    async fn put(&self, collection: &str, id: &str, body: Value) -> Result<(), DbError> {
        sqlx::query(UPSERT)
            .bind(collection)
            .bind(id)
            .bind(Json(body))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn put_many(&self, documents: Vec<Document>) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        for doc in documents {
            sqlx::query(UPSERT)
                .bind(&doc.collection)
                .bind(&doc.id)
                .bind(Json(doc.body))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, DbError> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            "SELECT doc_id, body FROM documents WHERE collection = $1 ORDER BY doc_id COLLATE \"C\"",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id, Json(body))| (id, body)).collect())
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
