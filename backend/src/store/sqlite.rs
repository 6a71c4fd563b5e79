//! SQLite document store
//!
//! Persists documents as JSON text in a single `documents` table keyed by
//! `(table_name, id)`.

use super::{document_key, Document, DocumentStore, Mutation, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Connection, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Document store backed by a SQLite connection pool
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database and run migrations
    ///
    /// # Arguments
    /// * `database_url` - `sqlite:` URL or bare path to the database file
    ///
    /// # Returns
    /// * `Ok(SqliteStore)` if successful
    /// * `Err(StoreError)` if the directory, connection or migration failed
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to SQLite database at: {}", path);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_documents.sql");

        // Strip comment lines and inline comments, then split into statements
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = match trimmed.find("--") {
                Some(comment_pos) => &trimmed[..comment_pos],
                None => trimmed,
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        for statement in cleaned_sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    async fn read_and_mutate(
        conn: &mut SqliteConnection,
        table: &str,
        id: &str,
        mutation: Mutation,
    ) -> Result<Option<Document>, StoreError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE table_name = ? AND id = ?")
                .bind(table)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        let Some(body) = body else {
            return Ok(None);
        };

        let mut document: Document = serde_json::from_str(&body)?;
        mutation(&mut document)?;
        if document_key(&document)? != id {
            return Err(StoreError::InvalidDocument(
                "mutation must not change the document key".to_string(),
            ));
        }

        sqlx::query("UPDATE documents SET body = ? WHERE table_name = ? AND id = ?")
            .bind(serde_json::to_string(&document)?)
            .bind(table)
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(Some(document))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn scan(&self, table: &str) -> Result<Vec<Document>, StoreError> {
        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE table_name = ? ORDER BY rowid")
                .bind(table)
                .fetch_all(&self.pool)
                .await?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StoreError::from))
            .collect()
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE table_name = ? AND id = ?")
                .bind(table)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }

    async fn put(&self, table: &str, document: Document) -> Result<(), StoreError> {
        let id = document_key(&document)?;
        sqlx::query(
            "INSERT INTO documents (table_name, id, body) VALUES (?, ?, ?) \
             ON CONFLICT(table_name, id) DO UPDATE SET body = excluded.body",
        )
        .bind(table)
        .bind(id)
        .bind(serde_json::to_string(&document)?)
        .execute(&self.pool)
        .await?;

        debug!(table, id, "Put document");
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE table_name = ? AND id = ?")
            .bind(table)
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(table, id, "Deleted document");
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        mutation: Mutation,
    ) -> Result<Option<Document>, StoreError> {
        let mut conn = self.pool.acquire().await?;

        // IMMEDIATE takes the write lock up front so the read cannot go stale.
        // Dropping `tx` before commit (error or cancelled request) rolls back.
        let mut tx = conn.begin_with("BEGIN IMMEDIATE").await?;
        let document = Self::read_and_mutate(&mut tx, table, id, mutation).await?;
        tx.commit().await?;

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    async fn create_test_store() -> (TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("test.db");
        let store = SqliteStore::connect(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_get_scan_delete() {
        let (_dir, store) = create_test_store().await;

        store
            .put("restaurants", doc(json!({"id": "r1", "url": "a"})))
            .await
            .unwrap();
        store
            .put("restaurants", doc(json!({"id": "r2", "url": "b"})))
            .await
            .unwrap();
        store
            .put("users", doc(json!({"id": "r1", "name": "not a restaurant"})))
            .await
            .unwrap();

        let item = store.get("restaurants", "r1").await.unwrap().unwrap();
        assert_eq!(item["url"], "a");

        let items = store.scan("restaurants").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "r1");
        assert_eq!(items[1]["id"], "r2");

        store.delete("restaurants", "r1").await.unwrap();
        store.delete("restaurants", "r1").await.unwrap();
        assert!(store.get("restaurants", "r1").await.unwrap().is_none());
        assert!(store.get("users", "r1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_put_overwrite_keeps_scan_position() {
        let (_dir, store) = create_test_store().await;
        store.put("t", doc(json!({"id": "a", "v": 1}))).await.unwrap();
        store.put("t", doc(json!({"id": "b", "v": 1}))).await.unwrap();
        store.put("t", doc(json!({"id": "a", "v": 2}))).await.unwrap();

        let items = store.scan("t").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], "a");
        assert_eq!(items[0]["v"], 2);
    }

    #[tokio::test]
    async fn test_update_missing_and_failed() {
        let (_dir, store) = create_test_store().await;

        let missing = store.update("t", "x", Box::new(|_: &mut Document| Ok(()))).await.unwrap();
        assert!(missing.is_none());

        store.put("t", doc(json!({"id": "x", "v": 1}))).await.unwrap();
        let failed = store
            .update(
                "t",
                "x",
                Box::new(|d: &mut Document| {
                    d.insert("v".to_string(), json!(2));
                    Err(StoreError::InvalidDocument("boom".to_string()))
                }),
            )
            .await;
        assert!(failed.is_err());
        assert_eq!(store.get("t", "x").await.unwrap().unwrap()["v"], 1);

        // Connection must be usable again after the rollback
        let updated = store
            .update(
                "t",
                "x",
                Box::new(|d: &mut Document| {
                    d.insert("v".to_string(), json!(3));
                    Ok(())
                }),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["v"], 3);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let (_dir, store) = create_test_store().await;
        let store = Arc::new(store);
        store.put("t", doc(json!({"id": "c", "n": 0}))).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..10 {
            let store = store.clone();
            tasks.spawn(async move {
                store
                    .update(
                        "t",
                        "c",
                        Box::new(|d: &mut Document| {
                            let n = d.get("n").and_then(Value::as_i64).unwrap_or(0);
                            d.insert("n".to_string(), json!(n + 1));
                            Ok(())
                        }),
                    )
                    .await
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(store.get("t", "c").await.unwrap().unwrap()["n"], 10);
    }

    #[tokio::test]
    async fn test_cancelled_updates_do_not_leak_transactions() {
        let (_dir, store) = create_test_store().await;
        store.put("t", doc(json!({"id": "c", "n": 0}))).await.unwrap();

        let increment = || -> Mutation {
            Box::new(|d: &mut Document| {
                let n = d.get("n").and_then(Value::as_i64).unwrap_or(0);
                d.insert("n".to_string(), json!(n + 1));
                Ok(())
            })
        };

        // Short deadlines drop some updates part-way through the transaction
        for i in 0..300u64 {
            let deadline = std::time::Duration::from_micros(20 + (i % 200));
            let _ = tokio::time::timeout(deadline, store.update("t", "c", increment())).await;
        }

        let mut last = -1;
        for _ in 0..5 {
            let updated = store.update("t", "c", increment()).await.unwrap().unwrap();
            let n = updated["n"].as_i64().unwrap();
            assert!(n > last);
            last = n;
        }

        // A plain put must be visible on every pooled connection
        store.put("t", doc(json!({"id": "p", "n": 1}))).await.unwrap();
        for _ in 0..5 {
            assert!(store.get("t", "p").await.unwrap().is_some());
        }
    }
}
