//! In-memory document store
//!
//! Used for offline runs and tests. Tables keep insertion order so scans are
//! stable.

use super::{document_key, Document, DocumentStore, Mutation, StoreError, KEY_ATTRIBUTE};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A single table: documents in insertion order
#[derive(Debug, Default)]
struct Table {
    documents: Vec<Document>,
}

impl Table {
    fn position(&self, id: &str) -> Option<usize> {
        self.documents
            .iter()
            .position(|doc| doc.get(KEY_ATTRIBUTE).and_then(Value::as_str) == Some(id))
    }
}

/// Document store held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn scan(&self, table: &str) -> Result<Vec<Document>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|t| t.documents.clone())
            .unwrap_or_default())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .and_then(|t| t.position(id).map(|i| t.documents[i].clone())))
    }

    async fn put(&self, table: &str, document: Document) -> Result<(), StoreError> {
        let id = document_key(&document)?.to_string();
        let mut tables = self.tables.write().await;
        let table = tables.entry(table.to_string()).or_default();
        match table.position(&id) {
            Some(i) => table.documents[i] = document,
            None => table.documents.push(document),
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(table) = tables.get_mut(table) {
            if let Some(i) = table.position(id) {
                table.documents.remove(i);
            }
        }
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        id: &str,
        mutation: Mutation,
    ) -> Result<Option<Document>, StoreError> {
        // Write lock is held across read, mutation and write-back
        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(table) else {
            return Ok(None);
        };
        let Some(i) = table.position(id) else {
            return Ok(None);
        };

        let mut updated = table.documents[i].clone();
        mutation(&mut updated)?;
        if document_key(&updated)? != id {
            return Err(StoreError::InvalidDocument(
                "mutation must not change the document key".to_string(),
            ));
        }

        table.documents[i] = updated.clone();
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_scan_empty_table() {
        let store = MemoryStore::new();
        let items = store.scan("missing").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_put_get_overwrite() {
        let store = MemoryStore::new();
        store
            .put("t", doc(json!({"id": "1", "name": "first"})))
            .await
            .unwrap();
        store
            .put("t", doc(json!({"id": "1", "name": "second"})))
            .await
            .unwrap();

        let item = store.get("t", "1").await.unwrap().unwrap();
        assert_eq!(item["name"], "second");
        assert_eq!(store.scan("t").await.unwrap().len(), 1);
        assert!(store.get("t", "2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_requires_key() {
        let store = MemoryStore::new();
        let result = store.put("t", doc(json!({"name": "no id"}))).await;
        assert!(matches!(result, Err(StoreError::MissingKey)));
    }

    #[tokio::test]
    async fn test_scan_keeps_insertion_order() {
        let store = MemoryStore::new();
        for id in ["b", "a", "c"] {
            store.put("t", doc(json!({ "id": id }))).await.unwrap();
        }
        let ids: Vec<_> = store
            .scan("t")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put("t", doc(json!({"id": "1"}))).await.unwrap();
        store.delete("t", "1").await.unwrap();
        store.delete("t", "1").await.unwrap();
        store.delete("other", "1").await.unwrap();
        assert!(store.get("t", "1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let result = store
            .update("t", "nope", Box::new(|_: &mut Document| Ok(())))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(store.scan("t").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_applies_mutation() {
        let store = MemoryStore::new();
        store.put("t", doc(json!({"id": "1"}))).await.unwrap();

        let updated = store
            .update(
                "t",
                "1",
                Box::new(|d: &mut Document| {
                    d.insert("count".to_string(), json!(3));
                    Ok(())
                }),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["count"], 3);
        assert_eq!(store.get("t", "1").await.unwrap().unwrap()["count"], 3);
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let store = MemoryStore::new();
        store.put("t", doc(json!({"id": "1", "v": 1}))).await.unwrap();

        let result = store
            .update(
                "t",
                "1",
                Box::new(|d: &mut Document| {
                    d.insert("v".to_string(), json!(2));
                    Err(StoreError::InvalidDocument("boom".to_string()))
                }),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(store.get("t", "1").await.unwrap().unwrap()["v"], 1);
    }

    #[tokio::test]
    async fn test_update_rejects_key_change() {
        let store = MemoryStore::new();
        store.put("t", doc(json!({"id": "1"}))).await.unwrap();

        let result = store
            .update(
                "t",
                "1",
                Box::new(|d: &mut Document| {
                    d.insert("id".to_string(), json!("2"));
                    Ok(())
                }),
            )
            .await;

        assert!(matches!(result, Err(StoreError::InvalidDocument(_))));
        assert!(store.get("t", "1").await.unwrap().is_some());
    }
}
