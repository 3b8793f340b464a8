use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{unique_field_for, DocumentStore, StoreError};

/// In-process store. Selected with `DATABASE_URL=memory://` and used by the tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(doc: &Value, filter: &serde_json::Map<String, Value>) -> bool {
    filter.iter().all(|(k, v)| doc.get(k) == Some(v))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, doc: Value) -> Result<String, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(field) = unique_field_for(collection) {
            let value = doc.get(field);
            if value.is_some() && docs.iter().any(|d| d.get(field) == value) {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.to_string(),
                });
            }
        }

        docs.push(doc);
        Ok(Uuid::new_v4().to_string())
    }

    async fn query(
        &self,
        collection: &str,
        filter: Value,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let Value::Object(filter) = filter else {
            return Err(StoreError::BadFilter);
        };
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .rev()
            .filter(|d| matches(d, &filter))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collections.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn query_filters_by_equality_newest_first() {
        let store = MemoryStore::new();
        store.create("post", json!({"n": 1, "status": "published"})).await.unwrap();
        store.create("post", json!({"n": 2, "status": "draft"})).await.unwrap();
        store.create("post", json!({"n": 3, "status": "published"})).await.unwrap();

        let docs = store
            .query("post", json!({"status": "published"}), 10)
            .await
            .unwrap();
        let ns: Vec<i64> = docs.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![3, 1]);
    }

    #[tokio::test]
    async fn query_respects_limit() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store.create("post", json!({ "n": n })).await.unwrap();
        }
        assert_eq!(store.query("post", json!({}), 2).await.unwrap().len(), 2);
        assert!(store.query("post", json!({}), 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store.query("nothing", json!({}), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_object_filter_is_rejected() {
        let store = MemoryStore::new();
        let err = store.query("post", json!([1, 2]), 5).await.unwrap_err();
        assert!(matches!(err, StoreError::BadFilter));
    }

    #[tokio::test]
    async fn unique_field_rejects_second_insert() {
        let store = MemoryStore::new();
        store.create("user", json!({"email": "a@x.com"})).await.unwrap();
        let err = store
            .create("user", json!({"email": "a@x.com"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        store.create("user", json!({"email": "b@x.com"})).await.unwrap();
    }

    #[tokio::test]
    async fn lists_collections_that_have_documents() {
        let store = MemoryStore::new();
        store.create("user", json!({"email": "a@x.com"})).await.unwrap();
        store.create("contactmessage", json!({})).await.unwrap();
        assert_eq!(
            store.list_collections().await.unwrap(),
            vec!["contactmessage".to_string(), "user".to_string()]
        );
    }
}
