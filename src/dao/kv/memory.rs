use std::sync::Arc;

use dashmap::DashMap;
use futures::future::{self, BoxFuture};
use serde_json::Value;

use super::KvStore;
use crate::dao::storage::StorageResult;

/// Process-local key-value store.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<DashMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let value = self.entries.get(key).map(|entry| entry.value().clone());
        Box::pin(future::ready(Ok(value)))
    }

    fn put(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>> {
        self.entries.insert(key.to_owned(), value);
        Box::pin(future::ready(Ok(())))
    }

    fn delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let removed = self.entries.remove(key).is_some();
        Box::pin(future::ready(Ok(removed)))
    }

    fn scan(&self, prefix: &str) -> BoxFuture<'static, StorageResult<Vec<(String, Value)>>> {
        let mut matches: Vec<(String, Value)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        matches.sort_by(|a, b| a.0.cmp(&b.0));
        Box::pin(future::ready(Ok(matches)))
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(future::ready(Ok(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn scan_returns_prefixed_entries_in_key_order() {
        let store = MemoryKvStore::new();
        store.put("kv_item:b", json!(2)).await.unwrap();
        store.put("kv_item:a", json!(1)).await.unwrap();
        store.put("other:c", json!(3)).await.unwrap();

        let keys: Vec<String> = store
            .scan("kv_item:")
            .await
            .unwrap()
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, ["kv_item:a", "kv_item:b"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_the_key_existed() {
        let store = MemoryKvStore::new();
        store.put("k", json!("v")).await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert!(store.get("k").await.unwrap().is_none());
    }
}
