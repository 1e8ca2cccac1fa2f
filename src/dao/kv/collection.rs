use std::{marker::PhantomData, sync::Arc};

use futures::future::BoxFuture;
use serde_json::Value;
use tracing::debug;

use super::KvStore;
use crate::dao::{
    id::HashKey,
    patch::Patchable,
    storage::{Query, Record, StorageError, StorageHandle, StorageResult},
};

/// Storage handle over one model namespace of a [`KvStore`].
pub struct KvCollection<F> {
    store: Arc<dyn KvStore>,
    model: &'static str,
    fields: PhantomData<fn() -> F>,
}

impl<F> Clone for KvCollection<F> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            model: self.model,
            fields: PhantomData,
        }
    }
}

impl<F: Patchable> KvCollection<F> {
    pub fn new(store: Arc<dyn KvStore>, model: &'static str) -> Self {
        Self {
            store,
            model,
            fields: PhantomData,
        }
    }

    fn prefix(&self) -> String {
        format!("{}:", self.model)
    }
}

fn decode<F: Patchable>(key: &str, value: Value) -> StorageResult<F> {
    serde_json::from_value(value)
        .map_err(|err| StorageError::corrupt(format!("value under `{key}` does not decode: {err}")))
}

fn encode<F: Patchable>(fields: &F) -> StorageResult<Value> {
    serde_json::to_value(fields).map_err(|err| StorageError::corrupt(format!("failed to encode record: {err}")))
}

impl<F: Patchable> StorageHandle for KvCollection<F> {
    type Id = HashKey;
    type Fields = F;

    fn find_by_id(&self, id: HashKey) -> BoxFuture<'static, StorageResult<Option<Record<HashKey, F>>>> {
        let store = Arc::clone(&self.store);
        let key = id.storage_key(self.model);
        Box::pin(async move {
            match store.get(&key).await? {
                Some(value) => Ok(Some(Record::new(id, decode(&key, value)?))),
                None => Ok(None),
            }
        })
    }

    fn find_many(&self, query: Query) -> BoxFuture<'static, StorageResult<Vec<Record<HashKey, F>>>> {
        let store = Arc::clone(&self.store);
        let model = self.model;
        let prefix = self.prefix();
        Box::pin(async move {
            let entries = store.scan(&prefix).await?;
            let scanned = entries.len();
            let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
            let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);

            let mut records = Vec::new();
            for (key, value) in entries
                .into_iter()
                .filter(|(_, value)| query.filter.as_ref().is_none_or(|filter| filter.matches(value)))
                .skip(skip)
                .take(limit)
            {
                let id = HashKey::from_storage_key(model, &key)
                    .map_err(|err| StorageError::corrupt(err.to_string()))?;
                records.push(Record::new(id, decode(&key, value)?));
            }
            debug!(model, scanned, returned = records.len(), "scanned key-value namespace");
            Ok(records)
        })
    }

    fn insert(&self, fields: F) -> BoxFuture<'static, StorageResult<Record<HashKey, F>>> {
        let store = Arc::clone(&self.store);
        let id = HashKey::generate();
        let key = id.storage_key(self.model);
        Box::pin(async move {
            store.put(&key, encode(&fields)?).await?;
            Ok(Record::new(id, fields))
        })
    }

    fn replace(&self, id: HashKey, fields: F) -> BoxFuture<'static, StorageResult<bool>> {
        let store = Arc::clone(&self.store);
        let key = id.storage_key(self.model);
        Box::pin(async move {
            if store.get(&key).await?.is_none() {
                return Ok(false);
            }
            store.put(&key, encode(&fields)?).await?;
            Ok(true)
        })
    }

    fn delete(&self, id: HashKey) -> BoxFuture<'static, StorageResult<bool>> {
        let store = Arc::clone(&self.store);
        let key = id.storage_key(self.model);
        Box::pin(async move { store.delete(&key).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.store.health_check()
    }
}
