//! Key-value record families.
//!
//! Records are JSON values stored under `"{model}:{key}"`. Listing scans every
//! key of the model namespace, so filtering is linear in the namespace size.

mod collection;
#[cfg(feature = "couch-store")]
pub mod couchdb;
mod memory;
#[cfg(feature = "redis-store")]
pub mod redis;

pub use collection::KvCollection;
pub use memory::MemoryKvStore;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::dao::{models::KvItemFields, storage::StorageResult};

/// Namespace of key-value items.
pub const KV_ITEM_MODEL: &str = "kv_item";

/// Key-value items handle.
pub type KvItemCollection = KvCollection<KvItemFields>;

/// Minimal key-value backend: string keys mapping to JSON values.
pub trait KvStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>>;

    /// Insert or overwrite `key`.
    fn put(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>>;

    /// Remove `key`, returning whether it existed.
    fn delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>>;

    /// Every entry whose key starts with `prefix`, sorted by key.
    fn scan(&self, prefix: &str) -> BoxFuture<'static, StorageResult<Vec<(String, Value)>>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
