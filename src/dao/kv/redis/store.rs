use futures::future::BoxFuture;
use redis::{Client, aio::ConnectionManager};
use serde_json::Value;
use tracing::{debug, info};

use super::error::{RedisDaoError, RedisResult};
use crate::dao::{kv::KvStore, storage::StorageResult};

/// Keys requested per SCAN round trip.
const SCAN_COUNT: usize = 500;

/// Key-value store keeping each entry as a JSON string under its own Redis key.
#[derive(Clone)]
pub struct RedisKvStore {
    connection: ConnectionManager,
}

impl RedisKvStore {
    /// Open a managed connection to the Redis server at `url`.
    ///
    /// The connection manager reconnects on its own after transient failures.
    pub async fn connect(url: &str) -> RedisResult<Self> {
        let client = Client::open(url).map_err(|source| RedisDaoError::InvalidUrl { source })?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|source| RedisDaoError::Connect { source })?;
        let store = Self { connection };
        store.ping().await?;
        info!("Redis key-value store ready");
        Ok(store)
    }

    async fn get_entry(&self, key: String) -> RedisResult<Option<Value>> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(&key)
            .query_async(&mut connection)
            .await
            .map_err(|source| command_error("GET", &key, source))?;
        raw.map(|raw| decode(&key, &raw)).transpose()
    }

    async fn put_entry(&self, key: String, value: Value) -> RedisResult<()> {
        let mut connection = self.connection.clone();
        let _: () = redis::cmd("SET")
            .arg(&key)
            .arg(value.to_string())
            .query_async(&mut connection)
            .await
            .map_err(|source| command_error("SET", &key, source))?;
        Ok(())
    }

    async fn delete_entry(&self, key: String) -> RedisResult<bool> {
        let mut connection = self.connection.clone();
        let removed: i64 = redis::cmd("DEL")
            .arg(&key)
            .query_async(&mut connection)
            .await
            .map_err(|source| command_error("DEL", &key, source))?;
        Ok(removed > 0)
    }

    async fn scan_entries(&self, prefix: String) -> RedisResult<Vec<(String, Value)>> {
        let mut connection = self.connection.clone();
        let pattern = format!("{}*", escape_glob(&prefix));

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut connection)
                .await
                .map_err(|source| command_error("SCAN", &pattern, source))?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        // SCAN may return a key more than once.
        keys.sort();
        keys.dedup();
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut connection)
            .await
            .map_err(|source| command_error("MGET", &pattern, source))?;

        let mut entries = Vec::with_capacity(keys.len());
        // Keys deleted between SCAN and MGET come back as nil.
        for (key, raw) in keys.into_iter().zip(values) {
            if let Some(raw) = raw {
                let value = decode(&key, &raw)?;
                entries.push((key, value));
            }
        }
        debug!(prefix = %prefix, returned = entries.len(), "scanned Redis keys");
        Ok(entries)
    }

    async fn ping(&self) -> RedisResult<()> {
        let mut connection = self.connection.clone();
        let reply: String = redis::cmd("PING")
            .query_async(&mut connection)
            .await
            .map_err(|source| command_error("PING", "", source))?;
        if reply != "PONG" {
            return Err(RedisDaoError::HealthPing { reply });
        }
        Ok(())
    }
}

impl KvStore for RedisKvStore {
    fn get(&self, key: &str) -> BoxFuture<'static, StorageResult<Option<Value>>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.get_entry(key).await.map_err(Into::into) })
    }

    fn put(&self, key: &str, value: Value) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.put_entry(key, value).await.map_err(Into::into) })
    }

    fn delete(&self, key: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        let key = key.to_owned();
        Box::pin(async move { store.delete_entry(key).await.map_err(Into::into) })
    }

    fn scan(&self, prefix: &str) -> BoxFuture<'static, StorageResult<Vec<(String, Value)>>> {
        let store = self.clone();
        let prefix = prefix.to_owned();
        Box::pin(async move { store.scan_entries(prefix).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}

fn command_error(command: &'static str, key: &str, source: redis::RedisError) -> RedisDaoError {
    RedisDaoError::Command {
        command,
        key: key.to_owned(),
        source,
    }
}

fn decode(key: &str, raw: &str) -> RedisResult<Value> {
    serde_json::from_str(raw).map_err(|source| RedisDaoError::Decode {
        key: key.to_owned(),
        source,
    })
}

/// Escape glob metacharacters so `prefix` matches literally in `SCAN MATCH`.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn glob_metacharacters_are_escaped() {
        assert_eq!(escape_glob("kv_item:"), "kv_item:");
        assert_eq!(escape_glob("a*b?[c]\\"), "a\\*b\\?\\[c\\]\\\\");
    }

    #[test]
    fn stored_strings_decode_as_json() {
        assert_eq!(
            decode("kv_item:1", r#"{"name":"a","timestamp":1.5}"#).unwrap(),
            json!({ "name": "a", "timestamp": 1.5 })
        );
        assert!(matches!(
            decode("kv_item:1", "not json"),
            Err(RedisDaoError::Decode { ref key, .. }) if key == "kv_item:1"
        ));
    }
}
