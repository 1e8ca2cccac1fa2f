//! Error types of the Redis key-value store.

use thiserror::Error;

use crate::dao::storage::StorageError;

/// Convenient result alias returning [`RedisDaoError`] failures.
pub type RedisResult<T> = Result<T, RedisDaoError>;

/// Failures that can occur while interacting with Redis.
#[derive(Debug, Error)]
pub enum RedisDaoError {
    #[error("invalid Redis URL")]
    InvalidUrl {
        #[source]
        source: redis::RedisError,
    },
    #[error("failed to connect to Redis")]
    Connect {
        #[source]
        source: redis::RedisError,
    },
    #[error("Redis {command} failed for `{key}`")]
    Command {
        command: &'static str,
        key: String,
        #[source]
        source: redis::RedisError,
    },
    /// The stored string is not a JSON document.
    #[error("value under `{key}` is not valid JSON")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected Redis PING reply `{reply}`")]
    HealthPing { reply: String },
}

impl From<RedisDaoError> for StorageError {
    fn from(err: RedisDaoError) -> Self {
        let message = err.to_string();
        match err {
            RedisDaoError::Decode { .. } => StorageError::corrupt(message),
            other => StorageError::unavailable(message, other),
        }
    }
}
