use std::error::Error;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::dao::{id::RecordId, patch::Patchable};

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {message}")]
    Conflict { message: String },
    /// A stored value no longer matches the record schema.
    #[error("corrupt record: {message}")]
    Corrupt { message: String },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a uniqueness conflict.
    pub fn conflict(message: impl Into<String>) -> Self {
        StorageError::Conflict {
            message: message.into(),
        }
    }

    /// Construct a schema mismatch error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        StorageError::Corrupt {
            message: message.into(),
        }
    }
}

/// A stored record: its identifier plus the schema fields.
///
/// The identifier is kept apart from the fields so a patch can never reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<I, F> {
    /// Primary key assigned by the store.
    pub id: I,
    /// Schema fields.
    pub fields: F,
}

impl<I, F> Record<I, F> {
    /// Build a record from its parts.
    pub fn new(id: I, fields: F) -> Self {
        Self { id, fields }
    }
}

/// Equality filter on a single schema field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Schema field name.
    pub field: &'static str,
    /// Value the field must equal.
    pub value: FilterValue,
}

impl Filter {
    /// Filter on `field == value`.
    pub fn eq(field: &'static str, value: impl Into<FilterValue>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Whether a JSON encoded record satisfies the filter.
    pub fn matches(&self, document: &Value) -> bool {
        let Some(actual) = document.get(self.field) else {
            return false;
        };
        match &self.value {
            FilterValue::Int(expected) => actual.as_i64() == Some(*expected),
            FilterValue::Text(expected) => actual.as_str() == Some(expected.as_str()),
        }
    }
}

/// Scalar value accepted by [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

/// Page request passed to [`StorageHandle::find_many`].
///
/// Results are always ordered by primary key (or storage key for key-value
/// stores) so that consecutive pages do not overlap.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub skip: u64,
    pub limit: u64,
    pub filter: Option<Filter>,
}

/// Backend specific access to one record family.
///
/// Handles are cheap to clone and return `'static` futures so services can
/// move them into spawned tasks.
pub trait StorageHandle: Clone + Send + Sync + 'static {
    /// Identifier type used by this family.
    type Id: RecordId;
    /// Schema fields stored for each record.
    type Fields: Patchable;

    /// Load a record by its identifier.
    fn find_by_id(
        &self,
        id: Self::Id,
    ) -> BoxFuture<'static, StorageResult<Option<Record<Self::Id, Self::Fields>>>>;

    /// Load a page of records in key order.
    fn find_many(
        &self,
        query: Query,
    ) -> BoxFuture<'static, StorageResult<Vec<Record<Self::Id, Self::Fields>>>>;

    /// Persist a new record; the store assigns its identifier.
    fn insert(
        &self,
        fields: Self::Fields,
    ) -> BoxFuture<'static, StorageResult<Record<Self::Id, Self::Fields>>>;

    /// Overwrite the fields of an existing record. Returns `false` when the
    /// record no longer exists.
    fn replace(&self, id: Self::Id, fields: Self::Fields) -> BoxFuture<'static, StorageResult<bool>>;

    /// Delete a record. Returns `false` when nothing was deleted.
    fn delete(&self, id: Self::Id) -> BoxFuture<'static, StorageResult<bool>>;

    /// Check the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filters_compare_by_json_type() {
        let doc = json!({ "owner_id": 7, "name": "seven" });
        assert!(Filter::eq("owner_id", 7).matches(&doc));
        assert!(!Filter::eq("owner_id", 8).matches(&doc));
        assert!(Filter::eq("name", "seven").matches(&doc));
        assert!(!Filter::eq("name", "7").matches(&doc));
        assert!(!Filter::eq("missing", "seven").matches(&doc));
    }
}
