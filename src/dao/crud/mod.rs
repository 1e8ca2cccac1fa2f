//! Generic CRUD engine shared by every record family.
//!
//! [`CrudBase`] is parameterised by a [`StorageHandle`], so the same
//! get / list / create / update / remove logic runs over relational tables,
//! MongoDB collections and key-value namespaces.

mod owned;
mod user;

pub use user::UserCrud;

use thiserror::Error;
use tracing::debug;

use crate::{
    dao::{
        patch::{self, Patch, PatchError},
        storage::{Filter, Query, Record, StorageError, StorageHandle},
    },
    security::SecurityError,
};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
/// Largest page a single listing may return.
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// Result alias for CRUD operations.
pub type CrudResult<T> = Result<T, CrudError>;

/// Failures surfaced by the CRUD engine.
#[derive(Debug, Error)]
pub enum CrudError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid update: {0}")]
    Patch(#[from] PatchError),
    #[error("record `{id}` was removed before the update was written")]
    Missing { id: String },
    #[error(transparent)]
    Security(#[from] SecurityError),
}

/// Clamp a requested page size into `1..=MAX_PAGE_LIMIT`.
pub fn clamp_limit(limit: u64) -> u64 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

/// CRUD operations over one record family.
#[derive(Clone)]
pub struct CrudBase<H> {
    handle: H,
}

impl<H: StorageHandle> CrudBase<H> {
    pub fn new(handle: H) -> Self {
        Self { handle }
    }

    /// Storage handle backing this engine.
    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Fetch one record, `None` when the identifier is unknown.
    pub async fn get(&self, id: H::Id) -> CrudResult<Option<Record<H::Id, H::Fields>>> {
        Ok(self.handle.find_by_id(id).await?)
    }

    /// List records in key order, skipping `skip` and returning at most `limit`.
    pub async fn get_multi(&self, skip: u64, limit: u64) -> CrudResult<Vec<Record<H::Id, H::Fields>>> {
        self.get_multi_filtered(None, skip, limit).await
    }

    /// Persist a new record built from `payload`.
    pub async fn create<C>(&self, payload: C) -> CrudResult<Record<H::Id, H::Fields>>
    where
        C: Into<H::Fields>,
    {
        self.insert_fields(payload.into()).await
    }

    /// Merge `patch` into `existing` and write the result. An empty patch
    /// returns `existing` without touching storage.
    ///
    /// Concurrent updates are last-write-wins.
    pub async fn update(
        &self,
        existing: Record<H::Id, H::Fields>,
        patch: &Patch<H::Fields>,
    ) -> CrudResult<Record<H::Id, H::Fields>> {
        if patch.is_empty() {
            return Ok(existing);
        }
        let merged = patch::merge(&existing.fields, patch)?;
        debug!(id = %existing.id, fields = ?patch.field_names().collect::<Vec<_>>(), "updating record");
        if !self.handle.replace(existing.id.clone(), merged.clone()).await? {
            return Err(CrudError::Missing {
                id: existing.id.to_string(),
            });
        }
        Ok(Record::new(existing.id, merged))
    }

    /// Delete a record and return it as it was, `None` when the identifier is unknown.
    pub async fn remove(&self, id: H::Id) -> CrudResult<Option<Record<H::Id, H::Fields>>> {
        let Some(existing) = self.handle.find_by_id(id.clone()).await? else {
            return Ok(None);
        };
        if !self.handle.delete(id).await? {
            // Deleted concurrently between the read and the delete.
            return Ok(None);
        }
        debug!(id = %existing.id, "removed record");
        Ok(Some(existing))
    }

    pub(crate) async fn insert_fields(&self, fields: H::Fields) -> CrudResult<Record<H::Id, H::Fields>> {
        let record = self.handle.insert(fields).await?;
        debug!(id = %record.id, "created record");
        Ok(record)
    }

    /// List records matching `filter` in key order.
    pub async fn get_multi_filtered(
        &self,
        filter: Option<Filter>,
        skip: u64,
        limit: u64,
    ) -> CrudResult<Vec<Record<H::Id, H::Fields>>> {
        let query = Query {
            skip,
            limit: clamp_limit(limit),
            filter,
        };
        Ok(self.handle.find_many(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dao::{
        kv::{KV_ITEM_MODEL, KvCollection, KvStore, MemoryKvStore},
        models::KvItemFields,
    };

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(100), 100);
        assert_eq!(clamp_limit(5_000), MAX_PAGE_LIMIT);
    }

    #[tokio::test]
    async fn empty_patch_returns_the_record_without_writing() {
        let store = Arc::new(MemoryKvStore::new());
        let crud = CrudBase::new(KvCollection::<KvItemFields>::new(store.clone(), KV_ITEM_MODEL));
        let record = crud
            .create(KvItemFields {
                name: "alpha".into(),
                timestamp: 1.0,
            })
            .await
            .unwrap();

        // Drop the stored entry behind the engine's back: any write now misses.
        store.delete(&record.id.storage_key(KV_ITEM_MODEL)).await.unwrap();

        let unchanged = crud.update(record.clone(), &Patch::new()).await.unwrap();
        assert_eq!(unchanged, record);

        let err = crud
            .update(record, &Patch::new().set("name", "beta"))
            .await
            .unwrap_err();
        assert!(matches!(err, CrudError::Missing { .. }));
    }
}
