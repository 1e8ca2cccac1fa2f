use crate::dao::{
    models::{IntoOwnedFields, Owned},
    storage::{Filter, Record, StorageHandle},
};

use super::{CrudBase, CrudResult};

/// Owner-scoped operations for families whose fields carry an owner.
impl<H> CrudBase<H>
where
    H: StorageHandle,
    H::Fields: Owned,
{
    /// Create a record owned by `owner_id`, whatever the payload says.
    pub async fn create_with_owner<C>(&self, payload: C, owner_id: i32) -> CrudResult<Record<H::Id, H::Fields>>
    where
        C: IntoOwnedFields<H::Fields>,
    {
        self.insert_fields(payload.into_owned_fields(owner_id)).await
    }

    /// List the records owned by `owner_id` in key order.
    pub async fn get_multi_by_owner(
        &self,
        owner_id: i32,
        skip: u64,
        limit: u64,
    ) -> CrudResult<Vec<Record<H::Id, H::Fields>>> {
        let filter = Filter::eq(<H::Fields as Owned>::OWNER_FIELD, owner_id);
        self.get_multi_filtered(Some(filter), skip, limit).await
    }
}
