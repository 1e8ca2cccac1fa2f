use crate::{
    dao::{
        id::RecordId,
        models::{ItemRecord, NewItem},
        patch::Patch,
    },
    dto::{
        item::{ItemCreate, ItemResponse, ItemUpdate},
        pagination::PageParams,
    },
    error::ServiceError,
    services::authz::{self, ListScope, Principal},
    state::SharedState,
};

/// List the items visible to `principal`.
pub async fn list_items(
    state: &SharedState,
    principal: &Principal,
    page: PageParams,
) -> Result<Vec<ItemResponse>, ServiceError> {
    let items = state.items();
    let records = match authz::list_scope(principal) {
        ListScope::All => items.get_multi(page.skip, page.limit).await?,
        ListScope::OwnedBy(owner_id) => items.get_multi_by_owner(owner_id, page.skip, page.limit).await?,
    };
    Ok(records.into_iter().map(Into::into).collect())
}

/// Create an item owned by `principal`.
pub async fn create_item(
    state: &SharedState,
    principal: &Principal,
    payload: ItemCreate,
) -> Result<ItemResponse, ServiceError> {
    let record = state
        .items()
        .create_with_owner(NewItem::from(payload), principal.id)
        .await?;
    Ok(record.into())
}

pub async fn get_item(state: &SharedState, principal: &Principal, raw_id: &str) -> Result<ItemResponse, ServiceError> {
    Ok(load_accessible(state, principal, raw_id).await?.into())
}

pub async fn update_item(
    state: &SharedState,
    principal: &Principal,
    raw_id: &str,
    payload: ItemUpdate,
) -> Result<ItemResponse, ServiceError> {
    let existing = load_accessible(state, principal, raw_id).await?;
    let patch = Patch::from_update(&payload).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let updated = state.items().update(existing, &patch).await?;
    Ok(updated.into())
}

/// Delete an item and return it as it was.
pub async fn delete_item(
    state: &SharedState,
    principal: &Principal,
    raw_id: &str,
) -> Result<ItemResponse, ServiceError> {
    let existing = load_accessible(state, principal, raw_id).await?;
    let removed = state
        .items()
        .remove(existing.id)
        .await?
        .ok_or_else(|| not_found(existing.id))?;
    Ok(removed.into())
}

/// Resolve the item, then apply the ownership gate.
async fn load_accessible(state: &SharedState, principal: &Principal, raw_id: &str) -> Result<ItemRecord, ServiceError> {
    let id = <i32 as RecordId>::parse(raw_id)?;
    let item = state.items().get(id).await?.ok_or_else(|| not_found(id))?;
    authz::ensure_can_access(principal, &item.fields)?;
    Ok(item)
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("item `{id}`"))
}
