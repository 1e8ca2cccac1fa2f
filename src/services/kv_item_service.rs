use time::OffsetDateTime;

use crate::{
    dao::{
        id::{HashKey, RecordId},
        models::{KvItemFields, KvItemRecord},
        patch::Patch,
        storage::Filter,
    },
    dto::kv_item::{KvItemCreate, KvItemListParams, KvItemResponse, KvItemUpdate},
    error::ServiceError,
    state::SharedState,
};

/// List key-value items, optionally only those named exactly `params.name`.
pub async fn list_kv_items(state: &SharedState, params: KvItemListParams) -> Result<Vec<KvItemResponse>, ServiceError> {
    let filter = params.name.map(|name| Filter::eq("name", name));
    let items = state
        .kv_items()
        .get_multi_filtered(filter, params.skip, params.limit)
        .await?;
    Ok(items.into_iter().map(Into::into).collect())
}

pub async fn create_kv_item(state: &SharedState, payload: KvItemCreate) -> Result<KvItemResponse, ServiceError> {
    let fields = KvItemFields {
        name: payload.name,
        timestamp: unix_seconds(OffsetDateTime::now_utc()),
    };
    Ok(state.kv_items().create(fields).await?.into())
}

pub async fn get_kv_item(state: &SharedState, raw_key: &str) -> Result<KvItemResponse, ServiceError> {
    Ok(load_kv_item(state, raw_key).await?.into())
}

pub async fn update_kv_item(
    state: &SharedState,
    raw_key: &str,
    payload: KvItemUpdate,
) -> Result<KvItemResponse, ServiceError> {
    let existing = load_kv_item(state, raw_key).await?;
    let patch = Patch::from_update(&payload).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    Ok(state.kv_items().update(existing, &patch).await?.into())
}

pub async fn delete_kv_item(state: &SharedState, raw_key: &str) -> Result<KvItemResponse, ServiceError> {
    let key = HashKey::parse(raw_key)?;
    state
        .kv_items()
        .remove(key.clone())
        .await?
        .map(Into::into)
        .ok_or_else(|| not_found(&key))
}

async fn load_kv_item(state: &SharedState, raw_key: &str) -> Result<KvItemRecord, ServiceError> {
    let key = HashKey::parse(raw_key)?;
    state.kv_items().get(key.clone()).await?.ok_or_else(|| not_found(&key))
}

fn not_found(key: &HashKey) -> ServiceError {
    ServiceError::NotFound(format!("key-value item `{key}`"))
}

fn unix_seconds(at: OffsetDateTime) -> f64 {
    at.unix_timestamp_nanos() as f64 / 1_000_000_000.0
}
