use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use validator::Validate;

use crate::{
    dto::kv_item::{KvItemCreate, KvItemListParams, KvItemResponse, KvItemUpdate},
    error::AppError,
    routes::auth::CurrentUser,
    services::kv_item_service,
    state::SharedState,
};

/// Items kept in the key-value store.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/kv_items", get(list_kv_items).post(create_kv_item))
        .route(
            "/kv_items/{key}",
            get(get_kv_item).put(update_kv_item).delete(delete_kv_item),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/kv_items",
    tag = "kv_items",
    params(KvItemListParams),
    responses((status = 200, description = "Key-value items", body = [KvItemResponse])),
    security(("basic" = []))
)]
pub async fn list_kv_items(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Query(params): Query<KvItemListParams>,
) -> Result<Json<Vec<KvItemResponse>>, AppError> {
    Ok(Json(kv_item_service::list_kv_items(&state, params).await?))
}

/// Create an item under a freshly generated key.
#[utoipa::path(
    post,
    path = "/api/v1/kv_items",
    tag = "kv_items",
    request_body = KvItemCreate,
    responses((status = 200, description = "Item created", body = KvItemResponse)),
    security(("basic" = []))
)]
pub async fn create_kv_item(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Json(payload): Json<KvItemCreate>,
) -> Result<Json<KvItemResponse>, AppError> {
    payload.validate()?;
    Ok(Json(kv_item_service::create_kv_item(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/kv_items/{key}",
    tag = "kv_items",
    params(("key" = String, Path, description = "Item key")),
    responses(
        (status = 200, description = "Item found", body = KvItemResponse),
        (status = 404, description = "Unknown key")
    ),
    security(("basic" = []))
)]
pub async fn get_kv_item(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<KvItemResponse>, AppError> {
    Ok(Json(kv_item_service::get_kv_item(&state, &key).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/kv_items/{key}",
    tag = "kv_items",
    params(("key" = String, Path, description = "Item key")),
    request_body = KvItemUpdate,
    responses(
        (status = 200, description = "Item updated", body = KvItemResponse),
        (status = 404, description = "Unknown key")
    ),
    security(("basic" = []))
)]
pub async fn update_kv_item(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(key): Path<String>,
    Json(payload): Json<KvItemUpdate>,
) -> Result<Json<KvItemResponse>, AppError> {
    payload.validate()?;
    Ok(Json(kv_item_service::update_kv_item(&state, &key, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/kv_items/{key}",
    tag = "kv_items",
    params(("key" = String, Path, description = "Item key")),
    responses(
        (status = 200, description = "Item deleted", body = KvItemResponse),
        (status = 404, description = "Unknown key")
    ),
    security(("basic" = []))
)]
pub async fn delete_kv_item(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<KvItemResponse>, AppError> {
    Ok(Json(kv_item_service::delete_kv_item(&state, &key).await?))
}
