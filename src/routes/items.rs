use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use validator::Validate;

use crate::{
    dto::{
        item::{ItemCreate, ItemResponse, ItemUpdate},
        pagination::PageParams,
    },
    error::AppError,
    routes::auth::CurrentUser,
    services::item_service,
    state::SharedState,
};

/// Owned items; every route requires an authenticated user.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
}

/// List items: all of them for superusers, the caller's own otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "items",
    params(PageParams),
    responses(
        (status = 200, description = "Visible items", body = [ItemResponse]),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(("basic" = []))
)]
pub async fn list_items(
    State(state): State<SharedState>,
    user: CurrentUser,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    Ok(Json(item_service::list_items(&state, &user.principal(), page).await?))
}

/// Create an item owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "items",
    request_body = ItemCreate,
    responses((status = 200, description = "Item created", body = ItemResponse)),
    security(("basic" = []))
)]
pub async fn create_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    Json(payload): Json<ItemCreate>,
) -> Result<Json<ItemResponse>, AppError> {
    payload.validate()?;
    Ok(Json(item_service::create_item(&state, &user.principal(), payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item found", body = ItemResponse),
        (status = 403, description = "Item belongs to another user"),
        (status = 404, description = "Unknown item")
    ),
    security(("basic" = []))
)]
pub async fn get_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, AppError> {
    Ok(Json(item_service::get_item(&state, &user.principal(), &id).await?))
}

/// Apply a partial update; only the provided fields change.
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item identifier")),
    request_body = ItemUpdate,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 403, description = "Item belongs to another user"),
        (status = 404, description = "Unknown item")
    ),
    security(("basic" = []))
)]
pub async fn update_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<ItemResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        item_service::update_item(&state, &user.principal(), &id, payload).await?,
    ))
}

/// Delete an item and return it as it was.
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "items",
    params(("id" = i32, Path, description = "Item identifier")),
    responses(
        (status = 200, description = "Item deleted", body = ItemResponse),
        (status = 403, description = "Item belongs to another user"),
        (status = 404, description = "Unknown item")
    ),
    security(("basic" = []))
)]
pub async fn delete_item(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, AppError> {
    Ok(Json(item_service::delete_item(&state, &user.principal(), &id).await?))
}
