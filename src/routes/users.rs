use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::{
        pagination::PageParams,
        user::{UserCreate, UserRegister, UserResponse, UserUpdate, UserUpdateMe},
    },
    error::AppError,
    routes::auth::{CurrentSuperuser, CurrentUser},
    services::user_service,
    state::SharedState,
};

/// Account management routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(read_me).put(update_me))
        .route("/users/open", post(register_user))
        .route("/users/{id}", get(get_user).put(update_user))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    params(PageParams),
    responses(
        (status = 200, description = "Accounts", body = [UserResponse]),
        (status = 403, description = "Caller is not a superuser")
    ),
    security(("basic" = []))
)]
pub async fn list_users(
    State(state): State<SharedState>,
    _admin: CurrentSuperuser,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    Ok(Json(user_service::list_users(&state, page).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 409, description = "Email already registered")
    ),
    security(("basic" = []))
)]
pub async fn create_user(
    State(state): State<SharedState>,
    _admin: CurrentSuperuser,
    Json(payload): Json<UserCreate>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    Ok(Json(user_service::create_user(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses((status = 200, description = "Caller's account", body = UserResponse)),
    security(("basic" = []))
)]
pub async fn read_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/users/me",
    tag = "users",
    request_body = UserUpdateMe,
    responses((status = 200, description = "Caller's account updated", body = UserResponse)),
    security(("basic" = []))
)]
pub async fn update_me(
    State(state): State<SharedState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UserUpdateMe>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    Ok(Json(user_service::update_me(&state, user, payload).await?))
}

/// Anonymous sign-up, available only when open registration is enabled.
#[utoipa::path(
    post,
    path = "/api/v1/users/open",
    tag = "users",
    request_body = UserRegister,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 403, description = "Open registration disabled"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register_user(
    State(state): State<SharedState>,
    Json(payload): Json<UserRegister>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    Ok(Json(user_service::register_user(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 403, description = "Not the caller's account"),
        (status = 404, description = "Unknown account")
    ),
    security(("basic" = []))
)]
pub async fn get_user(
    State(state): State<SharedState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(user_service::get_user(&state, &user.principal(), &id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "Account identifier")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 404, description = "Unknown account")
    ),
    security(("basic" = []))
)]
pub async fn update_user(
    State(state): State<SharedState>,
    _admin: CurrentSuperuser,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    Ok(Json(user_service::update_user(&state, &id, payload).await?))
}
