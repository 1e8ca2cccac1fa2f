use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use validator::Validate;

use crate::{
    dto::{
        game::{GameCreate, GameResponse, GameUpdate},
        pagination::PageParams,
    },
    error::AppError,
    routes::auth::CurrentUser,
    services::game_service,
    state::SharedState,
};

/// Game documents stored in MongoDB.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/{id}", get(get_game).patch(update_game).delete(delete_game))
}

#[utoipa::path(
    get,
    path = "/api/v1/games",
    tag = "games",
    params(PageParams),
    responses((status = 200, description = "Games in insertion order", body = [GameResponse])),
    security(("basic" = []))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    Ok(Json(game_service::list_games(&state, page).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/games",
    tag = "games",
    request_body = GameCreate,
    responses((status = 200, description = "Game created", body = GameResponse)),
    security(("basic" = []))
)]
pub async fn create_game(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Json(payload): Json<GameCreate>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    Ok(Json(game_service::create_game(&state, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "24-character hex document identifier")),
    responses(
        (status = 200, description = "Game found", body = GameResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Unknown game")
    ),
    security(("basic" = []))
)]
pub async fn get_game(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::get_game(&state, &id).await?))
}

/// Partially update a game; absent fields keep their stored value.
#[utoipa::path(
    patch,
    path = "/api/v1/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "24-character hex document identifier")),
    request_body = GameUpdate,
    responses(
        (status = 200, description = "Game updated", body = GameResponse),
        (status = 404, description = "Unknown game")
    ),
    security(("basic" = []))
)]
pub async fn update_game(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<GameUpdate>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    Ok(Json(game_service::update_game(&state, &id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/games/{id}",
    tag = "games",
    params(("id" = String, Path, description = "24-character hex document identifier")),
    responses(
        (status = 200, description = "Game deleted", body = GameResponse),
        (status = 404, description = "Unknown game")
    ),
    security(("basic" = []))
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::delete_game(&state, &id).await?))
}
