use crate::{
    dao::{
        id::{DocumentId, RecordId},
        models::{GameFields, GameRecord},
        patch::Patch,
    },
    dto::{
        game::{GameCreate, GameResponse, GameUpdate},
        pagination::PageParams,
    },
    error::ServiceError,
    state::SharedState,
};

pub async fn list_games(state: &SharedState, page: PageParams) -> Result<Vec<GameResponse>, ServiceError> {
    let games = state.games().get_multi(page.skip, page.limit).await?;
    Ok(games.into_iter().map(Into::into).collect())
}

pub async fn create_game(state: &SharedState, payload: GameCreate) -> Result<GameResponse, ServiceError> {
    let record = state.games().create(GameFields::from(payload)).await?;
    Ok(record.into())
}

pub async fn get_game(state: &SharedState, raw_id: &str) -> Result<GameResponse, ServiceError> {
    Ok(load_game(state, raw_id).await?.into())
}

pub async fn update_game(state: &SharedState, raw_id: &str, payload: GameUpdate) -> Result<GameResponse, ServiceError> {
    let existing = load_game(state, raw_id).await?;
    let patch = Patch::from_update(&payload).map_err(|err| ServiceError::InvalidInput(err.to_string()))?;
    let updated = state.games().update(existing, &patch).await?;
    Ok(updated.into())
}

pub async fn delete_game(state: &SharedState, raw_id: &str) -> Result<GameResponse, ServiceError> {
    let id = DocumentId::parse(raw_id)?;
    state
        .games()
        .remove(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| not_found(&id))
}

async fn load_game(state: &SharedState, raw_id: &str) -> Result<GameRecord, ServiceError> {
    let id = DocumentId::parse(raw_id)?;
    state.games().get(id).await?.ok_or_else(|| not_found(&id))
}

fn not_found(id: &DocumentId) -> ServiceError {
    ServiceError::NotFound(format!("game `{id}`"))
}
