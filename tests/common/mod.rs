#![allow(dead_code)]

use std::sync::Arc;

use artemis_back::{
    config::AppConfig,
    dao::{
        kv::MemoryKvStore,
        models::{NewUser, UserRecord},
        mongodb::{self as mongo, GAME_COLLECTION_NAME, GameCollection, MongoConfig},
        relational,
    },
    state::{AppState, SharedState},
};
use base64::{Engine, engine::general_purpose::STANDARD};

/// State over in-memory SQLite and the in-memory key-value store.
///
/// The MongoDB client is created lazily and never contacted unless a test
/// reaches the games collection.
pub async fn state_with(config: AppConfig) -> SharedState {
    let db = relational::connect("sqlite::memory:").await.unwrap();
    relational::ensure_schema(&db).await.unwrap();

    let mongo_config = MongoConfig::from_uri("mongodb://localhost:27017", None).await.unwrap();
    let games = GameCollection::new(mongo::open_lazy(&mongo_config).unwrap(), GAME_COLLECTION_NAME);

    AppState::new(config, db, games, Arc::new(MemoryKvStore::new()))
}

pub async fn state() -> SharedState {
    state_with(AppConfig::default()).await
}

pub async fn seed_user(state: &SharedState, email: &str, password: &str, superuser: bool) -> UserRecord {
    let new_user = NewUser {
        is_superuser: superuser,
        ..NewUser::new(email, password)
    };
    state.users().create(new_user).await.unwrap()
}

/// `Authorization` header value for HTTP Basic.
pub fn basic(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}
