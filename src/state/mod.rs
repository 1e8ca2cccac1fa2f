use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    dao::{
        crud::{CrudBase, UserCrud},
        kv::{KV_ITEM_MODEL, KvItemCollection, KvStore},
        mongodb::GameCollection,
        relational::{ItemCollection, UserCollection},
    },
};

pub type SharedState = Arc<AppState>;

/// CRUD engine over the items table.
pub type ItemCrud = CrudBase<ItemCollection>;
/// CRUD engine over the games collection.
pub type GameCrud = CrudBase<GameCollection>;
/// CRUD engine over the key-value item namespace.
pub type KvItemCrud = CrudBase<KvItemCollection>;

/// Central application state holding one CRUD engine per record family.
pub struct AppState {
    config: AppConfig,
    users: UserCrud<UserCollection>,
    items: ItemCrud,
    games: GameCrud,
    kv_items: KvItemCrud,
}

impl AppState {
    /// Wire the engines onto already opened storage handles.
    pub fn new(
        config: AppConfig,
        db: DatabaseConnection,
        games: GameCollection,
        kv_store: Arc<dyn KvStore>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            users: UserCrud::new(UserCollection::new(db.clone())),
            items: CrudBase::new(ItemCollection::new(db)),
            games: CrudBase::new(games),
            kv_items: CrudBase::new(KvItemCollection::new(kv_store, KV_ITEM_MODEL)),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn users(&self) -> &UserCrud<UserCollection> {
        &self.users
    }

    pub fn items(&self) -> &ItemCrud {
        &self.items
    }

    pub fn games(&self) -> &GameCrud {
        &self.games
    }

    pub fn kv_items(&self) -> &KvItemCrud {
        &self.kv_items
    }
}
