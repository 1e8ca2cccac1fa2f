//! Document record families backed by MongoDB.

mod collection;
mod config;
mod connection;
mod error;
mod models;

pub use collection::MongoCollection;
pub use config::{DEFAULT_DATABASE_NAME, MongoConfig};
pub use connection::{establish_connection, open_lazy};
pub use error::{MongoDaoError, MongoResult};
pub use models::MongoDocument;

use crate::dao::models::GameFields;

/// Collection holding game documents.
pub const GAME_COLLECTION_NAME: &str = "games";

/// Games collection handle.
pub type GameCollection = MongoCollection<GameFields>;

/// Open the games collection and make sure its indexes exist.
pub async fn games(database: mongodb::Database) -> MongoResult<GameCollection> {
    let collection = GameCollection::new(database, GAME_COLLECTION_NAME);
    collection.ensure_index("date", "game_date_idx").await?;
    Ok(collection)
}
