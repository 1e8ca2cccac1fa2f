use tracing::warn;

use crate::{
    dao::storage::{StorageHandle, StorageResult},
    dto::health::{HealthResponse, StoreHealth},
    state::SharedState,
};

/// Ping every store and report which ones answered.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let (relational, document, key_value) = tokio::join!(
        state.users().base().handle().health_check(),
        state.games().handle().health_check(),
        state.kv_items().handle().health_check(),
    );

    HealthResponse::from_stores(StoreHealth {
        relational: reachable("relational", relational),
        document: reachable("document", document),
        key_value: reachable("key_value", key_value),
    })
}

fn reachable(store: &'static str, result: StorageResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(store, error = %err, "storage health check failed");
            false
        }
    }
}
