use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod games;
pub mod health;
pub mod items;
pub mod kv_items;
pub mod users;

/// Prefix shared by every resource route.
pub const API_PREFIX: &str = "/api/v1";

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let resources = users::router()
        .merge(items::router())
        .merge(games::router())
        .merge(kv_items::router());

    health::router()
        .nest(API_PREFIX, resources)
        .merge(docs::router())
        .with_state(state)
}
