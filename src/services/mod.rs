/// Ownership and privilege checks.
pub mod authz;
/// OpenAPI documentation generation.
pub mod documentation;
/// Games document operations.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Startup data seeding.
pub mod initial_data;
/// Owned item operations.
pub mod item_service;
/// Key-value item operations.
pub mod kv_item_service;
/// Account management.
pub mod user_service;
