pub mod game;
pub mod health;
pub mod item;
pub mod kv_item;
pub mod pagination;
pub mod user;
pub mod validation;
