//! SeaORM entities backing the relational record families.

pub mod item;
pub mod user;
