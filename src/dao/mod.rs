/// Generic CRUD engine and its owner-scoped and user specialisations.
pub mod crud;
/// Record identifiers.
pub mod id;
/// Key-value storage family.
pub mod kv;
/// Domain record schemas.
pub mod models;
/// Document storage family.
pub mod mongodb;
/// Sparse partial updates.
pub mod patch;
/// Relational storage family.
pub mod relational;
/// Storage abstraction shared by every backend.
pub mod storage;
