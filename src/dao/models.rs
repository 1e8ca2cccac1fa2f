use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dao::{
    id::{DocumentId, HashKey},
    patch::Patchable,
    storage::Record,
};

/// Account stored in the relational `user` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    /// Unique login email.
    pub email: String,
    /// Optional display name.
    pub full_name: Option<String>,
    /// Argon2 PHC string; the plaintext password is never stored.
    pub hashed_password: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl Patchable for UserFields {}

/// Owned item stored in the relational `item` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub title: String,
    pub description: String,
    /// Identifier of the owning user, fixed at creation.
    pub owner_id: i32,
}

impl Patchable for ItemFields {
    const IMMUTABLE_FIELDS: &'static [&'static str] = &[ItemFields::OWNER_FIELD];
}

impl Owned for ItemFields {
    const OWNER_FIELD: &'static str = "owner_id";

    fn owner_id(&self) -> i32 {
        self.owner_id
    }
}

/// Game results stored as a MongoDB document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFields {
    /// Calendar date the games were played on.
    pub date: String,
    /// Free-form game payload.
    pub games: Value,
}

impl Patchable for GameFields {}

/// Named entry stored in the key-value store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KvItemFields {
    pub name: String,
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: f64,
}

impl Patchable for KvItemFields {}

/// Record fields that carry an owning user.
pub trait Owned {
    /// Name of the owner field in the serialized schema.
    const OWNER_FIELD: &'static str;

    fn owner_id(&self) -> i32;
}

/// Create payload for an owned record family; the owner comes from the caller.
pub trait IntoOwnedFields<F> {
    fn into_owned_fields(self, owner_id: i32) -> F;
}

/// Account creation request with a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// Active, non-privileged account.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: None,
            is_active: true,
            is_superuser: false,
        }
    }
}

/// Item creation request before an owner is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub description: String,
}

impl IntoOwnedFields<ItemFields> for NewItem {
    fn into_owned_fields(self, owner_id: i32) -> ItemFields {
        ItemFields {
            title: self.title,
            description: self.description,
            owner_id,
        }
    }
}

pub type UserRecord = Record<i32, UserFields>;
pub type ItemRecord = Record<i32, ItemFields>;
pub type GameRecord = Record<DocumentId, GameFields>;
pub type KvItemRecord = Record<HashKey, KvItemFields>;
