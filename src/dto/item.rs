use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{ItemRecord, NewItem},
    dto::validation::validate_not_blank,
};

/// Item creation; the owner is the authenticated caller.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ItemCreate {
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl From<ItemCreate> for NewItem {
    fn from(value: ItemCreate) -> Self {
        Self {
            title: value.title,
            description: value.description,
        }
    }
}

/// Partial item update. The owner cannot be changed.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub owner_id: i32,
}

impl From<ItemRecord> for ItemResponse {
    fn from(value: ItemRecord) -> Self {
        Self {
            id: value.id,
            title: value.fields.title,
            description: value.fields.description,
            owner_id: value.fields.owner_id,
        }
    }
}
