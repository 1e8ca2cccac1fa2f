use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dao::{crud::DEFAULT_PAGE_LIMIT, models::KvItemRecord},
    dto::validation::validate_not_blank,
};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct KvItemCreate {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
}

/// Partial update; the creation timestamp is fixed.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct KvItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,
}

/// Listing parameters with an optional exact-name filter.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct KvItemListParams {
    /// Only return items with exactly this name.
    pub name: Option<String>,
    pub skip: u64,
    pub limit: u64,
}

impl Default for KvItemListParams {
    fn default() -> Self {
        Self {
            name: None,
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KvItemResponse {
    /// Opaque record key.
    pub pk: String,
    pub name: String,
    /// Creation time in seconds since the Unix epoch.
    pub timestamp: f64,
}

impl From<KvItemRecord> for KvItemResponse {
    fn from(value: KvItemRecord) -> Self {
        Self {
            pk: value.id.to_string(),
            name: value.fields.name,
            timestamp: value.fields.timestamp,
        }
    }
}
