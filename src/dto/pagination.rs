use serde::Deserialize;
use utoipa::IntoParams;

use crate::dao::crud::DEFAULT_PAGE_LIMIT;

/// Offset pagination accepted by every listing route.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct PageParams {
    /// Number of records to skip.
    pub skip: u64,
    /// Maximum number of records returned (clamped to 1..=1000).
    pub limit: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
