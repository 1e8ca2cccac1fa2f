use serde::Serialize;
use utoipa::ToSchema;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" when every store answers, "degraded" otherwise.
    pub status: String,
    /// Per-store reachability.
    pub stores: StoreHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreHealth {
    pub relational: bool,
    pub document: bool,
    pub key_value: bool,
}

impl HealthResponse {
    pub fn from_stores(stores: StoreHealth) -> Self {
        let healthy = stores.relational && stores.document && stores.key_value;
        Self {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            stores,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}
