use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TenantId;

/// Per-tenant overlay network configuration handed to an agent once its
/// enrollment scope is settled. One row per tenant.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TenantNetworkSettings {
    pub id: i32,
    pub tenant_id: TenantId,
    pub management_url: String,
    pub setup_key: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
