use serde::{Deserialize, Serialize};

/// Identifier of a tenant, the top-level organizational scope an agent
/// enrolls into. Absence is expressed as `Option<TenantId>`, never as a
/// magic zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct TenantId(pub i32);

/// Identifier of a site, an optional sub-scope within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SiteId(pub i32);

/// A possibly partial tenant/site pair. Used both for caller-supplied
/// fallback identities and for the scope resolved from an enrollment token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentScope {
    pub tenant: Option<TenantId>,
    pub site: Option<SiteId>,
}

impl EnrollmentScope {
    pub fn new(tenant: Option<TenantId>, site: Option<SiteId>) -> Self {
        Self { tenant, site }
    }

    /// The empty scope: no tenant, no site.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_unset(&self) -> bool {
        self.tenant.is_none() && self.site.is_none()
    }
}
