use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EnrollmentScope, SiteId, TenantId};

/// Row mapping for the enrollment_tokens table.
///
/// Records are created, deactivated and expired by the issuance side; this
/// crate only reads them and bumps `current_uses` on consumption.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrollmentToken {
    pub id: i32,
    pub token: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    /// 0 means unlimited.
    pub max_uses: i32,
    pub current_uses: i32,
    pub tenant_id: Option<TenantId>,
    pub site_id: Option<SiteId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a token must not authorize an enrollment. Logged internally, then
/// collapsed to an indistinguishable "no scope" result at the gate boundary
/// so callers cannot probe token state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    NotFound,
    Inactive,
    Expired,
    QuotaExhausted,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::NotFound => "not_found",
            RejectionReason::Inactive => "inactive",
            RejectionReason::Expired => "expired",
            RejectionReason::QuotaExhausted => "quota_exhausted",
        }
    }
}

impl EnrollmentToken {
    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |deadline| deadline <= at)
    }

    pub fn quota_exhausted(&self) -> bool {
        self.max_uses > 0 && self.current_uses >= self.max_uses
    }

    /// First reason this token must be refused at `at`, if any. Checks run
    /// in a fixed order: active flag, expiration, usage quota.
    pub fn refusal(&self, at: DateTime<Utc>) -> Option<RejectionReason> {
        if !self.active {
            return Some(RejectionReason::Inactive);
        }
        if self.is_expired(at) {
            return Some(RejectionReason::Expired);
        }
        if self.quota_exhausted() {
            return Some(RejectionReason::QuotaExhausted);
        }
        None
    }

    pub fn scope(&self) -> EnrollmentScope {
        EnrollmentScope::new(self.tenant_id, self.site_id)
    }
}
