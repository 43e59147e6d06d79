//! Enrollment token gate.
//!
//! Decides whether a presented enrollment token authorizes a new agent to
//! join a tenant (and optionally a site), and records consumption of the
//! token against its usage quota. Rejected and unknown tokens are
//! indistinguishable from the outside: both surface as an unset scope, and
//! enrollment falls back to caller-supplied identities.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::db;
use crate::models::{EnrollmentScope, EnrollmentToken, RejectionReason, SiteId, TenantId};

/// The two storage capabilities the gate needs, kept separable so callers
/// can compose their own check-and-increment against the storage layer when
/// they need strict quota enforcement.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Exact-match lookup. `Ok(None)` on a miss; `Err` only on storage failure.
    async fn find_by_token(&self, token: &str) -> Result<Option<EnrollmentToken>, String>;

    /// Atomic in-place `current_uses + 1` scoped by exact token match.
    /// Returns the number of rows affected.
    async fn increment_uses(&self, token: &str) -> Result<u64, String>;
}

/// Postgres-backed store delegating to the db layer.
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<EnrollmentToken>, String> {
        db::enrollment_token::fetch_by_token(&self.pool, token).await
    }

    async fn increment_uses(&self, token: &str) -> Result<u64, String> {
        db::enrollment_token::increment_uses(&self.pool, token).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenGateError {
    #[error("enrollment token lookup failed: {0}")]
    Lookup(String),
    #[error("enrollment token usage update failed: {0}")]
    Consume(String),
}

/// Outcome of resolving a candidate token against caller-supplied fallbacks.
///
/// `token_used` records whether the token materially influenced the result.
/// It says nothing about consumption; bumping the usage counter is a
/// separate [`TokenGate::consume`] call the caller makes once enrollment
/// actually succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeResolution {
    pub tenant: Option<TenantId>,
    pub site: Option<SiteId>,
    pub token_used: bool,
}

impl ScopeResolution {
    fn from_fallback(fallback: EnrollmentScope) -> Self {
        Self {
            tenant: fallback.tenant,
            site: fallback.site,
            token_used: false,
        }
    }
}

/// Storage failure during resolution. Carries the degraded-but-usable
/// fallback resolution so the caller still has identities to proceed with
/// if it chooses to tolerate the failure.
#[derive(Debug, thiserror::Error)]
#[error("scope resolution degraded to fallback identities: {source}")]
pub struct ScopeResolutionError {
    pub fallback: ScopeResolution,
    #[source]
    pub source: TokenGateError,
}

pub struct TokenGate<S> {
    store: S,
}

impl TokenGate<PgTokenStore> {
    pub fn new_pg(pool: PgPool) -> Self {
        Self::new(PgTokenStore::new(pool))
    }
}

impl<S: TokenStore> TokenGate<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate a token and resolve its tenant/site scope.
    ///
    /// An empty token is a defined no-op: no lookup is performed and the
    /// unset scope is returned. Lookup-miss, inactive, expired and
    /// quota-exhausted tokens all yield the unset scope with no error; only
    /// storage failures surface as `Err`. Validation never mutates the
    /// token record.
    pub async fn validate(&self, token: &str) -> Result<EnrollmentScope, TokenGateError> {
        if token.is_empty() {
            return Ok(EnrollmentScope::unset());
        }

        let record = self
            .store
            .find_by_token(token)
            .await
            .map_err(TokenGateError::Lookup)?;

        let record = match record {
            Some(record) => record,
            None => return Ok(self.reject(RejectionReason::NotFound)),
        };

        if let Some(reason) = record.refusal(Utc::now()) {
            return Ok(self.reject(reason));
        }

        Ok(record.scope())
    }

    /// Record one confirmed use of the token.
    ///
    /// An empty token is a no-op. No validity re-check happens here: the
    /// caller is expected to have validated in the same logical operation,
    /// and the validate/consume pair is inherently racy; strict quota
    /// enforcement belongs to the storage layer. A zero-row update (token
    /// deleted in between) is accepted as success.
    pub async fn consume(&self, token: &str) -> Result<(), TokenGateError> {
        if token.is_empty() {
            return Ok(());
        }

        let affected = self
            .store
            .increment_uses(token)
            .await
            .map_err(TokenGateError::Consume)?;

        if affected == 0 {
            tracing::warn!("Enrollment token consume matched no rows");
        }

        Ok(())
    }

    /// Resolve the final enrollment scope from a candidate token and
    /// fallback identities.
    ///
    /// Precedence: token tenant over fallback tenant; token site over
    /// fallback site. A tenant-wide token (no site association) keeps the
    /// resolved tenant and lets the caller's fallback site fill the gap. An
    /// invalid or unknown token behaves exactly like no token at all.
    pub async fn resolve(
        &self,
        token: &str,
        fallback: EnrollmentScope,
    ) -> Result<ScopeResolution, ScopeResolutionError> {
        if token.is_empty() {
            return Ok(ScopeResolution::from_fallback(fallback));
        }

        let resolved = match self.validate(token).await {
            Ok(scope) => scope,
            Err(source) => {
                return Err(ScopeResolutionError {
                    fallback: ScopeResolution::from_fallback(fallback),
                    source,
                })
            }
        };

        let tenant = match resolved.tenant {
            Some(tenant) => tenant,
            // Rejected, unknown, or a token with no tenant association;
            // enrollment proceeds on the fallbacks alone.
            None => return Ok(ScopeResolution::from_fallback(fallback)),
        };

        Ok(ScopeResolution {
            tenant: Some(tenant),
            site: resolved.site.or(fallback.site),
            token_used: true,
        })
    }

    fn reject(&self, reason: RejectionReason) -> EnrollmentScope {
        // The cause stays internal; callers only ever see an unset scope.
        tracing::debug!("Enrollment token rejected: {}", reason.as_str());
        EnrollmentScope::unset()
    }
}
