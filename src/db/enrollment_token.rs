use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn fetch_by_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<models::EnrollmentToken>, String> {
    let query_span = tracing::info_span!("Fetching enrollment token");
    sqlx::query_as::<_, models::EnrollmentToken>(
        r#"
        SELECT id, token, active, expires_at, max_uses, current_uses,
               tenant_id, site_id, created_at, updated_at
        FROM enrollment_tokens
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch enrollment token: {:?}", err);
        "Database error".to_string()
    })
}

/// Atomic in-place increment scoped by exact token match. Returns the number
/// of rows affected; a vanished token yields 0, not an error.
pub async fn increment_uses(pool: &PgPool, token: &str) -> Result<u64, String> {
    let query_span = tracing::info_span!("Incrementing enrollment token usage");
    sqlx::query(
        r#"
        UPDATE enrollment_tokens
        SET current_uses = current_uses + 1
        WHERE token = $1
        "#,
    )
    .bind(token)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|result| result.rows_affected())
    .map_err(|err| {
        tracing::error!("Failed to increment enrollment token usage: {:?}", err);
        "Failed to update token usage".to_string()
    })
}
