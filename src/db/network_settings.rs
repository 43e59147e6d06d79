use crate::models;
use sqlx::PgPool;
use tracing::Instrument;

pub async fn fetch_by_tenant(
    pool: &PgPool,
    tenant_id: models::TenantId,
) -> Result<Option<models::TenantNetworkSettings>, String> {
    let query_span = tracing::info_span!("Fetching tenant network settings");
    sqlx::query_as::<_, models::TenantNetworkSettings>(
        r#"
        SELECT id, tenant_id, management_url, setup_key, enabled,
               created_at, updated_at
        FROM tenant_network_settings
        WHERE tenant_id = $1
        "#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch tenant network settings: {:?}", err);
        "Database error".to_string()
    })
}
