use sqlx::PgPool;
use uuid::Uuid;

use crate::models::AuditEvent;
use crate::workflow::Role;

pub struct NewEvent<'a> {
    pub tenant_id: Uuid,
    pub user_id: Option<Uuid>,
    pub actor_role: Option<Role>,
    pub action: &'a str,
    pub resource_type: &'a str,
    pub resource_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
}

pub async fn log_event(pool: &PgPool, event: NewEvent<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_events
            (tenant_id, user_id, actor_role, action, resource_type, resource_id, details)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(event.tenant_id)
    .bind(event.user_id)
    .bind(event.actor_role.map(|r| r.as_str()))
    .bind(event.action)
    .bind(event.resource_type)
    .bind(event.resource_id)
    .bind(event.details)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(
    pool: &PgPool,
    tenant_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditEvent>, sqlx::Error> {
    sqlx::query_as::<_, AuditEvent>(
        "SELECT * FROM audit_events WHERE tenant_id = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(tenant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn list_for_resource(
    pool: &PgPool,
    resource_id: Uuid,
) -> Result<Vec<AuditEvent>, sqlx::Error> {
    sqlx::query_as::<_, AuditEvent>(
        "SELECT * FROM audit_events WHERE resource_id = $1 ORDER BY created_at ASC",
    )
    .bind(resource_id)
    .fetch_all(pool)
    .await
}
