use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db::audit::NewEvent;
use crate::models::Submission;

/// Record an audit event. Called explicitly in handlers after mutations;
/// a failed write is logged and never fails the request.
pub async fn log_event(pool: &PgPool, event: NewEvent<'_>) {
    let action = event.action.to_string();
    if let Err(e) = crate::db::audit::log_event(pool, event).await {
        tracing::error!("Failed to log audit event {action}: {e}");
    }
}

/// Record an event performed by an authenticated user in their own tenant.
pub async fn log_user_event(
    pool: &PgPool,
    auth: &AuthUser,
    action: &str,
    resource_type: &str,
    resource_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    log_event(
        pool,
        NewEvent {
            tenant_id: auth.tenant_id(),
            user_id: Some(auth.user_id),
            actor_role: Some(auth.role),
            action,
            resource_type,
            resource_id,
            details,
        },
    )
    .await;
}

/// Record an event against a submission. Filed under the submission's
/// jurisdiction so the state's audit log shows ministry activity too.
pub async fn log_submission_event(
    pool: &PgPool,
    auth: &AuthUser,
    submission: &Submission,
    action: &str,
    details: Option<serde_json::Value>,
) {
    log_event(
        pool,
        NewEvent {
            tenant_id: submission.jurisdiction_id,
            user_id: Some(auth.user_id),
            actor_role: Some(auth.role),
            action,
            resource_type: "submission",
            resource_id: Some(submission.id),
            details,
        },
    )
    .await;
}
