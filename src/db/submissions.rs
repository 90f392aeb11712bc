use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Submission;
use crate::workflow::{StatusUpdate, SubmissionStatus};

pub async fn create(pool: &PgPool, draft: &Submission) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "INSERT INTO submissions
            (id, reference_code, jurisdiction_id, status, current_owner_role, payload, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(draft.id)
    .bind(&draft.reference_code)
    .bind(draft.jurisdiction_id)
    .bind(draft.status.as_str())
    .bind(draft.current_owner_role.map(|r| r.as_str()))
    .bind(&draft.payload)
    .bind(draft.created_by)
    .fetch_one(pool)
    .await
}

/// Look up a submission. `scope` limits the search to one jurisdiction; `None` searches all.
pub async fn find_scoped(
    pool: &PgPool,
    id: Uuid,
    scope: Option<Uuid>,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions
         WHERE id = $1 AND ($2::uuid IS NULL OR jurisdiction_id = $2)",
    )
    .bind(id)
    .bind(scope)
    .fetch_optional(pool)
    .await
}

pub struct ListParams {
    pub scope: Option<Uuid>,
    pub statuses: Vec<SubmissionStatus>,
    pub limit: i64,
    pub offset: i64,
}

fn status_strings(statuses: &[SubmissionStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

pub async fn list(pool: &PgPool, params: &ListParams) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT * FROM submissions
         WHERE ($1::uuid IS NULL OR jurisdiction_id = $1) AND status = ANY($2)
         ORDER BY updated_at DESC LIMIT $3 OFFSET $4",
    )
    .bind(params.scope)
    .bind(status_strings(&params.statuses))
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &PgPool, params: &ListParams) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM submissions
         WHERE ($1::uuid IS NULL OR jurisdiction_id = $1) AND status = ANY($2)",
    )
    .bind(params.scope)
    .bind(status_strings(&params.statuses))
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

/// Replace the payload of a draft. Returns `None` if the row is no longer a
/// draft or moved past `expected_version`.
pub async fn update_payload(
    pool: &PgPool,
    id: Uuid,
    expected_version: i32,
    payload: &serde_json::Value,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "UPDATE submissions SET payload = $3, version = version + 1, updated_at = now()
         WHERE id = $1 AND version = $2 AND status = $4
         RETURNING *",
    )
    .bind(id)
    .bind(expected_version)
    .bind(payload)
    .bind(SubmissionStatus::Draft.as_str())
    .fetch_optional(pool)
    .await
}

/// Compare-and-set status change. Returns `None` when the row is not at the
/// expected status and version.
pub async fn transition<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    update: &StatusUpdate,
) -> Result<Option<Submission>, sqlx::Error> {
    let stamp = update
        .status
        .audit_stamp()
        .map(|s| format!(", {} = now()", s.column()))
        .unwrap_or_default();

    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions
         SET status = $4, current_owner_role = $5, version = version + 1, updated_at = now(){stamp}
         WHERE id = $1 AND status = $2 AND version = $3
         RETURNING *"
    ))
    .bind(id)
    .bind(update.expected_status.as_str())
    .bind(update.expected_version)
    .bind(update.status.as_str())
    .bind(update.status.owner_role().map(|r| r.as_str()))
    .fetch_optional(executor)
    .await
}
