use uuid::Uuid;

use crate::models::ReviewComment;
use crate::workflow::{CommentKind, Role};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    submission_id: Uuid,
    author_id: Uuid,
    author_role: Role,
    body: &str,
    kind: CommentKind,
) -> Result<ReviewComment, sqlx::Error> {
    sqlx::query_as::<_, ReviewComment>(
        "INSERT INTO review_comments (submission_id, author_id, author_role, body, kind)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(submission_id)
    .bind(author_id)
    .bind(author_role.as_str())
    .bind(body)
    .bind(kind.as_str())
    .fetch_one(executor)
    .await
}

/// Comments in the order they were written.
pub async fn list_for_submission<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    submission_id: Uuid,
) -> Result<Vec<ReviewComment>, sqlx::Error> {
    sqlx::query_as::<_, ReviewComment>(
        "SELECT * FROM review_comments WHERE submission_id = $1 ORDER BY created_at ASC",
    )
    .bind(submission_id)
    .fetch_all(executor)
    .await
}
