use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::{ReviewComment, Submission};

use super::backend::{BackendError, NewComment, StatusUpdate, SubmissionBackend};

/// Postgres-backed submission store. Status changes are compare-and-set on
/// `(status, version)`, so a stale snapshot cannot overwrite a newer one.
#[derive(Clone)]
pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubmissionBackend for PgSubmissionStore {
    async fn update(
        &self,
        submission_id: Uuid,
        update: StatusUpdate,
    ) -> Result<Submission, BackendError> {
        let mut tx = self.pool.begin().await?;

        let Some(mut submission) =
            db::submissions::transition(&mut *tx, submission_id, &update).await?
        else {
            tracing::warn!(
                "Stale transition on submission {submission_id}: expected {} v{}",
                update.expected_status,
                update.expected_version
            );
            return Err(BackendError::new(
                "This submission was changed by someone else. Reload it and try again.",
            ));
        };

        if let Some(message) = &update.message {
            db::comments::create(
                &mut *tx,
                submission_id,
                update.actor_id,
                update.actor_role,
                message,
                update.comment_kind,
            )
            .await?;
        }

        submission.review_comments =
            db::comments::list_for_submission(&mut *tx, submission_id).await?;

        tx.commit().await?;
        Ok(submission)
    }

    async fn add_comment(
        &self,
        submission_id: Uuid,
        comment: NewComment,
    ) -> Result<ReviewComment, BackendError> {
        let comment = db::comments::create(
            &self.pool,
            submission_id,
            comment.author_id,
            comment.author_role,
            &comment.body,
            comment.kind,
        )
        .await?;
        Ok(comment)
    }
}
