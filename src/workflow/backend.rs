use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ReviewComment, Submission};

use super::types::{CommentKind, Role, SubmissionStatus};

/// A status change as handed to the backend. `expected_status` and
/// `expected_version` describe the snapshot the change was authorized against.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: SubmissionStatus,
    pub expected_status: SubmissionStatus,
    pub expected_version: i32,
    pub message: Option<String>,
    pub comment_kind: CommentKind,
    pub actor_id: Uuid,
    pub actor_role: Role,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub author_id: Uuid,
    pub author_role: Role,
    pub body: String,
    pub kind: CommentKind,
}

/// Failure reported by a backend. The message reaches the caller verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Submission backend database error: {err}");
        BackendError::new("The submission could not be saved. Please try again.")
    }
}

/// Where the executor sends state-mutating calls.
#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    /// Apply a status change and return the new snapshot.
    async fn update(
        &self,
        submission_id: Uuid,
        update: StatusUpdate,
    ) -> Result<Submission, BackendError>;

    /// Append a review comment without touching status.
    async fn add_comment(
        &self,
        submission_id: Uuid,
        comment: NewComment,
    ) -> Result<ReviewComment, BackendError>;
}
