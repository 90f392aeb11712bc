use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::{CommentKind, Role, SubmissionStatus};

/// One jurisdiction's data package moving through approval.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub reference_code: String,
    pub jurisdiction_id: Uuid,
    pub status: SubmissionStatus,
    pub current_owner_role: Option<Role>,
    /// Form data; opaque to the workflow.
    pub payload: serde_json::Value,
    pub version: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub forwarded_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    #[serde(default)]
    pub review_comments: Vec<ReviewComment>,
}

impl Submission {
    /// An unsaved draft owned by the submitting role.
    pub fn new_draft(
        reference_code: String,
        jurisdiction_id: Uuid,
        created_by: Uuid,
        payload: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        let status = SubmissionStatus::Draft;
        Self {
            id: Uuid::now_v7(),
            reference_code,
            jurisdiction_id,
            status,
            current_owner_role: status.owner_role(),
            payload,
            version: 0,
            created_by,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            forwarded_at: None,
            reviewed_at: None,
            approved_at: None,
            review_comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub author_id: Uuid,
    pub author_role: Role,
    pub body: String,
    pub kind: CommentKind,
    pub created_at: DateTime<Utc>,
}
