use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Submission;

use super::backend::{NewComment, StatusUpdate, SubmissionBackend};
use super::notify::{NoticeLevel, NotificationSink};
use super::policy::WorkflowPolicy;
use super::presentation;
use super::types::{Action, Role, SubmissionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowErrorKind {
    /// The authorization check failed; nothing was sent to the backend.
    InsufficientPermissions,
    /// The action is not something the executor dispatches.
    UnknownAction,
    /// The backend call failed, or the action data was invalid.
    ExecutionError,
}

impl WorkflowErrorKind {
    pub fn title(&self) -> &'static str {
        match self {
            WorkflowErrorKind::InsufficientPermissions => "Permission Denied",
            WorkflowErrorKind::UnknownAction => "Unknown Action",
            WorkflowErrorKind::ExecutionError => "Action Failed",
        }
    }
}

/// Result of one executor call. Failures are values, never panics or errors.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<WorkflowErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

impl ActionOutcome {
    fn succeeded(message: String, submission: Submission) -> Self {
        Self {
            success: true,
            message,
            error: None,
            submission: Some(submission),
        }
    }

    fn failed(kind: WorkflowErrorKind, message: String) -> Self {
        Self {
            success: false,
            message,
            error: Some(kind),
            submission: None,
        }
    }
}

pub struct ActionContext {
    pub submission: Submission,
    pub acting_role: Role,
    pub acting_user_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionData {
    pub comment: Option<String>,
}

impl ActionData {
    pub fn with_comment(comment: impl Into<String>) -> Self {
        Self {
            comment: Some(comment.into()),
        }
    }

    fn comment(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Runs one workflow action: authorize, make a single backend call, report.
pub struct ActionExecutor<'a> {
    policy: &'a WorkflowPolicy,
    backend: &'a dyn SubmissionBackend,
    notifier: &'a dyn NotificationSink,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(
        policy: &'a WorkflowPolicy,
        backend: &'a dyn SubmissionBackend,
        notifier: &'a dyn NotificationSink,
    ) -> Self {
        Self {
            policy,
            backend,
            notifier,
        }
    }

    /// Entry point for untyped action names coming off the wire.
    pub async fn execute_named(
        &self,
        action: &str,
        ctx: &ActionContext,
        data: &ActionData,
    ) -> ActionOutcome {
        match action.parse::<Action>() {
            Ok(action) => self.execute(action, ctx, data).await,
            Err(e) => self.fail(WorkflowErrorKind::UnknownAction, e.to_string()),
        }
    }

    pub async fn execute(
        &self,
        action: Action,
        ctx: &ActionContext,
        data: &ActionData,
    ) -> ActionOutcome {
        let submission = &ctx.submission;

        let Some(rule) = self.policy.resolve(action, ctx.acting_role, submission) else {
            tracing::warn!(
                "Denied {action} by {} ({}) on submission {} in {}",
                ctx.acting_user_id,
                ctx.acting_role,
                submission.id,
                submission.status
            );
            return self.fail(
                WorkflowErrorKind::InsufficientPermissions,
                format!(
                    "A {} cannot perform '{}' on a submission that is {}",
                    ctx.acting_role.label(),
                    action.label(),
                    presentation::describe(submission.status).label.to_lowercase()
                ),
            );
        };

        match (action, rule.to) {
            (Action::AddComment, _) => self.add_comment(ctx, data).await,
            (action, Some(to)) if action.changes_status() => {
                self.transition(action, to, ctx, data).await
            }
            (action, _) => self.fail(
                WorkflowErrorKind::UnknownAction,
                format!("'{}' is not a workflow action", action.label()),
            ),
        }
    }

    async fn transition(
        &self,
        action: Action,
        to: SubmissionStatus,
        ctx: &ActionContext,
        data: &ActionData,
    ) -> ActionOutcome {
        let comment = data.comment();
        if action.requires_comment() && comment.is_none() {
            return self.fail(
                WorkflowErrorKind::ExecutionError,
                format!("A comment is required to {}", action.label().to_lowercase()),
            );
        }

        let update = StatusUpdate {
            status: to,
            expected_status: ctx.submission.status,
            expected_version: ctx.submission.version,
            message: comment.map(str::to_string),
            comment_kind: action.comment_kind(),
            actor_id: ctx.acting_user_id,
            actor_role: ctx.acting_role,
        };

        match self.backend.update(ctx.submission.id, update).await {
            Ok(updated) => {
                tracing::info!(
                    "Submission {} moved {} -> {} by {} ({action})",
                    updated.id,
                    ctx.submission.status,
                    updated.status,
                    ctx.acting_user_id
                );
                let message = format!(
                    "Submission {} is now {}",
                    updated.reference_code,
                    presentation::describe(updated.status).label
                );
                self.notifier
                    .notify(NoticeLevel::Success, &message, action.label());
                ActionOutcome::succeeded(message, updated)
            }
            Err(e) => self.fail(WorkflowErrorKind::ExecutionError, e.message),
        }
    }

    async fn add_comment(&self, ctx: &ActionContext, data: &ActionData) -> ActionOutcome {
        let Some(body) = data.comment() else {
            return self.fail(
                WorkflowErrorKind::ExecutionError,
                "Comment text cannot be empty".to_string(),
            );
        };

        let comment = NewComment {
            author_id: ctx.acting_user_id,
            author_role: ctx.acting_role,
            body: body.to_string(),
            kind: Action::AddComment.comment_kind(),
        };

        match self.backend.add_comment(ctx.submission.id, comment).await {
            Ok(comment) => {
                let mut snapshot = ctx.submission.clone();
                snapshot.review_comments.push(comment);
                let message = "Comment added".to_string();
                self.notifier
                    .notify(NoticeLevel::Success, &message, Action::AddComment.label());
                ActionOutcome::succeeded(message, snapshot)
            }
            Err(e) => self.fail(WorkflowErrorKind::ExecutionError, e.message),
        }
    }

    fn fail(&self, kind: WorkflowErrorKind, message: String) -> ActionOutcome {
        self.notifier
            .notify(NoticeLevel::Error, &message, kind.title());
        ActionOutcome::failed(kind, message)
    }
}
