use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::Submission;
use crate::state::{AppState, SharedState};
use crate::workflow::presentation::{self, StatusSummary};
use crate::workflow::{
    Action, ActionContext, ActionData, ActionExecutor, ActionOutcome, Notice, NoticeBuffer,
    SubmissionStatus, WorkflowErrorKind,
};

use super::submissions::{load_scoped, next_actions};

#[derive(Deserialize)]
pub struct PerformAction {
    pub action: String,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
pub struct AddComment {
    pub comment: String,
}

#[derive(Serialize)]
pub struct AvailableAction {
    pub action: Action,
    pub label: &'static str,
    pub requires_comment: bool,
}

#[derive(Serialize)]
pub struct ActionResponse {
    #[serde(flatten)]
    pub outcome: ActionOutcome,
    pub notices: Vec<Notice>,
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        let status = match self.outcome.error {
            Some(WorkflowErrorKind::InsufficientPermissions) => StatusCode::FORBIDDEN,
            Some(WorkflowErrorKind::UnknownAction) => StatusCode::BAD_REQUEST,
            Some(WorkflowErrorKind::ExecutionError) | None => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}

pub async fn available(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AvailableAction>>, AppError> {
    let submission = load_scoped(&state, &auth, id).await?;
    let actions = next_actions(&state, &auth, &submission)
        .into_iter()
        .map(|action| AvailableAction {
            action,
            label: action.label(),
            requires_comment: action.requires_comment(),
        })
        .collect();
    Ok(Json(actions))
}

pub async fn perform(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PerformAction>,
) -> Result<ActionResponse, AppError> {
    let data = ActionData {
        comment: req.comment,
    };
    run(&state, &auth, id, &req.action, data).await
}

/// Shortcut for the add-comment action.
pub async fn comment(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddComment>,
) -> Result<ActionResponse, AppError> {
    let data = ActionData::with_comment(req.comment);
    run(&state, &auth, id, Action::AddComment.as_str(), data).await
}

pub async fn statuses() -> Json<Vec<StatusSummary>> {
    Json(
        SubmissionStatus::ALL
            .into_iter()
            .map(presentation::summary)
            .collect(),
    )
}

async fn run(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    action: &str,
    data: ActionData,
) -> Result<ActionResponse, AppError> {
    let submission = load_scoped(state, auth, id).await?;
    let previous = submission.status;
    let ctx = ActionContext {
        submission,
        acting_role: auth.role,
        acting_user_id: auth.user_id,
    };

    let notices = NoticeBuffer::new();
    let outcome = ActionExecutor::new(&state.policy, &state.store, &notices)
        .execute_named(action, &ctx, &data)
        .await;

    if let Some(updated) = outcome.submission.as_ref().filter(|_| outcome.success) {
        let details = if updated.status == previous {
            None
        } else {
            Some(serde_json::json!({ "from": previous, "to": updated.status }))
        };
        let verb = action.parse::<Action>().map_or(action, |a| a.as_str());
        audit::log_submission_event(
            &state.pool,
            auth,
            updated,
            &format!("submission.{verb}"),
            details,
        )
        .await;

        if updated.status != previous {
            notify_new_owner(state, updated);
        }
    }

    Ok(ActionResponse {
        outcome,
        notices: notices.into_notices(),
    })
}

/// Email everyone holding the role that now owns the submission. Best effort.
fn notify_new_owner(state: &AppState, submission: &Submission) {
    let (Some(mailer), Some(role)) = (state.system_mailer.clone(), submission.current_owner_role)
    else {
        return;
    };

    let pool = state.pool.clone();
    let scope = (!role.is_ministry()).then_some(submission.jurisdiction_id);
    let url = format!(
        "{}/submissions/{}",
        state.config.base_url.trim_end_matches('/'),
        submission.id
    );
    let reference_code = submission.reference_code.clone();
    let status_label = presentation::describe(submission.status).label;

    tokio::spawn(async move {
        let recipients = match db::users::list_by_role(&pool, role, scope).await {
            Ok(users) => users,
            Err(e) => {
                tracing::error!("Failed to load {role} recipients for {reference_code}: {e}");
                return;
            }
        };

        for user in recipients {
            if let Err(e) = mailer
                .send_awaiting_action(&user.email, &user.name, &reference_code, status_label, &url)
                .await
            {
                tracing::warn!("Failed to notify {} about {reference_code}: {e}", user.email);
            }
        }
    });
}
