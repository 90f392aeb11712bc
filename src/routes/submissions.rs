use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{AuditEvent, ReviewComment, Submission};
use crate::state::{AppState, SharedState};
use crate::workflow::presentation::{self, StatusSummary};
use crate::workflow::visibility::visible_statuses;
use crate::workflow::{Action, SubmissionStatus};

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateSubmission {
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Deserialize)]
pub struct UpdateSubmission {
    pub payload: serde_json::Value,
    pub version: i32,
}

/// A submission as the caller sees it: data, presentation, and what they can do next.
#[derive(Serialize)]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub presentation: StatusSummary,
    pub available_actions: Vec<Action>,
}

impl SubmissionView {
    pub fn new(state: &AppState, auth: &AuthUser, submission: Submission) -> Self {
        Self {
            presentation: presentation::summary(submission.status),
            available_actions: next_actions(state, auth, &submission),
            submission,
        }
    }
}

/// Actions the caller can take on an existing submission. `create` only
/// applies before a row exists, so it is left out.
pub(crate) fn next_actions(
    state: &AppState,
    auth: &AuthUser,
    submission: &Submission,
) -> Vec<Action> {
    state
        .policy
        .available_actions(auth.role, submission)
        .into_iter()
        .filter(|action| *action != Action::Create)
        .collect()
}

/// Load a submission inside the caller's jurisdiction scope, comments included.
pub(crate) async fn load_scoped(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> Result<Submission, AppError> {
    let mut submission = db::submissions::find_scoped(&state.pool, id, auth.scope())
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;
    submission.review_comments = db::comments::list_for_submission(&state.pool, id).await?;
    Ok(submission)
}

/// Like [`load_scoped`], but also hides statuses the caller's role does not list.
async fn load_visible(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> Result<Submission, AppError> {
    let submission = load_scoped(state, auth, id).await?;
    if !visible_statuses(auth.role).contains(&submission.status) {
        return Err(AppError::NotFound("Submission not found".to_string()));
    }
    Ok(submission)
}

/// `{SLUG}-{YYYY}-{6 hex}`, e.g. `KERALA-2025-3FA9C1`.
fn reference_code(slug: &str) -> String {
    let suffix: [u8; 3] = rand::random();
    format!(
        "{}-{}-{}",
        slug.to_uppercase(),
        chrono::Utc::now().format("%Y"),
        hex::encode_upper(suffix)
    )
}

pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let visible = visible_statuses(auth.role);
    let statuses = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => {
            let wanted: SubmissionStatus = raw.parse()?;
            visible.iter().copied().filter(|s| *s == wanted).collect()
        }
        None => visible.to_vec(),
    };

    let (page, per_page, offset) = super::paging(query.page, query.per_page);
    let params = db::submissions::ListParams {
        scope: auth.scope(),
        statuses,
        limit: per_page,
        offset,
    };

    let submissions = db::submissions::list(&state.pool, &params).await?;
    let total = db::submissions::count(&state.pool, &params).await?;

    let submissions: Vec<serde_json::Value> = submissions
        .into_iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id,
                "reference_code": s.reference_code,
                "jurisdiction_id": s.jurisdiction_id,
                "status": s.status,
                "current_owner_role": s.current_owner_role,
                "version": s.version,
                "updated_at": s.updated_at,
                "presentation": presentation::summary(s.status),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "submissions": submissions,
        "total": total,
        "page": page,
        "per_page": per_page,
        "total_pages": (total + per_page - 1) / per_page,
    })))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateSubmission>,
) -> Result<Json<SubmissionView>, AppError> {
    let jurisdiction = db::tenants::find_by_id(&state.pool, auth.tenant_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;

    if jurisdiction.is_ministry() {
        return Err(AppError::Forbidden(
            "Submissions are created by state jurisdictions".to_string(),
        ));
    }

    let draft = Submission::new_draft(
        reference_code(&jurisdiction.slug),
        jurisdiction.id,
        auth.user_id,
        req.payload,
    );

    if !state.policy.authorize(Action::Create, auth.role, &draft) {
        return Err(AppError::Forbidden(format!(
            "A {} cannot create submissions",
            auth.role.label()
        )));
    }

    let submission = db::submissions::create(&state.pool, &draft)
        .await
        .map_err(|e| AppError::conflict_on_constraint(e, "Reference code collision, try again"))?;

    tracing::info!(
        "Submission {} ({}) created by {}",
        submission.reference_code,
        submission.id,
        auth.user_id
    );
    audit::log_submission_event(&state.pool, &auth, &submission, "submission.created", None).await;

    Ok(Json(SubmissionView::new(&state, &auth, submission)))
}

pub async fn get(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionView>, AppError> {
    let submission = load_visible(&state, &auth, id).await?;
    Ok(Json(SubmissionView::new(&state, &auth, submission)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSubmission>,
) -> Result<Json<SubmissionView>, AppError> {
    let submission = load_visible(&state, &auth, id).await?;

    if !state.policy.authorize(Action::Edit, auth.role, &submission) {
        return Err(AppError::Forbidden(format!(
            "A {} cannot edit a submission that is {}",
            auth.role.label(),
            presentation::describe(submission.status).label.to_lowercase()
        )));
    }

    let mut updated = db::submissions::update_payload(&state.pool, id, req.version, &req.payload)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(
                "This submission was changed by someone else. Reload it and try again."
                    .to_string(),
            )
        })?;
    updated.review_comments = submission.review_comments;

    audit::log_submission_event(
        &state.pool,
        &auth,
        &updated,
        "submission.edited",
        Some(serde_json::json!({ "version": updated.version })),
    )
    .await;

    Ok(Json(SubmissionView::new(&state, &auth, updated)))
}

pub async fn list_comments(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReviewComment>>, AppError> {
    let submission = load_visible(&state, &auth, id).await?;
    Ok(Json(submission.review_comments))
}

pub async fn history(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AuditEvent>>, AppError> {
    let submission = load_visible(&state, &auth, id).await?;
    let events = db::audit::list_for_resource(&state.pool, submission.id).await?;
    Ok(Json(events))
}
