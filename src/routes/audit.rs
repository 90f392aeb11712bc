use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct AuditQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// The caller's tenant audit log, newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (page, per_page, offset) = super::paging(query.page, query.per_page);
    let events = db::audit::list(&state.pool, auth.tenant_id(), per_page, offset).await?;

    Ok(Json(serde_json::json!({
        "events": events,
        "page": page,
        "per_page": per_page,
    })))
}
