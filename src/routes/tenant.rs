use axum::extract::State;
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Tenant, User};
use crate::state::SharedState;

pub async fn get_tenant(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Tenant>, AppError> {
    let tenant = db::tenants::find_by_id(&state.pool, auth.tenant_id())
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;
    Ok(Json(tenant))
}

pub async fn list_members(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    let members = db::users::list_by_tenant(&state.pool, auth.tenant_id()).await?;
    Ok(Json(members))
}
