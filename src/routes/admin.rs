use std::sync::LazyLock;

use axum::extract::{Path, State};
use axum::Json;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::db;
use crate::error::AppError;
use crate::middleware::audit;
use crate::models::{Tenant, TenantKind, User};
use crate::state::SharedState;
use crate::workflow::Role;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

#[derive(Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: Option<String>,
    pub kind: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub tenant_id: Uuid,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct UpdateUserRole {
    pub role: Role,
}

fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() > 64 || !SLUG_RE.is_match(slug) {
        return Err(AppError::BadRequest(
            "Slug must be lowercase letters, digits and single hyphens".to_string(),
        ));
    }
    Ok(())
}

/// Ministry roles live in the ministry tenant, state roles in a jurisdiction.
fn check_role_fits(tenant: &Tenant, role: Role) -> Result<(), AppError> {
    if tenant.is_ministry() != role.is_ministry() {
        return Err(AppError::BadRequest(format!(
            "A {} cannot belong to {} tenant '{}'",
            role.label(),
            tenant.kind,
            tenant.name
        )));
    }
    Ok(())
}

pub async fn list_tenants(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Tenant>>, AppError> {
    auth.require_system_admin()?;
    let tenants = db::tenants::list(&state.pool).await?;
    Ok(Json(tenants))
}

pub async fn create_tenant(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateTenant>,
) -> Result<Json<Tenant>, AppError> {
    auth.require_system_admin()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let slug = match req.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => super::slugify(name),
    };
    validate_slug(&slug)?;

    let kind = match req.kind.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.parse::<TenantKind>()?,
        _ => TenantKind::State,
    };

    let tenant = db::tenants::create(&state.pool, name, &slug, kind)
        .await
        .map_err(|e| {
            AppError::conflict_on_constraint(e, "A tenant with this slug already exists")
        })?;

    audit::log_user_event(
        &state.pool,
        &auth,
        "tenant.created",
        "tenant",
        Some(tenant.id),
        Some(serde_json::json!({ "kind": kind })),
    )
    .await;

    Ok(Json(tenant))
}

pub async fn get_tenant(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_system_admin()?;

    let tenant = db::tenants::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;

    let members = db::users::list_by_tenant(&state.pool, id).await?;

    Ok(Json(serde_json::json!({
        "tenant": tenant,
        "members": members,
    })))
}

pub async fn delete_tenant(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_system_admin()?;

    if id == auth.tenant_id() {
        return Err(AppError::BadRequest(
            "Cannot delete your own tenant".to_string(),
        ));
    }

    db::tenants::delete(&state.pool, id).await.map_err(|e| {
        AppError::conflict_on_constraint(
            e,
            "This tenant still has submissions and cannot be deleted",
        )
    })?;

    audit::log_user_event(&state.pool, &auth, "tenant.deleted", "tenant", Some(id), None).await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn list_users(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<User>>, AppError> {
    auth.require_system_admin()?;
    let users = db::users::list_all(&state.pool).await?;
    Ok(Json(users))
}

pub async fn create_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CreateUser>,
) -> Result<Json<User>, AppError> {
    auth.require_system_admin()?;

    if req.email.trim().is_empty() || req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Email and name are required".to_string()));
    }
    password::validate(&req.password)?;

    let tenant = db::tenants::find_by_id(&state.pool, req.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;
    check_role_fits(&tenant, req.role)?;

    let pw_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let user = db::users::create(
        &state.pool,
        tenant.id,
        req.email.trim(),
        &pw_hash,
        req.name.trim(),
        req.role,
        false,
    )
    .await
    .map_err(|e| AppError::conflict_on_constraint(e, "A user with this email already exists"))?;

    if let Some(mailer) = state.system_mailer.clone() {
        let base_url = state.config.base_url.clone();
        let (email, name, role_label) = (user.email.clone(), user.name.clone(), user.role.label());
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_account_created(&email, &name, role_label, &base_url)
                .await
            {
                tracing::warn!("Failed to send account email to {email}: {e}");
            }
        });
    }

    audit::log_user_event(
        &state.pool,
        &auth,
        "user.created",
        "user",
        Some(user.id),
        Some(serde_json::json!({ "role": user.role, "tenant_id": tenant.id })),
    )
    .await;

    Ok(Json(user))
}

pub async fn update_user_role(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRole>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_system_admin()?;

    let user = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let tenant = db::tenants::find_by_id(&state.pool, user.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".to_string()))?;
    check_role_fits(&tenant, req.role)?;

    db::users::update_role(&state.pool, id, req.role).await?;
    // Role lives in the access token; force a fresh login
    db::refresh_tokens::revoke_all_for_user(&state.pool, id).await?;

    audit::log_user_event(
        &state.pool,
        &auth,
        "user.role_updated",
        "user",
        Some(id),
        Some(serde_json::json!({ "from": user.role, "to": req.role })),
    )
    .await;

    Ok(Json(serde_json::json!({ "message": "Role updated" })))
}

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth.require_system_admin()?;

    if id == auth.user_id {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    db::users::delete(&state.pool, id).await.map_err(|e| {
        AppError::conflict_on_constraint(e, "This user authored submissions and cannot be deleted")
    })?;

    audit::log_user_event(&state.pool, &auth, "user.deleted", "user", Some(id), None).await;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}
