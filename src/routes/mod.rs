pub mod admin;
pub mod audit;
pub mod auth;
pub mod submissions;
pub mod tenant;
pub mod workflow;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        // Submissions
        .route(
            "/api/v1/submissions",
            get(submissions::list).post(submissions::create),
        )
        .route(
            "/api/v1/submissions/{id}",
            get(submissions::get).put(submissions::update),
        )
        .route(
            "/api/v1/submissions/{id}/actions",
            get(workflow::available).post(workflow::perform),
        )
        .route(
            "/api/v1/submissions/{id}/comments",
            get(submissions::list_comments).post(workflow::comment),
        )
        .route("/api/v1/submissions/{id}/history", get(submissions::history))
        // Workflow
        .route("/api/v1/workflow/statuses", get(workflow::statuses))
        // Audit
        .route("/api/v1/audit", get(audit::list))
        // Admin
        .route(
            "/api/v1/admin/tenants",
            get(admin::list_tenants).post(admin::create_tenant),
        )
        .route(
            "/api/v1/admin/tenants/{id}",
            get(admin::get_tenant).delete(admin::delete_tenant),
        )
        .route(
            "/api/v1/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/api/v1/admin/users/{id}",
            put(admin::update_user_role).delete(admin::delete_user),
        )
        // Tenant
        .route("/api/v1/tenant", get(tenant::get_tenant))
        .route("/api/v1/tenant/members", get(tenant::list_members))
}

/// Page number and size from query params, clamped to sane bounds.
pub(crate) fn paging(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    (page, per_page, (page - 1).saturating_mul(per_page))
}

pub(crate) fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
