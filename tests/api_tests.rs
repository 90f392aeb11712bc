mod common;

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use statsubmit::workflow::{
    CommentKind, PgSubmissionStore, Role, StatusUpdate, SubmissionBackend, SubmissionStatus,
};

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()["x-content-type-options"].to_str().unwrap(),
        "nosniff"
    );
    assert_eq!(resp.text().await.unwrap(), "ok");

    common::cleanup(app).await;
}

// ── Registration & Auth ─────────────────────────────────────────

#[tokio::test]
async fn register_bootstrap_user_is_ministry_approver() {
    let app = common::spawn_app().await;

    let (body, status) = app.register("admin@test.com", common::PASSWORD, "Admin").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());
    assert_eq!(body["role"], "MOSPI_APPROVER");

    let token = body["access_token"].as_str().unwrap();
    let (tenant, status) = app.get_auth("/api/v1/tenant", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tenant["kind"], "ministry");

    common::cleanup(app).await;
}

#[tokio::test]
async fn register_rejects_second_user() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.register("other@test.com", common::PASSWORD, "Other").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("disabled"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = common::spawn_app().await;

    let (_, status) = app.register("admin@test.com", "short", "Admin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn login_invalid_credentials() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (_, status) = app.login("admin@test.com", "wrongpassword").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, status) = app.login("nobody@test.com", common::PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn login_is_rate_limited_after_repeated_failures() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    for _ in 0..5 {
        let (_, status) = app.login("admin@test.com", "wrongpassword").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (_, status) = app.login("admin@test.com", common::PASSWORD).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    common::cleanup(app).await;
}

#[tokio::test]
async fn refresh_token_reuse_revokes_sessions() {
    let app = common::spawn_app().await;
    app.bootstrap().await;
    let (login_body, _) = app.login("admin@test.com", common::PASSWORD).await;
    let refresh = login_body["refresh_token"].as_str().unwrap().to_string();

    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    let rotated = body["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // Replaying the old token trips reuse detection
    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // ...which also kills the rotated one
    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={rotated}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn protected_routes_require_auth() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .get(app.url("/api/v1/submissions"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

// ── Admin ───────────────────────────────────────────────────────

#[tokio::test]
async fn admin_rejects_role_in_wrong_tenant_kind() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    let state = app.create_tenant(&admin, "Kerala", "state").await;

    let (body, status) = app
        .post_auth(
            "/api/v1/admin/users",
            &admin,
            &json!({
                "tenant_id": state["id"],
                "email": "rev@test.com",
                "password": common::PASSWORD,
                "name": "Reviewer",
                "role": "MOSPI_REVIEWER",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    common::cleanup(app).await;
}

#[tokio::test]
async fn admin_rejects_duplicate_tenant_slug() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;
    app.create_tenant(&admin, "Kerala", "state").await;

    let (_, status) = app
        .post_auth(
            "/api/v1/admin/tenants",
            &admin,
            &json!({ "name": "Kerala", "kind": "state" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::cleanup(app).await;
}

#[tokio::test]
async fn admin_tenant_kind_is_validated_and_normalized() {
    let app = common::spawn_app().await;
    let admin = app.bootstrap().await;

    let (body, status) = app
        .post_auth(
            "/api/v1/admin/tenants",
            &admin,
            &json!({ "name": "Goa", "kind": "province" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown tenant kind: 'province'");

    let tenant = app.create_tenant(&admin, "Statistics Wing", "MINISTRY").await;
    assert_eq!(tenant["kind"], "ministry");

    let (body, status) = app
        .post_auth("/api/v1/admin/tenants", &admin, &json!({ "name": "Goa" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "state");

    common::cleanup(app).await;
}

#[tokio::test]
async fn non_admin_cannot_use_admin_routes() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;

    let (_, status) = app.get_auth("/api/v1/admin/users", &cast.nodal).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

// ── Submissions ─────────────────────────────────────────────────

#[tokio::test]
async fn create_draft_assigns_reference_and_owner() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;

    let sub = app
        .create_submission(&cast.nodal, json!({ "households": 1200 }))
        .await;
    assert_eq!(sub["status"], "DRAFT");
    assert_eq!(sub["current_owner_role"], "NODAL_OFFICER");
    assert_eq!(sub["jurisdiction_id"], cast.state_id.as_str());
    assert_eq!(sub["presentation"]["label"], "Draft");
    assert_eq!(sub["presentation"]["progress"], 10);

    let code = sub["reference_code"].as_str().unwrap();
    let parts: Vec<&str> = code.split('-').collect();
    assert_eq!(parts[0], "KERALA");
    assert_eq!(parts[1].len(), 4);
    assert_eq!(parts[2].len(), 6);

    let actions: Vec<&str> = sub["available_actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a.as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["edit", "submit-to-state"]);

    common::cleanup(app).await;
}

#[tokio::test]
async fn only_nodal_officer_creates_submissions() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;

    let (_, status) = app
        .post_auth("/api/v1/submissions", &cast.state_approver, &json!({ "payload": {} }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, status) = app
        .post_auth("/api/v1/submissions", &cast.reviewer, &json!({ "payload": {} }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

#[tokio::test]
async fn edit_with_stale_version_conflicts() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({ "v": 1 })).await;
    let id = sub["id"].as_str().unwrap();
    let path = format!("/api/v1/submissions/{id}");

    let (body, status) = app
        .put_auth(&path, &cast.nodal, &json!({ "payload": { "v": 2 }, "version": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["version"], 1);
    assert_eq!(body["payload"]["v"], 2);

    let (_, status) = app
        .put_auth(&path, &cast.nodal, &json!({ "payload": { "v": 3 }, "version": 0 }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::cleanup(app).await;
}

#[tokio::test]
async fn edit_is_refused_once_submitted() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();

    let (_, status) = app.act(&cast.nodal, id, "submit-to-state", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app
        .put_auth(
            &format!("/api/v1/submissions/{id}"),
            &cast.nodal,
            &json!({ "payload": { "late": true }, "version": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

// ── Workflow ────────────────────────────────────────────────────

#[tokio::test]
async fn full_approval_path() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({ "rows": 42 })).await;
    let id = sub["id"].as_str().unwrap();

    let steps = [
        (&cast.nodal, "submit-to-state", "SUBMITTED_TO_STATE", json!("STATE_APPROVER")),
        (
            &cast.state_approver,
            "forward-to-ministry",
            "SUBMITTED_TO_MOSPI_REVIEWER",
            json!("MOSPI_REVIEWER"),
        ),
        (
            &cast.reviewer,
            "forward-to-ministry",
            "SUBMITTED_TO_MOSPI_APPROVER",
            json!("MOSPI_APPROVER"),
        ),
        (&cast.approver, "approve", "APPROVED", json!(null)),
    ];

    for (token, action, expected, owner) in steps {
        let (body, status) = app.act(token, id, action, None).await;
        assert_eq!(status, StatusCode::OK, "{action}: {body}");
        assert_eq!(body["success"], true, "{action}: {body}");
        assert_eq!(body["submission"]["status"], expected);
        assert_eq!(body["submission"]["current_owner_role"], owner);
        assert_eq!(body["notices"][0]["level"], "success");
    }

    let (body, _) = app
        .get_auth(&format!("/api/v1/submissions/{id}"), &cast.approver)
        .await;
    assert_eq!(body["status"], "APPROVED");
    assert_eq!(body["version"], 4);
    assert_eq!(body["presentation"]["progress"], 100);
    assert_eq!(body["presentation"]["terminal"], true);
    assert!(body["submitted_at"].is_string());
    assert!(body["forwarded_at"].is_string());
    assert!(body["reviewed_at"].is_string());
    assert!(body["approved_at"].is_string());
    assert_eq!(body["available_actions"], json!(["add-comment"]));

    let (history, status) = app
        .get_auth(&format!("/api/v1/submissions/{id}/history"), &cast.approver)
        .await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec![
            "submission.created",
            "submission.submit-to-state",
            "submission.forward-to-ministry",
            "submission.forward-to-ministry",
            "submission.approve",
        ]
    );

    common::cleanup(app).await;
}

#[tokio::test]
async fn return_for_revision_then_resubmit() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();

    app.act(&cast.nodal, id, "submit-to-state", None).await;
    app.act(&cast.state_approver, id, "forward-to-ministry", None).await;

    let (body, status) = app
        .act(&cast.reviewer, id, "state-reject", Some("Table 4 totals do not add up"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["submission"]["status"], "RETURNED_FROM_MOSPI");
    assert_eq!(body["submission"]["current_owner_role"], "NODAL_OFFICER");

    let comments = body["submission"]["review_comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["kind"], "rejection");
    assert_eq!(comments[0]["author_role"], "MOSPI_REVIEWER");

    let (body, status) = app.act(&cast.nodal, id, "resubmit", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["submission"]["status"], "SUBMITTED_TO_STATE");

    common::cleanup(app).await;
}

#[tokio::test]
async fn reject_without_comment_is_an_execution_error() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();
    app.act(&cast.nodal, id, "submit-to-state", None).await;

    let (body, status) = app.act(&cast.state_approver, id, "state-reject", Some("  ")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "EXECUTION_ERROR");
    assert_eq!(body["notices"][0]["title"], "Action Failed");

    let (body, _) = app
        .get_auth(&format!("/api/v1/submissions/{id}"), &cast.state_approver)
        .await;
    assert_eq!(body["status"], "SUBMITTED_TO_STATE");

    common::cleanup(app).await;
}

#[tokio::test]
async fn final_reject_is_terminal() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();

    app.act(&cast.nodal, id, "submit-to-state", None).await;
    app.act(&cast.state_approver, id, "forward-to-ministry", None).await;
    let (body, _) = app
        .act(&cast.reviewer, id, "final-reject", Some("Out of scope for this survey round"))
        .await;
    assert_eq!(body["submission"]["status"], "REJECTED_FINAL");
    assert_eq!(body["submission"]["current_owner_role"], json!(null));

    let (body, status) = app.act(&cast.nodal, id, "resubmit", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "INSUFFICIENT_PERMISSIONS");

    common::cleanup(app).await;
}

#[tokio::test]
async fn wrong_role_gets_structured_403() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();
    app.act(&cast.nodal, id, "submit-to-state", None).await;

    let (body, status) = app.act(&cast.nodal, id, "approve", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INSUFFICIENT_PERMISSIONS");
    assert_eq!(body["notices"][0]["level"], "error");
    assert_eq!(body["notices"][0]["title"], "Permission Denied");

    // A ministry approver cannot skip the reviewer
    let (body, status) = app.act(&cast.approver, id, "approve", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    common::cleanup(app).await;
}

#[tokio::test]
async fn unknown_action_is_400() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();

    let (body, status) = app.act(&cast.nodal, id, "teleport", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UNKNOWN_ACTION");

    // Normalized names are accepted
    let (body, status) = app.act(&cast.nodal, id, "Submit To State", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["submission"]["status"], "SUBMITTED_TO_STATE");

    common::cleanup(app).await;
}

#[tokio::test]
async fn comments_are_closed_on_drafts_and_open_afterwards() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();
    let path = format!("/api/v1/submissions/{id}/comments");

    let (body, status) = app
        .post_auth(&path, &cast.nodal, &json!({ "comment": "note to self" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    app.act(&cast.nodal, id, "submit-to-state", None).await;

    let (body, status) = app
        .post_auth(&path, &cast.state_approver, &json!({ "comment": "Looking at it" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["submission"]["status"], "SUBMITTED_TO_STATE");

    let (body, status) = app
        .post_auth(&path, &cast.nodal, &json!({ "comment": "Thanks" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (comments, _) = app.get_auth(&path, &cast.nodal).await;
    let bodies: Vec<&str> = comments
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["Looking at it", "Thanks"]);

    common::cleanup(app).await;
}

#[tokio::test]
async fn available_actions_reflect_role_and_status() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();
    app.act(&cast.nodal, id, "submit-to-state", None).await;

    let path = format!("/api/v1/submissions/{id}/actions");
    let (body, status) = app.get_auth(&path, &cast.state_approver).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["forward-to-ministry", "state-reject", "add-comment"]);
    assert_eq!(body[1]["requires_comment"], true);

    let (body, _) = app.get_auth(&path, &cast.nodal).await;
    assert_eq!(
        body,
        json!([{ "action": "add-comment", "label": "Add Comment", "requires_comment": true }])
    );

    common::cleanup(app).await;
}

// ── Visibility ──────────────────────────────────────────────────

#[tokio::test]
async fn listing_is_filtered_by_role_and_jurisdiction() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;

    let draft = app.create_submission(&cast.nodal, json!({})).await;
    let sent = app.create_submission(&cast.nodal, json!({})).await;
    let sent_id = sent["id"].as_str().unwrap();
    app.act(&cast.nodal, sent_id, "submit-to-state", None).await;

    let (body, _) = app.get_auth("/api/v1/submissions", &cast.nodal).await;
    assert_eq!(body["total"], 2);

    let (body, _) = app.get_auth("/api/v1/submissions", &cast.state_approver).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"][0]["id"], sent["id"]);

    let (body, _) = app.get_auth("/api/v1/submissions", &cast.reviewer).await;
    assert_eq!(body["total"], 0);

    app.act(&cast.state_approver, sent_id, "forward-to-ministry", None).await;
    let (body, _) = app.get_auth("/api/v1/submissions", &cast.reviewer).await;
    assert_eq!(body["total"], 1);

    let (body, _) = app
        .get_auth("/api/v1/submissions?status=draft", &cast.nodal)
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"][0]["id"], draft["id"]);

    let (_, status) = app
        .get_auth("/api/v1/submissions?status=limbo", &cast.nodal)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Drafts stay hidden from the ministry even by id
    let draft_id = draft["id"].as_str().unwrap();
    let (_, status) = app
        .get_auth(&format!("/api/v1/submissions/{draft_id}"), &cast.reviewer)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn other_jurisdictions_are_invisible() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();

    let other = app.create_tenant(&cast.admin, "Goa", "state").await;
    let outsider = app
        .create_user(&cast.admin, other["id"].as_str().unwrap(), "nodal@goa.test", "NODAL_OFFICER")
        .await;

    let (body, _) = app.get_auth("/api/v1/submissions", &outsider).await;
    assert_eq!(body["total"], 0);

    let (_, status) = app
        .get_auth(&format!("/api/v1/submissions/{id}"), &outsider)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app.act(&outsider, id, "submit-to-state", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn status_table_lists_every_status() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (body, status) = app.get_auth("/api/v1/workflow/statuses", &token).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["status"], "DRAFT");
    assert_eq!(rows[0]["owner_role"], "NODAL_OFFICER");

    common::cleanup(app).await;
}

#[tokio::test]
async fn audit_log_shows_ministry_activity_to_the_state() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id = sub["id"].as_str().unwrap();
    app.act(&cast.nodal, id, "submit-to-state", None).await;
    app.act(&cast.state_approver, id, "forward-to-ministry", None).await;
    app.act(&cast.reviewer, id, "forward-to-ministry", None).await;

    let (body, status) = app.get_auth("/api/v1/audit", &cast.nodal).await;
    assert_eq!(status, StatusCode::OK);
    let roles: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["resource_type"] == "submission")
        .filter_map(|e| e["actor_role"].as_str())
        .collect();
    assert!(roles.contains(&"MOSPI_REVIEWER"), "{body}");

    common::cleanup(app).await;
}

#[tokio::test]
async fn huge_page_numbers_return_empty_pages() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    app.create_submission(&cast.nodal, json!({})).await;

    let (body, status) = app
        .get_auth("/api/v1/submissions?page=9223372036854775807", &cast.nodal)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"].as_array().unwrap().len(), 0);

    let (body, status) = app
        .get_auth("/api/v1/audit?page=9223372036854775807&per_page=100", &cast.nodal)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["events"].as_array().unwrap().len(), 0);

    common::cleanup(app).await;
}

// ── Store ───────────────────────────────────────────────────────

#[tokio::test]
async fn store_refuses_stale_status_update() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id: Uuid = sub["id"].as_str().unwrap().parse().unwrap();
    let author: Uuid = sub["created_by"].as_str().unwrap().parse().unwrap();

    let store = PgSubmissionStore::new(app.pool.clone());
    let update = StatusUpdate {
        status: SubmissionStatus::SubmittedToState,
        expected_status: SubmissionStatus::Draft,
        expected_version: 0,
        message: Some("first".to_string()),
        comment_kind: CommentKind::Comment,
        actor_id: author,
        actor_role: Role::NodalOfficer,
    };

    let updated = store.update(id, update.clone()).await.unwrap();
    assert_eq!(updated.status, SubmissionStatus::SubmittedToState);
    assert_eq!(updated.version, 1);
    assert_eq!(updated.review_comments.len(), 1);

    // Same snapshot again: the row has moved on
    let err = store.update(id, update).await.unwrap_err();
    assert!(err.message.contains("changed by someone else"));

    let comments: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM review_comments WHERE submission_id = $1")
            .bind(id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(comments, 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn store_rolls_back_when_comment_reload_fails() {
    let app = common::spawn_app().await;
    let cast = app.cast().await;
    let sub = app.create_submission(&cast.nodal, json!({})).await;
    let id: Uuid = sub["id"].as_str().unwrap().parse().unwrap();
    let author: Uuid = sub["created_by"].as_str().unwrap().parse().unwrap();

    // No message, so the only comment query is the reload after the status change
    sqlx::query("ALTER TABLE review_comments RENAME TO review_comments_moved")
        .execute(&app.pool)
        .await
        .unwrap();

    let store = PgSubmissionStore::new(app.pool.clone());
    let update = StatusUpdate {
        status: SubmissionStatus::SubmittedToState,
        expected_status: SubmissionStatus::Draft,
        expected_version: 0,
        message: None,
        comment_kind: CommentKind::Comment,
        actor_id: author,
        actor_role: Role::NodalOfficer,
    };
    assert!(store.update(id, update).await.is_err());

    let (status, version): (String, i32) =
        sqlx::query_as("SELECT status, version FROM submissions WHERE id = $1")
            .bind(id)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(status, "DRAFT");
    assert_eq!(version, 0);

    common::cleanup(app).await;
}
