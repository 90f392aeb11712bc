#![allow(dead_code)]

use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use statsubmit::config::Config;

pub const PASSWORD: &str = "password123";

/// A running test server instance with a dedicated test database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
}

/// Tokens for one user of each role, all in the same state jurisdiction.
pub struct Cast {
    pub admin: String,
    pub state_id: String,
    pub nodal: String,
    pub state_approver: String,
    pub reviewer: String,
    pub approver: String,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(&json!({ "email": email, "password": password, "name": name }))
            .send()
            .await
            .expect("register request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("login request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Register the bootstrap admin (a MoSPI approver), return its access token.
    pub async fn bootstrap(&self) -> String {
        let (body, status) = self.register("admin@test.com", PASSWORD, "Admin").await;
        assert_eq!(status, StatusCode::OK, "bootstrap register failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn create_tenant(&self, admin: &str, name: &str, kind: &str) -> Value {
        let (body, status) = self
            .post_auth(
                "/api/v1/admin/tenants",
                admin,
                &json!({ "name": name, "kind": kind }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create tenant failed: {body}");
        body
    }

    /// Create a user and log them in, return the access token.
    pub async fn create_user(
        &self,
        admin: &str,
        tenant_id: &str,
        email: &str,
        role: &str,
    ) -> String {
        let (body, status) = self
            .post_auth(
                "/api/v1/admin/users",
                admin,
                &json!({
                    "tenant_id": tenant_id,
                    "email": email,
                    "password": PASSWORD,
                    "name": email,
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create user failed: {body}");

        let (body, status) = self.login(email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Bootstrap, then one state jurisdiction with a user per role.
    pub async fn cast(&self) -> Cast {
        let admin = self.bootstrap().await;
        let tenants: Value = self.get_auth("/api/v1/admin/tenants", &admin).await.0;
        let ministry_id = tenants[0]["id"].as_str().unwrap().to_string();

        let state = self.create_tenant(&admin, "Kerala", "state").await;
        let state_id = state["id"].as_str().unwrap().to_string();

        let nodal = self
            .create_user(&admin, &state_id, "nodal@kerala.test", "NODAL_OFFICER")
            .await;
        let state_approver = self
            .create_user(&admin, &state_id, "approver@kerala.test", "STATE_APPROVER")
            .await;
        let reviewer = self
            .create_user(&admin, &ministry_id, "reviewer@mospi.test", "MOSPI_REVIEWER")
            .await;
        let approver = self
            .create_user(&admin, &ministry_id, "approver@mospi.test", "MOSPI_APPROVER")
            .await;

        Cast {
            admin,
            state_id,
            nodal,
            state_approver,
            reviewer,
            approver,
        }
    }

    /// Create a draft as `token`, return the submission JSON.
    pub async fn create_submission(&self, token: &str, payload: Value) -> Value {
        let (body, status) = self
            .post_auth("/api/v1/submissions", token, &json!({ "payload": payload }))
            .await;
        assert_eq!(status, StatusCode::OK, "create submission failed: {body}");
        body
    }

    /// Run a workflow action, return (body, status).
    pub async fn act(
        &self,
        token: &str,
        submission_id: &str,
        action: &str,
        comment: Option<&str>,
    ) -> (Value, StatusCode) {
        self.post_auth(
            &format!("/api/v1/submissions/{submission_id}/actions"),
            token,
            &json!({ "action": action, "comment": comment }),
        )
        .await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("delete request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let db_name = format!("statsubmit_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let config = Config {
        database_url: test_url,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:0".to_string(),
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        smtp: None,
    };

    let state = statsubmit::build_state(pool.clone(), config);
    let app = statsubmit::build_app(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
    }
}

/// Drop the test database after a test completes.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}
