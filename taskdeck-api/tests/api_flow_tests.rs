/// End-to-end API flow tests
///
/// These tests drive the full stack over HTTP: router, gates, handlers and a
/// real PostgreSQL database. They are ignored by default; run them with a
/// database available:
///
/// ```text
/// cargo test --test api_flow_tests -- --ignored --test-threads=1
/// ```
///
/// Accounts use unique email addresses, so the suite tolerates leftover rows
/// from earlier runs.

mod common;

use std::sync::atomic::{AtomicU64, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use sqlx::PgPool;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_shared::auth::password::hash_password;
use taskdeck_shared::db::migrations::{ensure_database_exists, run_migrations};
use taskdeck_shared::models::user::{CreateUser, Role, User};
use tower::Service as _;

const PASSWORD: &str = "password123";

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Produces an email no other test or run has used
fn unique_email(tag: &str) -> String {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{}-{}-{}@example.com", tag, n, nanos)
}

/// Test context backed by a real database
struct TestContext {
    db: PgPool,
    app: Router,
}

impl TestContext {
    async fn new() -> Self {
        let config = common::test_config();

        ensure_database_exists(&config.database.url)
            .await
            .expect("Failed to ensure test database");
        let db = PgPool::connect(&config.database.url)
            .await
            .expect("Failed to connect to test database");
        run_migrations(&db).await.expect("Failed to run migrations");

        let app = build_router(AppState::new(db.clone(), config));
        Self { db, app }
    }

    /// Sends one request through a fresh clone of the router
    async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().call(request).await.unwrap()
    }

    /// Registers an account over the API, returning (id, email)
    async fn register(&self, username: &str, tag: &str) -> (i64, String) {
        let email = unique_email(tag);
        let response = self
            .send(common::json_request(
                "POST",
                "/api/auth/register",
                None,
                json!({"username": username, "email": email, "password": PASSWORD}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = common::read_json(response).await;
        (body["id"].as_i64().unwrap(), email)
    }

    /// Logs in over the API, returning the bearer token
    async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .send(common::json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({"email": email, "password": password}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = common::read_json(response).await;
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates an admin account directly in the store and logs it in
    async fn admin_token(&self) -> String {
        let email = unique_email("admin");
        User::create(
            &self.db,
            CreateUser {
                username: "Admin".to_string(),
                email: email.clone(),
                password_hash: hash_password(PASSWORD).expect("Failed to hash password"),
                role: Some(Role::Admin),
            },
        )
        .await
        .expect("Failed to create admin");

        self.login(&email, PASSWORD).await
    }
}

/// Test registration, login and using the issued token
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_register_and_login_roundtrip() {
    let ctx = TestContext::new().await;
    let email = unique_email("alice");

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "Alice", "email": email, "password": PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["username"], "Alice");
    assert_eq!(body["email"], email.as_str());
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": email, "password": PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    assert_eq!(body["expires_in"], 3600);

    let response = ctx.send(common::get("/api/users", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test that a wrong password and an unknown account are indistinguishable
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_login_rejects_bad_credentials() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.register("Bob", "bob").await;

    let canonical = json!({
        "error": "authentication_failure",
        "message": "Authentication required"
    });

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": email, "password": "wrong-password"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::read_json(response).await, canonical);

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": unique_email("ghost"), "password": PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(common::read_json(response).await, canonical);
}

/// Test that registering an already-taken email yields 409
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_register_duplicate_email_conflict() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.register("Carol", "carol").await;

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "Impostor", "email": email, "password": PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = common::read_json(response).await;
    assert_eq!(body["error"], "duplicate_identity");
    assert_eq!(body["message"], "Email already in use");

    // The original account is untouched
    ctx.login(&email, PASSWORD).await;
}

/// Test the full task lifecycle: create, read, update, filter, delete
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_task_lifecycle() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.register("Dave", "dave").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "Write release notes", "description": "For 1.0"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::read_json(response).await;
    let task_id = body["id"].as_i64().unwrap();
    assert_eq!(body["title"], "Write release notes");
    assert_eq!(body["description"], "For 1.0");
    assert_eq!(body["status"], "pending");
    assert!(body["assignee_id"].is_null());

    let response = ctx
        .send(common::get(&format!("/api/tasks/{}", task_id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await["title"], "Write release notes");

    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
            json!({"status": "in_progress"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["title"], "Write release notes");

    let response = ctx.send(common::get("/api/tasks", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let all = common::read_json(response).await;
    assert!(all.as_array().unwrap().iter().any(|t| t["id"] == task_id));

    let response = ctx
        .send(common::get("/api/tasks?status=in_progress", Some(&token)))
        .await;
    let filtered = common::read_json(response).await;
    assert!(filtered.as_array().unwrap().iter().any(|t| t["id"] == task_id));

    let response = ctx
        .send(common::get("/api/tasks?status=completed", Some(&token)))
        .await;
    let filtered = common::read_json(response).await;
    assert!(!filtered.as_array().unwrap().iter().any(|t| t["id"] == task_id));

    let response = ctx
        .send(common::request(
            "DELETE",
            &format!("/api/tasks/{}", task_id),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .send(common::get(&format!("/api/tasks/{}", task_id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = common::read_json(response).await;
    assert_eq!(body["error"], "not_found");
    assert_eq!(body["message"], "Task not found");
}

/// Test that task creation checks the assignee exists
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_create_task_validates_assignee() {
    let ctx = TestContext::new().await;
    let (user_id, email) = ctx.register("Erin", "erin").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "Orphan", "assignee_id": 999999999}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::read_json(response).await["message"], "User not found");

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "Owned from birth", "assignee_id": user_id}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(common::read_json(response).await["assignee_id"], user_id);
}

/// Test assignment: to the caller, to another user, and the failure modes
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_task_assignment_flows() {
    let ctx = TestContext::new().await;
    let (frank_id, email) = ctx.register("Frank", "frank").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "Rotate keys"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task_id = common::read_json(response).await["id"].as_i64().unwrap();

    // No assignee in the body means the caller takes the task
    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/tasks/{}/assign", task_id),
            Some(&token),
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await["assignee_id"], frank_id);

    let (grace_id, _) = ctx.register("Grace", "grace").await;
    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/tasks/{}/assign", task_id),
            Some(&token),
            json!({"assignee_id": grace_id}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await["assignee_id"], grace_id);

    // A missing assignee leaves the current owner in place
    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/tasks/{}/assign", task_id),
            Some(&token),
            json!({"assignee_id": 999999999}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::read_json(response).await["message"], "User not found");

    let response = ctx
        .send(common::get(&format!("/api/tasks/{}", task_id), Some(&token)))
        .await;
    assert_eq!(common::read_json(response).await["assignee_id"], grace_id);

    let response = ctx
        .send(common::json_request(
            "PUT",
            "/api/tasks/999999999/assign",
            Some(&token),
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::read_json(response).await["message"], "Task not found");
}

/// Test that deleting a user deletes their tasks and only their tasks
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_deleting_user_cascades_to_their_tasks() {
    let ctx = TestContext::new().await;
    let (henry_id, email) = ctx.register("Henry", "henry").await;
    let token = ctx.login(&email, PASSWORD).await;

    let mut owned = Vec::new();
    for title in ["Pack boxes", "Label boxes"] {
        let response = ctx
            .send(common::json_request(
                "POST",
                "/api/tasks",
                Some(&token),
                json!({"title": title, "assignee_id": henry_id}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        owned.push(common::read_json(response).await["id"].as_i64().unwrap());
    }

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "Unowned"}),
        ))
        .await;
    let unowned = common::read_json(response).await["id"].as_i64().unwrap();

    let admin = ctx.admin_token().await;
    let response = ctx
        .send(common::request(
            "DELETE",
            &format!("/api/admin/users/{}", henry_id),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .send(common::get(&format!("/api/users/{}", henry_id), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    for task_id in owned {
        let response = ctx
            .send(common::get(&format!("/api/tasks/{}", task_id), Some(&admin)))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = ctx
        .send(common::get(&format!("/api/tasks/{}", unowned), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test the admin mirror and role promotion via token reissue
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_admin_mirror_and_role_promotion() {
    let ctx = TestContext::new().await;
    let (ivy_id, email) = ctx.register("Ivy", "ivy").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx.send(common::get("/api/admin/users", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let admin = ctx.admin_token().await;

    let response = ctx.send(common::get("/api/admin/users", Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = common::read_json(response).await;
    assert!(listing.as_array().unwrap().iter().any(|u| u["id"] == ivy_id));

    let response = ctx
        .send(common::get(&format!("/api/admin/users/{}", ivy_id), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::read_json(response).await["tasks"].is_array());

    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/admin/users/{}/role", ivy_id),
            Some(&admin),
            json!({"role": "admin"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await["role"], "admin");

    // The promotion takes effect on the next login, not on the old token
    let response = ctx.send(common::get("/api/admin/users", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let fresh = ctx.login(&email, PASSWORD).await;
    let response = ctx.send(common::get("/api/admin/users", Some(&fresh))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// Test the admin task mirror: list, fetch, delete
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_admin_task_mirror() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.register("Judy", "judy").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "Audit logs"}),
        ))
        .await;
    let task_id = common::read_json(response).await["id"].as_i64().unwrap();

    let admin = ctx.admin_token().await;

    let response = ctx.send(common::get("/api/admin/tasks", Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = common::read_json(response).await;
    assert!(listing.as_array().unwrap().iter().any(|t| t["id"] == task_id));

    let response = ctx
        .send(common::get(&format!("/api/admin/tasks/{}", task_id), Some(&admin)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send(common::request(
            "DELETE",
            &format!("/api/admin/tasks/{}", task_id),
            Some(&admin),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .send(common::get(&format!("/api/tasks/{}", task_id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test self-service account deletion
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_self_deletion() {
    let ctx = TestContext::new().await;
    let (_, email) = ctx.register("Kate", "kate").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx
        .send(common::request("DELETE", "/api/users", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The account is gone
    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": email, "password": PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The old token still authenticates but names an account that no longer
    // exists, so there is nothing left to delete
    let response = ctx
        .send(common::request("DELETE", "/api/users", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(common::read_json(response).await["message"], "User not found");
}

/// Test that identity comes from the signed claims, not a store lookup
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_unknown_subject_token_still_authenticates() {
    let ctx = TestContext::new().await;
    let token = common::token_for(&unique_email("ghost"), Role::User);

    let response = ctx.send(common::get("/api/users", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Handlers that need the row behind the identity report it missing
    let response = ctx
        .send(common::request("DELETE", "/api/users", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test profile updates: rename, email conflict, password rotation
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_user_profile_updates() {
    let ctx = TestContext::new().await;
    let (lena_id, email) = ctx.register("Lena", "lena").await;
    let token = ctx.login(&email, PASSWORD).await;

    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/users/{}", lena_id),
            Some(&token),
            json!({"username": "Lena Lane"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::read_json(response).await["username"], "Lena Lane");

    let (_, taken_email) = ctx.register("Mona", "mona").await;
    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/users/{}", lena_id),
            Some(&token),
            json!({"email": taken_email}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(common::read_json(response).await["error"], "duplicate_identity");

    let response = ctx
        .send(common::json_request(
            "PUT",
            &format!("/api/users/{}", lena_id),
            Some(&token),
            json!({"password": "rotated-password-456"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .send(common::json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": email, "password": PASSWORD}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    ctx.login(&email, "rotated-password-456").await;

    let response = ctx
        .send(common::json_request(
            "PUT",
            "/api/users/999999999",
            Some(&token),
            json!({"username": "Nobody"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test that the user detail response embeds the user's tasks
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_user_detail_includes_their_tasks() {
    let ctx = TestContext::new().await;
    let (nora_id, email) = ctx.register("Nora", "nora").await;
    let token = ctx.login(&email, PASSWORD).await;

    for title in ["Prepare agenda", "Book room"] {
        let response = ctx
            .send(common::json_request(
                "POST",
                "/api/tasks",
                Some(&token),
                json!({"title": title, "assignee_id": nora_id}),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = ctx
        .send(common::get(&format!("/api/users/{}", nora_id), Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["username"], "Nora");
    assert!(body.get("password_hash").is_none());

    let titles: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Prepare agenda"));
    assert!(titles.contains(&"Book room"));
}

/// Test that the health endpoint reports a reachable database
#[tokio::test]
#[ignore] // Requires running PostgreSQL instance
async fn test_health_reports_connected() {
    let ctx = TestContext::new().await;

    let response = ctx.send(common::get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}
