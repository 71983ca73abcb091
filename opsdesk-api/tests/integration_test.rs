/// Integration tests for the OpsDesk API
///
/// These tests require a running PostgreSQL database and exercise the full
/// router with real authentication:
/// - Authentication requirement on protected routes
/// - Not-found handling for comment routes on missing tasks
/// - Indistinguishable denials for hidden and missing tasks
/// - The approval lifecycle (assign → report → review → approve)
///
/// Run with: cargo test --test integration_test -- --test-threads=1
/// Requires DATABASE_URL and JWT_SECRET in the environment.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

fn json_request(method: &str, uri: &str, auth: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", auth)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("Failed to build request")
}

fn get_request(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .expect("Failed to build request")
}

/// Protected routes reject requests without a token
#[tokio::test]
async fn test_authentication_required() {
    let ctx = TestContext::new().await.unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/v1/tasks")
        .body(Body::empty())
        .unwrap();

    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    ctx.cleanup().await.unwrap();
}

/// Comment routes answer 404 for a task that does not exist, the same way
/// the task detail route does, instead of leaking a constraint error or an
/// empty list
#[tokio::test]
async fn test_comment_routes_on_missing_task_return_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let ghost = Uuid::new_v4();

    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/comments", ghost),
        &ctx.admin_auth(),
        json!({ "body": "does this task exist?" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let request = get_request(&format!("/v1/tasks/{}/comments", ghost), &ctx.admin_auth());
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    ctx.cleanup().await.unwrap();
}

/// For a non-elevated caller, a task they are not assigned to and a task
/// that does not exist produce byte-identical denials
#[tokio::test]
async fn test_hidden_and_missing_tasks_look_identical_to_staff() {
    let ctx = TestContext::new().await.unwrap();

    // Admin creates a task the staff member is not assigned to
    let request = json_request(
        "POST",
        "/v1/tasks",
        &ctx.admin_auth(),
        json!({ "title": "Hidden task" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::body_json(response).await;
    let hidden_id = created["id"].as_str().unwrap().to_string();

    let on_hidden = ctx
        .app
        .clone()
        .call(get_request(
            &format!("/v1/tasks/{}", hidden_id),
            &ctx.staff_auth(),
        ))
        .await
        .unwrap();
    let on_missing = ctx
        .app
        .clone()
        .call(get_request(
            &format!("/v1/tasks/{}", Uuid::new_v4()),
            &ctx.staff_auth(),
        ))
        .await
        .unwrap();

    assert_eq!(on_hidden.status(), StatusCode::FORBIDDEN);
    assert_eq!(on_missing.status(), StatusCode::FORBIDDEN);

    let hidden_body = common::body_json(on_hidden).await;
    let missing_body = common::body_json(on_missing).await;
    assert_eq!(
        hidden_body, missing_body,
        "Denial must not reveal whether the task exists"
    );

    ctx.cleanup().await.unwrap();
}

/// Full approval lifecycle through the HTTP surface
#[tokio::test]
async fn test_task_approval_lifecycle() {
    let ctx = TestContext::new().await.unwrap();

    // Admin creates a task assigned to the staff member
    let request = json_request(
        "POST",
        "/v1/tasks",
        &ctx.admin_auth(),
        json!({
            "title": "Inspect backup generator",
            "priority": "high",
            "assignee_ids": [ctx.staff.id],
        }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::body_json(response).await;
    let task_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["status"], "pending");

    // The assignee received an in-app notification with the task
    let response = ctx
        .app
        .clone()
        .call(get_request("/v1/notifications/unread", &ctx.staff_auth()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let unread = common::body_json(response).await;
    assert_eq!(unread["count"], 1);

    // Staff starts work
    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/status", task_id),
        &ctx.staff_auth(),
        json!({ "status": "in_progress" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "in_progress");
    assert_eq!(body["changed"], true);

    // Staff reports completion; the task lands in review instead
    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/status", task_id),
        &ctx.staff_auth(),
        json!({ "status": "completed" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "review");
    assert!(body["completion_date"].is_null());

    // Admin approves; now it is completed with a completion date
    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/status", task_id),
        &ctx.admin_auth(),
        json!({ "status": "completed" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "completed");
    assert!(!body["completion_date"].is_null());

    // Repeating the approval is a no-op
    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/status", task_id),
        &ctx.admin_auth(),
        json!({ "status": "completed" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["changed"], false);

    ctx.cleanup().await.unwrap();
}

/// An unknown status name is rejected for every caller, elevated included
#[tokio::test]
async fn test_unknown_status_rejected_for_admin() {
    let ctx = TestContext::new().await.unwrap();

    let request = json_request(
        "POST",
        &format!("/v1/tasks/{}/status", Uuid::new_v4()),
        &ctx.admin_auth(),
        json!({ "status": "archived" }),
    );
    let response = ctx.app.clone().call(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    ctx.cleanup().await.unwrap();
}
