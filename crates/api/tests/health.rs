//! Health check, routing, and authentication behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_anonymous};
use flowiq_core::roles::Role;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_check_is_public(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_anonymous(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["dbHealthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_anonymous(app, "/pm/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_forged_token_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/pm/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_team_member_cannot_open_pm_dashboard(pool: PgPool) {
    let member = common::user(&pool, "tm@flowiq.test", Role::TeamMember).await;
    let app = common::build_test_app(pool);
    let response = get(app, "/pm/dashboard", &common::token(member, Role::TeamMember)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_anonymous(app, "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_profile_lists_role_capabilities(pool: PgPool) {
    let finance = common::user(&pool, "fin@flowiq.test", Role::Finance).await;
    let app = common::build_test_app(pool);
    let response = get(app, "/ui/profile", &common::token(finance, Role::Finance)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["role"], "Finance");
    let caps: Vec<&str> = json["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert!(caps.contains(&"settle_finance_documents"));
    assert!(!caps.contains(&"manage_projects"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_gate_evaluates_rules_for_caller_role(pool: PgPool) {
    let member = common::user(&pool, "tm@flowiq.test", Role::TeamMember).await;
    let app = common::build_test_app(pool);
    let response = common::post_json(
        app,
        "/ui/gate",
        &common::token(member, Role::TeamMember),
        serde_json::json!({
            "elements": [
                { "id": "new-project", "roles": ["Admin", "Project Manager"], "actionable": true },
                { "id": "budget", "hideFor": ["Team Member"] },
                { "id": "my-tasks" }
            ]
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["decisions"][0]["decision"], "hidden-disabled");
    assert_eq!(json["decisions"][1]["decision"], "hidden");
    assert_eq!(json["decisions"][2]["decision"], "visible");
}
