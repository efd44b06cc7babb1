#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use flowiq_api::auth::jwt::{generate_access_token, JwtConfig};
use flowiq_api::config::{LogFormat, ServerConfig};
use flowiq_api::router::build_app_router;
use flowiq_api::state::AppState;
use flowiq_core::roles::Role;
use flowiq_core::types::DbId;
use flowiq_db::models::user::CreateUser;
use flowiq_db::repositories::UserRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
const BOUNDARY: &str = "flowiq-test-boundary";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(uploads_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        uploads_dir,
        max_body_bytes: 2 * 1024 * 1024,
        log_format: LogFormat::Pretty,
        jwt: jwt_config(),
    }
}

/// Build the full application router (same middleware stack as `main.rs`).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_uploads(pool, std::env::temp_dir().join("flowiq-test-uploads"))
}

pub fn build_test_app_with_uploads(pool: PgPool, uploads_dir: impl AsRef<Path>) -> Router {
    let config = test_config(uploads_dir.as_ref().to_path_buf());
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Insert a user and return its id.
pub async fn user(pool: &PgPool, email: &str, role: Role) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            role,
        },
    )
    .await
    .unwrap()
    .id
}

/// Mint a bearer token for `user_id` acting as `role`.
pub fn token(user_id: DbId, role: Role) -> String {
    generate_access_token(user_id, role, &jwt_config()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, path: &str, token: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
}

pub async fn get(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, path, token).body(Body::empty()).unwrap()).await
}

pub async fn get_anonymous(app: Router, path: &str) -> Response<Body> {
    send(
        app,
        Request::builder().uri(path).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn delete(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, path, token).body(Body::empty()).unwrap()).await
}

async fn send_json(
    app: Router,
    method: Method,
    path: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let body = request(method, path, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&json).unwrap()))
        .unwrap();
    send(app, body).await
}

pub async fn post_json(
    app: Router,
    path: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, path, token, json).await
}

pub async fn patch_json(
    app: Router,
    path: &str,
    token: &str,
    json: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::PATCH, path, token, json).await
}

/// POST with an empty body (status actions).
pub async fn post(app: Router, path: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, path, token).body(Body::empty()).unwrap()).await
}

/// POST a `multipart/form-data` body built from text fields and an optional
/// `(field, file name, bytes)` file part.
pub async fn post_multipart(
    app: Router,
    path: &str,
    token: &str,
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> Response<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let req = request(Method::POST, path, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, req).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
