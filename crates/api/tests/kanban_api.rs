//! Kanban board and reorder over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, patch_json, post_json};
use flowiq_core::roles::Role;
use sqlx::PgPool;

struct Board {
    pool: PgPool,
    token: String,
    project_id: i64,
}

impl Board {
    async fn new(pool: PgPool) -> Self {
        let pm = common::user(&pool, "pm@flowiq.test", Role::ProjectManager).await;
        let token = common::token(pm, Role::ProjectManager);
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/pm/projects", &token, serde_json::json!({ "name": "Board" })).await;
        let project_id = body_json(response).await["project"]["id"].as_i64().unwrap();
        Self {
            pool,
            token,
            project_id,
        }
    }

    async fn add(&self, title: &str, status: &str) -> i64 {
        let app = common::build_test_app(self.pool.clone());
        let response = post_json(
            app,
            &format!("/pm/projects/{}/tasks", self.project_id),
            &self.token,
            serde_json::json!({ "title": title, "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["task"]["id"].as_i64().unwrap()
    }

    async fn columns(&self, query: &str) -> serde_json::Value {
        let app = common::build_test_app(self.pool.clone());
        let response = get(
            app,
            &format!("/pm/projects/{}/kanban{query}", self.project_id),
            &self.token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["columns"].clone()
    }

    async fn reorder(&self, body: serde_json::Value) -> axum::http::Response<axum::body::Body> {
        let app = common::build_test_app(self.pool.clone());
        post_json(
            app,
            &format!("/pm/projects/{}/kanban/reorder", self.project_id),
            &self.token,
            body,
        )
        .await
    }
}

fn titles(column: &serde_json::Value) -> Vec<String> {
    column
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

fn orders(column: &serde_json::Value) -> Vec<i64> {
    column
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["order"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_board_lists_every_column(pool: PgPool) {
    let board = Board::new(pool).await;
    board.add("Write brief", "todo").await;

    let columns = board.columns("").await;
    let columns_obj = columns.as_object().unwrap();
    assert_eq!(columns_obj.len(), 5);
    for status in ["todo", "in-progress", "blocked", "review", "done"] {
        assert!(columns_obj.contains_key(status), "missing column {status}");
    }
    assert_eq!(titles(&columns["todo"]), ["Write brief"]);
    assert!(columns["done"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cross_column_move_keeps_orders_contiguous(pool: PgPool) {
    let board = Board::new(pool).await;
    let a = board.add("A", "todo").await;
    board.add("B", "todo").await;
    board.add("C", "todo").await;
    board.add("X", "review").await;
    board.add("Y", "review").await;

    let response = board
        .reorder(serde_json::json!({
            "taskId": a,
            "from": { "status": "todo", "index": 0 },
            "to": { "status": "review", "index": 1 }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let task = &body_json(response).await["task"];
    assert_eq!(task["status"], "review");
    assert_eq!(task["order"], 1);

    let columns = board.columns("").await;
    assert_eq!(titles(&columns["todo"]), ["B", "C"]);
    assert_eq!(orders(&columns["todo"]), [0, 1]);
    assert_eq!(titles(&columns["review"]), ["X", "A", "Y"]);
    assert_eq!(orders(&columns["review"]), [0, 1, 2]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_stale_source_is_409(pool: PgPool) {
    let board = Board::new(pool).await;
    let a = board.add("A", "todo").await;

    let response = board
        .reorder(serde_json::json!({
            "taskId": a,
            "from": { "status": "blocked", "index": 0 },
            "to": { "status": "done", "index": 0 }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let columns = board.columns("").await;
    assert_eq!(titles(&columns["todo"]), ["A"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_moving_onto_own_slot_changes_nothing(pool: PgPool) {
    let board = Board::new(pool).await;
    board.add("A", "todo").await;
    let b = board.add("B", "todo").await;
    board.add("C", "todo").await;

    let response = board
        .reorder(serde_json::json!({
            "taskId": b,
            "from": { "status": "todo", "index": 1 },
            "to": { "status": "todo", "index": 1 }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let columns = board.columns("").await;
    assert_eq!(titles(&columns["todo"]), ["A", "B", "C"]);
    assert_eq!(orders(&columns["todo"]), [0, 1, 2]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_negative_index_is_400(pool: PgPool) {
    let board = Board::new(pool).await;
    let a = board.add("A", "todo").await;

    let response = board
        .reorder(serde_json::json!({
            "taskId": a,
            "from": { "status": "todo", "index": 0 },
            "to": { "status": "done", "index": -1 }
        }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "to.index: index must be zero or greater"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_status_patch_appends_to_new_column(pool: PgPool) {
    let board = Board::new(pool).await;
    let a = board.add("A", "todo").await;
    board.add("B", "todo").await;
    board.add("D", "done").await;

    let app = common::build_test_app(board.pool.clone());
    let response = patch_json(
        app,
        &format!("/pm/projects/{}/tasks/{a}", board.project_id),
        &board.token,
        serde_json::json!({ "status": "done" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let columns = board.columns("").await;
    assert_eq!(titles(&columns["todo"]), ["B"]);
    assert_eq!(orders(&columns["todo"]), [0]);
    assert_eq!(titles(&columns["done"]), ["D", "A"]);
    assert_eq!(orders(&columns["done"]), [0, 1]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_search_filters_titles_case_insensitively(pool: PgPool) {
    let board = Board::new(pool).await;
    board.add("Design landing page", "todo").await;
    board.add("Fix login bug", "todo").await;
    board.add("Landing copy review", "review").await;

    let columns = board.columns("?q=LANDING").await;
    assert_eq!(titles(&columns["todo"]), ["Design landing page"]);
    assert_eq!(titles(&columns["review"]), ["Landing copy review"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_comment_returns_task_with_history(pool: PgPool) {
    let board = Board::new(pool).await;
    let a = board.add("A", "todo").await;

    let app = common::build_test_app(board.pool.clone());
    let response = post_json(
        app,
        &format!("/pm/projects/{}/tasks/{a}/comments", board.project_id),
        &board.token,
        serde_json::json!({ "text": "Blocked on copy" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = &body_json(response).await["task"];
    assert_eq!(task["id"], a);
    assert_eq!(task["comments"][0]["text"], "Blocked on copy");
    assert_eq!(task["activity"].as_array().unwrap().last().unwrap()["type"], "comment");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_attachment_accepts_uploaded_file_path(pool: PgPool) {
    let board = Board::new(pool).await;
    let a = board.add("A", "todo").await;
    let path = format!("/pm/projects/{}/tasks/{a}/attachments", board.project_id);

    let response = post_json(
        common::build_test_app(board.pool.clone()),
        &path,
        &board.token,
        serde_json::json!({
            "url": "/uploads/bills/1718000000000-3f2a.pdf",
            "name": "quote.pdf",
            "size": 2048,
            "type": "application/pdf",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = &body_json(response).await["task"];
    assert_eq!(task["attachments"][0]["url"], "/uploads/bills/1718000000000-3f2a.pdf");
    assert_eq!(task["attachments"][0]["size"], 2048);

    let response = post_json(
        common::build_test_app(board.pool.clone()),
        &path,
        &board.token,
        serde_json::json!({ "url": "quote.pdf", "name": "quote.pdf" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "url: url must be an absolute URL or an /uploads/ path"
    );
}
