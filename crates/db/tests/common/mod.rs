#![allow(dead_code)]

use flowiq_core::roles::Role;
use flowiq_core::status::{TaskPriority, TaskStatus};
use flowiq_core::types::DbId;
use flowiq_db::models::project::CreateProject;
use flowiq_db::models::task::CreateTask;
use flowiq_db::models::user::CreateUser;
use flowiq_db::repositories::{ProjectRepo, TaskRepo, UserRepo};
use rust_decimal::Decimal;
use sqlx::PgPool;

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

pub fn new_project(name: &str) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        client: None,
        budget: Decimal::ZERO,
        start_date: None,
        end_date: None,
        deadline: None,
        manager_id: None,
        team_members: Vec::new(),
    }
}

pub async fn project(pool: &PgPool, manager_id: DbId, name: &str) -> DbId {
    ProjectRepo::create(pool, manager_id, &new_project(name))
        .await
        .unwrap()
        .id
}

pub async fn task(pool: &PgPool, project_id: DbId, title: &str, status: TaskStatus) -> DbId {
    TaskRepo::create(
        pool,
        project_id,
        &CreateTask {
            title: title.to_string(),
            description: None,
            assignee_id: None,
            priority: TaskPriority::Medium,
            status,
            due_date: None,
        },
    )
    .await
    .unwrap()
    .id
}
