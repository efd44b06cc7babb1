//! Task ordering against a real database.

mod common;

use assert_matches::assert_matches;
use flowiq_core::error::CoreError;
use flowiq_core::kanban::{is_contiguous, Card, ColumnPosition};
use flowiq_core::roles::Role;
use flowiq_core::status::TaskStatus;
use flowiq_core::types::DbId;
use flowiq_db::models::task::{KanbanFilter, ReorderTask, TaskFilter, UpdateTask};
use flowiq_db::repositories::TaskRepo;
use flowiq_db::RepoError;
use sqlx::PgPool;

async fn cards(pool: &PgPool, project_id: DbId) -> Vec<Card> {
    TaskRepo::list(pool, project_id, &TaskFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|t| Card {
            id: t.id,
            status: TaskStatus::parse(&t.status).unwrap(),
            order: t.order,
        })
        .collect()
}

fn position(cards: &[Card], id: DbId) -> ColumnPosition {
    let card = cards.iter().find(|c| c.id == id).unwrap();
    ColumnPosition::new(card.status, card.order)
}

async fn seeded_board(pool: &PgPool) -> (DbId, DbId, Vec<DbId>) {
    let pm = common::user(pool, "pm@example.com", Role::ProjectManager).await;
    let project = common::project(pool, pm, "Board").await;
    let mut ids = Vec::new();
    for (title, status) in [
        ("Write brief", TaskStatus::Todo),
        ("Collect quotes", TaskStatus::Todo),
        ("Book venue", TaskStatus::Todo),
        ("Draft contract", TaskStatus::Review),
        ("Kickoff call", TaskStatus::Review),
    ] {
        ids.push(common::task(pool, project, title, status).await);
    }
    (pm, project, ids)
}

#[sqlx::test(migrations = "./migrations")]
async fn test_new_tasks_append_to_column(pool: PgPool) {
    let (_, project, ids) = seeded_board(&pool).await;
    let board = cards(&pool, project).await;
    assert_eq!(position(&board, ids[2]), ColumnPosition::new(TaskStatus::Todo, 2));
    assert_eq!(position(&board, ids[4]), ColumnPosition::new(TaskStatus::Review, 1));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_cross_column_move_keeps_columns_contiguous(pool: PgPool) {
    let (pm, project, ids) = seeded_board(&pool).await;
    let input = ReorderTask {
        task_id: ids[0],
        from: ColumnPosition::new(TaskStatus::Todo, 0),
        to: ColumnPosition::new(TaskStatus::Review, 1),
    };
    let moved = TaskRepo::reorder(&pool, project, &input, pm).await.unwrap();
    assert_eq!(moved.status, "review");
    assert_eq!(moved.order, 1);

    let board = cards(&pool, project).await;
    assert!(is_contiguous(&board), "{board:?}");
    assert_eq!(position(&board, ids[1]), ColumnPosition::new(TaskStatus::Todo, 0));
    assert_eq!(position(&board, ids[4]), ColumnPosition::new(TaskStatus::Review, 2));

    let activity = TaskRepo::list_activity(&pool, ids[0]).await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].activity_type, "update");
    assert_eq!(activity[0].meta["action"], "reorder");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_move_to_own_position_writes_nothing(pool: PgPool) {
    let (pm, project, ids) = seeded_board(&pool).await;
    let before = cards(&pool, project).await;
    let here = ColumnPosition::new(TaskStatus::Todo, 1);
    let input = ReorderTask {
        task_id: ids[1],
        from: here,
        to: here,
    };
    TaskRepo::reorder(&pool, project, &input, pm).await.unwrap();

    assert_eq!(cards(&pool, project).await, before);
    assert!(TaskRepo::list_activity(&pool, ids[1]).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_source_is_rejected(pool: PgPool) {
    let (pm, project, ids) = seeded_board(&pool).await;
    let input = ReorderTask {
        task_id: ids[2],
        from: ColumnPosition::new(TaskStatus::Todo, 0),
        to: ColumnPosition::new(TaskStatus::Done, 0),
    };
    let err = TaskRepo::reorder(&pool, project, &input, pm).await.unwrap_err();
    assert_matches!(err, RepoError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_destination_index_is_clamped(pool: PgPool) {
    let (pm, project, ids) = seeded_board(&pool).await;
    let input = ReorderTask {
        task_id: ids[0],
        from: ColumnPosition::new(TaskStatus::Todo, 0),
        to: ColumnPosition::new(TaskStatus::Done, 12),
    };
    let moved = TaskRepo::reorder(&pool, project, &input, pm).await.unwrap();
    assert_eq!(moved.order, 0);
    assert!(is_contiguous(&cards(&pool, project).await));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_patch_moves_task_to_end_of_column(pool: PgPool) {
    let (pm, project, ids) = seeded_board(&pool).await;
    let update = UpdateTask {
        status: Some(TaskStatus::Review),
        ..UpdateTask::default()
    };
    let task = TaskRepo::update(&pool, project, ids[1], &update, pm)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, "review");
    assert_eq!(task.order, 2);

    let board = cards(&pool, project).await;
    assert!(is_contiguous(&board));
    assert_eq!(position(&board, ids[2]), ColumnPosition::new(TaskStatus::Todo, 1));

    let activity = TaskRepo::list_activity(&pool, ids[1]).await.unwrap();
    assert_eq!(activity[0].activity_type, "status_change");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_leaving_done_clears_completion_time(pool: PgPool) {
    let (pm, project, ids) = seeded_board(&pool).await;
    let to = |status| UpdateTask {
        status: Some(status),
        ..UpdateTask::default()
    };

    let done = TaskRepo::update(&pool, project, ids[0], &to(TaskStatus::Done), pm)
        .await
        .unwrap()
        .unwrap();
    assert!(done.completed_at.is_some());

    let reopened = TaskRepo::update(&pool, project, ids[0], &to(TaskStatus::InProgress), pm)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.status, "in-progress");
    assert_eq!(reopened.completed_at, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_board_filter_matches_title_case_insensitively(pool: PgPool) {
    let (_, project, ids) = seeded_board(&pool).await;
    let filter = KanbanFilter {
        q: Some("QUOTE".into()),
        ..KanbanFilter::default()
    };
    let tasks = TaskRepo::list_for_board(&pool, project, &filter).await.unwrap();
    assert_eq!(tasks.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ids[1]]);

    let literal = KanbanFilter {
        q: Some("%".into()),
        ..KanbanFilter::default()
    };
    let none = TaskRepo::list_for_board(&pool, project, &literal).await.unwrap();
    assert!(none.is_empty());
}
