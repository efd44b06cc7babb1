//! Repository for tasks and their comments, attachments and activity.
//!
//! Column positions are maintained here. Every write that changes a task's
//! column or index runs in a transaction that first locks the owning
//! project row, so concurrent moves within one project are serialised and
//! each column's orders stay `0..n-1`.

use flowiq_core::error::CoreError;
use flowiq_core::kanban::{ColumnPosition, ReorderPlan};
use flowiq_core::status::{parse_stored, ActivityType, TaskStatus};
use flowiq_core::types::DbId;
use serde_json::json;
use sqlx::{PgConnection, PgPool};

use crate::error::RepoError;
use crate::models::task::{
    AssignedTask, CreateAttachment, CreateTask, KanbanFilter, ReorderTask, Task, TaskActivity,
    TaskAttachment, TaskComment, TaskFilter, TaskWithHistory, UpdateTask,
};

/// Column list shared across queries. Every query aliases `tasks` as `t`.
const COLUMNS: &str = "t.id, t.project_id, t.title, t.description, t.assignee_id, t.priority, \
    t.status, t.sort_order, t.due_date, t.completed_at, t.created_at, t.updated_at";

const COMMENT_COLUMNS: &str = "id, task_id, user_id, text, created_at";

const ATTACHMENT_COLUMNS: &str =
    "id, task_id, url, name, size_bytes, content_type, added_by, added_at";

const ACTIVITY_COLUMNS: &str = "id, task_id, user_id, activity_type, meta, at";

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task at the end of its column.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let mut tx = pool.begin().await?;
        lock_project(&mut tx, project_id).await?;

        let order = column_len(&mut tx, project_id, input.status, None).await?;
        let query = format!(
            "INSERT INTO tasks AS t
                (project_id, title, description, assignee_id, priority, status, sort_order,
                 due_date, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                     CASE WHEN $6 = 'done' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.assignee_id)
            .bind(input.priority.as_str())
            .bind(input.status.as_str())
            .bind(order)
            .bind(input.due_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Find a task that belongs to `project_id`.
    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        task_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks t WHERE t.id = $1 AND t.project_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Tasks of a project in board order.
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks t
             WHERE t.project_id = $1 AND ($2::TEXT IS NULL OR t.status = $2)
             ORDER BY t.status, t.sort_order, t.created_at, t.id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Tasks for the Kanban board, ascending by order with ties broken by
    /// creation time. Grouping into columns happens in the caller.
    pub async fn list_for_board(
        pool: &PgPool,
        project_id: DbId,
        filter: &KanbanFilter,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let title_pattern = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)));

        let query = format!(
            "SELECT {COLUMNS} FROM tasks t
             WHERE t.project_id = $1
               AND ($2::TEXT IS NULL OR t.title ILIKE $2)
               AND ($3::BIGINT IS NULL OR t.assignee_id = $3)
               AND ($4::TEXT IS NULL OR t.priority = $4)
             ORDER BY t.sort_order, t.created_at, t.id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(title_pattern)
            .bind(filter.assignee)
            .bind(filter.priority.map(|p| p.as_str()))
            .fetch_all(pool)
            .await
    }

    /// Tasks assigned to `user_id` on live projects.
    pub async fn list_assigned(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AssignedTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, p.name AS project_name FROM tasks t
             JOIN projects p ON p.id = t.project_id
             WHERE t.assignee_id = $1 AND p.deleted_at IS NULL
             ORDER BY t.due_date NULLS LAST, t.created_at, t.id"
        );
        sqlx::query_as::<_, AssignedTask>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial update. A status change moves the task to the end of
    /// the destination column and records a `status_change` activity.
    ///
    /// Returns `None` if the task is not in `project_id`.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        task_id: DbId,
        input: &UpdateTask,
        user_id: DbId,
    ) -> Result<Option<Task>, RepoError> {
        let mut tx = pool.begin().await?;
        lock_project(&mut tx, project_id).await?;

        let Some(current) = find_for_update(&mut tx, project_id, task_id).await? else {
            return Ok(None);
        };
        let position = position_of(&current)?;

        if let Some(status) = input.status.filter(|s| *s != position.status) {
            let len = column_len(&mut tx, project_id, status, Some(task_id)).await?;
            let plan = ReorderPlan::append(position, status, len);
            apply_plan(&mut tx, project_id, task_id, &plan).await?;
            record_activity(
                &mut tx,
                task_id,
                Some(user_id),
                ActivityType::StatusChange,
                json!({ "from": position.status, "status": status }),
            )
            .await?;
        }

        let query = format!(
            "UPDATE tasks AS t SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                assignee_id = COALESCE($4, assignee_id),
                priority = COALESCE($5, priority),
                due_date = COALESCE($6, due_date),
                completed_at = COALESCE($7, completed_at)
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.assignee_id)
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.due_date)
            .bind(input.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(task))
    }

    /// Move a task on the Kanban board.
    ///
    /// Fails with `NotFound` if the task is not in `project_id` and with
    /// `Conflict` if `input.from` is not the task's stored position. Moving
    /// a task onto its own position writes nothing.
    pub async fn reorder(
        pool: &PgPool,
        project_id: DbId,
        input: &ReorderTask,
        user_id: DbId,
    ) -> Result<Task, RepoError> {
        let mut tx = pool.begin().await?;
        lock_project(&mut tx, project_id).await?;

        let current = find_for_update(&mut tx, project_id, input.task_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Task", input.task_id))?;
        let position = position_of(&current)?;

        let len = column_len(&mut tx, project_id, input.to.status, Some(input.task_id)).await?;
        let plan = ReorderPlan::new(position, input.from, input.to, len)?;
        if plan.is_noop() {
            tx.commit().await?;
            return Ok(current);
        }

        let task = apply_plan(&mut tx, project_id, input.task_id, &plan).await?;
        record_activity(
            &mut tx,
            input.task_id,
            Some(user_id),
            ActivityType::Update,
            json!({ "action": "reorder", "from": plan.source, "to": plan.destination }),
        )
        .await?;

        tx.commit().await?;
        tracing::debug!(
            task_id = input.task_id,
            from_status = %plan.source.status,
            from_index = plan.source.index,
            to_status = %plan.destination.status,
            to_index = plan.destination.index,
            "Task reordered"
        );
        Ok(task)
    }

    pub async fn add_comment(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        text: &str,
    ) -> Result<TaskComment, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO task_comments (task_id, user_id, text) VALUES ($1, $2, $3)
             RETURNING {COMMENT_COLUMNS}"
        );
        let comment = sqlx::query_as::<_, TaskComment>(&query)
            .bind(task_id)
            .bind(user_id)
            .bind(text)
            .fetch_one(&mut *tx)
            .await?;
        record_activity(
            &mut tx,
            task_id,
            Some(user_id),
            ActivityType::Comment,
            json!({ "text": text }),
        )
        .await?;
        tx.commit().await?;
        Ok(comment)
    }

    pub async fn add_attachment(
        pool: &PgPool,
        task_id: DbId,
        user_id: DbId,
        input: &CreateAttachment,
    ) -> Result<TaskAttachment, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO task_attachments (task_id, url, name, size_bytes, content_type, added_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ATTACHMENT_COLUMNS}"
        );
        let attachment = sqlx::query_as::<_, TaskAttachment>(&query)
            .bind(task_id)
            .bind(&input.url)
            .bind(&input.name)
            .bind(input.size)
            .bind(&input.content_type)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        record_activity(
            &mut tx,
            task_id,
            Some(user_id),
            ActivityType::Attachment,
            json!({ "name": input.name, "url": input.url }),
        )
        .await?;
        tx.commit().await?;
        Ok(attachment)
    }

    /// Load a task with its comments, attachments and activity, each oldest
    /// first.
    pub async fn find_with_history(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Option<TaskWithHistory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks t WHERE t.id = $1");
        let Some(task) = sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, TaskComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM task_comments WHERE task_id = $1 ORDER BY created_at, id"
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await?;
        let attachments = sqlx::query_as::<_, TaskAttachment>(&format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM task_attachments WHERE task_id = $1
             ORDER BY added_at, id"
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await?;
        let activity = Self::list_activity(pool, task_id).await?;

        Ok(Some(TaskWithHistory {
            task,
            comments,
            attachments,
            activity,
        }))
    }

    pub async fn list_activity(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<TaskActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM task_activity WHERE task_id = $1 ORDER BY at, id"
        );
        sqlx::query_as::<_, TaskActivity>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }
}

/// Append an entry to a task's activity log.
pub(crate) async fn record_activity(
    conn: &mut PgConnection,
    task_id: DbId,
    user_id: Option<DbId>,
    activity_type: ActivityType,
    meta: serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO task_activity (task_id, user_id, activity_type, meta)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(task_id)
    .bind(user_id)
    .bind(activity_type.as_str())
    .bind(meta)
    .execute(conn)
    .await?;
    Ok(())
}

async fn lock_project(conn: &mut PgConnection, project_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT id FROM projects WHERE id = $1 AND deleted_at IS NULL FOR UPDATE")
        .bind(project_id)
        .fetch_one(conn)
        .await?;
    Ok(())
}

async fn find_for_update(
    conn: &mut PgConnection,
    project_id: DbId,
    task_id: DbId,
) -> Result<Option<Task>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM tasks t WHERE t.id = $1 AND t.project_id = $2 FOR UPDATE"
    );
    sqlx::query_as::<_, Task>(&query)
        .bind(task_id)
        .bind(project_id)
        .fetch_optional(conn)
        .await
}

/// Number of tasks in a column, optionally not counting one task.
async fn column_len(
    conn: &mut PgConnection,
    project_id: DbId,
    status: TaskStatus,
    excluding: Option<DbId>,
) -> Result<i32, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tasks
         WHERE project_id = $1 AND status = $2 AND ($3::BIGINT IS NULL OR id <> $3)",
    )
    .bind(project_id)
    .bind(status.as_str())
    .bind(excluding)
    .fetch_one(conn)
    .await?;
    Ok(i32::try_from(count).unwrap_or(i32::MAX))
}

/// Execute a plan: close the source gap, open the destination slot, place
/// the task. Mirrors [`ReorderPlan::apply`].
async fn apply_plan(
    conn: &mut PgConnection,
    project_id: DbId,
    task_id: DbId,
    plan: &ReorderPlan,
) -> Result<Task, sqlx::Error> {
    sqlx::query(
        "UPDATE tasks SET sort_order = sort_order - 1
         WHERE project_id = $1 AND status = $2 AND sort_order > $3 AND id <> $4",
    )
    .bind(project_id)
    .bind(plan.source.status.as_str())
    .bind(plan.source.index)
    .bind(task_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "UPDATE tasks SET sort_order = sort_order + 1
         WHERE project_id = $1 AND status = $2 AND sort_order >= $3 AND id <> $4",
    )
    .bind(project_id)
    .bind(plan.destination.status.as_str())
    .bind(plan.destination.index)
    .bind(task_id)
    .execute(&mut *conn)
    .await?;

    let query = format!(
        "UPDATE tasks AS t SET
            status = $2,
            sort_order = $3,
            completed_at = CASE
                WHEN $2 = 'done' THEN COALESCE(t.completed_at, NOW())
                ELSE NULL
            END
         WHERE t.id = $1
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Task>(&query)
        .bind(task_id)
        .bind(plan.destination.status.as_str())
        .bind(plan.destination.index)
        .fetch_one(&mut *conn)
        .await
}

fn position_of(task: &Task) -> Result<ColumnPosition, CoreError> {
    Ok(ColumnPosition::new(parse_stored(&task.status)?, task.order))
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
