//! Repository for the `timesheets` table.

use flowiq_core::status::ActivityType;
use flowiq_core::types::DbId;
use serde_json::json;
use sqlx::PgPool;

use crate::models::timesheet::{CreateTimesheet, MemberHours, Timesheet};
use crate::repositories::task_repo::record_activity;

const COLUMNS: &str =
    "id, project_id, task_id, user_id, hours, billable, note, work_date, created_at";

pub struct TimesheetRepo;

impl TimesheetRepo {
    /// Log hours for `user_id`. Time logged against a task is also written
    /// to the task's activity log.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        input: &CreateTimesheet,
    ) -> Result<Timesheet, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "INSERT INTO timesheets (project_id, task_id, user_id, hours, billable, note, work_date)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()))
             RETURNING {COLUMNS}"
        );
        let timesheet = sqlx::query_as::<_, Timesheet>(&query)
            .bind(project_id)
            .bind(input.task_id)
            .bind(user_id)
            .bind(input.hours)
            .bind(input.billable)
            .bind(&input.note)
            .bind(input.date)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(task_id) = timesheet.task_id {
            record_activity(
                &mut tx,
                task_id,
                Some(user_id),
                ActivityType::Timesheet,
                json!({ "timesheetId": timesheet.id, "hours": timesheet.hours }),
            )
            .await?;
        }

        tx.commit().await?;
        Ok(timesheet)
    }

    /// Timesheets of a project, most recent work first.
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<Timesheet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM timesheets WHERE project_id = $1
             ORDER BY work_date DESC, id DESC"
        );
        sqlx::query_as::<_, Timesheet>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Total hours per member on a project, largest first.
    pub async fn hours_per_member(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MemberHours>, sqlx::Error> {
        sqlx::query_as::<_, MemberHours>(
            "SELECT ts.user_id, u.name, SUM(ts.hours)::FLOAT8 AS hours
             FROM timesheets ts
             JOIN users u ON u.id = ts.user_id
             WHERE ts.project_id = $1
             GROUP BY ts.user_id, u.name
             ORDER BY hours DESC, ts.user_id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
