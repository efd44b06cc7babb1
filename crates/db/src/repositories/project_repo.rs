//! Repository for the `projects` and `project_members` tables.

use flowiq_core::roles::ProjectScope;
use flowiq_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use crate::scope::{scope_bind, scope_clause};

/// Column list shared across queries. Every query aliases `projects` as `p`.
const COLUMNS: &str = "p.id, p.name, p.description, p.client, p.budget, p.revenue, p.cost, \
    p.progress, p.status, p.manager_id, \
    ARRAY(SELECT m.user_id FROM project_members m WHERE m.project_id = p.id ORDER BY m.user_id) \
        AS team_members, \
    p.start_date, p.end_date, p.deadline, p.created_at, p.updated_at";

pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project managed by `manager_id` together with its members.
    pub async fn create(
        pool: &PgPool,
        manager_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO projects
                (name, description, client, budget, manager_id, start_date, end_date, deadline)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.client)
        .bind(input.budget)
        .bind(manager_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.deadline)
        .fetch_one(&mut *tx)
        .await?;

        replace_members(&mut tx, id, &input.team_members).await?;
        let project = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        Ok(project)
    }

    /// Find a live project by id, regardless of scope.
    ///
    /// Callers compare `manager_id` against the caller's scope so that an
    /// out-of-scope project is distinguishable from a missing one.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects p WHERE p.id = $1 AND p.deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live projects inside `scope`, newest first.
    pub async fn list(
        pool: &PgPool,
        scope: ProjectScope,
        filter: &ProjectFilter,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             WHERE {scope}
               AND ($2::TEXT IS NULL OR p.status = $2)
               AND ($3::DATE IS NULL OR p.deadline >= $3::DATE)
               AND ($4::DATE IS NULL OR p.deadline < $4::DATE + 1)
             ORDER BY p.created_at DESC, p.id DESC",
            scope = scope_clause(1),
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(scope_bind(scope))
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(pool)
            .await
    }

    /// Live projects the user is a member of.
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p
             JOIN project_members pm ON pm.project_id = p.id
             WHERE pm.user_id = $1 AND p.deleted_at IS NULL
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn is_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM project_members pm
                JOIN projects p ON p.id = pm.project_id
                WHERE pm.project_id = $1 AND pm.user_id = $2 AND p.deleted_at IS NULL
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Apply the non-`None` fields of `input`. `team_members`, when present,
    /// replaces the member list.
    ///
    /// Returns `None` if the project does not exist or is deleted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                client = COALESCE($4, client),
                budget = COALESCE($5, budget),
                start_date = COALESCE($6, start_date),
                end_date = COALESCE($7, end_date),
                deadline = COALESCE($8, deadline),
                status = COALESCE($9, status),
                progress = COALESCE($10, progress),
                revenue = COALESCE($11, revenue),
                cost = COALESCE($12, cost)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.client)
        .bind(input.budget)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.deadline)
        .bind(input.status.map(|s| s.as_str()))
        .bind(input.progress)
        .bind(input.revenue)
        .bind(input.cost)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }
        if let Some(members) = &input.team_members {
            replace_members(&mut tx, id, members).await?;
        }
        let project = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Soft-delete a project. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn replace_members(
    conn: &mut PgConnection,
    project_id: DbId,
    members: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM project_members WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;
    sqlx::query(
        "INSERT INTO project_members (project_id, user_id)
         SELECT $1, u FROM UNNEST($2::BIGINT[]) AS u
         ON CONFLICT DO NOTHING",
    )
    .bind(project_id)
    .bind(members)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn fetch_one(conn: &mut PgConnection, id: DbId) -> Result<Project, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM projects p WHERE p.id = $1");
    sqlx::query_as::<_, Project>(&query)
        .bind(id)
        .fetch_one(conn)
        .await
}
