//! Repository for the `linked_docs` table.

use flowiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::linked_doc::{CreateLinkedDoc, LinkedDoc};

const COLUMNS: &str = "id, project_id, doc_type, ref_id, meta, created_at";

pub struct LinkedDocRepo;

impl LinkedDocRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateLinkedDoc,
    ) -> Result<LinkedDoc, sqlx::Error> {
        let query = format!(
            "INSERT INTO linked_docs (project_id, doc_type, ref_id, meta)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LinkedDoc>(&query)
            .bind(project_id)
            .bind(input.doc_type.as_str())
            .bind(&input.ref_id)
            .bind(serde_json::Value::Object(input.meta.clone()))
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<LinkedDoc>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM linked_docs WHERE project_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, LinkedDoc>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
