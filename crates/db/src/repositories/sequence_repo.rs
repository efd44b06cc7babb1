//! Durable document-number counters.

use flowiq_core::documents::DocumentKind;
use sqlx::PgConnection;

pub struct SequenceRepo;

impl SequenceRepo {
    /// Advance the counter for `kind` and return the formatted number.
    ///
    /// Must run on the connection of the transaction that inserts the
    /// document: the `UPDATE` holds the counter row lock until commit, so
    /// concurrent creators queue behind it and a rollback returns the number.
    pub async fn next_number(
        conn: &mut PgConnection,
        kind: DocumentKind,
    ) -> Result<String, sqlx::Error> {
        let value: i64 = sqlx::query_scalar(
            "UPDATE document_sequences SET last_value = last_value + 1
             WHERE key = $1
             RETURNING last_value",
        )
        .bind(kind.sequence_key())
        .fetch_one(conn)
        .await?;
        Ok(kind.format_number(value))
    }
}
