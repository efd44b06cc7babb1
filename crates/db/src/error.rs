use flowiq_core::error::CoreError;

/// Failure of a repository operation that enforces domain rules inside its
/// transaction (reorders, status transitions).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
