use std::sync::Arc;

use crate::config::ServerConfig;
use crate::uploads::AttachmentStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: flowiq_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Disk storage for vendor bill attachments.
    pub uploads: Arc<AttachmentStore>,
}

impl AppState {
    pub fn new(pool: flowiq_db::DbPool, config: ServerConfig) -> Self {
        let uploads = Arc::new(AttachmentStore::new(config.uploads_dir.clone()));
        Self {
            pool,
            config: Arc::new(config),
            uploads,
        }
    }
}
