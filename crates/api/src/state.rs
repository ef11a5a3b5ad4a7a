use std::sync::Arc;

use padron_storage::ObjectStorage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`). Handlers receive their collaborators exclusively through this
/// struct -- there is no ambient global client anywhere.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: padron_db::DbPool,
    /// Server configuration (JWT secrets, cookie policy, timeouts).
    pub config: Arc<ServerConfig>,
    /// Photo object store.
    pub storage: Arc<dyn ObjectStorage>,
}
