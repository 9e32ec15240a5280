//! Application state management
//!
//! Contains shared state accessible across all handlers.
//! DATABASE-ONLY: All storage is backed by PostgreSQL, no in-memory fallbacks.

use crate::db::UserService;
use crate::nlquery::NlQueryGateway;
use deadpool_postgres::Pool;
use std::sync::Arc;

/// Application state shared across all handlers
/// All operations require a valid database connection
pub struct AppState {
    /// Database connection pool (required)
    pub db_pool: Pool,

    /// User service for account storage (required)
    pub users: UserService,

    /// Natural-language query gateway (generation, validation, execution)
    pub gateway: NlQueryGateway,
}

impl AppState {
    /// Create new application state with database pool (the only way)
    pub fn new(pool: Pool, gateway: NlQueryGateway) -> Self {
        let users = UserService::new(pool.clone());

        Self {
            db_pool: pool,
            users,
            gateway,
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
