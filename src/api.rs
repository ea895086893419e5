//! HTTP API for the transfer registry and interview endpoints

mod auth;
mod handlers;
mod types;

pub use auth::{AuthContext, RoleName};
pub use handlers::create_router;
pub use types::*;

use crate::db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Bearer token the server requires. None accepts any non-empty token
    /// (development mode).
    pub api_token: Option<String>,
}

impl AppState {
    pub fn new(db: Database, api_token: Option<String>) -> Self {
        Self { db, api_token }
    }
}
