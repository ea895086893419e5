//! Database schema and row types

use chrono::{DateTime, Utc};
use serde::Serialize;

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transfers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    position TEXT NOT NULL,
    outgoing_user TEXT NOT NULL,
    manager_instructions TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transfers_outgoing_user
    ON transfers(outgoing_user);
"#;

/// A transfer record: an outgoing employee's position plus the handover
/// material collected for it.
///
/// `manager_instructions` doubles as the storage slot for the serialized
/// interview state; free-form text written by a manager before the
/// interview starts simply loads as a fresh state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub id: i64,
    pub position: String,
    pub outgoing_user: String,
    pub manager_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
