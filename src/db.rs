//! Database module for the transfer registry
//!
//! Provides persistence for transfers and their interview state.

mod schema;

pub use schema::Transfer;
use schema::SCHEMA;

use crate::interview::InterviewState;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Transfer not found: {0}")]
    TransferNotFound(i64),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ==================== Transfer Operations ====================

    /// Create a new transfer
    pub fn create_transfer(
        &self,
        position: &str,
        outgoing_user: &str,
        manager_instructions: Option<&str>,
    ) -> DbResult<Transfer> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO transfers (position, outgoing_user, manager_instructions, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![position, outgoing_user, manager_instructions, now.to_rfc3339()],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Transfer {
            id,
            position: position.to_string(),
            outgoing_user: outgoing_user.to_string(),
            manager_instructions: manager_instructions.map(String::from),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get transfer by ID
    pub fn get_transfer(&self, id: i64) -> DbResult<Transfer> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, position, outgoing_user, manager_instructions, created_at, updated_at
             FROM transfers WHERE id = ?1",
        )?;

        stmt.query_row(params![id], row_to_transfer)
            .optional()?
            .ok_or(DbError::TransferNotFound(id))
    }

    /// List all transfers, newest first
    pub fn list_transfers(&self) -> DbResult<Vec<Transfer>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, position, outgoing_user, manager_instructions, created_at, updated_at
             FROM transfers ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt.query_map([], row_to_transfer)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Update a transfer's position and outgoing user
    pub fn update_transfer(
        &self,
        id: i64,
        position: &str,
        outgoing_user: &str,
    ) -> DbResult<Transfer> {
        {
            let conn = self.conn.lock().unwrap();
            let now = Utc::now();
            let changed = conn.execute(
                "UPDATE transfers SET position = ?2, outgoing_user = ?3, updated_at = ?4
                 WHERE id = ?1",
                params![id, position, outgoing_user, now.to_rfc3339()],
            )?;
            if changed == 0 {
                return Err(DbError::TransferNotFound(id));
            }
        }
        self.get_transfer(id)
    }

    /// Delete a transfer
    pub fn delete_transfer(&self, id: i64) -> DbResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM transfers WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DbError::TransferNotFound(id));
        }
        Ok(())
    }

    // ==================== Interview State ====================

    /// Load the interview state stored on a transfer.
    ///
    /// Missing, empty, or corrupt `manager_instructions` loads as a fresh
    /// state rather than an error: the column may hold free-form manager
    /// text from before the interview existed.
    pub fn load_interview_state(&self, id: i64) -> DbResult<InterviewState> {
        let transfer = self.get_transfer(id)?;
        let raw = transfer
            .manager_instructions
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if raw.is_empty() {
            return Ok(InterviewState::default());
        }
        match serde_json::from_str(raw) {
            Ok(state) => Ok(state),
            Err(err) => {
                tracing::warn!(transfer_id = id, error = %err, "Stored interview state unreadable, starting fresh");
                Ok(InterviewState::default())
            }
        }
    }

    /// Persist the interview state onto its transfer row.
    pub fn save_interview_state(&self, id: i64, state: &InterviewState) -> DbResult<()> {
        let json = serde_json::to_string(state).expect("interview state serializes");
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let changed = conn.execute(
            "UPDATE transfers SET manager_instructions = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, json, now.to_rfc3339()],
        )?;
        if changed == 0 {
            return Err(DbError::TransferNotFound(id));
        }
        Ok(())
    }
}

fn row_to_transfer(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transfer> {
    Ok(Transfer {
        id: row.get(0)?,
        position: row.get(1)?,
        outgoing_user: row.get(2)?,
        manager_instructions: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
