//! Displayed transcript and the assistant-dedup rule
//!
//! The server response separates "the thread so far" from "the latest
//! assistant reply", and the reply may or may not already be the thread's
//! last entry. Reconciliation appends it at most once.

use crate::interview::{Role, Turn};
use uuid::Uuid;

/// A turn as displayed locally. The id is client-generated and exists so an
/// optimistic turn can be removed by identity on rollback; it never goes
/// over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTurn {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
}

impl DisplayTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
        }
    }

    fn from_wire(turn: &Turn) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Build the displayed transcript from the authoritative thread plus the
/// latest assistant text.
///
/// The thread is displayed unchanged when its last turn is an assistant
/// turn carrying exactly `assistant`; otherwise one synthetic assistant
/// turn is appended. With no assistant text the thread stands alone.
pub fn reconcile(thread: &[Turn], assistant: Option<&str>) -> Vec<DisplayTurn> {
    let mut display: Vec<DisplayTurn> = thread.iter().map(DisplayTurn::from_wire).collect();
    if let Some(assistant) = assistant {
        let already_last = thread
            .last()
            .is_some_and(|t| t.role == Role::Assistant && t.content == assistant);
        if !already_last {
            display.push(DisplayTurn::assistant(assistant));
        }
    }
    display
}
