//! Interview state types
//!
//! The whole state serializes to JSON and is persisted inside the transfer
//! row (`manager_instructions`), so every field here is part of the stored
//! format.

use serde::{Deserialize, Serialize};

/// Speaker of a transcript turn. Exactly two roles exist in this protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the interview transcript. Position in the thread is the
/// only ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Information-gathering steps, in interview order.
///
/// The wire representation (`responsibilities`, `pending_work`,
/// `key_contacts`) is what clients see in `pending_step`; a completed
/// interview has no pending step at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Responsibilities,
    PendingWork,
    KeyContacts,
}

impl Step {
    /// The step after this one, or None when the interview is done.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Responsibilities => Some(Step::PendingWork),
            Step::PendingWork => Some(Step::KeyContacts),
            Step::KeyContacts => None,
        }
    }

    /// Wire name, identical to the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Responsibilities => "responsibilities",
            Step::PendingWork => "pending_work",
            Step::KeyContacts => "key_contacts",
        }
    }
}

/// Maximum items kept per collected bucket.
pub const MAX_ITEMS_PER_BUCKET: usize = 7;

/// Serialized interview state for one transfer.
///
/// `thread` is append-only; collected buckets are merged with
/// deduplication and capped at [`MAX_ITEMS_PER_BUCKET`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewState {
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub pending_work: Vec<String>,
    #[serde(default)]
    pub key_contacts: Vec<String>,
    /// None once the interview is complete.
    #[serde(default = "default_step")]
    pub pending_step: Option<Step>,
    #[serde(default)]
    pub last_assistant: Option<String>,
    #[serde(default)]
    pub thread: Vec<Turn>,
}

fn default_step() -> Option<Step> {
    Some(Step::default())
}

impl Default for InterviewState {
    /// Matches the serde field defaults, so a fresh state and an empty JSON
    /// object deserialize to the same value.
    fn default() -> Self {
        Self {
            responsibilities: Vec::new(),
            pending_work: Vec::new(),
            key_contacts: Vec::new(),
            pending_step: default_step(),
            last_assistant: None,
            thread: Vec::new(),
        }
    }
}

impl InterviewState {
    /// A session is started once the opening assistant prompt exists.
    pub fn is_started(&self) -> bool {
        !self.thread.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.pending_step.is_none()
    }

    /// Merge new items into a bucket, skipping duplicates and enforcing the
    /// per-bucket cap.
    pub(crate) fn merge_into(bucket: &mut Vec<String>, items: Vec<String>) {
        for item in items {
            if bucket.len() >= MAX_ITEMS_PER_BUCKET {
                break;
            }
            if !bucket.contains(&item) {
                bucket.push(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_order_is_fixed() {
        assert_eq!(Step::Responsibilities.next(), Some(Step::PendingWork));
        assert_eq!(Step::PendingWork.next(), Some(Step::KeyContacts));
        assert_eq!(Step::KeyContacts.next(), None);
    }

    #[test]
    fn step_wire_names_match_serde() {
        for step in [Step::Responsibilities, Step::PendingWork, Step::KeyContacts] {
            assert_eq!(
                serde_json::to_string(&step).unwrap(),
                format!("\"{}\"", step.as_str())
            );
        }
    }

    #[test]
    fn fresh_state_pends_responsibilities() {
        let s = InterviewState::default();
        assert_eq!(s.pending_step, Some(Step::Responsibilities));
        assert!(!s.is_started());
        assert!(!s.is_complete());
    }

    #[test]
    fn merge_dedups_and_caps() {
        let mut bucket = vec!["a".to_string()];
        InterviewState::merge_into(
            &mut bucket,
            vec![
                "a".into(),
                "b".into(),
                "c".into(),
                "d".into(),
                "e".into(),
                "f".into(),
                "g".into(),
                "h".into(),
            ],
        );
        assert_eq!(bucket.len(), MAX_ITEMS_PER_BUCKET);
        assert_eq!(bucket.iter().filter(|i| i.as_str() == "a").count(), 1);
    }

    #[test]
    fn missing_fields_deserialize_as_fresh() {
        // A partially written or hand-edited row must still load.
        let s: InterviewState = serde_json::from_str("{}").unwrap();
        assert_eq!(s, InterviewState::default());
    }
}
