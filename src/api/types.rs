//! API request and response types

use crate::db::Transfer;
use crate::interview::{InterviewState, Turn};
use serde::{Deserialize, Serialize};

/// Request to create a new transfer
#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub position: String,
    pub outgoing_user: String,
    #[serde(default)]
    pub manager_instructions: Option<String>,
}

/// Request to update a transfer
#[derive(Debug, Deserialize)]
pub struct UpdateTransferRequest {
    pub position: String,
    pub outgoing_user: String,
}

/// Request body for an interview message
#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
}

/// Response with a list of transfers
#[derive(Debug, Serialize)]
pub struct TransferListResponse {
    pub transfers: Vec<Transfer>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response shape shared by the interview start and message endpoints.
///
/// `assistant` restates the latest prompt even when the thread already ends
/// with it; clients deduplicate on display.
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub assistant: Option<String>,
    pub pending_step: Option<String>,
    pub state: StepStateBody,
}

/// The serialized interview state as exposed on the wire. The thread is the
/// contractual part; the collected buckets ride along for review screens.
#[derive(Debug, Serialize)]
pub struct StepStateBody {
    pub thread: Vec<Turn>,
    pub responsibilities: Vec<String>,
    pub pending_work: Vec<String>,
    pub key_contacts: Vec<String>,
}

impl StepResponse {
    pub fn from_state(state: InterviewState) -> Self {
        let pending_step = state.pending_step.map(|s| s.as_str().to_string());
        Self {
            assistant: state.last_assistant,
            pending_step,
            state: StepStateBody {
                thread: state.thread,
                responsibilities: state.responsibilities,
                pending_work: state.pending_work,
                key_contacts: state.key_contacts,
            },
        }
    }
}

/// Error response. The field name (`detail`) is the conventional one the
/// clients extract.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            detail: message.into(),
        }
    }
}
