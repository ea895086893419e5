//! Interview client stack
//!
//! Everything the UI layer needs to run a server-synchronized interview:
//! the transcript reconciliation rule, the HTTP transport, and the session
//! synchronizer with its optimistic-update/rollback contract.

pub mod error;
pub mod http;
pub mod session;
pub mod transcript;

pub use error::ClientError;
pub use http::{HttpInterviewApi, InterviewApi, StepResponse, StepState};
pub use session::{reduce, InterviewSession, SyncEvent, SyncState};
pub use transcript::{reconcile, DisplayTurn};
