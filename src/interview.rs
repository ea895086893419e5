//! Transfer interview state machine
//!
//! Server-owned progression of a transfer's handover interview. The client
//! never computes transitions; it only renders what this module produces.

pub mod event;
pub mod extract;
pub mod prompts;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use event::Event;
pub use state::{InterviewState, Role, Step, Turn};
pub use transition::{transition, TransitionError};
