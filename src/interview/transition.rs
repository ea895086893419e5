//! Pure interview transition function
//!
//! Given the persisted state and an event, produce the next state. No I/O
//! happens here; the HTTP handler loads the state from the transfer row,
//! calls [`transition`], and persists the result only on `Ok`. A failed
//! transition therefore never commits a partial turn.

use super::event::Event;
use super::extract::{extract_items, is_sufficient};
use super::prompts;
use super::state::{InterviewState, Step, Turn};
use thiserror::Error;

/// Errors that leave the persisted state untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("El mensaje no puede estar vacío")]
    EmptyMessage,
    #[error("La entrevista no está iniciada; llama a start primero")]
    NotStarted,
}

/// Advance an interview by one event.
pub fn transition(state: &InterviewState, event: Event) -> Result<InterviewState, TransitionError> {
    match event {
        Event::Start => Ok(start(state)),
        Event::UserMessage { text } => user_message(state, &text),
    }
}

/// Initialize or resume. Appends the opening prompt only on the very first
/// call; resuming restates the current step's prompt without growing the
/// thread, so repeated starts are idempotent in transcript length.
fn start(state: &InterviewState) -> InterviewState {
    let mut next = state.clone();
    if !next.is_started() {
        next.pending_step = Some(Step::Responsibilities);
        next.last_assistant = Some(prompts::ASK_RESPONSIBILITIES.to_string());
        next.thread.push(Turn::assistant(prompts::ASK_RESPONSIBILITIES));
        return next;
    }
    let restated = match next.pending_step {
        Some(step) => prompts::ask_for(step),
        None => prompts::ALREADY_COMPLETE,
    };
    next.last_assistant = Some(restated.to_string());
    next
}

fn user_message(state: &InterviewState, text: &str) -> Result<InterviewState, TransitionError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TransitionError::EmptyMessage);
    }
    if !state.is_started() {
        return Err(TransitionError::NotStarted);
    }

    let mut next = state.clone();
    next.thread.push(Turn::user(text));

    let Some(step) = next.pending_step else {
        // Completed interviews stay read-only; acknowledge and move on.
        next.last_assistant = Some(prompts::ALREADY_COMPLETE.to_string());
        next.thread.push(Turn::assistant(prompts::ALREADY_COMPLETE));
        return Ok(next);
    };

    let items = extract_items(step, text);
    let assistant = if is_sufficient(step, &items) {
        let bucket = match step {
            Step::Responsibilities => &mut next.responsibilities,
            Step::PendingWork => &mut next.pending_work,
            Step::KeyContacts => &mut next.key_contacts,
        };
        InterviewState::merge_into(bucket, items);
        next.pending_step = step.next();
        match next.pending_step {
            Some(following) => prompts::ask_for(following),
            None => prompts::COMPLETE,
        }
    } else {
        // Insufficient answer: same step, clarifying re-prompt.
        prompts::clarify_for(step)
    };

    next.last_assistant = Some(assistant.to_string());
    next.thread.push(Turn::assistant(assistant));
    Ok(next)
}
