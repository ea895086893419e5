//! Session synchronizer and interview façade
//!
//! Wraps every Start/Message call with optimistic local display and
//! guaranteed rollback. The displayed transcript lives in an explicit
//! three-state model transitioned by a single reducer, so the
//! commit/rollback contract is testable without any UI harness.

use super::error::ClientError;
use super::http::{InterviewApi, StepResponse};
use super::transcript::{reconcile, DisplayTurn};
use uuid::Uuid;

// ============================================================================
// Sync state + reducer
// ============================================================================

/// Displayed-transcript state for one interview session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// Everything shown is server-confirmed.
    Confirmed { transcript: Vec<DisplayTurn> },
    /// A user turn is shown ahead of server confirmation.
    Optimistic {
        transcript: Vec<DisplayTurn>,
        pending_id: Uuid,
        sent_text: String,
    },
    /// The last call failed; the transcript is back to its confirmed form.
    Failed {
        transcript: Vec<DisplayTurn>,
        error: String,
    },
}

impl Default for SyncState {
    fn default() -> Self {
        SyncState::Confirmed { transcript: vec![] }
    }
}

impl SyncState {
    pub fn transcript(&self) -> &[DisplayTurn] {
        match self {
            SyncState::Confirmed { transcript }
            | SyncState::Optimistic { transcript, .. }
            | SyncState::Failed { transcript, .. } => transcript,
        }
    }
}

/// Events the reducer understands.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A user turn was queued for sending and should show immediately.
    SendQueued { turn: DisplayTurn },
    /// The server confirmed; `transcript` is the reconciled authoritative
    /// transcript and replaces the display wholesale.
    Committed { transcript: Vec<DisplayTurn> },
    /// The call failed; any optimistic turn must come back out.
    CallFailed { error: String },
    /// Local clear.
    Cleared,
}

/// Single transition function for the displayed transcript.
pub fn reduce(state: SyncState, event: SyncEvent) -> SyncState {
    match (state, event) {
        (
            SyncState::Confirmed { mut transcript } | SyncState::Failed { mut transcript, .. },
            SyncEvent::SendQueued { turn },
        ) => {
            let pending_id = turn.id;
            let sent_text = turn.content.clone();
            transcript.push(turn);
            SyncState::Optimistic {
                transcript,
                pending_id,
                sent_text,
            }
        }
        // A queue while already optimistic cannot happen behind the busy
        // gate; keep the reducer total by ignoring it.
        (state @ SyncState::Optimistic { .. }, SyncEvent::SendQueued { .. }) => state,

        (_, SyncEvent::Committed { transcript }) => SyncState::Confirmed { transcript },

        (
            SyncState::Optimistic {
                mut transcript,
                pending_id,
                ..
            },
            SyncEvent::CallFailed { error },
        ) => {
            transcript.retain(|t| t.id != pending_id);
            SyncState::Failed { transcript, error }
        }
        (
            SyncState::Confirmed { transcript } | SyncState::Failed { transcript, .. },
            SyncEvent::CallFailed { error },
        ) => SyncState::Failed { transcript, error },

        (_, SyncEvent::Cleared) => SyncState::default(),
    }
}

// ============================================================================
// Interview session façade
// ============================================================================

/// Admission ticket for one in-flight call, tagged with its sequence
/// number so late completions can be recognized as stale.
#[derive(Debug, Clone, Copy)]
struct CallTicket {
    seq: u64,
}

/// Client-side interview session for one transfer.
///
/// The API handle is injected at construction; at most one Start/Message
/// call is in flight at a time, enforced here rather than by the server.
pub struct InterviewSession<A: InterviewApi> {
    api: A,
    /// Transfer id typed by the user; auto-start-on-send uses it.
    transfer_input: Option<i64>,
    /// Transfer id of the started session, if any.
    transfer_id: Option<i64>,
    sync: SyncState,
    pending_step: Option<String>,
    busy: bool,
    seq: u64,
    last_applied_seq: u64,
    /// Input text restored after a rollback, so the user can retry without
    /// retyping.
    draft: String,
    last_error: Option<ClientError>,
}

impl<A: InterviewApi> InterviewSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            transfer_input: None,
            transfer_id: None,
            sync: SyncState::default(),
            pending_step: None,
            busy: false,
            seq: 0,
            last_applied_seq: 0,
            draft: String::new(),
            last_error: None,
        }
    }

    // ---- observables -------------------------------------------------------

    pub fn transcript(&self) -> &[DisplayTurn] {
        self.sync.transcript()
    }

    pub fn pending_step(&self) -> Option<&str> {
        self.pending_step.as_deref()
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&ClientError> {
        self.last_error.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn transfer_id(&self) -> Option<i64> {
        self.transfer_id
    }

    /// Record the transfer id the user has typed without starting anything.
    pub fn set_transfer_input(&mut self, id: i64) {
        self.transfer_input = Some(id);
    }

    // ---- operations --------------------------------------------------------

    /// Start (or resume) the interview for a transfer. Safe to call
    /// repeatedly for the same id; the server resumes rather than restarts.
    pub async fn start(&mut self, transfer_id: i64) -> Result<(), ClientError> {
        if transfer_id <= 0 {
            return Err(self.record_validation("El id de traspaso debe ser un entero positivo"));
        }
        let ticket = self.try_begin()?;
        let result = self.api.start(transfer_id).await;
        self.finish_start(ticket, transfer_id, result)
    }

    /// Send the user's answer to the current pending step. Starts the
    /// session first if the user typed a transfer id but never pressed
    /// start.
    pub async fn send(&mut self, text: &str) -> Result<(), ClientError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(self.record_validation("El mensaje no puede estar vacío"));
        }
        if self.busy {
            return Err(ClientError::Validation(
                "Hay una petición en curso".to_string(),
            ));
        }
        if self.transfer_id.is_none() {
            let Some(id) = self.transfer_input else {
                return Err(self.record_validation(
                    "Indica un id de traspaso e inicia la entrevista primero",
                ));
            };
            self.start(id).await?;
        }
        let transfer_id = self
            .transfer_id
            .ok_or_else(|| ClientError::Validation("La entrevista no está iniciada".to_string()))?;

        let ticket = self.try_begin()?;
        // Optimistic: show the turn and clear the input before the call
        // resolves.
        let turn = DisplayTurn::user(text.clone());
        self.sync = reduce(std::mem::take(&mut self.sync), SyncEvent::SendQueued { turn });
        self.draft.clear();

        let result = self.api.message(transfer_id, &text).await;
        self.finish_message(ticket, &text, result)
    }

    /// Discard local session state. Server-side interview state is
    /// untouched; a later start for the same transfer resumes it.
    pub fn reset(&mut self) {
        // Any in-flight completion becomes stale instead of resurrecting
        // the cleared transcript.
        self.last_applied_seq = self.seq;
        self.busy = false;
        self.transfer_id = None;
        self.sync = reduce(std::mem::take(&mut self.sync), SyncEvent::Cleared);
        self.pending_step = None;
        self.draft.clear();
        self.last_error = None;
    }

    // ---- internals ---------------------------------------------------------

    /// Synchronous admission point: rejects while a call is outstanding and
    /// assigns the call's sequence number.
    fn try_begin(&mut self) -> Result<CallTicket, ClientError> {
        if self.busy {
            return Err(ClientError::Validation(
                "Hay una petición en curso".to_string(),
            ));
        }
        self.busy = true;
        self.seq += 1;
        Ok(CallTicket { seq: self.seq })
    }

    /// A completion is applied only in call-issue order; anything at or
    /// below the last applied sequence number is discarded.
    fn is_stale(&self, ticket: CallTicket) -> bool {
        ticket.seq <= self.last_applied_seq
    }

    fn finish_start(
        &mut self,
        ticket: CallTicket,
        transfer_id: i64,
        result: Result<StepResponse, ClientError>,
    ) -> Result<(), ClientError> {
        self.busy = false;
        if self.is_stale(ticket) {
            return Ok(());
        }
        self.last_applied_seq = ticket.seq;
        match result {
            Ok(response) => {
                self.transfer_id = Some(transfer_id);
                self.transfer_input = Some(transfer_id);
                self.apply_confirmed(&response);
                Ok(())
            }
            Err(error) => {
                self.sync = reduce(
                    std::mem::take(&mut self.sync),
                    SyncEvent::CallFailed {
                        error: error.to_string(),
                    },
                );
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn finish_message(
        &mut self,
        ticket: CallTicket,
        sent_text: &str,
        result: Result<StepResponse, ClientError>,
    ) -> Result<(), ClientError> {
        self.busy = false;
        if self.is_stale(ticket) {
            return Ok(());
        }
        self.last_applied_seq = ticket.seq;
        match result {
            Ok(response) => {
                self.apply_confirmed(&response);
                Ok(())
            }
            Err(error) => {
                // Rollback: the optimistic turn comes out by identity and
                // the input text is restored for retry.
                self.sync = reduce(
                    std::mem::take(&mut self.sync),
                    SyncEvent::CallFailed {
                        error: error.to_string(),
                    },
                );
                self.draft = sent_text.to_string();
                self.last_error = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Commit: the displayed transcript is replaced wholesale by the
    /// reconciled server transcript; the optimistic turn is superseded,
    /// never merged.
    fn apply_confirmed(&mut self, response: &StepResponse) {
        let transcript = reconcile(&response.state.thread, response.assistant.as_deref());
        self.sync = reduce(
            std::mem::take(&mut self.sync),
            SyncEvent::Committed { transcript },
        );
        self.pending_step.clone_from(&response.pending_step);
        self.last_error = None;
    }

    fn record_validation(&mut self, message: &str) -> ClientError {
        let error = ClientError::Validation(message.to_string());
        self.last_error = Some(error.clone());
        error
    }
}
