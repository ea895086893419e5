//! Events that drive the interview state machine

/// Events a client may raise against a transfer's interview.
#[derive(Debug, Clone)]
pub enum Event {
    /// Initialize or resume the interview.
    Start,
    /// The user's answer to the current pending step.
    UserMessage { text: String },
}
