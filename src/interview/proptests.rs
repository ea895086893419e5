//! Property tests for the interview state machine

use super::event::Event;
use super::state::{InterviewState, Role, Step};
use super::transition::transition;
use proptest::prelude::*;

fn arb_message() -> impl Strategy<Value = String> {
    prop_oneof![
        // Bullet-ish answers the extractor accepts
        prop::collection::vec("[a-zA-Z]{2,10}( [a-zA-Z]{2,10}){0,3}", 1..5)
            .prop_map(|items| items.iter().map(|i| format!("- {i}\n")).collect()),
        // Arbitrary junk, including whitespace-only and long prose
        ".*",
        Just("   ".to_string()),
    ]
}

fn step_rank(step: Option<Step>) -> u8 {
    match step {
        Some(Step::Responsibilities) => 0,
        Some(Step::PendingWork) => 1,
        Some(Step::KeyContacts) => 2,
        None => 3,
    }
}

proptest! {
    /// The thread only ever grows, errors change nothing, and the pending
    /// step never moves backwards, whatever the user types.
    #[test]
    fn thread_grows_and_steps_never_regress(messages in prop::collection::vec(arb_message(), 0..12)) {
        let mut state = transition(&InterviewState::default(), Event::Start).unwrap();
        for text in messages {
            let before_len = state.thread.len();
            let before_rank = step_rank(state.pending_step);
            match transition(&state, Event::UserMessage { text }) {
                Ok(next) => {
                    prop_assert!(next.thread.len() >= before_len);
                    prop_assert!(step_rank(next.pending_step) >= before_rank);
                    prop_assert_eq!(&next.thread[..before_len], &state.thread[..]);
                    state = next;
                }
                Err(_) => {
                    // The pure function returned the error before producing
                    // a new state; the caller keeps the old one.
                }
            }
        }
    }

    /// Every accepted message appends exactly one user turn followed by one
    /// assistant turn, and the assistant always speaks last.
    #[test]
    fn accepted_messages_append_a_turn_pair(messages in prop::collection::vec(arb_message(), 1..8)) {
        let mut state = transition(&InterviewState::default(), Event::Start).unwrap();
        for text in messages {
            if let Ok(next) = transition(&state, Event::UserMessage { text }) {
                prop_assert_eq!(next.thread.len(), state.thread.len() + 2);
                prop_assert_eq!(next.thread[next.thread.len() - 2].role, Role::User);
                prop_assert_eq!(next.thread[next.thread.len() - 1].role, Role::Assistant);
                prop_assert_eq!(
                    next.last_assistant.as_deref(),
                    Some(next.thread[next.thread.len() - 1].content.as_str())
                );
                state = next;
            }
        }
    }

    /// Start is idempotent on transcript length from any reachable state.
    #[test]
    fn start_is_idempotent(messages in prop::collection::vec(arb_message(), 0..8)) {
        let mut state = transition(&InterviewState::default(), Event::Start).unwrap();
        for text in messages {
            if let Ok(next) = transition(&state, Event::UserMessage { text }) {
                state = next;
            }
        }
        let resumed = transition(&state, Event::Start).unwrap();
        prop_assert_eq!(&resumed.thread, &state.thread);
        prop_assert_eq!(resumed.pending_step, state.pending_step);
        let again = transition(&resumed, Event::Start).unwrap();
        prop_assert_eq!(&again.thread, &state.thread);
    }

    /// Serialized state always round-trips, so persistence cannot corrupt a
    /// reachable interview.
    #[test]
    fn state_roundtrips_through_json(messages in prop::collection::vec(arb_message(), 0..8)) {
        let mut state = transition(&InterviewState::default(), Event::Start).unwrap();
        for text in messages {
            if let Ok(next) = transition(&state, Event::UserMessage { text }) {
                state = next;
            }
        }
        let json = serde_json::to_string(&state).unwrap();
        let loaded: InterviewState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(loaded, state);
    }
}
