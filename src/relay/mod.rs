//! Verdict relay for out-of-process collaborators.
//!
//! A browser side panel runs the checklist while a content script on the
//! trading site locks or unlocks its order buttons. Only a binary fact crosses
//! that boundary: whether the last check passed.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Lock status of the order-entry controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// No outcome yet.
    Unchecked,
    /// Last check ended with a go verdict.
    Passed,
    /// Last check ended with a caution or no-go verdict.
    Blocked,
}

impl LockState {
    pub fn from_state(state: &SessionState) -> Self {
        match &state.outcome {
            None => LockState::Unchecked,
            Some(outcome) if outcome.verdict.is_pass() => LockState::Passed,
            Some(_) => LockState::Blocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, LockState::Passed)
    }
}

/// Message exchanged between the extension contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelayMessage {
    CheckPassed,
    CheckReset,
    Ping,
}

impl RelayMessage {
    /// Message to broadcast after a state change.
    pub fn for_state(state: &SessionState) -> Self {
        Self::for_lock(LockState::from_state(state))
    }

    pub fn for_lock(lock: LockState) -> Self {
        if lock.is_unlocked() {
            RelayMessage::CheckPassed
        } else {
            RelayMessage::CheckReset
        }
    }

    /// Whether the background relay forwards this message to content scripts.
    pub fn is_broadcast(&self) -> bool {
        !matches!(self, RelayMessage::Ping)
    }
}
