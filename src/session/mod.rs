//! Navigation sessions over a validated decision graph.
//!
//! A [`NavigationSession`] walks one [`GraphStore`] at a time. It is either
//! *asking* (positioned on a question) or *resolved* (an outcome was reached).
//! Every answer is pushed onto a history stack so [`NavigationSession::go_back`]
//! can undo transitions exactly.
//!
//! Runtime misuse never fails: an unknown option value, `go_back` with an
//! empty history, or `select_option` after an outcome are ignored and leave
//! [`NavigationSession::snapshot`] unchanged.

mod listeners;


pub use listeners::Subscription;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::{GraphStore, OutcomeNode, QuestionNode, Target};
use listeners::ListenerRegistry;

/// Answers after which the progress estimate would reach 100%.
const PROGRESS_EXPECTED_STEPS: usize = 10;
/// Progress never claims completion before an outcome is reached.
const PROGRESS_CAP: u32 = 95;

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Question the answer was given on.
    pub node_id: String,
    /// Prompt text of that question.
    pub prompt: String,
    pub label: String,
    pub value: String,
    pub category: String,
    pub answered_at: DateTime<Utc>,
}

/// Logical state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Positioned on a question, no outcome yet.
    Asking,
    /// An outcome has been reached.
    Resolved,
}

/// Immutable view of a session handed to listeners and callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub current_node_id: String,
    /// `None` while resolved.
    pub current_question: Option<QuestionNode>,
    pub outcome: Option<OutcomeNode>,
    pub history: Vec<AnswerRecord>,
    /// Approximate completion percentage in `0..=95`.
    pub progress: u32,
    /// 1-based step number for display.
    pub current_step: usize,
    pub started_at: DateTime<Utc>,
}

/// Progress estimate for a history of `answered` records.
pub fn progress_for(answered: usize) -> u32 {
    let percent = answered.saturating_mul(100) / PROGRESS_EXPECTED_STEPS;
    u32::try_from(percent).unwrap_or(u32::MAX).min(PROGRESS_CAP)
}

/// Mutable traversal state bound to one [`GraphStore`].
pub struct NavigationSession {
    store: Arc<GraphStore>,
    current_node_id: String,
    history: Vec<AnswerRecord>,
    outcome_id: Option<String>,
    started_at: DateTime<Utc>,
    listeners: ListenerRegistry,
}

impl NavigationSession {
    /// Start a session at the root of `store`.
    pub fn new(store: Arc<GraphStore>) -> Self {
        let current_node_id = store.root_id().to_string();
        Self {
            store,
            current_node_id,
            history: Vec::new(),
            outcome_id: None,
            started_at: Utc::now(),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn store(&self) -> &Arc<GraphStore> {
        &self.store
    }

    pub fn phase(&self) -> SessionPhase {
        if self.outcome_id.is_some() {
            SessionPhase::Resolved
        } else {
            SessionPhase::Asking
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome_id.is_some()
    }

    pub fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    /// The question being asked, `None` once resolved.
    pub fn current_question(&self) -> Option<&QuestionNode> {
        if self.is_resolved() {
            return None;
        }
        self.store.lookup_question(&self.current_node_id)
    }

    pub fn outcome(&self) -> Option<&OutcomeNode> {
        self.outcome_id
            .as_deref()
            .and_then(|id| self.store.lookup_outcome(id))
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Answer the current question with the option whose value matches.
    ///
    /// Returns `false`, without notifying, when the session is resolved or
    /// the value is not an option of the current question.
    pub fn select_option(&mut self, value: &str) -> bool {
        if let Some(outcome_id) = &self.outcome_id {
            debug!(outcome_id = %outcome_id, value, "Ignoring answer after outcome");
            return false;
        }

        let store = Arc::clone(&self.store);
        let Some(question) = store.lookup_question(&self.current_node_id) else {
            debug!(node_id = %self.current_node_id, "Current question missing from graph");
            return false;
        };
        let Some(option) = question.option(value) else {
            debug!(node_id = %question.id, value, "Ignoring unknown option value");
            return false;
        };
        let Some(target) = option.target.as_deref().and_then(|t| store.resolve_target(t)) else {
            debug!(node_id = %question.id, value, "Option has no resolvable target");
            return false;
        };

        self.history.push(AnswerRecord {
            node_id: question.id.clone(),
            prompt: question.prompt.clone(),
            label: option.label.clone(),
            value: option.value.clone(),
            category: question.category.clone(),
            answered_at: Utc::now(),
        });

        match target {
            Target::Question(next) => {
                debug!(from = %question.id, to = %next.id, value, "Advanced to question");
                self.current_node_id = next.id.clone();
            }
            Target::Outcome(outcome) => {
                info!(
                    node_id = %question.id,
                    outcome_id = %outcome.id,
                    verdict = %outcome.verdict,
                    answers = self.history.len(),
                    "Checklist resolved"
                );
                self.outcome_id = Some(outcome.id.clone());
            }
        }

        self.emit();
        true
    }

    /// Undo the most recent answer.
    ///
    /// Returns `false`, without notifying, when there is nothing to undo.
    pub fn go_back(&mut self) -> bool {
        let Some(last) = self.history.pop() else {
            return false;
        };

        // A record names the question it was answered on, which is where
        // undoing it returns to. The first record is always the root.
        self.outcome_id = None;
        self.current_node_id = last.node_id;

        debug!(
            node_id = %self.current_node_id,
            answers = self.history.len(),
            "Stepped back"
        );
        self.emit();
        true
    }

    /// Return to the root with an empty history and restart the clock.
    pub fn reset(&mut self) {
        self.current_node_id = self.store.root_id().to_string();
        self.history.clear();
        self.outcome_id = None;
        self.started_at = Utc::now();
        debug!(root_id = %self.current_node_id, "Session reset");
        self.emit();
    }

    pub fn progress(&self) -> u32 {
        progress_for(self.history.len())
    }

    pub fn current_step(&self) -> usize {
        self.history.len() + 1
    }

    pub fn snapshot(&self) -> SessionState {
        SessionState {
            phase: self.phase(),
            current_node_id: self.current_node_id.clone(),
            current_question: self.current_question().cloned(),
            outcome: self.outcome().cloned(),
            history: self.history.clone(),
            progress: self.progress(),
            current_step: self.current_step(),
            started_at: self.started_at,
        }
    }

    /// Register a listener called after every state change.
    ///
    /// Listeners run synchronously, in subscription order, with a fresh
    /// snapshot.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&SessionState) + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&self) {
        self.listeners.notify(&self.snapshot());
    }
}

impl std::fmt::Debug for NavigationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationSession")
            .field("current_node_id", &self.current_node_id)
            .field("history", &self.history.len())
            .field("outcome_id", &self.outcome_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
