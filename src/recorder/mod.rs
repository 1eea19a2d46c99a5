//! Recording of completed checklist sessions.
//!
//! The navigation engine never persists anything itself. When a session
//! resolves, the host packages it as a [`CompletedSession`] and hands it to a
//! [`SessionRecorder`].

mod file;

pub use file::JsonFileRecorder;

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::RecorderResult;
use crate::graph::OutcomeNode;
use crate::session::{AnswerRecord, NavigationSession};

/// Default number of sessions kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A resolved checklist run, ready to be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub decisions: Vec<AnswerRecord>,
    pub outcome: OutcomeNode,
    /// Label of the first answer, which is the trade direction in the
    /// built-in checklists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_direction: Option<String>,
    /// Instrument the check was run for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CompletedSession {
    /// Package a resolved session. Returns `None` while it is still asking.
    pub fn from_session(session: &NavigationSession) -> Option<Self> {
        let outcome = session.outcome()?.clone();
        let decisions = session.history().to_vec();
        Some(Self {
            id: Uuid::new_v4().to_string(),
            started_at: session.started_at(),
            ended_at: Utc::now(),
            trade_direction: decisions.first().map(|d| d.label.clone()),
            decisions,
            outcome,
            pair: None,
            metadata: None,
        })
    }

    pub fn with_pair(mut self, pair: impl Into<String>) -> Self {
        let pair = pair.into();
        self.pair = if pair.trim().is_empty() {
            None
        } else {
            Some(pair)
        };
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Wall-clock duration of the run.
    pub fn duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }
}

/// Persistence collaborator for completed sessions.
///
/// Implementations keep history newest first.
#[cfg_attr(test, mockall::automock)]
pub trait SessionRecorder {
    /// Store a completed session.
    fn record(&mut self, session: CompletedSession) -> RecorderResult<()>;

    /// All stored sessions, newest first.
    fn history(&self) -> RecorderResult<Vec<CompletedSession>>;

    /// Remove every stored session.
    fn clear(&mut self) -> RecorderResult<()>;
}

/// Package `session` and record it if it has resolved.
///
/// Returns the id of the stored session, or `None` when still asking.
/// Each call packages a new `CompletedSession` with a fresh id, so calling
/// it twice on the same resolved session stores two entries. Callers that
/// may retry should keep the returned id.
pub fn record_if_resolved(
    recorder: &mut dyn SessionRecorder,
    session: &NavigationSession,
    pair: Option<&str>,
) -> RecorderResult<Option<String>> {
    let Some(mut completed) = CompletedSession::from_session(session) else {
        return Ok(None);
    };
    if let Some(pair) = pair {
        completed = completed.with_pair(pair);
    }
    let id = completed.id.clone();
    recorder.record(completed)?;
    Ok(Some(id))
}

/// In-memory recorder, bounded to a fixed number of sessions.
#[derive(Debug, Clone)]
pub struct MemoryRecorder {
    sessions: VecDeque<CompletedSession>,
    limit: usize,
}

impl MemoryRecorder {
    pub fn new(limit: usize) -> Self {
        Self {
            sessions: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for MemoryRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl SessionRecorder for MemoryRecorder {
    fn record(&mut self, session: CompletedSession) -> RecorderResult<()> {
        debug!(session_id = %session.id, verdict = %session.outcome.verdict, "Recording session");
        self.sessions.push_front(session);
        self.sessions.truncate(self.limit);
        Ok(())
    }

    fn history(&self) -> RecorderResult<Vec<CompletedSession>> {
        Ok(self.sessions.iter().cloned().collect())
    }

    fn clear(&mut self) -> RecorderResult<()> {
        self.sessions.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecorderError;
    use crate::graph::fixtures::mini_store;
    use crate::graph::Verdict;
    use pretty_assertions::assert_eq;

    fn resolved_session(path: &[&str]) -> NavigationSession {
        let mut session = NavigationSession::new(mini_store());
        for value in path {
            session.select_option(value);
        }
        session
    }

    #[test]
    fn test_from_session_requires_outcome() {
        let session = resolved_session(&["yes"]);
        assert!(CompletedSession::from_session(&session).is_none());
    }

    #[test]
    fn test_from_session_packages_trace() {
        let session = resolved_session(&["yes", "good"]);
        let completed = CompletedSession::from_session(&session).unwrap();

        assert_eq!(completed.decisions.len(), 2);
        assert_eq!(completed.outcome.id, "outcomeGood");
        assert_eq!(completed.trade_direction.as_deref(), Some("Yes"));
        assert_eq!(completed.started_at, session.started_at());
        assert!(completed.duration() >= chrono::Duration::zero());
        assert!(Uuid::parse_str(&completed.id).is_ok());
    }

    #[test]
    fn test_blank_pair_is_dropped() {
        let session = resolved_session(&["no"]);
        let completed = CompletedSession::from_session(&session).unwrap();
        assert_eq!(completed.clone().with_pair("  ").pair, None);
        assert_eq!(completed.with_pair("ES").pair.as_deref(), Some("ES"));
    }

    #[test]
    fn test_memory_recorder_keeps_newest_first_within_limit() {
        let mut recorder = MemoryRecorder::new(2);
        let mut ids = Vec::new();
        for _ in 0..3 {
            let completed = CompletedSession::from_session(&resolved_session(&["no"])).unwrap();
            ids.push(completed.id.clone());
            recorder.record(completed).unwrap();
        }

        let history = recorder.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, ids[2]);
        assert_eq!(history[1].id, ids[1]);

        recorder.clear().unwrap();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_record_if_resolved_skips_asking_sessions() {
        let mut recorder = MockSessionRecorder::new();
        recorder.expect_record().never();

        let session = resolved_session(&["yes"]);
        let id = record_if_resolved(&mut recorder, &session, Some("NQ")).unwrap();
        assert_eq!(id, None);
    }

    #[test]
    fn test_record_if_resolved_hands_over_session() {
        let mut recorder = MockSessionRecorder::new();
        recorder
            .expect_record()
            .withf(|s| s.outcome.verdict == Verdict::Go && s.pair.as_deref() == Some("NQ"))
            .times(1)
            .returning(|_| Ok(()));

        let session = resolved_session(&["yes", "good"]);
        let id = record_if_resolved(&mut recorder, &session, Some("NQ")).unwrap();
        assert!(id.is_some());
    }

    #[test]
    fn test_record_if_resolved_records_each_call() {
        let mut recorder = MemoryRecorder::new(DEFAULT_HISTORY_LIMIT);
        let session = resolved_session(&["yes", "good"]);

        let first = record_if_resolved(&mut recorder, &session, None).unwrap();
        let second = record_if_resolved(&mut recorder, &session, None).unwrap();

        assert_ne!(first, second);
        assert_eq!(recorder.len(), 2);
    }

    #[test]
    fn test_record_if_resolved_propagates_errors() {
        let mut recorder = MockSessionRecorder::new();
        recorder.expect_record().returning(|_| {
            Err(RecorderError::Io {
                path: "history.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            })
        });

        let session = resolved_session(&["no"]);
        let err = record_if_resolved(&mut recorder, &session, None).unwrap_err();
        assert!(matches!(err, RecorderError::Io { .. }));
    }
}
