use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{CompletedSession, SessionRecorder};
use crate::error::{RecorderError, RecorderResult};

/// Recorder backed by a single JSON array file, newest session first.
///
/// A missing file is an empty history. A corrupt file is logged and treated
/// as empty, then replaced on the next write.
#[derive(Debug, Clone)]
pub struct JsonFileRecorder {
    path: PathBuf,
    limit: usize,
}

impl JsonFileRecorder {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            path: path.into(),
            limit: limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RecorderResult<Vec<CompletedSession>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(RecorderError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&raw) {
            Ok(sessions) => Ok(sessions),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History file is corrupt, starting from empty history"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, sessions: &[CompletedSession]) -> RecorderResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RecorderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(sessions)?;
        fs::write(&self.path, json).map_err(|source| RecorderError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionRecorder for JsonFileRecorder {
    fn record(&mut self, session: CompletedSession) -> RecorderResult<()> {
        let mut sessions = self.load()?;
        debug!(
            session_id = %session.id,
            path = %self.path.display(),
            existing = sessions.len(),
            "Appending session to history file"
        );
        sessions.insert(0, session);
        sessions.truncate(self.limit);
        self.save(&sessions)
    }

    fn history(&self) -> RecorderResult<Vec<CompletedSession>> {
        self.load()
    }

    fn clear(&mut self) -> RecorderResult<()> {
        self.save(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::fixtures::mini_store;
    use crate::session::NavigationSession;
    use tempfile::tempdir;

    fn completed(path: &[&str]) -> CompletedSession {
        let mut session = NavigationSession::new(mini_store());
        for value in path {
            session.select_option(value);
        }
        CompletedSession::from_session(&session).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_history() {
        let dir = tempdir().unwrap();
        let recorder = JsonFileRecorder::new(dir.path().join("none.json"), 5);
        assert!(recorder.history().unwrap().is_empty());
    }

    #[test]
    fn test_record_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut recorder = JsonFileRecorder::new(&path, 2);
        let first = completed(&["no"]);
        let second = completed(&["yes", "good"]);
        let third = completed(&["yes", "bad"]);
        recorder.record(first).unwrap();
        recorder.record(second.clone()).unwrap();
        recorder.record(third.clone()).unwrap();

        let reopened = JsonFileRecorder::new(&path, 2);
        let history = reopened.history().unwrap();
        assert_eq!(history, vec![third, second]);
    }

    #[test]
    fn test_corrupt_file_is_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();

        let mut recorder = JsonFileRecorder::new(&path, 5);
        assert!(recorder.history().unwrap().is_empty());

        recorder.record(completed(&["no"])).unwrap();
        assert_eq!(recorder.history().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_empties_file() {
        let dir = tempdir().unwrap();
        let mut recorder = JsonFileRecorder::new(dir.path().join("history.json"), 5);
        recorder.record(completed(&["no"])).unwrap();

        recorder.clear().unwrap();
        assert!(recorder.history().unwrap().is_empty());
        assert!(recorder.path().exists());
    }
}
