use std::path::PathBuf;

use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Graph source error: {0}")]
    Source(#[from] SourceError),

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Decision graph construction errors.
///
/// Raised only by [`GraphStore::new`](crate::graph::GraphStore::new); a graph
/// that was accepted can never produce one later.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Invalid graph ({} issue(s)): {}", .issues.len(), join_issues(.issues))]
    InvalidGraph { issues: Vec<GraphIssue> },
}

impl GraphError {
    /// All structural problems found, in a stable order.
    pub fn issues(&self) -> &[GraphIssue] {
        match self {
            GraphError::InvalidGraph { issues } => issues,
        }
    }
}

fn join_issues(issues: &[GraphIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single structural problem in a graph definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Error)]
pub enum GraphIssue {
    #[error("root {root_id} is not a question")]
    MissingRoot { root_id: String },

    #[error("question keyed {key} declares id {id}")]
    QuestionIdMismatch { key: String, id: String },

    #[error("outcome keyed {key} declares id {id}")]
    OutcomeIdMismatch { key: String, id: String },

    #[error("id {id} names both a question and an outcome")]
    AmbiguousId { id: String },

    #[error("question {node_id} has no options")]
    NoOptions { node_id: String },

    #[error("question {node_id} repeats option value {value}")]
    DuplicateOptionValue { node_id: String, value: String },

    #[error("option {node_id}/{value} has no target")]
    MissingTarget { node_id: String, value: String },

    #[error("option {node_id}/{value} targets unknown id {target}")]
    DanglingTarget {
        node_id: String,
        value: String,
        target: String,
    },

    #[error("question {node_id} is unreachable from the root")]
    UnreachableQuestion { node_id: String },

    #[error("outcome {outcome_id} is never referenced")]
    OrphanedOutcome { outcome_id: String },
}

/// Errors loading or storing graph definitions.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed graph definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown built-in checklist: {name}")]
    UnknownBuiltin { name: String },
}

/// Session recorder errors
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("History I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for graph construction
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type alias for graph source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type alias for recorder operations
pub type RecorderResult<T> = Result<T, RecorderError>;
