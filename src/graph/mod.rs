//! Decision graph model and the validated, immutable [`GraphStore`].
//!
//! A graph is made of question nodes (each with an ordered list of options)
//! and terminal outcome nodes. Options point at either another question or an
//! outcome. The serde field names follow the JSON documents produced by the
//! checklist editor, so definitions exported from it load unchanged.

mod store;

#[cfg(test)]
pub(crate) mod fixtures;

pub use store::{GraphStore, Target};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A complete, not yet validated, graph definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    /// Display name of the checklist.
    #[serde(default)]
    pub name: String,
    /// Free-form description of the checklist.
    #[serde(default)]
    pub description: String,
    /// Id of the question every session starts at.
    #[serde(rename = "rootNodeId")]
    pub root_id: String,
    /// Question nodes keyed by id.
    #[serde(rename = "nodes")]
    pub questions: HashMap<String, QuestionNode>,
    /// Outcome nodes keyed by id.
    #[serde(rename = "results")]
    pub outcomes: HashMap<String, OutcomeNode>,
}

/// One checklist question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionNode {
    pub id: String,
    /// Grouping label shown next to the progress bar.
    pub category: String,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(
        rename = "description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub detail: Option<String>,
    pub options: Vec<AnswerOption>,
}

impl QuestionNode {
    /// Find the option with the given value.
    pub fn option(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// One answer choice of a [`QuestionNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    /// Unique within the parent question.
    pub value: String,
    /// Question or outcome id this option leads to.
    #[serde(rename = "nextNodeId", default)]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A terminal verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeNode {
    pub id: String,
    #[serde(rename = "type")]
    pub verdict: Verdict,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_plan: Option<ExecutionPlan>,
}

/// Entry, stop and target notes attached to a go outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    pub entry: String,
    pub stop_loss: String,
    pub take_profit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Verdict carried by an [`OutcomeNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Go,
    Caution,
    NoGo,
}

impl Verdict {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Go => "go",
            Verdict::Caution => "caution",
            Verdict::NoGo => "no-go",
        }
    }

    /// Only a go verdict clears the order-entry lock.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Go)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "go" => Ok(Verdict::Go),
            "caution" => Ok(Verdict::Caution),
            "no-go" | "no_go" | "nogo" => Ok(Verdict::NoGo),
            _ => Err(format!("Unknown verdict: {}", s)),
        }
    }
}
