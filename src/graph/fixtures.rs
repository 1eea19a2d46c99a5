//! Small graphs shared by unit tests.

use std::sync::Arc;

use super::{AnswerOption, GraphDefinition, GraphStore, OutcomeNode, QuestionNode, Verdict};

fn option(label: &str, value: &str, target: &str) -> AnswerOption {
    AnswerOption {
        label: label.to_string(),
        value: value.to_string(),
        target: Some(target.to_string()),
        icon: None,
    }
}

fn outcome(id: &str, verdict: Verdict, title: &str) -> OutcomeNode {
    OutcomeNode {
        id: id.to_string(),
        verdict,
        title: title.to_string(),
        message: format!("{} message", title),
        suggestions: vec![format!("{} suggestion", title)],
        execution_plan: None,
    }
}

/// `q1{yes->q2, no->outcomeBad}`, `q2{good->outcomeGood, bad->outcomeBad}`.
pub(crate) fn mini_definition() -> GraphDefinition {
    let q1 = QuestionNode {
        id: "q1".to_string(),
        category: "Cat A".to_string(),
        prompt: "First question?".to_string(),
        detail: None,
        options: vec![
            option("Yes", "yes", "q2"),
            option("No", "no", "outcomeBad"),
        ],
    };
    let q2 = QuestionNode {
        id: "q2".to_string(),
        category: "Cat B".to_string(),
        prompt: "Second question?".to_string(),
        detail: Some("More context".to_string()),
        options: vec![
            option("Good", "good", "outcomeGood"),
            option("Bad", "bad", "outcomeBad"),
        ],
    };

    GraphDefinition {
        name: "Mini".to_string(),
        description: "A minimal tree for testing".to_string(),
        root_id: "q1".to_string(),
        questions: [q1, q2].into_iter().map(|q| (q.id.clone(), q)).collect(),
        outcomes: [
            outcome("outcomeGood", Verdict::Go, "All good"),
            outcome("outcomeBad", Verdict::NoGo, "Stop"),
        ]
        .into_iter()
        .map(|o| (o.id.clone(), o))
        .collect(),
    }
}

pub(crate) fn mini_store() -> Arc<GraphStore> {
    Arc::new(GraphStore::new(mini_definition()).expect("mini graph is valid"))
}
