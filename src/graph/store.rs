use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use super::{GraphDefinition, OutcomeNode, QuestionNode};
use crate::error::{GraphError, GraphIssue, GraphResult};

/// Resolved destination of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Question(&'a QuestionNode),
    Outcome(&'a OutcomeNode),
}

/// An immutable decision graph whose structure has been validated.
///
/// Every question is reachable from the root, every outcome is referenced by
/// at least one option, and every option target exists. Share it between
/// sessions with `Arc<GraphStore>`.
#[derive(Debug, Clone)]
pub struct GraphStore {
    name: String,
    description: String,
    root_id: String,
    questions: HashMap<String, QuestionNode>,
    outcomes: HashMap<String, OutcomeNode>,
}

impl GraphStore {
    /// Validate a definition and take ownership of it.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidGraph`] listing every issue found.
    pub fn new(definition: GraphDefinition) -> GraphResult<Self> {
        let issues = validate(&definition);
        if !issues.is_empty() {
            warn!(
                name = %definition.name,
                issue_count = issues.len(),
                "Rejected decision graph"
            );
            return Err(GraphError::InvalidGraph { issues });
        }

        debug!(
            name = %definition.name,
            root_id = %definition.root_id,
            questions = definition.questions.len(),
            outcomes = definition.outcomes.len(),
            "Decision graph loaded"
        );

        let GraphDefinition {
            name,
            description,
            root_id,
            questions,
            outcomes,
        } = definition;

        Ok(Self {
            name,
            description,
            root_id,
            questions,
            outcomes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn lookup_question(&self, id: &str) -> Option<&QuestionNode> {
        self.questions.get(id)
    }

    pub fn lookup_outcome(&self, id: &str) -> Option<&OutcomeNode> {
        self.outcomes.get(id)
    }

    /// Resolve an option target to the node it names.
    pub fn resolve_target(&self, id: &str) -> Option<Target<'_>> {
        if let Some(question) = self.questions.get(id) {
            return Some(Target::Question(question));
        }
        self.outcomes.get(id).map(Target::Outcome)
    }

    /// Number of questions; an upper bound on the steps of any session.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn outcome_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn questions(&self) -> impl Iterator<Item = &QuestionNode> {
        self.questions.values()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &OutcomeNode> {
        self.outcomes.values()
    }

    /// Rebuild the serializable definition, e.g. to refresh a cache file.
    pub fn to_definition(&self) -> GraphDefinition {
        GraphDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            root_id: self.root_id.clone(),
            questions: self.questions.clone(),
            outcomes: self.outcomes.clone(),
        }
    }
}

/// Collect every structural issue of a definition, sorted.
fn validate(def: &GraphDefinition) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    if !def.questions.contains_key(&def.root_id) {
        issues.push(GraphIssue::MissingRoot {
            root_id: def.root_id.clone(),
        });
    }

    for (key, question) in &def.questions {
        if question.id != *key {
            issues.push(GraphIssue::QuestionIdMismatch {
                key: key.clone(),
                id: question.id.clone(),
            });
        }
        if def.outcomes.contains_key(key) {
            issues.push(GraphIssue::AmbiguousId { id: key.clone() });
        }
    }

    for (key, outcome) in &def.outcomes {
        if outcome.id != *key {
            issues.push(GraphIssue::OutcomeIdMismatch {
                key: key.clone(),
                id: outcome.id.clone(),
            });
        }
    }

    // Option-level checks, collecting the outcomes that are referenced.
    let mut referenced_outcomes: HashSet<&str> = HashSet::new();
    for (key, question) in &def.questions {
        if question.options.is_empty() {
            issues.push(GraphIssue::NoOptions {
                node_id: key.clone(),
            });
        }

        let mut seen_values: HashSet<&str> = HashSet::new();
        for option in &question.options {
            if !seen_values.insert(option.value.as_str()) {
                issues.push(GraphIssue::DuplicateOptionValue {
                    node_id: key.clone(),
                    value: option.value.clone(),
                });
            }

            match option.target.as_deref() {
                None => issues.push(GraphIssue::MissingTarget {
                    node_id: key.clone(),
                    value: option.value.clone(),
                }),
                Some(target) if def.outcomes.contains_key(target) => {
                    referenced_outcomes.insert(target);
                }
                Some(target) if def.questions.contains_key(target) => {}
                Some(target) => issues.push(GraphIssue::DanglingTarget {
                    node_id: key.clone(),
                    value: option.value.clone(),
                    target: target.to_string(),
                }),
            }
        }
    }

    // Breadth-first reachability over question-to-question edges.
    let mut reachable: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    if def.questions.contains_key(&def.root_id) {
        queue.push_back(def.root_id.as_str());
    }
    while let Some(id) = queue.pop_front() {
        if !reachable.insert(id) {
            continue;
        }
        let Some(question) = def.questions.get(id) else {
            continue;
        };
        for target in question.options.iter().filter_map(|o| o.target.as_deref()) {
            if def.questions.contains_key(target) && !reachable.contains(target) {
                queue.push_back(target);
            }
        }
    }

    for key in def.questions.keys() {
        if !reachable.contains(key.as_str()) {
            issues.push(GraphIssue::UnreachableQuestion {
                node_id: key.clone(),
            });
        }
    }

    for key in def.outcomes.keys() {
        if !referenced_outcomes.contains(key.as_str()) {
            issues.push(GraphIssue::OrphanedOutcome {
                outcome_id: key.clone(),
            });
        }
    }

    issues.sort();
    issues
}
