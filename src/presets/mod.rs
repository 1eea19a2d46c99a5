//! Built-in checklist graphs.
//!
//! These are used when no graph file is configured and no cached copy is
//! available, and as ready-made fixtures for the CLI.

mod builtins;

pub use builtins::{trend_pullback_checklist, BUILTIN_NAMES, TREND_PULLBACK};

use crate::error::{SourceError, SourceResult};
use crate::graph::GraphDefinition;

/// Look up a built-in checklist by name.
pub fn builtin(name: &str) -> SourceResult<GraphDefinition> {
    match name {
        TREND_PULLBACK => Ok(trend_pullback_checklist()),
        _ => Err(SourceError::UnknownBuiltin {
            name: name.to_string(),
        }),
    }
}

/// The checklist used when nothing else is configured.
pub fn default_checklist() -> GraphDefinition {
    trend_pullback_checklist()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphStore, Verdict};

    #[test]
    fn test_every_builtin_is_a_valid_graph() {
        for name in BUILTIN_NAMES {
            let def = builtin(name).unwrap();
            if let Err(e) = GraphStore::new(def) {
                panic!("built-in {} is invalid: {}", name, e);
            }
        }
    }

    #[test]
    fn test_unknown_builtin() {
        let err = builtin("scalping").unwrap_err();
        assert!(matches!(err, SourceError::UnknownBuiltin { .. }));
    }

    #[test]
    fn test_default_covers_every_verdict() {
        let store = GraphStore::new(default_checklist()).unwrap();
        for verdict in [Verdict::Go, Verdict::Caution, Verdict::NoGo] {
            assert!(
                store.outcomes().any(|o| o.verdict == verdict),
                "missing {} outcome",
                verdict
            );
        }
    }

    #[test]
    fn test_go_outcome_carries_execution_plan() {
        let store = GraphStore::new(default_checklist()).unwrap();
        for outcome in store.outcomes() {
            assert!(
                !outcome.suggestions.is_empty() || outcome.execution_plan.is_some(),
                "outcome {} has neither suggestions nor execution plan",
                outcome.id
            );
        }
    }

    #[test]
    fn test_root_asks_for_direction() {
        let def = default_checklist();
        let root = &def.questions[&def.root_id];
        let values: Vec<&str> = root.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["long", "short"]);
    }
}
