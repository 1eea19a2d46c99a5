//! Command-line driver for checklist graphs.
//!
//! The CLI validates graph files, walks a session along a list of option
//! values and manages the local history of completed runs.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{debug, error};

use crate::config::Config;
use crate::graph::{GraphStore, OutcomeNode, Verdict};
use crate::recorder::{record_if_resolved, JsonFileRecorder, SessionRecorder};
use crate::relay::{LockState, RelayMessage};
use crate::session::{NavigationSession, SessionPhase, SessionState};
use crate::source::{load_store, GraphLoader, GraphOrigin};

/// Walk token that undoes the previous answer.
pub const BACK_TOKEN: &str = ":back";
/// Walk token that resets the session to the root.
pub const RESET_TOKEN: &str = ":reset";

const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════\n";

/// Pre-trade checklist engine.
#[derive(Parser, Debug)]
#[command(name = "trade-checklist", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Checklist subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate a decision graph and print a summary
    Validate {
        /// Graph file; defaults to the configured source chain
        #[arg(long)]
        graph: Option<PathBuf>,
    },

    /// Answer questions by option value and show where the checklist ends up
    Walk {
        /// Option values in order; `:back` undoes, `:reset` restarts
        #[arg(required = true)]
        values: Vec<String>,

        /// Graph file; defaults to the configured source chain
        #[arg(long)]
        graph: Option<PathBuf>,

        /// Append the run to the history file if it resolves
        #[arg(long)]
        record: bool,

        /// Instrument the check is for
        #[arg(long)]
        pair: Option<String>,
    },

    /// Show completed runs, newest first
    History {
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Delete all completed runs
    ClearHistory,
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

/// Execute a CLI command.
pub fn execute_command(command: Commands, config: &Config) -> CliResult {
    match command {
        Commands::Validate { graph } => execute_validate(graph, config),
        Commands::Walk {
            values,
            graph,
            record,
            pair,
        } => execute_walk(&values, graph, record, pair.as_deref(), config),
        Commands::History { limit } => execute_history(limit, config),
        Commands::ClearHistory => execute_clear_history(config),
    }
}

/// An explicit `--graph` must load as-is; otherwise use the fallback chain.
fn open_graph(graph: Option<PathBuf>, config: &Config) -> Result<(GraphStore, GraphOrigin), String> {
    match graph {
        Some(path) => load_store(&path)
            .map(|store| (store, GraphOrigin::Primary))
            .map_err(|e| e.to_string()),
        None => GraphLoader::from_config(&config.graph)
            .load()
            .map(|loaded| (loaded.store, loaded.origin))
            .map_err(|e| e.to_string()),
    }
}

fn execute_validate(graph: Option<PathBuf>, config: &Config) -> CliResult {
    let target = graph.clone();
    match open_graph(graph, config) {
        Ok((store, origin)) => CliResult::success(format!(
            "✓ {} ({} source): {} question(s), {} outcome(s), root {}\n",
            display_name(&store),
            origin,
            store.question_count(),
            store.outcome_count(),
            store.root_id()
        )),
        Err(message) => {
            error!(graph = ?target, "Graph validation failed");
            CliResult::error(format!("✗ {}\n", message))
        }
    }
}

fn execute_walk(
    values: &[String],
    graph: Option<PathBuf>,
    record: bool,
    pair: Option<&str>,
    config: &Config,
) -> CliResult {
    let store = match open_graph(graph, config) {
        Ok((store, _)) => Arc::new(store),
        Err(message) => return CliResult::error(format!("✗ {}\n", message)),
    };

    let mut session = NavigationSession::new(store);
    let transcript = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&transcript);
    let subscription = session.subscribe(move |state| {
        sink.borrow_mut().push_str(&describe_step(state));
    });

    for value in values {
        let changed = match value.as_str() {
            BACK_TOKEN => session.go_back(),
            RESET_TOKEN => {
                session.reset();
                true
            }
            _ => session.select_option(value),
        };
        if !changed {
            debug!(value = %value, node_id = %session.current_node_id(), "Walk input ignored");
            transcript.borrow_mut().push_str(&format!(
                "  ! ignored {:?} at {}\n",
                value,
                session.current_node_id()
            ));
        }
    }
    subscription.unsubscribe();

    let state = session.snapshot();
    let mut output = String::new();
    output.push_str(&transcript.borrow());
    output.push('\n');
    output.push_str(RULE);

    match (&state.phase, &state.outcome, &state.current_question) {
        (SessionPhase::Resolved, Some(outcome), _) => output.push_str(&describe_outcome(outcome)),
        (_, _, Some(question)) => {
            output.push_str(&format!(
                "Unfinished at step {} ({}%): {}\n",
                state.current_step, state.progress, question.prompt
            ));
            for option in &question.options {
                output.push_str(&format!("  - {} → {}\n", option.value, option.label));
            }
        }
        _ => output.push_str("Session has no current question\n"),
    }

    let relay = RelayMessage::for_state(&state);
    output.push_str(&format!(
        "Lock: {:?}  Relay: {}\n",
        LockState::from_state(&state),
        serde_json::to_string(&relay).unwrap_or_default()
    ));

    if record {
        let mut recorder = JsonFileRecorder::new(&config.history.path, config.history.limit);
        match record_if_resolved(&mut recorder, &session, pair) {
            Ok(Some(id)) => output.push_str(&format!("Recorded session {}\n", id)),
            Ok(None) => output.push_str("Not recorded: no outcome reached\n"),
            Err(e) => return CliResult::error(format!("{}✗ {}\n", output, e)),
        }
    }

    CliResult::success(output)
}

fn execute_history(limit: usize, config: &Config) -> CliResult {
    let recorder = JsonFileRecorder::new(&config.history.path, config.history.limit);
    let sessions = match recorder.history() {
        Ok(sessions) => sessions,
        Err(e) => return CliResult::error(format!("✗ {}\n", e)),
    };

    let mut output = String::new();
    output.push_str("\nChecklist History\n");
    output.push_str(RULE);
    output.push('\n');

    if sessions.is_empty() {
        output.push_str("No completed checks recorded.\n");
        return CliResult::success(output);
    }

    output.push_str(&format!(
        "Showing {} of {} run(s):\n\n",
        sessions.len().min(limit),
        sessions.len()
    ));
    for session in sessions.iter().take(limit) {
        output.push_str(&format!(
            "{} | {} | {}\n",
            session.ended_at.format("%Y-%m-%d %H:%M:%S"),
            verdict_badge(&session.outcome),
            session.outcome.title
        ));
        output.push_str(&format!(
            "    Direction: {}  Pair: {}  Answers: {}  Took: {}s\n",
            session.trade_direction.as_deref().unwrap_or("-"),
            session.pair.as_deref().unwrap_or("-"),
            session.decisions.len(),
            session.duration().num_seconds()
        ));
    }

    CliResult::success(output)
}

fn execute_clear_history(config: &Config) -> CliResult {
    let mut recorder = JsonFileRecorder::new(&config.history.path, config.history.limit);
    match recorder.clear() {
        Ok(()) => CliResult::success(format!(
            "Cleared history at {}\n",
            config.history.path.display()
        )),
        Err(e) => CliResult::error(format!("✗ {}\n", e)),
    }
}

fn display_name(store: &GraphStore) -> &str {
    if store.name().is_empty() {
        "unnamed checklist"
    } else {
        store.name()
    }
}

fn verdict_badge(outcome: &OutcomeNode) -> &'static str {
    match outcome.verdict {
        Verdict::Go => "✓ GO",
        Verdict::Caution => "⚠ CAUTION",
        Verdict::NoGo => "✗ NO-GO",
    }
}

/// One transcript line per state change.
pub fn describe_step(state: &SessionState) -> String {
    match (&state.outcome, &state.current_question) {
        (Some(outcome), _) => format!(
            "[step {:>2} | done] {} {}\n",
            state.current_step - 1,
            verdict_badge(outcome),
            outcome.title
        ),
        (None, Some(question)) => format!(
            "[step {:>2} | {:>2}%] {}: {}\n",
            state.current_step, state.progress, question.category, question.prompt
        ),
        (None, None) => format!("[step {:>2}] {}\n", state.current_step, state.current_node_id),
    }
}

fn describe_outcome(outcome: &OutcomeNode) -> String {
    let mut out = format!("{} {}\n{}\n", verdict_badge(outcome), outcome.title, outcome.message);
    if let Some(plan) = &outcome.execution_plan {
        out.push_str(&format!("  Entry:       {}\n", plan.entry));
        out.push_str(&format!("  Stop loss:   {}\n", plan.stop_loss));
        out.push_str(&format!("  Take profit: {}\n", plan.take_profit));
        if let Some(notes) = &plan.notes {
            out.push_str(&format!("  Notes:       {}\n", notes));
        }
    }
    if !outcome.verdict.is_pass() {
        for suggestion in &outcome.suggestions {
            out.push_str(&format!("  • {}\n", suggestion));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GraphConfig, HistoryConfig, LoggingConfig};
    use crate::graph::fixtures::mini_definition;
    use crate::source::write_definition;
    use tempfile::{tempdir, TempDir};

    fn test_config(dir: &TempDir) -> Config {
        Config {
            logging: LoggingConfig::default(),
            graph: GraphConfig {
                path: None,
                cache_path: dir.path().join("cache.json"),
            },
            history: HistoryConfig {
                path: dir.path().join("history.json"),
                limit: 10,
            },
        }
    }

    fn mini_graph(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("mini.json");
        write_definition(&path, &mini_definition()).unwrap();
        path
    }

    fn walk(values: &[&str], graph: PathBuf, record: bool, config: &Config) -> CliResult {
        execute_command(
            Commands::Walk {
                values: values.iter().map(|v| v.to_string()).collect(),
                graph: Some(graph),
                record,
                pair: Some("ES".to_string()),
            },
            config,
        )
    }

    #[test]
    fn test_cli_parses_walk() {
        let cli = Cli::try_parse_from([
            "trade-checklist",
            "walk",
            "yes",
            ":back",
            "no",
            "--record",
            "--pair",
            "NQ",
        ])
        .unwrap();
        match cli.command {
            Commands::Walk {
                values,
                record,
                pair,
                graph,
            } => {
                assert_eq!(values, vec!["yes", ":back", "no"]);
                assert!(record);
                assert_eq!(pair.as_deref(), Some("NQ"));
                assert!(graph.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_validate_reports_summary() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        let result = execute_command(
            Commands::Validate {
                graph: Some(mini_graph(&dir)),
            },
            &config,
        );
        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("2 question(s), 2 outcome(s)"));
    }

    #[test]
    fn test_validate_reports_issues() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        let path = dir.path().join("bad.json");
        let mut def = mini_definition();
        def.questions.get_mut("q1").unwrap().options[0].target = Some("ghost".to_string());
        write_definition(&path, &def).unwrap();

        let result = execute_command(Commands::Validate { graph: Some(path) }, &config);
        assert_eq!(result.exit_code, 1);
        assert!(result.message.contains("ghost"));
    }

    #[test]
    fn test_walk_reaches_outcome_and_records() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        let result = walk(&["yes", "good"], mini_graph(&dir), true, &config);

        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("✓ GO All good"));
        assert!(result.message.contains(r#"{"type":"CHECK_PASSED"}"#));
        assert!(result.message.contains("Recorded session"));

        let history = execute_command(Commands::History { limit: 5 }, &config);
        assert!(history.message.contains("Showing 1 of 1 run(s)"));
        assert!(history.message.contains("Pair: ES"));
    }

    #[test]
    fn test_walk_reports_ignored_values_and_undo() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        let result = walk(&["yes", "maybe", ":back"], mini_graph(&dir), true, &config);

        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("ignored \"maybe\" at q2"));
        assert!(result.message.contains("Unfinished at step 1 (0%): First question?"));
        assert!(result.message.contains("Not recorded"));
        assert!(result.message.contains(r#"{"type":"CHECK_RESET"}"#));
    }

    #[test]
    fn test_clear_history() {
        let dir = tempdir().unwrap();
        let config = test_config(&dir);
        walk(&["no"], mini_graph(&dir), true, &config);

        let cleared = execute_command(Commands::ClearHistory, &config);
        assert_eq!(cleared.exit_code, 0);
        let history = execute_command(Commands::History { limit: 5 }, &config);
        assert!(history.message.contains("No completed checks recorded."));
    }
}
