//! # Trade Checklist
//!
//! A decision-tree engine for pre-trade checklists: a validated graph of
//! questions and verdicts, and undoable navigation sessions over it.
//!
//! ## Features
//!
//! - **Graph validation**: reachability, dangling targets and orphaned
//!   outcomes are rejected once, at construction
//! - **Navigation sessions**: select, step back, reset and progress
//!   estimation with synchronous change notification
//! - **Session recording**: package resolved runs for a history store
//! - **Verdict relay**: lock state and messages for browser-extension hosts
//! - **Graph loading**: primary file, cached copy, then built-in checklist
//!
//! ## Architecture
//!
//! ```text
//! GraphLoader → GraphStore (Arc) → NavigationSession → listeners
//!                                        ↓
//!                       CompletedSession → SessionRecorder
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use trade_checklist::graph::GraphStore;
//! use trade_checklist::presets::default_checklist;
//! use trade_checklist::session::NavigationSession;
//!
//! let store = Arc::new(GraphStore::new(default_checklist()).unwrap());
//! let mut session = NavigationSession::new(store);
//! let _subscription = session.subscribe(|state| println!("step {}", state.current_step));
//!
//! session.select_option("long");
//! assert_eq!(session.current_node_id(), "pre_trade_context");
//! session.go_back();
//! assert_eq!(session.current_node_id(), "trade_direction");
//! ```

/// Command-line interface.
pub mod cli;
/// Configuration loaded from the environment.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Decision graph model and validated store.
pub mod graph;
/// Built-in checklist graphs.
pub mod presets;
/// Completed-session recording.
pub mod recorder;
/// Verdict relay for browser-extension hosts.
pub mod relay;
/// Navigation sessions.
pub mod session;
/// Graph definition loading.
pub mod source;

pub use config::Config;
pub use error::{AppError, AppResult, GraphError, GraphIssue};
pub use graph::{GraphDefinition, GraphStore, Verdict};
pub use session::{NavigationSession, SessionState, Subscription};
