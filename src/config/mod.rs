use std::env;
use std::path::PathBuf;

use crate::error::AppError;
use crate::recorder::DEFAULT_HISTORY_LIMIT;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub graph: GraphConfig,
    pub history: HistoryConfig,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, PartialEq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Where the decision graph is loaded from
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Graph file to load. When unset, the cached graph is used if present,
    /// else the built-in checklist.
    pub path: Option<PathBuf>,
    /// Last successfully loaded graph, used when `path` is unreadable.
    pub cache_path: PathBuf,
}

/// Completed-session history configuration
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub path: PathBuf,
    pub limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        };

        let graph = GraphConfig {
            path: env::var("CHECKLIST_GRAPH_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            cache_path: PathBuf::from(
                env::var("CHECKLIST_CACHE_PATH")
                    .unwrap_or_else(|_| "./data/graph-cache.json".to_string()),
            ),
        };

        let history = HistoryConfig {
            path: PathBuf::from(
                env::var("CHECKLIST_HISTORY_PATH")
                    .unwrap_or_else(|_| "./data/history.json".to_string()),
            ),
            limit: match env::var("CHECKLIST_HISTORY_LIMIT") {
                Ok(raw) => parse_history_limit(&raw)?,
                Err(_) => DEFAULT_HISTORY_LIMIT,
            },
        };

        Ok(Config {
            logging,
            graph,
            history,
        })
    }
}

fn parse_history_limit(raw: &str) -> Result<usize, AppError> {
    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::Config {
            message: format!("CHECKLIST_HISTORY_LIMIT must be a positive integer, got {raw:?}"),
        }),
        Ok(limit) => Ok(limit),
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/history.json"),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}
