//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Workflow policy configuration.
    pub workflow: WorkflowConfig,
    /// Logging configuration.
    pub log: LogConfig,
}

/// Who may move an accepted report to closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosePolicy {
    /// Only workspace reviewers may close.
    #[default]
    ReviewerOnly,
    /// Reviewers and the report owner may close.
    ReviewerOrOwner,
}

/// Workflow policy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Who may perform the `close` transition.
    pub close_policy: ClosePolicy,
    /// How long reviewers keep seeing closed and withdrawn reports, in days.
    ///
    /// `None` keeps them visible indefinitely.
    pub reviewer_history_days: Option<u32>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "outlay=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("OUTLAY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
