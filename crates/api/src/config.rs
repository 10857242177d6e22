use std::path::{Path, PathBuf};

use serde::Deserialize;

use saltwatch_core::{CoreError, ThresholdTable};

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Periodic level-check interval in seconds (default: `300`).
    pub check_interval_secs: u64,
    /// Path of the monitor configuration file (default: `saltwatch.json`).
    pub monitor_config_path: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `HOST`                 | `0.0.0.0`        |
    /// | `PORT`                 | `3000`           |
    /// | `REQUEST_TIMEOUT_SECS` | `30`             |
    /// | `CHECK_INTERVAL_SECS`  | `300`            |
    /// | `SALTWATCH_CONFIG`     | `saltwatch.json` |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let check_interval_secs: u64 = std::env::var("CHECK_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("CHECK_INTERVAL_SECS must be a valid u64");

        let monitor_config_path =
            PathBuf::from(std::env::var("SALTWATCH_CONFIG").unwrap_or_else(|_| "saltwatch.json".into()));

        Self {
            host,
            port,
            request_timeout_secs,
            check_interval_secs,
            monitor_config_path,
        }
    }
}

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Error type for monitor configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read monitor config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for a monitor config.
    #[error("invalid monitor config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but fails a domain rule.
    #[error(transparent)]
    Invalid(#[from] CoreError),
}

/// Monitor configuration: recipient, thresholds, and data file locations.
///
/// Loaded once at startup from the JSON file named by `SALTWATCH_CONFIG`:
///
/// ```json
/// {
///     "emailrcpt": "ops@example.com",
///     "thresholds": { "10": "Critical", "25": "Warning", "1000": "Normal" },
///     "state_path": "/var/lib/saltwatch/state.json",
///     "log_path": "/var/lib/saltwatch/measurements.log"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Recipient address for alarm and all-clear mail.
    #[serde(rename = "emailrcpt")]
    pub email_recipient: String,
    /// Threshold table keyed by upper bound.
    pub thresholds: ThresholdTable,
    /// Path of the JSON scale-state file.
    pub state_path: PathBuf,
    /// Path of the append-only measurement log.
    pub log_path: PathBuf,
}

impl MonitorConfig {
    /// Read and validate the monitor configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MonitorConfig = serde_json::from_slice(&bytes)?;

        if config.email_recipient.trim().is_empty() {
            return Err(CoreError::Validation("emailrcpt must not be empty".to_string()).into());
        }

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
