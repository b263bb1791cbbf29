use std::path::PathBuf;
use thiserror::Error;

/// Problems with the config file or credentials. Always fatal, reported
/// before any fetch happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("no API token: set {env_var} or api_token in the config file")]
    MissingCredential { env_var: &'static str },

    #[error("{0}")]
    Invalid(String),
}

/// A standings fetch that did not produce a usable table. Aborts the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("standings request failed with status {code}")]
    Status { code: u16 },

    #[error("standings request failed: {0}")]
    Transport(String),

    #[error("failed to decode standings response: {0}")]
    Decode(String),

    #[error("invalid standings: {0}")]
    InvalidStandings(String),
}

impl FetchError {
    /// 401 and 403 mean the token was rejected rather than the network failing.
    pub fn is_auth(&self) -> bool {
        matches!(self, FetchError::Status { code: 401 | 403 })
    }
}

/// Predictions CSV could not be loaded at all. Individual bad rows are
/// warnings, not errors.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("failed to read predictions from {}: {source}", path.display())]
    Read { path: PathBuf, source: csv::Error },

    #[error("predictions CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("predictions CSV has no '{0}' column")]
    MissingRankColumn(String),
}

/// History read or write failure. Best-effort: callers log it and carry on.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("history I/O at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("history file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported history version: {0}")]
    UnsupportedVersion(u32),
}

/// Anything that stops a scoring run from producing output
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Predictions(#[from] PredictionError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
