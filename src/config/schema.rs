use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::predictions::DEFAULT_RANK_COLUMN;
use crate::standings::football_data::DEFAULT_BASE_URL;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// league: PL
/// predictions: predictions.csv
/// total_teams: 20
/// request_timeout: 10s
/// history:
///   enabled: true
/// participants:
///   - { name: Alice, icon: "🦊" }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Competition code as the standings API knows it (e.g. "PL")
    pub league: String,

    /// Predictions CSV. Relative paths resolve against the config file's directory.
    pub predictions: PathBuf,

    /// Header of the predicted-rank column
    #[serde(default = "default_rank_column")]
    pub rank_column: String,

    /// League size, also the midline for the half-table tier
    #[serde(default = "default_total_teams")]
    pub total_teams: u32,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Fallback when TABLE_TIPPER_API_TOKEN is not set
    #[serde(default)]
    pub api_token: Option<String>,

    /// humantime duration, e.g. "10s" or "1m 30s"
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,

    /// Dashboard auto-refresh, in seconds
    #[serde(default = "default_auto_refresh_interval")]
    pub auto_refresh_interval: u64,

    #[serde(default)]
    pub theme: ThemeSetting,

    #[serde(default)]
    pub history: HistoryConfig,

    /// Optional display metadata per participant
    #[serde(default)]
    pub participants: Vec<ParticipantConfig>,

    /// Directory of the loaded config file, for resolving relative paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSetting {
    #[default]
    Auto,
    Dark,
    Light,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    #[serde(default = "default_history_enabled")]
    pub enabled: bool,

    /// Defaults to ~/.config/table-tipper/history.json
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ParticipantConfig {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_rank_column() -> String {
    DEFAULT_RANK_COLUMN.to_string()
}

fn default_total_teams() -> u32 {
    20
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> String {
    "10s".to_string()
}

fn default_auto_refresh_interval() -> u64 {
    300
}

fn default_history_enabled() -> bool {
    true
}
