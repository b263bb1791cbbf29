mod schema;
pub mod validation;

pub use schema::{Config, HistoryConfig, ParticipantConfig, ThemeSetting};
pub use validation::validate_config;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Get the config directory path (~/.config/table-tipper/)
pub fn get_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("table-tipper")
}

/// Get the default config file path (~/.config/table-tipper/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/table-tipper/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        return Err(ConfigError::NotFound(config_path));
    }

    let config_content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;

    let mut config: Config =
        serde_saphyr::from_str(&config_content).map_err(|e| ConfigError::Parse {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

    config.base_dir = config_path.parent().map(Path::to_path_buf);

    Ok(config)
}

/// Expand a leading "~/" and resolve relative paths against `base_dir`
fn resolve_path(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

impl Config {
    pub fn predictions_path(&self) -> PathBuf {
        resolve_path(&self.predictions, self.base_dir.as_deref())
    }

    pub fn history_path(&self) -> PathBuf {
        match &self.history.path {
            Some(path) => resolve_path(path, self.base_dir.as_deref()),
            None => crate::history::get_history_path(),
        }
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            ConfigError::Invalid(format!(
                "request_timeout: invalid duration '{}' - {}",
                self.request_timeout, e
            ))
        })
    }

    pub fn icon_for(&self, participant: &str) -> Option<String> {
        self.participants
            .iter()
            .find(|p| p.name == participant)
            .and_then(|p| p.icon.clone())
    }
}
