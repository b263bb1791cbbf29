use tracing::debug;

use crate::config::Config;
use crate::error::ConfigError;

/// Environment variable name for providing the standings API token
pub const ENV_TOKEN_VAR: &str = "TABLE_TIPPER_API_TOKEN";

/// Check for an API token in the TABLE_TIPPER_API_TOKEN environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env() -> Option<String> {
    non_empty(std::env::var(ENV_TOKEN_VAR).ok())
}

/// Resolve the API token for this run: environment first, then config.
pub fn resolve_token(config: &Config) -> Result<String, ConfigError> {
    choose_token(get_token_from_env(), config.api_token.clone())
}

fn choose_token(env: Option<String>, configured: Option<String>) -> Result<String, ConfigError> {
    if let Some(token) = non_empty(env) {
        debug!("using API token from {}", ENV_TOKEN_VAR);
        return Ok(token);
    }
    if let Some(token) = non_empty(configured) {
        debug!("using API token from config file");
        return Ok(token);
    }
    Err(ConfigError::MissingCredential {
        env_var: ENV_TOKEN_VAR,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
