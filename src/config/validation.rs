use std::collections::HashSet;

use super::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.league.trim().is_empty() {
        errors.push("league: must not be empty".to_string());
    }

    if config.total_teams == 0 {
        errors.push("total_teams: must be at least 1".to_string());
    }

    if config.rank_column.trim().is_empty() {
        errors.push("rank_column: must not be empty".to_string());
    }

    if config.api_base_url.trim().is_empty() {
        errors.push("api_base_url: must not be empty".to_string());
    }

    if let Err(e) = config.request_timeout() {
        errors.push(e.to_string());
    }

    if config.auto_refresh_interval == 0 {
        errors.push("auto_refresh_interval: must be at least 1 second".to_string());
    }

    let mut seen = HashSet::new();
    for (i, participant) in config.participants.iter().enumerate() {
        if participant.name.trim().is_empty() {
            errors.push(format!("participants[{}].name: must not be empty", i));
        } else if !seen.insert(participant.name.as_str()) {
            errors.push(format!(
                "participants[{}].name: '{}' listed more than once",
                i, participant.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
