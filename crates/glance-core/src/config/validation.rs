//! Configuration validation.
//!
//! Validation runs once after the config hierarchy is merged, so every
//! consumer can assume a loaded [`GlanceConfig`] is internally consistent.

use crate::config::types::GlanceConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the service URL does not parse, a zero
/// interval/timeout is configured, or the default game is not one of the
/// available games.
pub fn validate_config(config: &GlanceConfig) -> Result<(), ConfigError> {
    let base_url = config.service.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "service.base_url cannot be empty".to_string(),
        });
    }
    if let Err(e) = reqwest::Url::parse(base_url) {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("service.base_url '{}' is not a valid URL: {}", base_url, e),
        });
    }

    if config.service.timeout_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "service.timeout_secs must be greater than 0".to_string(),
        });
    }

    if config.watch.poll_interval_secs == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "watch.poll_interval_secs must be greater than 0".to_string(),
        });
    }

    let game = config.games.default.trim();
    if game.is_empty() {
        return Err(ConfigError::InvalidConfiguration {
            message: "games.default cannot be empty".to_string(),
        });
    }
    if !config.games.available.is_empty()
        && !config.games.available.iter().any(|g| g == game)
    {
        return Err(ConfigError::InvalidGame {
            game: game.to_string(),
        });
    }

    Ok(())
}
