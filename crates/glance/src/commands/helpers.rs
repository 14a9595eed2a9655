use clap::ArgMatches;
use serde_json::Value;
use tracing::warn;

use glance_core::{GlanceConfig, TelemetryClient};

/// Load the config hierarchy, falling back to defaults with a warning.
///
/// A broken config file should not make read-only commands unusable, so
/// the error is surfaced once on stderr and the defaults are used.
pub(crate) fn load_config_with_warning() -> GlanceConfig {
    match GlanceConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            warn!(event = "cli.config_load_failed", error = %e);
            eprintln!("Warning: failed to load config ({}), using defaults", e);
            GlanceConfig::default()
        }
    }
}

pub(crate) fn build_client(
    config: &GlanceConfig,
) -> Result<TelemetryClient, Box<dyn std::error::Error>> {
    Ok(TelemetryClient::new(&config.service)?)
}

/// Runtime for the async client calls; command handlers stay synchronous.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

/// Game id from `--game`, falling back to the configured default.
///
/// An id outside `games.available` is allowed (the config list may lag the
/// service) but gets a warning.
pub(crate) fn resolve_game(matches: &ArgMatches, config: &GlanceConfig) -> String {
    let game = matches
        .get_one::<String>("game")
        .cloned()
        .unwrap_or_else(|| config.games.default.clone());
    if !config.games.available.is_empty() && !config.games.available.contains(&game) {
        warn!(
            event = "cli.unknown_game",
            game = game,
            "game is not in the configured games.available list"
        );
    }
    game
}

/// Parse a `--only a,b,c` filter into a name list.
pub(crate) fn parse_only_list(matches: &ArgMatches) -> Option<Vec<String>> {
    matches.get_one::<String>("only").map(|raw| {
        raw.split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    })
}

/// Render a JSON value for line output, without quoting plain strings.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_cli;

    #[test]
    fn test_resolve_game_prefers_flag() {
        let matches = build_cli()
            .try_get_matches_from(vec!["glance", "sessions", "--game", "WAVES"])
            .unwrap();
        let sub = matches.subcommand_matches("sessions").unwrap();
        let config = GlanceConfig::default();
        assert_eq!(resolve_game(sub, &config), "WAVES");
    }

    #[test]
    fn test_resolve_game_falls_back_to_config() {
        let matches = build_cli()
            .try_get_matches_from(vec!["glance", "sessions"])
            .unwrap();
        let sub = matches.subcommand_matches("sessions").unwrap();
        let config = GlanceConfig::default();
        assert_eq!(resolve_game(sub, &config), config.games.default);
    }

    #[test]
    fn test_parse_only_list() {
        let matches = build_cli()
            .try_get_matches_from(vec![
                "glance",
                "predictions",
                "17",
                "--only",
                "completion_chance, next_level,,",
            ])
            .unwrap();
        let sub = matches.subcommand_matches("predictions").unwrap();
        assert_eq!(
            parse_only_list(sub),
            Some(vec![
                "completion_chance".to_string(),
                "next_level".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_only_list_absent() {
        let matches = build_cli()
            .try_get_matches_from(vec!["glance", "predictions", "17"])
            .unwrap();
        let sub = matches.subcommand_matches("predictions").unwrap();
        assert_eq!(parse_only_list(sub), None);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&serde_json::json!("ready")), "ready");
        assert_eq!(render_value(&serde_json::json!(0.82)), "0.82");
        assert_eq!(render_value(&serde_json::json!(null)), "null");
    }
}
