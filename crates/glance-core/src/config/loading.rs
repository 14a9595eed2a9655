//! Configuration loading and merging logic.
//!
//! This module handles loading configuration from files and merging
//! configurations from different sources (user config, project config).
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.glance/config.toml` (global user preferences)
//! 3. **Project config** - `./.glance/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)

use crate::config::types::{GamesConfig, GlanceConfig, ServiceConfig, WatchConfig};
use crate::config::validation::validate_config;
use std::fs;
use std::path::PathBuf;

/// Check if an error is a "file not found" error.
fn is_file_not_found(e: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
        return io_err.kind() == std::io::ErrorKind::NotFound;
    }

    let err_str = e.to_string();
    err_str.contains("No such file or directory") || err_str.contains("cannot find the path")
}

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.glance/config.toml`)
/// 3. Project config (`./.glance/config.toml`)
///
/// # Errors
///
/// Returns an error if validation fails. Missing config files are not errors.
pub fn load_hierarchy() -> Result<GlanceConfig, Box<dyn std::error::Error>> {
    let mut config = GlanceConfig::default();

    // Load user config (file not found is expected, parse errors fail)
    match load_user_config() {
        Ok(user_config) => config = merge_configs(config, user_config),
        Err(e) if !is_file_not_found(e.as_ref()) => return Err(e),
        Err(_) => {} // File not found - continue with defaults
    }

    // Load project config (file not found is expected, parse errors fail)
    match load_project_config() {
        Ok(project_config) => config = merge_configs(config, project_config),
        Err(e) if !is_file_not_found(e.as_ref()) => return Err(e),
        Err(_) => {} // File not found - continue with merged config
    }

    // Validate the final configuration
    validate_config(&config)?;

    Ok(config)
}

/// Load the user configuration from ~/.glance/config.toml.
fn load_user_config() -> Result<GlanceConfig, Box<dyn std::error::Error>> {
    let home_dir = dirs::home_dir().ok_or("Could not find home directory")?;
    let config_path = home_dir.join(".glance").join("config.toml");
    load_config_file(&config_path)
}

/// Load the project configuration from ./.glance/config.toml.
fn load_project_config() -> Result<GlanceConfig, Box<dyn std::error::Error>> {
    let config_path = std::env::current_dir()?.join(".glance").join("config.toml");
    load_config_file(&config_path)
}

/// Load a configuration file from the given path.
fn load_config_file(path: &PathBuf) -> Result<GlanceConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;
    let config: GlanceConfig = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
    Ok(config)
}

/// Merge two configurations, with override_config taking precedence.
///
/// Optional fields replace base values only when present. For `base_url`,
/// `games.default` and `games.available` we cannot distinguish an explicit
/// value from the serde default, so the override config always wins.
pub fn merge_configs(base: GlanceConfig, override_config: GlanceConfig) -> GlanceConfig {
    GlanceConfig {
        service: ServiceConfig {
            base_url: override_config.service.base_url,
            timeout_secs: override_config
                .service
                .timeout_secs
                .or(base.service.timeout_secs),
        },
        watch: WatchConfig {
            poll_interval_secs: override_config
                .watch
                .poll_interval_secs
                .or(base.watch.poll_interval_secs),
            require_player_id: override_config.watch.require_player_id
                || base.watch.require_player_id,
        },
        games: GamesConfig {
            default: override_config.games.default,
            available: override_config.games.available,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_override_service() {
        let base: GlanceConfig = toml::from_str(
            r#"
[service]
base_url = "http://user.example/realtime"
timeout_secs = 10
"#,
        )
        .unwrap();
        let override_config: GlanceConfig = toml::from_str(
            r#"
[service]
base_url = "http://project.example/realtime"
"#,
        )
        .unwrap();

        let merged = merge_configs(base, override_config);
        assert_eq!(merged.service.base_url, "http://project.example/realtime");
        // Optional field falls back to the base value
        assert_eq!(merged.service.timeout_secs, Some(10));
    }

    #[test]
    fn test_merge_watch_options() {
        let base: GlanceConfig = toml::from_str(
            r#"
[watch]
poll_interval_secs = 15
"#,
        )
        .unwrap();
        let override_config: GlanceConfig = toml::from_str(
            r#"
[watch]
require_player_id = true
"#,
        )
        .unwrap();

        let merged = merge_configs(base, override_config);
        assert_eq!(merged.watch.poll_interval_secs(), 15);
        assert!(merged.watch.require_player_id);
    }

    #[test]
    fn test_config_hierarchy_integration() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let user_config_dir = temp_dir.path().join("user");
        let project_config_dir = temp_dir.path().join("project");

        fs::create_dir_all(&user_config_dir).unwrap();
        fs::create_dir_all(project_config_dir.join(".glance")).unwrap();

        let user_config_content = r#"
[service]
base_url = "https://telemetry.example.edu/realtime"
timeout_secs = 20

[games]
default = "WAVES"
"#;
        fs::write(user_config_dir.join("config.toml"), user_config_content).unwrap();

        let project_config_content = r#"
[games]
default = "LAKELAND"

[watch]
poll_interval_secs = 2
"#;
        fs::write(
            project_config_dir.join(".glance").join("config.toml"),
            project_config_content,
        )
        .unwrap();

        let user_config = load_config_file(&user_config_dir.join("config.toml")).unwrap();
        assert_eq!(user_config.games.default, "WAVES");
        assert_eq!(
            user_config.service.base_url,
            "https://telemetry.example.edu/realtime"
        );

        let project_config =
            load_config_file(&project_config_dir.join(".glance").join("config.toml")).unwrap();
        assert_eq!(project_config.games.default, "LAKELAND");

        let merged = merge_configs(user_config, project_config);
        assert_eq!(merged.games.default, "LAKELAND"); // Overridden by project
        assert_eq!(merged.service.timeout_secs, Some(20)); // From user
        assert_eq!(merged.watch.poll_interval_secs(), 2); // From project
    }

    #[test]
    fn test_toml_parsing_edge_cases() {
        // Empty config falls back to defaults everywhere
        let empty_config: GlanceConfig = toml::from_str("").unwrap();
        assert_eq!(empty_config.games.default, "CRYSTAL");

        // Partial config keeps defaults for the missing sections
        let partial_config: GlanceConfig = toml::from_str(
            r#"
[watch]
poll_interval_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(partial_config.games.default, "CRYSTAL");
        assert_eq!(partial_config.watch.poll_interval_secs(), 30);

        // Invalid TOML should fail
        let invalid_result: Result<GlanceConfig, _> = toml::from_str("invalid toml [[[");
        assert!(invalid_result.is_err());
    }
}
