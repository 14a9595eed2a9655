//! Configuration type definitions for the glance client.
//!
//! This module contains all configuration struct definitions used throughout
//! glance. These types are serialized/deserialized from TOML config files.
//!
//! # Example Configuration
//!
//! ```toml
//! [service]
//! base_url = "https://telemetry.example.edu/realtime"
//! timeout_secs = 10
//!
//! [watch]
//! poll_interval_secs = 5
//! require_player_id = true
//!
//! [games]
//! default = "LAKELAND"
//! ```

use serde::{Deserialize, Serialize};

/// Main configuration loaded from TOML config files.
///
/// This is the primary configuration structure that gets loaded from:
/// 1. User config: `~/.glance/config.toml`
/// 2. Project config: `./.glance/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlanceConfig {
    /// Telemetry service endpoint settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Polling behavior for watch mode
    #[serde(default)]
    pub watch: WatchConfig,

    /// Game identifiers known to the service
    #[serde(default)]
    pub games: GamesConfig,
}

/// Telemetry service endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Endpoint that accepts the form-encoded `method=...` POST calls.
    #[serde(default = "super::defaults::default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    /// Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Polling configuration for watch mode.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WatchConfig {
    /// Interval in seconds between session polls.
    /// Default: 5 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll_interval_secs: Option<u64>,

    /// Whether the service should filter out sessions without a valid
    /// player id.
    #[serde(default)]
    pub require_player_id: bool,
}

/// Game scope configuration.
///
/// The service keys every call by a game identifier; `default` is used when
/// no `--game` flag is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesConfig {
    /// Game to query when none is specified.
    #[serde(default = "super::defaults::default_game")]
    pub default: String,

    /// Games the service is known to track. An empty list disables the
    /// membership check on `default`.
    #[serde(default = "super::defaults::default_available_games")]
    pub available: Vec<String>,
}
