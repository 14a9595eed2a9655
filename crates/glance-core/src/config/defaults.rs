//! Default implementations for configuration types.
//!
//! This module contains all `Default` implementations and helper functions
//! for providing default values in serde deserialization.

use crate::config::types::{GamesConfig, ServiceConfig, WatchConfig};
use std::time::Duration;

/// Returns the default service endpoint.
///
/// Points at a locally hosted service instance; deployments override this
/// in their config file.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_base_url() -> String {
    "http://127.0.0.1:8080/realtime".to_string()
}

/// Returns the default game identifier.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_game() -> String {
    "CRYSTAL".to_string()
}

/// Returns the games the telemetry service is known to track.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_available_games() -> Vec<String> {
    ["CRYSTAL", "WAVES", "LAKELAND", "JOWILDER"]
        .map(String::from)
        .to_vec()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            default: default_game(),
            available: default_available_games(),
        }
    }
}

impl ServiceConfig {
    /// Returns the request timeout in seconds, defaulting to 30.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(30)
    }
}

impl WatchConfig {
    /// Returns the poll interval in seconds, defaulting to 5.
    pub fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs.unwrap_or(5)
    }

    /// Returns the poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs())
    }
}
