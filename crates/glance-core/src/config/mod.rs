//! # Configuration System
//!
//! Hierarchical TOML configuration system for glance.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.glance/config.toml` (global user preferences)
//! 3. **Project config** - `./.glance/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.glance/config.toml
//! [service]
//! base_url = "https://telemetry.example.edu/realtime"
//!
//! [watch]
//! poll_interval_secs = 5
//!
//! [games]
//! default = "LAKELAND"
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use glance_core::config::GlanceConfig;
//!
//! // Handle config errors explicitly - don't silently fall back to defaults
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GlanceConfig::load_hierarchy()?;
//!     let interval = config.watch.poll_interval();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use types::{GamesConfig, GlanceConfig, ServiceConfig, WatchConfig};
pub use validation::validate_config;

// Convenience delegation for GlanceConfig methods
impl GlanceConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, Box<dyn std::error::Error>> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
