//! Configuration for hosts embedding the tracker
//!
//! Configuration is resolved in order of precedence:
//! 1. Environment variables (highest priority, see [`Config::with_env_overrides`])
//! 2. Config file (TOML)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

mod sections;

#[cfg(test)]
mod tests;

pub use sections::{
    DataLayerConfig, FileDataLayer, FileLogging, FilePageView, LogFormat, LoggingConfig,
    PageViewConfig,
};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding `[logging] level`
pub const LOG_LEVEL_ENV: &str = "SCOPE_TRACKER_LOG";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Tracker configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Page-view trigger behaviour
    pub page_view: PageViewConfig,

    /// Data-layer sink behaviour
    pub data_layer: DataLayerConfig,
}

/// Config file structure
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [page_view] section
    pub page_view: Option<FilePageView>,

    /// Optional [data_layer] section
    pub data_layer: Option<FileDataLayer>,
}

impl Config {
    /// Parse a TOML document, filling anything unset with defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: FileConfig =
            toml::from_str(contents).context("Failed to parse tracker configuration")?;
        Ok(Self::from_file(file))
    }

    /// Load a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config.with_env_overrides())
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.logging.level = level.trim().to_string();
            }
        }
        self
    }

    fn from_file(file: FileConfig) -> Self {
        Self {
            logging: LoggingConfig::from_file(file.logging),
            page_view: PageViewConfig::from_file(file.page_view),
            data_layer: DataLayerConfig::from_file(file.data_layer),
        }
    }

    /// Render the configuration as a commented TOML document
    ///
    /// Single source of truth for the file format; the output parses back
    /// into an equal `Config`.
    pub fn to_toml(&self) -> String {
        let history_limit = match self.data_layer.history_limit {
            Some(limit) => format!("history_limit = {}", limit),
            None => "# history_limit = 50  # Unset: remember every key pushed".to_string(),
        };

        format!(
            r#"# scope-tracker configuration (v{version})

[logging]
# Level for the scope_tracker target: trace, debug, info, warn, error
# Overridden by {env}; RUST_LOG overrides both when the host installs logging
level = "{level}"
# Output format: "text" or "json"
format = "{format}"

[page_view]
# Fire page-view again when the page becomes visible after being hidden
refire_on_visibility = {refire}

[data_layer]
# Reset custom parameters from earlier pushes on every push
flush = {flush}
{history_limit}
"#,
            version = VERSION,
            env = LOG_LEVEL_ENV,
            level = self.logging.level,
            format = self.logging.format.as_str(),
            refire = self.page_view.refire_on_visibility,
            flush = self.data_layer.flush,
            history_limit = history_limit,
        )
    }
}
