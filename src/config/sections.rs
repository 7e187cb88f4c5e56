//! Configuration sections: logging, page view, data layer

use crate::trigger::PageViewOptions;
use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines (default)
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse format string from config
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text, // Default to text for unknown values
        }
    }

    /// Convert to string for TOML serialization
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Output format for hosts that let the tracker install logging
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Logging settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileLogging {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl LoggingConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file.level.unwrap_or(defaults.level),
            format: file
                .format
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page View Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Page-view trigger configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageViewConfig {
    /// Re-fire page-view when the page becomes visible again (opt-in)
    pub refire_on_visibility: bool,
}

/// Page-view settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilePageView {
    pub refire_on_visibility: Option<bool>,
}

impl PageViewConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FilePageView>) -> Self {
        let file = file.unwrap_or_default();

        Self {
            refire_on_visibility: file.refire_on_visibility.unwrap_or(false),
        }
    }

    /// Trigger options for this configuration
    pub fn options(&self) -> PageViewOptions {
        PageViewOptions {
            refire_on_visibility: self.refire_on_visibility,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Data Layer Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Data-layer sink configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DataLayerConfig {
    /// Flush custom parameters against earlier pushes (default: true)
    pub flush: bool,
    /// Flush against at most this many earlier payloads; `None` flushes
    /// against every key ever pushed, keeping only the keys
    pub history_limit: Option<usize>,
}

impl Default for DataLayerConfig {
    fn default() -> Self {
        Self {
            flush: true,
            history_limit: None,
        }
    }
}

/// Data-layer settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileDataLayer {
    pub flush: Option<bool>,
    pub history_limit: Option<usize>,
}

impl DataLayerConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileDataLayer>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            flush: file.flush.unwrap_or(defaults.flush),
            history_limit: file.history_limit.or(defaults.history_limit),
        }
    }
}
