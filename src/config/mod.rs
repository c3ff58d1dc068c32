//! Configuration management
//!
//! Settings come from a TOML file (default `~/.mentions/config.toml`) and
//! from command-line arguments, the latter taking precedence. A missing
//! default file yields the defaults; a missing file given explicitly is an
//! error.
//!
//! ```toml
//! [expander]
//! keys = "@ # [["
//! multiword = "# [["
//! staleness = "same-match"
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::matcher::KeySet;
use crate::session::StalenessPolicy;
use crate::surface::DEFAULT_ATTACHMENT_ATTRIBUTE;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Session configuration
    #[serde(default)]
    pub expander: ExpanderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Playground binary settings
    #[serde(default)]
    pub playground: PlaygroundConfig,
}

/// Declarative session settings, mirroring the element attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpanderConfig {
    /// Space separated trigger literals
    #[serde(default = "default_keys")]
    pub keys: String,

    /// Multi-word keys: absent for none, empty for all, otherwise a space
    /// separated subset of `keys`
    #[serde(default)]
    pub multiword: Option<String>,

    /// Query parameter used when driving the remote frame
    #[serde(default)]
    pub name: Option<String>,

    /// Id of the remote frame
    #[serde(default)]
    pub frame: Option<String>,

    #[serde(default)]
    pub staleness: StalenessPolicy,

    /// Option attribute holding the JSON attachment payload
    #[serde(default = "default_attachment_attribute")]
    pub attachment_attribute: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Suggestions offered for every key
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,

    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

fn default_keys() -> String {
    "@".to_string()
}

fn default_attachment_attribute() -> String {
    DEFAULT_ATTACHMENT_ATTRIBUTE.to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

fn default_candidates() -> Vec<String> {
    ["Ada Lovelace", "Alan Turing", "Barbara Liskov", "Grace Hopper", "Ken Thompson"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_color_output() -> bool {
    true
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            keys: default_keys(),
            multiword: None,
            name: None,
            frame: None,
            staleness: StalenessPolicy::default(),
            attachment_attribute: default_attachment_attribute(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            color_output: default_color_output(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Explicit path, or `None` for the default location
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration, defaults when the default
    ///   file does not exist
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mentions")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error naming the offending field otherwise
    pub fn validate(&self) -> Result<()> {
        self.expander.validate()
    }
}

impl ExpanderConfig {
    /// Check the key list and the attachment attribute.
    ///
    /// Keys are parsed exactly as [`KeySet::from_attributes`] parses them,
    /// so blanks and duplicates are dropped rather than rejected. The list
    /// is invalid only when no key survives.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, value: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };

        let keys = KeySet::from_attributes(Some(&self.keys), self.multiword.as_deref());
        if keys.is_empty() {
            return Err(invalid("expander.keys", &self.keys).into());
        }

        if self.attachment_attribute.is_empty() {
            return Err(invalid("expander.attachment_attribute", "").into());
        }

        Ok(())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
