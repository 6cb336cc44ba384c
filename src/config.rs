//! Configuration system for xstatus.
//!
//! Provides layered configuration from multiple sources:
//!
//! 1. **Compiled defaults** - Sensible defaults built into the binary
//! 2. **User config file** - `~/.config/xstatus/config.toml`
//! 3. **Environment variables** - `XSTATUS_*` prefix
//! 4. **CLI arguments** - Highest priority, always wins
//!
//! # Example Configuration File
//!
//! ```toml
//! [mentions]
//! case_sensitive_screen_names = false
//!
//! [parser]
//! lookup_degenerate_users = true
//! parallel = true
//!
//! [output]
//! format = "text"
//! colors = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, XstatusError};

/// Keys accepted by [`Config::set_value`].
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "mentions.case_sensitive_screen_names",
    "parser.lookup_degenerate_users",
    "parser.parallel",
    "output.format",
    "output.colors",
    "output.quiet",
];

/// Main configuration structure for xstatus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mentions: MentionsConfig,
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

/// Screen-name handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MentionsConfig {
    /// Keep `@Mention` case instead of lowercasing.
    /// Environment variable: `XSTATUS_CASE_SENSITIVE`
    pub case_sensitive_screen_names: bool,
}

/// Parser behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Consult the user loader for id-only author objects.
    pub lookup_degenerate_users: bool,

    /// Parse batch elements in parallel.
    pub parallel: bool,
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format: text, json, json-pretty.
    /// Environment variable: `XSTATUS_FORMAT`
    pub format: String,

    /// Enable colored output.
    pub colors: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lookup_degenerate_users: true,
            parallel: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            colors: true,
            quiet: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. User config file (~/.config/xstatus/config.toml)
    /// 3. Compiled defaults
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::user_config_path()
            .and_then(|path| Self::load_from_file(&path).ok().flatten())
            .unwrap_or_default();

        config.apply_env_overrides();

        debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Load configuration from a specific file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("Config file not found: {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        match toml::from_str(&content) {
            Ok(config) => {
                info!("Loaded config from: {}", path.display());
                Ok(Some(config))
            }
            Err(e) => {
                warn!("Failed to parse config file {}: {}", path.display(), e);
                Err(XstatusError::ConfigError {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xstatus").join("config.toml"))
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("XSTATUS_CASE_SENSITIVE") {
            if let Some(enabled) = parse_bool(&value) {
                self.mentions.case_sensitive_screen_names = enabled;
            }
        }

        if let Ok(format) = std::env::var("XSTATUS_FORMAT") {
            self.output.format = format;
        }
        if std::env::var("XSTATUS_NO_COLOR").is_ok() || std::env::var("NO_COLOR").is_ok() {
            self.output.colors = false;
        }
        if std::env::var("XSTATUS_QUIET").is_ok() {
            self.output.quiet = true;
        }
    }

    /// Set one dotted key, e.g. `parser.parallel = false`.
    ///
    /// # Errors
    ///
    /// Returns [`XstatusError::InvalidConfigKey`] for unknown keys or values
    /// of the wrong type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let flag = || {
            parse_bool(value).ok_or_else(|| XstatusError::InvalidConfigKey {
                key: key.to_string(),
                reason: format!("expected true or false, got '{value}'"),
            })
        };

        match key {
            "mentions.case_sensitive_screen_names" => {
                self.mentions.case_sensitive_screen_names = flag()?;
            }
            "parser.lookup_degenerate_users" => self.parser.lookup_degenerate_users = flag()?,
            "parser.parallel" => self.parser.parallel = flag()?,
            "output.format" => self.output.format = value.to_string(),
            "output.colors" => self.output.colors = flag()?,
            "output.quiet" => self.output.quiet = flag()?,
            _ => {
                return Err(XstatusError::InvalidConfigKey {
                    key: key.to_string(),
                    reason: "unknown key".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Save the configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| XstatusError::ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Save the configuration to the user config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;
        self.save_to(&path)
    }

    /// Generate a default configuration file content.
    #[must_use]
    pub fn default_config_content() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
