//! Settings loading and resolution
//!
//! Per-field priority order:
//! 1. Environment variable (`ECODASH_*`)
//! 2. TOML config file (`<config_dir>/ecodash/ecodash.toml`)
//! 3. Compiled default
//!
//! A missing or malformed TOML file logs a warning and falls through to
//! the remaining tiers; settings problems never abort startup.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Logging configuration section of the TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter ("trace", "debug", "info", "warn", "error")
    pub level: String,
    /// Optional log file path (stdout when absent)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// On-disk TOML configuration schema
///
/// All fields optional; absent fields fall through to ENV/defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the assessments collection API
    pub api_base_url: Option<String>,
    /// Base URL of the object store the upload pipeline watches
    pub storage_base_url: Option<String>,
    /// Listen address for the dashboard service
    pub bind_address: Option<String>,
    /// Display name of the already-authenticated user
    pub display_name: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled fallback values used when neither ENV nor TOML provide a field
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub api_base_url: String,
    pub storage_base_url: String,
    pub bind_address: String,
    pub display_name: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:4566".to_string(),
            storage_base_url: "http://127.0.0.1:4567".to_string(),
            bind_address: "127.0.0.1:5740".to_string(),
            display_name: "operator".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Fully resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub storage_base_url: String,
    pub bind_address: String,
    pub display_name: String,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

/// Resolves service settings from ENV, TOML, and compiled defaults
pub struct SettingsResolver {
    config_path: Option<PathBuf>,
}

impl SettingsResolver {
    pub fn new() -> Self {
        Self {
            config_path: default_config_path(),
        }
    }

    /// Use an explicit config file path instead of the platform default
    pub fn with_config_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Resolve all settings, per-field, ENV → TOML → compiled default.
    pub fn resolve(&self) -> Settings {
        let defaults = CompiledDefaults::for_current_platform();
        let toml_config = self.load_toml_or_default();

        Settings {
            api_base_url: resolve_field(
                "ECODASH_API_URL",
                toml_config.api_base_url.clone(),
                defaults.api_base_url,
            ),
            storage_base_url: resolve_field(
                "ECODASH_STORAGE_URL",
                toml_config.storage_base_url.clone(),
                defaults.storage_base_url,
            ),
            bind_address: resolve_field(
                "ECODASH_BIND",
                toml_config.bind_address.clone(),
                defaults.bind_address,
            ),
            display_name: resolve_field(
                "ECODASH_USER",
                toml_config.display_name.clone(),
                defaults.display_name,
            ),
            log_level: resolve_field(
                "ECODASH_LOG_LEVEL",
                Some(toml_config.logging.level.clone()),
                defaults.log_level,
            ),
            log_file: toml_config.logging.file,
        }
    }

    fn load_toml_or_default(&self) -> TomlConfig {
        let Some(path) = &self.config_path else {
            return TomlConfig::default();
        };
        if !path.exists() {
            return TomlConfig::default();
        }
        match load_toml_config(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Config file unreadable, continuing with ENV/defaults"
                );
                TomlConfig::default()
            }
        }
    }
}

impl Default for SettingsResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve_field(env_var: &str, toml_value: Option<String>, default: String) -> String {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    if let Some(value) = toml_value {
        if !value.trim().is_empty() {
            return value;
        }
    }
    default
}

/// Platform config file location: `<config_dir>/ecodash/ecodash.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ecodash").join("ecodash.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Write a TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Create config dir failed: {}", e)))?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content).map_err(|e| Error::Config(format!("Write TOML failed: {}", e)))
}
