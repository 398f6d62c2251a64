//! Configuration loading utilities
//!
//! This module handles loading configuration from various sources with proper
//! precedence and validation.

use super::*;
use crate::core::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Load configuration from environment variables
pub fn load_from_env() -> Result<DashboardConfig> {
    load_from_vars(|key| env::var(key).ok())
}

/// Load configuration from a variable lookup
///
/// `lookup` stands in for the process environment, which keeps this
/// testable without touching global state.
pub fn load_from_vars<F>(lookup: F) -> Result<DashboardConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = DashboardConfig::default();

    // Data location
    if let Some(dir_list) = lookup("SOUQDASH_DATA_DIR") {
        let base_dirs: Vec<PathBuf> = env::split_paths(&dir_list)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        if base_dirs.is_empty() {
            return Err(Error::ConfigurationError(
                "Invalid SOUQDASH_DATA_DIR: no directories given".to_string(),
            ));
        }
        config.data.base_dirs = base_dirs;
    }

    // Sentinels
    if let Some(sentinel) = lookup("SOUQDASH_ALL_SENTINEL") {
        config.filters.all_sentinel = sentinel;
    }

    if let Some(no_delay) = lookup("SOUQDASH_NO_DELAY_LABEL") {
        config.vocabulary.no_delay = no_delay;
    }

    if let Some(currency) = lookup("SOUQDASH_CURRENCY") {
        config.display.currency = currency;
    }

    // Logging configuration
    if let Some(log_level) = lookup("SOUQDASH_LOG_LEVEL").or_else(|| lookup("RUST_LOG")) {
        config.logging.level = log_level;
    }

    Ok(config)
}

/// Serialization format of a config file, picked by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Toml,
}

impl FileFormat {
    /// `None` for a file without extension
    fn of(path: &Path) -> Result<Option<Self>> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Some(FileFormat::Yaml)),
            Some("toml") => Ok(Some(FileFormat::Toml)),
            Some(ext) => Err(Error::ConfigurationError(format!("Unsupported config file format: {}", ext))),
            None => Ok(None),
        }
    }
}

fn file_error(action: &str, path: &Path, err: std::io::Error) -> Error {
    Error::ConfigurationError(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Load configuration from a file (YAML or TOML based on extension)
///
/// A file without extension is tried as YAML, then as TOML.
pub fn load_from_file(path: &Path) -> Result<DashboardConfig> {
    let format = FileFormat::of(path)?;
    let contents = fs::read_to_string(path).map_err(|e| file_error("read config file", path, e))?;

    match format {
        Some(FileFormat::Yaml) => load_from_yaml(&contents),
        Some(FileFormat::Toml) => load_from_toml(&contents),
        None => load_from_yaml(&contents).or_else(|_| load_from_toml(&contents)),
    }
}

/// Load configuration from YAML string
pub fn load_from_yaml(yaml: &str) -> Result<DashboardConfig> {
    serde_yaml::from_str(yaml).map_err(|e| Error::ConfigurationError(format!("Invalid YAML config: {}", e)))
}

/// Load configuration from TOML string
pub fn load_from_toml(toml: &str) -> Result<DashboardConfig> {
    toml::from_str(toml).map_err(|e| Error::ConfigurationError(format!("Invalid TOML config: {}", e)))
}

/// Load configuration with precedence: defaults -> file -> environment
///
/// Without an explicit file, the first existing entry of
/// [`get_config_file_paths`] is used, if any.
pub fn load_with_precedence<P: AsRef<Path>>(config_file: Option<P>) -> Result<DashboardConfig> {
    // Start with defaults
    let mut config = DashboardConfig::default();

    let file_path = match config_file {
        Some(path) => Some(path.as_ref().to_path_buf()),
        None => get_config_file_paths().into_iter().find(|p| p.is_file()),
    };

    if let Some(file_path) = file_path {
        log::debug!("loading configuration from {}", file_path.display());
        let file_config = load_from_file(&file_path)?;
        config.merge(&file_config);
    }

    // Load from environment (highest precedence)
    let env_config = load_from_env()?;
    config.merge(&env_config);

    // Validate final configuration
    config.validate()?;

    Ok(config)
}

/// Save configuration to a file, YAML unless the extension says TOML
pub fn save_to_file(config: &DashboardConfig, path: &Path) -> Result<()> {
    let contents = match FileFormat::of(path)? {
        Some(FileFormat::Toml) => config.to_toml()?,
        Some(FileFormat::Yaml) | None => config.to_yaml()?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| file_error("create config directory", parent, e))?;
    }

    fs::write(path, contents).map_err(|e| file_error("write config file", path, e))
}

/// Get configuration file paths in order of precedence
pub fn get_config_file_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = vec![
        // Current directory
        "souqdash.yml".into(),
        "souqdash.yaml".into(),
        "souqdash.toml".into(),
    ];

    // User config directory
    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join("souqdash");
        paths.push(app_dir.join("config.yml"));
        paths.push(app_dir.join("config.yaml"));
        paths.push(app_dir.join("config.toml"));
    }

    // System config directory
    paths.push("/etc/souqdash/config.yml".into());
    paths.push("/etc/souqdash/config.yaml".into());
    paths.push("/etc/souqdash/config.toml".into());

    // Environment variable override
    if let Ok(config_path) = env::var("SOUQDASH_CONFIG_FILE") {
        paths.insert(0, config_path.into());
    }

    paths
}
