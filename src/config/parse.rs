//! Configuration file parsing and discovery

use crate::config::defaults::release_pipeline;
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, ShiprunError};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
pub const CONFIG_FILE_NAMES: &[&str] = &["shiprun.yml", "shiprun.yaml"];

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A project file on disk
    File(PathBuf),
    /// The per-user file; commands still run in the invoking directory
    User(PathBuf),
    /// The compiled-in release pipeline
    Builtin,
}

impl ConfigSource {
    /// Directory commands run in and relative paths resolve against
    pub fn base_dir(&self, fallback: &Path) -> PathBuf {
        match self {
            ConfigSource::File(path) => path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| fallback.to_path_buf()),
            ConfigSource::User(_) | ConfigSource::Builtin => fallback.to_path_buf(),
        }
    }
}

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Per-user configuration file, if one exists
pub fn find_user_config_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "shiprun")?;
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dirs.config_dir().join(name))
        .find(|path| path.is_file())
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, ShiprunError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, ShiprunError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Load configuration with automatic discovery.
///
/// Search order: project file (current directory upwards), per-user file,
/// then the built-in release pipeline.
pub fn load_config_auto() -> Result<(Config, ConfigSource), ShiprunError> {
    match find_config_file() {
        Ok(path) => {
            let config = parse_config_file(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        Err(ConfigError::NotFound(_)) => match find_user_config_file() {
            Some(path) => {
                let config = parse_config_file(&path)?;
                Ok((config, ConfigSource::User(path)))
            }
            None => Ok((release_pipeline(), ConfigSource::Builtin)),
        },
        Err(e) => Err(e.into()),
    }
}
