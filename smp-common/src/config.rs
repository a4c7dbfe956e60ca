//! Configuration loading and data directory resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Data directory resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (`SMP_DATA_DIR`)
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("SMP_DATA_DIR") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return PathBuf::from(data_dir);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_data_dir()
}

/// Get default configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/smp/config.toml first, then /etc/smp/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("smp").join("config.toml"));
        let system_config = PathBuf::from("/etc/smp/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("smp").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data directory path
fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("smp"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\smp"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("smp"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/smp"))
    } else if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("smp"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/smp"))
    } else {
        PathBuf::from("./smp_data")
    }
}

/// Create the data directory (and the photo storage subdirectory) if missing
pub fn ensure_data_dir(data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir)?;
    std::fs::create_dir_all(photos_dir(data_dir))?;
    Ok(())
}

/// Path of the portal database inside the data directory
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("portal.db")
}

/// Root of on-disk photo storage inside the data directory
pub fn photos_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("photos")
}
