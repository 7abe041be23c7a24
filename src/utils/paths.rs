use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable that relocates the simlaunch configuration directory
pub const HOME_ENV: &str = "SIMLAUNCH_HOME";

/// Get the simlaunch configuration directory (~/.simlaunch, or $SIMLAUNCH_HOME)
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match std::env::var_os(HOME_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .context("Could not find home directory")?
            .join(".simlaunch"),
    };
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    Ok(config_dir)
}

/// Get the settings file path
pub fn get_settings_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("settings.yaml"))
}

/// Get the directory holding saved launch profiles
pub fn get_profiles_dir() -> Result<PathBuf> {
    let profiles_dir = get_config_dir()?.join("profiles");
    std::fs::create_dir_all(&profiles_dir)?;
    Ok(profiles_dir)
}
