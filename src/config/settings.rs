use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::paths;

/// Runtime binary used when neither the CLI nor the settings name one
pub const DEFAULT_RUNTIME: &str = "docker";

/// Global simlaunch settings stored in ~/.simlaunch/settings.yaml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    /// Container runtime executable (e.g., docker, podman, /usr/local/bin/docker)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    /// Profile used when --profile is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
}

impl Settings {
    /// Load settings from disk, creating default if not exists
    pub fn load() -> Result<Self> {
        let settings_path = paths::get_settings_file()?;

        if !settings_path.exists() {
            let settings = Self::default();
            settings.save()?;
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read settings: {}", settings_path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", settings_path.display()))?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let settings_path = paths::get_settings_file()?;

        if let Some(parent) = settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write settings: {}", settings_path.display()))?;

        Ok(())
    }

    /// Pick the runtime executable: CLI/env override, then settings, then docker
    pub fn runtime(&self, cli_override: Option<&str>) -> String {
        cli_override
            .or(self.runtime.as_deref())
            .unwrap_or(DEFAULT_RUNTIME)
            .to_string()
    }

    /// Pick the profile to use: explicit argument, then the configured default
    pub fn profile<'a>(&'a self, explicit: Option<&'a str>) -> Result<&'a str> {
        explicit.or(self.default_profile.as_deref()).context(
            "No profile given. Pass --profile <path-or-name> or set default_profile in settings.yaml",
        )
    }
}
