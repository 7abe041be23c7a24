use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::builtin;
use crate::config::profile::ProfileDocument;
use crate::utils::paths;

/// Where a resolved profile came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    File(PathBuf),
    Saved(PathBuf),
    Builtin(&'static str),
}

impl fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileSource::File(path) => write!(f, "file {}", path.display()),
            ProfileSource::Saved(path) => write!(f, "saved profile {}", path.display()),
            ProfileSource::Builtin(name) => write!(f, "builtin profile {}", name),
        }
    }
}

/// Saved launch profiles (~/.simlaunch/profiles/<name>.yaml)
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Open the store under the simlaunch config directory
    pub fn open() -> Result<Self> {
        Ok(Self::at(paths::get_profiles_dir()?))
    }

    pub fn at(dir: PathBuf) -> Self {
        ProfileStore { dir }
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.yaml", name))
    }

    /// Save a profile document under the given name
    pub fn save(&self, name: &str, doc: &ProfileDocument) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            anyhow::bail!("Invalid profile name '{}'", name);
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create profile store: {}", self.dir.display()))?;
        let path = self.profile_path(name);
        let yaml = serde_yaml::to_string(doc).context("Failed to serialize profile to YAML")?;
        std::fs::write(&path, yaml)
            .with_context(|| format!("Failed to write profile: {}", path.display()))?;
        Ok(path)
    }

    /// Load a saved profile, or None if nothing is saved under that name
    pub fn load(&self, name: &str) -> Result<Option<(PathBuf, ProfileDocument)>> {
        let path = self.profile_path(name);
        if !path.is_file() {
            return Ok(None);
        }
        let doc = load_file(&path)?;
        Ok(Some((path, doc)))
    }

    /// Delete a saved profile
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.profile_path(name);
        if !path.exists() {
            anyhow::bail!("Profile '{}' is not saved in {}", name, self.dir.display());
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("Failed to delete profile: {}", path.display()))?;
        Ok(())
    }

    /// Names of all saved profiles, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read profile store: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Resolve `--profile <path-or-name>`: an existing file, then a saved
    /// profile, then a builtin.
    pub fn resolve(&self, reference: &str) -> Result<(ProfileSource, ProfileDocument)> {
        let as_path = Path::new(reference);
        if as_path.is_file() {
            let doc = load_file(as_path)?;
            return Ok((ProfileSource::File(as_path.to_path_buf()), doc));
        }
        if looks_like_path(reference) {
            anyhow::bail!("Profile file not found: {}", reference);
        }

        if let Some((path, doc)) = self.load(reference)? {
            return Ok((ProfileSource::Saved(path), doc));
        }

        if let Some(name) = builtin::names().find(|n| *n == reference) {
            if let Some(doc) = builtin::get(name)? {
                return Ok((ProfileSource::Builtin(name), doc));
            }
        }

        anyhow::bail!(
            "Profile '{}' not found. Pass a profile file, or one of: {}",
            reference,
            self.list()?
                .into_iter()
                .chain(builtin::names().map(str::to_string))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

fn looks_like_path(reference: &str) -> bool {
    reference.contains('/') || reference.ends_with(".yaml") || reference.ends_with(".yml")
}

/// Load a profile document from a YAML file
pub fn load_file(path: &Path) -> Result<ProfileDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile: {}", path.display()))?;
    let doc = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse profile: {}", path.display()))?;
    Ok(doc)
}
