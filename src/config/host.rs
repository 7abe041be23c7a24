use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Ambient facts about the invoking host.
///
/// Captured once by the CLI and passed into profile construction, so that
/// nothing downstream reads the environment on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub cwd: PathBuf,
    pub home: PathBuf,
    pub display: Option<String>,
    pub xauthority: Option<PathBuf>,
    pub uid: u32,
    pub gid: u32,
}

impl HostContext {
    /// Capture the current process's host context
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let display = std::env::var("DISPLAY").ok().filter(|d| !d.is_empty());
        let xauthority = std::env::var_os("XAUTHORITY")
            .filter(|x| !x.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                let default = home.join(".Xauthority");
                default.exists().then_some(default)
            });

        let host = HostContext {
            cwd,
            home,
            display,
            xauthority,
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        };
        tracing::debug!(?host, "Captured host context");
        Ok(host)
    }

    /// Resolve a host path from a profile: `~` expands to the home directory,
    /// relative paths are taken from the working directory.
    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        if raw == "~" {
            return self.home.clone();
        }
        if let Some(rest) = raw.strip_prefix("~/") {
            return self.home.join(rest);
        }
        let path = Path::new(raw);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(raw.strip_prefix("./").unwrap_or(raw))
        }
    }
}

#[cfg(test)]
pub(crate) fn fixture(root: &Path) -> HostContext {
    HostContext {
        cwd: root.join("work"),
        home: root.join("home"),
        display: None,
        xauthority: None,
        uid: 1000,
        gid: 1000,
    }
}
