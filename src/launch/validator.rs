use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::profile::LaunchProfile;
use crate::error::ValidationError;

/// What validation did (or would do) to the host filesystem
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Missing host directories that were created
    pub created: Vec<PathBuf>,
    /// Missing host directories that would be created on launch
    pub pending: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostPathMode {
    Create,
    Inspect,
}

/// Validate a profile, creating missing host directories where the mount allows it
pub fn validate(profile: &LaunchProfile) -> Result<ValidationReport, ValidationError> {
    check(profile, HostPathMode::Create)
}

/// Validate a profile without touching the filesystem
pub fn inspect(profile: &LaunchProfile) -> Result<ValidationReport, ValidationError> {
    check(profile, HostPathMode::Inspect)
}

fn check(profile: &LaunchProfile, mode: HostPathMode) -> Result<ValidationReport, ValidationError> {
    check_env_keys(profile)?;
    check_mount_targets(profile)?;

    // Every missing path is checked before any directory is created, so a
    // failed validation leaves the host untouched.
    let mut missing: Vec<&PathBuf> = Vec::new();
    for mount in profile.mounts() {
        if mount.host_path.exists() || missing.contains(&&mount.host_path) {
            continue;
        }
        if !mount.create {
            return Err(ValidationError::MissingHostPath {
                path: mount.host_path.clone(),
                container_path: mount.container_path.clone(),
            });
        }
        missing.push(&mount.host_path);
    }

    let mut report = ValidationReport::default();
    for path in missing {
        match mode {
            HostPathMode::Inspect => report.pending.push(path.clone()),
            HostPathMode::Create => {
                std::fs::create_dir_all(path).map_err(|source| {
                    ValidationError::HostPathCreation {
                        path: path.clone(),
                        source,
                    }
                })?;
                tracing::info!("Created host directory {}", path.display());
                report.created.push(path.clone());
            }
        }
    }

    Ok(report)
}

fn check_env_keys(profile: &LaunchProfile) -> Result<(), ValidationError> {
    for var in profile.env() {
        let reason = if var.key.is_empty() {
            "must not be empty"
        } else if var.key.contains('=') {
            "must not contain '='"
        } else {
            continue;
        };
        return Err(ValidationError::InvalidEnvKey {
            key: var.key.clone(),
            reason,
        });
    }
    Ok(())
}

fn check_mount_targets(profile: &LaunchProfile) -> Result<(), ValidationError> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
    for mount in profile.mounts() {
        let target = normalize_target(&mount.container_path);
        if let Some(first) = seen.insert(target, &mount.host_path) {
            return Err(ValidationError::DuplicateMountTarget {
                container_path: mount.container_path.clone(),
                first: first.clone(),
                second: mount.host_path.clone(),
            });
        }
    }
    Ok(())
}

/// `/data/` and `/data` are the same mount point
fn normalize_target(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::host::{fixture, HostContext};
    use crate::config::profile::{AccessMode, EnvVar, MountEntry, ProfileDocument};
    use std::path::Path;

    fn doc_with_mounts(host: &HostContext, mounts: &[(&str, &str, Option<bool>)]) -> ProfileDocument {
        let mut doc = ProfileDocument::template("check");
        doc.create_host_paths = false;
        doc.user = None;
        doc.mounts = mounts
            .iter()
            .map(|(h, c, create)| MountEntry {
                host: host.home.join(h).display().to_string(),
                container: c.to_string(),
                mode: AccessMode::ReadWrite,
                create: *create,
            })
            .collect();
        doc
    }

    #[test]
    fn duplicate_container_paths_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let host = fixture(tmp.path());
        let doc = doc_with_mounts(
            &host,
            &[("a", "/isaac-sim/.cache", Some(true)), ("b", "/isaac-sim/.cache/", Some(true))],
        );
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        match validate(&profile) {
            Err(ValidationError::DuplicateMountTarget { container_path, first, second }) => {
                assert_eq!(container_path, "/isaac-sim/.cache/");
                assert_eq!(first, host.home.join("a"));
                assert_eq!(second, host.home.join("b"));
            }
            other => panic!("expected DuplicateMountTarget, got {:?}", other),
        }
        assert!(!host.home.join("a").exists(), "nothing created before the check fails");
    }

    #[test]
    fn env_keys_with_equals_or_empty_are_rejected() {
        let host = fixture(Path::new("/h"));
        for bad in ["ACCEPT=EULA", ""] {
            let mut doc = doc_with_mounts(&host, &[]);
            doc.env.push(EnvVar::new(bad, "Y"));
            let profile = LaunchProfile::from_document(doc, &host).unwrap();
            match validate(&profile) {
                Err(ValidationError::InvalidEnvKey { key, .. }) => assert_eq!(key, bad),
                other => panic!("expected InvalidEnvKey, got {:?}", other),
            }
        }
    }

    #[test]
    fn missing_host_path_without_creation_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let host = fixture(tmp.path());
        let doc = doc_with_mounts(&host, &[("docker/isaac-sim/cache/main", "/isaac-sim/.cache", None)]);
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        match validate(&profile) {
            Err(ValidationError::MissingHostPath { path, container_path }) => {
                assert_eq!(path, host.home.join("docker/isaac-sim/cache/main"));
                assert_eq!(container_path, "/isaac-sim/.cache");
            }
            other => panic!("expected MissingHostPath, got {:?}", other),
        }
    }

    #[test]
    fn creatable_paths_are_created_by_validate_only() {
        let tmp = tempfile::tempdir().unwrap();
        let host = fixture(tmp.path());
        let doc = doc_with_mounts(&host, &[("cache/main", "/isaac-sim/.cache", Some(true))]);
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        let target = host.home.join("cache/main");

        let report = inspect(&profile).unwrap();
        assert_eq!(report.pending, vec![target.clone()]);
        assert!(!target.exists());

        let report = validate(&profile).unwrap();
        assert_eq!(report.created, vec![target.clone()]);
        assert!(target.is_dir());

        let report = validate(&profile).unwrap();
        assert_eq!(report, ValidationReport::default());
    }

    #[test]
    fn missing_path_fails_before_any_directory_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let host = fixture(tmp.path());
        let doc = doc_with_mounts(
            &host,
            &[("made", "/a", Some(true)), ("absent", "/b", Some(false))],
        );
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        match validate(&profile) {
            Err(ValidationError::MissingHostPath { path, .. }) => {
                assert_eq!(path, host.home.join("absent"))
            }
            other => panic!("expected MissingHostPath, got {:?}", other),
        }
        assert!(!host.home.join("made").exists());
    }

    #[test]
    fn shared_host_path_is_reported_once() {
        let tmp = tempfile::tempdir().unwrap();
        let host = fixture(tmp.path());
        let doc = doc_with_mounts(
            &host,
            &[("shared", "/a", Some(true)), ("shared", "/b", Some(true))],
        );
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        let report = validate(&profile).unwrap();
        assert_eq!(report.created, vec![host.home.join("shared")]);
    }

    #[test]
    fn existing_paths_pass_without_creation_flag() {
        let tmp = tempfile::tempdir().unwrap();
        let host = fixture(tmp.path());
        std::fs::create_dir_all(host.home.join("data")).unwrap();
        let doc = doc_with_mounts(&host, &[("data", "/data", Some(false))]);
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        assert_eq!(validate(&profile).unwrap(), ValidationReport::default());
    }
}
