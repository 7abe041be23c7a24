use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when a profile is malformed or fails validation
pub const EXIT_INVALID: i32 = 2;

/// Exit code used when the container runtime executable cannot be found
pub const EXIT_RUNTIME_MISSING: i32 = 3;

/// A profile could not be constructed from its definition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("invalid profile field '{field}': {reason}")]
    InvalidProfile { field: String, reason: String },
}

impl ProfileError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ProfileError::InvalidProfile {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A constructed profile is inconsistent with itself or with the host
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("mount target '{container_path}' is used by both '{first}' and '{second}'")]
    DuplicateMountTarget {
        container_path: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("host path '{}' does not exist and auto-creation is not allowed for mount '{container_path}'", .path.display())]
    MissingHostPath { path: PathBuf, container_path: String },

    #[error("invalid environment variable key '{key}': {reason}")]
    InvalidEnvKey { key: String, reason: &'static str },

    #[error("failed to create host path '{}'", .path.display())]
    HostPathCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handing the built invocation to the container runtime failed
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("container runtime '{runtime}' could not be located")]
    ExecutorUnavailable {
        runtime: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to spawn container runtime '{}'", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for container runtime '{}' to exit", .program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("container runtime exited with code {code}")]
    LaunchFailed { code: i32 },
}

/// Map an error surfaced by a command to the process exit code.
///
/// A failed launch mirrors the runtime's own exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.downcast_ref::<ProfileError>().is_some()
            || cause.downcast_ref::<ValidationError>().is_some()
        {
            return EXIT_INVALID;
        }
        if let Some(launch) = cause.downcast_ref::<LaunchError>() {
            return match launch {
                LaunchError::Validation(_) => EXIT_INVALID,
                LaunchError::ExecutorUnavailable { .. } => EXIT_RUNTIME_MISSING,
                LaunchError::LaunchFailed { code } => *code,
                LaunchError::Spawn { .. } | LaunchError::Wait { .. } => 1,
            };
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn launch_failure_mirrors_runtime_code() {
        let err = anyhow::Error::new(LaunchError::LaunchFailed { code: 125 });
        assert_eq!(exit_code(&err), 125);
    }

    #[test]
    fn validation_errors_map_to_two_through_context() {
        let result: Result<(), ValidationError> = Err(ValidationError::InvalidEnvKey {
            key: "A=B".to_string(),
            reason: "contains '='",
        });
        let err = result.context("Profile 'x' failed validation").unwrap_err();
        assert_eq!(exit_code(&err), EXIT_INVALID);

        let err = anyhow::Error::new(ProfileError::invalid("name", "must not be empty"));
        assert_eq!(exit_code(&err), EXIT_INVALID);
    }

    #[test]
    fn missing_runtime_maps_to_three() {
        let source = which::which("simlaunch-no-such-runtime-binary").unwrap_err();
        let err = anyhow::Error::new(LaunchError::ExecutorUnavailable {
            runtime: "simlaunch-no-such-runtime-binary".to_string(),
            source,
        });
        assert_eq!(exit_code(&err), EXIT_RUNTIME_MISSING);
    }

    #[test]
    fn wait_failure_is_not_reported_as_spawn() {
        let err = LaunchError::Wait {
            program: PathBuf::from("/usr/bin/docker"),
            source: std::io::Error::from(std::io::ErrorKind::Interrupted),
        };
        assert_eq!(
            err.to_string(),
            "failed waiting for container runtime '/usr/bin/docker' to exit"
        );
        assert_eq!(exit_code(&anyhow::Error::new(err)), 1);
    }

    #[test]
    fn other_errors_map_to_one() {
        assert_eq!(exit_code(&anyhow::anyhow!("profile not found")), 1);
    }
}
