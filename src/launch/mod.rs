//! Validate, build, and launch a resolved profile.
//!
//! Each stage consumes the previous one, so a profile can only move forward:
//! `LaunchProfile` -> [`Validated`] -> [`Built`] -> [`Launched`] or a
//! [`LaunchError`]. Nothing is retried.

pub mod builder;
pub mod executor;
pub mod validator;

use crate::config::profile::LaunchProfile;
use crate::error::{LaunchError, ValidationError};
use builder::Invocation;
use executor::Executor;
use validator::ValidationReport;

/// A profile that passed validation
#[derive(Debug)]
pub struct Validated {
    profile: LaunchProfile,
    report: ValidationReport,
}

impl Validated {
    /// Validate, creating host directories the profile allows
    pub fn new(profile: LaunchProfile) -> Result<Self, ValidationError> {
        let report = validator::validate(&profile)?;
        Ok(Validated { profile, report })
    }

    /// Validate without touching the filesystem
    pub fn inspected(profile: LaunchProfile) -> Result<Self, ValidationError> {
        let report = validator::inspect(&profile)?;
        Ok(Validated { profile, report })
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn build(self) -> Built {
        let invocation = builder::build(&self.profile);
        Built {
            profile: self.profile,
            invocation,
        }
    }
}

/// A validated profile with its rendered invocation
#[derive(Debug)]
pub struct Built {
    profile: LaunchProfile,
    invocation: Invocation,
}

impl Built {
    pub fn profile(&self) -> &LaunchProfile {
        &self.profile
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Hand the invocation to the executor; non-zero exit is `LaunchFailed`
    pub async fn launch(self, executor: &dyn Executor) -> Result<Launched, LaunchError> {
        tracing::info!(
            profile = self.profile.name(),
            fingerprint = %self.invocation.fingerprint(),
            "Launching container"
        );
        let code = executor.execute(&self.invocation).await?;
        if code != 0 {
            return Err(LaunchError::LaunchFailed { code });
        }
        Ok(Launched {
            profile: self.profile,
            invocation: self.invocation,
        })
    }
}

/// A launch whose runtime exited successfully
#[derive(Debug)]
pub struct Launched {
    pub profile: LaunchProfile,
    pub invocation: Invocation,
}

/// Validate, build, and execute a profile in one step
pub async fn launch(profile: LaunchProfile, executor: &dyn Executor) -> Result<Launched, LaunchError> {
    Validated::new(profile)?.build().launch(executor).await
}
