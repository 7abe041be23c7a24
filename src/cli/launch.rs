use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::ProfileArgs;
use crate::config::host::HostContext;
use crate::config::profile::{GpuRequest, LaunchProfile};
use crate::config::settings::Settings;
use crate::config::store::{ProfileSource, ProfileStore};
use crate::launch::executor::ProcessExecutor;
use crate::launch::Validated;

#[derive(Serialize)]
struct RenderOutput {
    profile: String,
    source: String,
    runtime: String,
    args: Vec<String>,
    fingerprint: String,
    pending_dirs: Vec<PathBuf>,
}

// ---------------------------------------------------------------------------
// simlaunch launch
// ---------------------------------------------------------------------------

pub async fn launch(runtime: Option<&str>, target: &ProfileArgs) -> Result<()> {
    let settings = Settings::load()?;
    let runtime = settings.runtime(runtime);
    let (source, profile) = resolve_profile(&settings, target)?;
    let name = profile.name().to_string();

    println!("{} Launching {} ({})", "=>".blue().bold(), name.cyan(), source);
    if let Some(description) = profile.description() {
        println!("  {}", description.dimmed());
    }

    let validated = Validated::new(profile)
        .with_context(|| format!("Profile '{}' failed validation", name))?;
    for dir in &validated.report().created {
        println!("  {} Created {}", "•".yellow(), dir.display());
    }

    let built = validated.build();
    print_summary(built.profile());

    let executor = ProcessExecutor::new(runtime);
    let detach = built.invocation().detach();
    built
        .launch(&executor)
        .await
        .with_context(|| format!("Launch of '{}' failed", name))?;

    if detach {
        println!("{} Container {} started in background", "✓".green().bold(), name.cyan());
    } else {
        println!("{} Container exited successfully", "✓".green().bold());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// simlaunch render
// ---------------------------------------------------------------------------

pub fn render(runtime: Option<&str>, target: &ProfileArgs, json: bool) -> Result<()> {
    let settings = Settings::load()?;
    let runtime = settings.runtime(runtime);
    let (source, profile) = resolve_profile(&settings, target)?;
    let name = profile.name().to_string();

    let validated = Validated::inspected(profile)
        .with_context(|| format!("Profile '{}' failed validation", name))?;
    let pending = validated.report().pending.clone();
    for dir in &pending {
        tracing::info!("Launch would create {}", dir.display());
    }
    let built = validated.build();
    let invocation = built.invocation();

    if json {
        let output = RenderOutput {
            profile: name,
            source: source.to_string(),
            runtime,
            args: invocation.args().to_vec(),
            fingerprint: invocation.fingerprint(),
            pending_dirs: pending,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", invocation.command_line(&runtime));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// simlaunch validate
// ---------------------------------------------------------------------------

pub fn validate(target: &ProfileArgs, dry_run: bool) -> Result<()> {
    let settings = Settings::load()?;
    let (source, profile) = resolve_profile(&settings, target)?;
    let name = profile.name().to_string();

    let validated = if dry_run {
        Validated::inspected(profile)
    } else {
        Validated::new(profile)
    }
    .with_context(|| format!("Profile '{}' failed validation", name))?;

    println!("{} Profile {} ({}) is valid", "✓".green().bold(), name.cyan(), source);
    let report = validated.report();
    for dir in &report.created {
        println!("  {} Created {}", "•".yellow(), dir.display());
    }
    for dir in &report.pending {
        println!("  {} Would create {}", "•".yellow(), dir.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the selected profile and apply command-line overrides
fn resolve_profile(settings: &Settings, target: &ProfileArgs) -> Result<(ProfileSource, LaunchProfile)> {
    let reference = settings.profile(target.profile.as_deref())?;
    let store = ProfileStore::open()?;
    let (source, mut doc) = store.resolve(reference)?;
    tracing::debug!("Resolved profile '{}' from {}", reference, source);

    for (key, value) in parse_env_vars(&target.env)? {
        doc.override_env(&key, &value);
    }
    if !target.args.is_empty() {
        doc.command = target.args.clone();
    }

    let host = HostContext::detect()?;
    let profile = LaunchProfile::from_document(doc, &host)
        .with_context(|| format!("Invalid profile from {}", source))?;
    Ok((source, profile))
}

fn print_summary(profile: &LaunchProfile) {
    match profile.gpu() {
        GpuRequest::None => {}
        GpuRequest::All => println!("  {} GPU passthrough: all devices", "•".yellow()),
        GpuRequest::Devices(ids) => {
            println!("  {} GPU passthrough: {}", "•".yellow(), ids.join(", "))
        }
    }
    for mount in profile.mounts() {
        println!(
            "  {} Mount: {} -> {} ({})",
            "•".yellow(),
            mount.host_path.display(),
            mount.container_path,
            mount.mode.as_str()
        );
    }
    if let Some(user) = profile.user() {
        println!("  {} User: {}", "•".yellow(), user);
    }
}

/// Parse KEY=VALUE overrides, keeping their order
fn parse_env_vars(env_args: &[String]) -> Result<Vec<(String, String)>> {
    env_args
        .iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| {
                    format!("Invalid environment variable format: {}. Expected KEY=VALUE", arg)
                })
        })
        .collect()
}
