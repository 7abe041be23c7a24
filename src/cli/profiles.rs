use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::builtin;
use crate::config::host::HostContext;
use crate::config::profile::{LaunchProfile, ProfileDocument};
use crate::config::store::{self, ProfileStore};

#[derive(Serialize)]
struct ProfileListEntry {
    name: String,
    source: &'static str,
    image: Option<String>,
    description: Option<String>,
    found: bool,
}

// ---------------------------------------------------------------------------
// simlaunch init
// ---------------------------------------------------------------------------

pub fn init_profile(name: Option<&str>, output: Option<&Path>, force: bool) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let profile_name = name.map(|s| s.to_string()).unwrap_or_else(|| {
        current_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("my-sim")
            .to_string()
    });

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| current_dir.join(format!("{}.yaml", profile_name)));
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }

    let template = ProfileDocument::template(&profile_name);
    let yaml = serde_yaml::to_string(&template)?;
    std::fs::write(&path, yaml)
        .with_context(|| format!("Failed to write profile: {}", path.display()))?;

    println!("{} Created {}", "✓".green().bold(), path.display().to_string().cyan());
    println!("\nNext steps:");
    println!("  1. Edit the profile's image, mounts and environment");
    println!(
        "  2. Run {} to inspect the invocation",
        format!("simlaunch render --profile {}", path.display()).cyan()
    );

    Ok(())
}

// ---------------------------------------------------------------------------
// simlaunch list
// ---------------------------------------------------------------------------

pub fn list_profiles(json: bool) -> Result<()> {
    let store = ProfileStore::open()?;
    let mut entries = Vec::new();

    for name in store.list()? {
        let entry = match store.load(&name) {
            Ok(Some((_, doc))) => ProfileListEntry {
                name,
                source: "saved",
                image: Some(doc.image),
                description: doc.description,
                found: true,
            },
            Ok(None) | Err(_) => {
                tracing::warn!("Saved profile '{}' could not be read", name);
                ProfileListEntry {
                    name,
                    source: "saved",
                    image: None,
                    description: None,
                    found: false,
                }
            }
        };
        entries.push(entry);
    }

    for name in builtin::names() {
        if let Some(doc) = builtin::get(name)? {
            entries.push(ProfileListEntry {
                name: name.to_string(),
                source: "builtin",
                image: Some(doc.image),
                description: doc.description,
                found: true,
            });
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Profiles:".bold());
    for entry in &entries {
        let marker = if entry.found { "•".yellow() } else { "✗".red() };
        println!(
            "  {} {} [{}] {}",
            marker,
            entry.name.cyan(),
            entry.source,
            entry.image.as_deref().unwrap_or("<unreadable>")
        );
        if let Some(description) = &entry.description {
            println!("      {}", description.dimmed());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// simlaunch import / remove
// ---------------------------------------------------------------------------

pub fn import_profile(file: &PathBuf, name: Option<&str>) -> Result<()> {
    let doc = store::load_file(file)?;

    // Resolve once so a broken profile is rejected at import time. The
    // unresolved document is what gets saved, keeping `~/` paths portable.
    // The saved document does not depend on the live display, so a
    // display-forwarding profile can be imported from a headless shell.
    let mut host = HostContext::detect()?;
    if host.display.is_none() {
        host.display = Some(":0".to_string());
    }
    LaunchProfile::from_document(doc.clone(), &host)
        .with_context(|| format!("Invalid profile: {}", file.display()))?;

    let name = name.unwrap_or(&doc.name).to_string();
    let store = ProfileStore::open()?;
    let path = store.save(&name, &doc)?;

    println!(
        "{} Saved profile {} to {}",
        "✓".green().bold(),
        name.cyan(),
        path.display()
    );
    Ok(())
}

pub fn remove_profile(name: &str) -> Result<()> {
    let store = ProfileStore::open()?;
    store.delete(name)?;
    println!("{} Removed profile {}", "✓".green().bold(), name.cyan());
    Ok(())
}
