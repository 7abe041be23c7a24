pub mod launch;
pub mod profiles;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simlaunch")]
#[command(version)]
#[command(about = "Validated, reproducible launches of GPU-accelerated simulation containers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Container runtime executable (defaults to settings.yaml, then docker)
    #[arg(long, global = true, env = "SIMLAUNCH_RUNTIME")]
    runtime: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Profile selection shared by launch, render and validate
#[derive(Args)]
pub struct ProfileArgs {
    /// Profile file path, saved profile name, or builtin name
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Extra or overriding environment variables (format: KEY=VALUE, repeatable)
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Replace the profile's command with these arguments
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, build and run a profile
    Launch {
        #[command(flatten)]
        target: ProfileArgs,
    },

    /// Print the runtime invocation a profile builds, without running it
    Render {
        #[command(flatten)]
        target: ProfileArgs,

        /// Output as JSON (args, runtime, fingerprint)
        #[arg(long)]
        json: bool,
    },

    /// Check a profile without launching it
    Validate {
        #[command(flatten)]
        target: ProfileArgs,

        /// Report missing host directories instead of creating them
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a template profile
    Init {
        /// Profile name (defaults to the current directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Output file (defaults to ./<name>.yaml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List builtin and saved profiles
    List {
        /// Output as JSON (for programmatic use)
        #[arg(long)]
        json: bool,
    },

    /// Save a profile file into the profile store
    Import {
        /// Profile file to import
        file: PathBuf,

        /// Name to save under (defaults to the profile's name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Delete a saved profile
    Remove {
        /// Saved profile name
        name: String,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let runtime = self.runtime.as_deref();
        match self.command {
            Commands::Launch { target } => launch::launch(runtime, &target).await,
            Commands::Render { target, json } => launch::render(runtime, &target, json),
            Commands::Validate { target, dry_run } => launch::validate(&target, dry_run),
            Commands::Init {
                name,
                output,
                force,
            } => profiles::init_profile(name.as_deref(), output.as_deref(), force),
            Commands::List { json } => profiles::list_profiles(json),
            Commands::Import { file, name } => profiles::import_profile(&file, name.as_deref()),
            Commands::Remove { name } => profiles::remove_profile(&name),
        }
    }
}
