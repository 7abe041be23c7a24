mod cli;
mod config;
mod error;
mod launch;
mod utils;

use clap::Parser;
use cli::Cli;
use colored::Colorize;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = utils::logger::init(cli.verbose) {
        eprintln!("{} Failed to initialize logging: {}", "!".yellow().bold(), e);
    }

    if let Err(err) = cli.execute().await {
        eprintln!("{} {:#}", "✗".red().bold(), err);
        std::process::exit(error::exit_code(&err));
    }
}
