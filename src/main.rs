//! Sitefront CLI - converge a static site onto object storage behind a CDN
//!
//! Usage: sitefront [OPTIONS] <COMMAND>
//!
//! Commands:
//!   converge  Publish, secure, front and invalidate
//!   plan      Preview the next converge
//!   status    Show the recorded state
//!   policy    Print the bound bucket policy
//!   init      Write a starter site.toml

mod cli;
mod commands;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Overrides `-v` with a full filter directive, e.g. `sitefront=trace`
const LOG_ENV: &str = "SITEFRONT_LOG";

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("sitefront={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json = cli.json;
    let result = match cli.command {
        Commands::Converge { dry_run, wait } => {
            commands::converge::cmd_converge(&cli.config, dry_run, wait, json, cli.verbose)
        }
        Commands::Plan => commands::plan::cmd_plan(&cli.config, json),
        Commands::Status => commands::status::cmd_status(&cli.config, json),
        Commands::Policy => commands::policy::cmd_policy(&cli.config, json),
        Commands::Init { bucket, force } => {
            commands::init::cmd_init(&cli.config, bucket.as_deref(), force, json)
        }
    };

    if let Err(err) = result {
        ui::error::print_error(&err, json);
        std::process::exit(1);
    }
}
