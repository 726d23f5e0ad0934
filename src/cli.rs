use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sitefront - converge a static site onto object storage behind a CDN
#[derive(Parser, Debug)]
#[command(name = "sitefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the site configuration file
    #[arg(short, long, global = true, default_value = "site.toml")]
    pub config: PathBuf,

    /// Output format for CI (NDJSON events)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish the site, secure the bucket, front it with the CDN and invalidate changes
    Converge {
        /// Show what would change without touching the provider
        #[arg(long)]
        dry_run: bool,

        /// Wait for the cache invalidation to complete
        #[arg(long)]
        wait: bool,
    },

    /// Show the changes the next converge would make
    Plan,

    /// Show what the last converge recorded
    Status,

    /// Print the bucket policy bound to the recorded distribution
    Policy,

    /// Write a starter site.toml
    Init {
        /// Bucket name to put in the template
        #[arg(long)]
        bucket: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}
