//! # pressroom CLI
//!
//! Command-line interface for the pressroom publishing tools.

mod commands;
mod github;

use clap::{Parser, Subcommand};
use pressroom_core::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pressroom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "pressroom.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post or update the production-vs-preview link table on a pull request
    PreviewDiff {
        /// GitHub repository (e.g. "owner/repo")
        #[arg(long)]
        repo: String,

        /// Pull request number
        #[arg(long)]
        pr: u64,

        /// API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Aggregate release notes and print the grouped view as JSON
    ReleaseNotes {
        /// YAML file with locally authored release-notes entries
        #[arg(long)]
        data: Option<PathBuf>,

        /// Only the deprecations bucket
        #[arg(long)]
        deprecations_only: bool,

        /// Only the external SDK release feed
        #[arg(long)]
        external_only: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = if cli.config.exists() {
        Config::from_file(&cli.config)?
    } else {
        tracing::debug!("no config file at {:?}, using defaults", cli.config);
        Config::default()
    };

    match cli.command {
        Commands::PreviewDiff { repo, pr, token } => {
            commands::preview_diff(&config, &repo, pr, &token).await
        }
        Commands::ReleaseNotes {
            data,
            deprecations_only,
            external_only,
        } => {
            commands::release_notes(&config, data.as_deref(), deprecations_only, external_only)
                .await
        }
    }
}
