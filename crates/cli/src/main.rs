mod cli;
mod commands;
mod render;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use drypowder_core::cache::SNAPSHOT_CACHE;
use drypowder_core::models::settings::Settings;
use drypowder_core::providers::registry::PriceProviderRegistry;
use drypowder_core::Dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = cli.settings().context("Failed to build settings")?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Show { json } => {
            let dashboard = load_dashboard(&settings).await?;
            if json {
                println!("{}", render::performance_json(&dashboard)?);
            } else {
                println!("{}\n", render::header(&dashboard));
                println!("{}", render::performance_table(&dashboard));
            }
            Ok(())
        }
        Commands::Export => {
            let mut dashboard = load_dashboard(&settings).await?;
            let path = dashboard.save().context("Failed to write output CSV")?;
            println!("{} Saved to {}", "✓".green().bold(), path.display());
            Ok(())
        }
        Commands::Interactive => repl::run(settings).await,
    }
}

/// Load (or reuse) the snapshot for these settings, measured up to today.
pub(crate) async fn load_dashboard(settings: &Settings) -> Result<Dashboard> {
    let registry = PriceProviderRegistry::new_with_defaults(settings);
    let today = chrono::Local::now().date_naive();
    Dashboard::load_cached(&SNAPSHOT_CACHE, settings.clone(), registry, today)
        .await
        .with_context(|| format!("Failed to load {}", settings.input_path.display()))
}

/// Logs go to stderr so tables and JSON on stdout stay clean.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
