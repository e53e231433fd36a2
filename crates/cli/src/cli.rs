use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use drypowder_core::models::settings::Settings;

#[derive(Parser)]
#[command(name = "drypowder")]
#[command(version, about = "Holdings vs. benchmark dashboard with editable targets")]
#[command(
    long_about = "Loads a brokerage holdings CSV, compares each position's return with a benchmark index since its purchase date, lets you edit hold duration, target and stop-loss prices, and saves the edited table to a new CSV."
)]
pub struct Cli {
    /// TOML settings file (all keys optional)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Holdings CSV to read
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// CSV written on save
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Benchmark ticker
    #[arg(short, long, global = true)]
    pub benchmark: Option<String>,

    /// First day of the benchmark window (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub since: Option<NaiveDate>,

    /// Local Date,Close CSV used instead of (or before) the network
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Alpha Vantage API key, used if Yahoo Finance fails
    #[arg(long, env = "ALPHAVANTAGE_API_KEY", global = true, hide_env_values = true)]
    pub alphavantage_key: Option<String>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Print the performance table and exit
    Show {
        /// Output rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the output CSV without editing
    Export,

    /// Edit rows interactively (default)
    Interactive,
}

impl Cli {
    /// Settings from the config file (or defaults), then flag overrides.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(input) = &self.input {
            settings.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if let Some(symbol) = &self.benchmark {
            settings.benchmark.symbol = symbol.to_uppercase();
        }
        if let Some(since) = self.since {
            settings.benchmark.start_date = since;
        }
        if let Some(history) = &self.history {
            settings.benchmark.history_path = Some(history.clone());
        }
        if let Some(key) = &self.alphavantage_key {
            settings.api_keys.insert("alphavantage".into(), key.clone());
        }

        settings.validate()?;
        Ok(settings)
    }
}
