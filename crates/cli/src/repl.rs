use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use drypowder_core::cache::SNAPSHOT_CACHE;
use drypowder_core::models::settings::Settings;
use drypowder_core::Dashboard;

use crate::commands::{self, ReplCommand};
use crate::render;

/// Interactive session: every command mutates the in-memory table (or saves
/// it) and the performance table is redrawn afterwards.
pub async fn run(settings: Settings) -> Result<()> {
    let mut dashboard = crate::load_dashboard(&settings).await?;
    let mut editor = DefaultEditor::new()?;

    println!("{}\n", render::header(&dashboard));
    println!("{}\n", render::performance_table(&dashboard));
    println!("{}", "Type 'help' for commands.".dimmed());

    loop {
        let prompt = if dashboard.is_dirty() { "drypowder*> " } else { "drypowder> " };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(line.as_str());

        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                eprintln!("{} {msg}", "✗".red().bold());
                continue;
            }
        };
        debug!(?command, "repl command");
        let redraw = matches!(
            command,
            ReplCommand::Duration { .. }
                | ReplCommand::Target { .. }
                | ReplCommand::StopLoss { .. }
                | ReplCommand::Reload
        );

        let outcome = match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                println!("{}", commands::HELP);
                Ok(())
            }
            ReplCommand::Show => {
                println!("{}", render::performance_table(&dashboard));
                Ok(())
            }
            ReplCommand::Editors => {
                println!("{}", render::editors_table(&dashboard.row_editors()));
                Ok(())
            }
            ReplCommand::Duration { row, duration } => dashboard.set_hold_duration(row, duration),
            ReplCommand::Target { row, price } => dashboard.set_target_price(row, price),
            ReplCommand::StopLoss { row, price } => dashboard.set_stop_loss_price(row, price),
            ReplCommand::Save => dashboard.save().map(|path| {
                println!("{} Saved to {}", "✓".green().bold(), path.display());
            }),
            ReplCommand::Reload => {
                SNAPSHOT_CACHE.invalidate();
                // A failed reload keeps the current session
                match crate::load_dashboard(&settings).await {
                    Ok(fresh) => {
                        warn_unsaved(&dashboard);
                        dashboard = fresh;
                        println!("{}", render::header(&dashboard));
                        Ok(())
                    }
                    Err(e) => {
                        eprintln!("{} {e:#}", "✗".red().bold());
                        continue;
                    }
                }
            }
        };

        match outcome {
            Ok(()) if redraw => {
                println!("{}", render::editors_table(&dashboard.row_editors()));
                println!("{}", render::performance_table(&dashboard));
            }
            Ok(()) => {}
            Err(e) => eprintln!("{} {e}", "✗".red().bold()),
        }
    }

    warn_unsaved(&dashboard);
    Ok(())
}

fn unsaved_notice(dashboard: &Dashboard) -> Option<&'static str> {
    dashboard.is_dirty().then_some("Unsaved edits discarded.")
}

/// Called whenever the current session is about to be thrown away.
fn warn_unsaved(dashboard: &Dashboard) {
    if let Some(notice) = unsaved_notice(dashboard) {
        eprintln!("{}", notice.yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use drypowder_core::models::holding::{Holding, HoldingsTable};
    use drypowder_core::models::price::BenchmarkSeries;
    use drypowder_core::services::portfolio_service::PortfolioSnapshot;

    fn dashboard() -> Dashboard {
        let snapshot = PortfolioSnapshot {
            table: HoldingsTable::new(vec![Holding::new("AAPL").with_targets(250.0, 150.0)]),
            benchmark: BenchmarkSeries::empty("SPY"),
            performance: Vec::new(),
            as_of: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        };
        Dashboard::from_snapshot(Settings::default(), snapshot)
    }

    #[test]
    fn clean_session_has_no_notice() {
        assert_eq!(unsaved_notice(&dashboard()), None);
    }

    #[test]
    fn edited_session_warns_before_discard() {
        let mut d = dashboard();
        d.set_target_price(0, 300.0).unwrap();
        assert_eq!(unsaved_notice(&d), Some("Unsaved edits discarded."));
    }
}
