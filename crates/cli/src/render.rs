use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use drypowder_core::models::duration::HoldDuration;
use drypowder_core::models::editor::RowEditor;
use drypowder_core::models::performance::{AlphaTone, PerformanceRow};
use drypowder_core::Dashboard;

#[derive(Tabled)]
struct PerformanceLine {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Current Price")]
    current_price: String,
    #[tabled(rename = "Cost Basis")]
    cost_basis: String,
    #[tabled(rename = "Stock Return")]
    stock_return: String,
    #[tabled(rename = "Benchmark Return")]
    benchmark_return: String,
    #[tabled(rename = "Alpha")]
    alpha: String,
}

#[derive(Tabled)]
struct EditorLine {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Hold Duration")]
    hold_duration: String,
    #[tabled(rename = "Target Price")]
    target_price: String,
    #[tabled(rename = "Stop Loss")]
    stop_loss_price: String,
}

fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "—".into())
}

fn percent(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}%", v * 100.0)).unwrap_or_else(|| "—".into())
}

fn tinted_alpha(value: Option<f64>, tone: AlphaTone) -> String {
    let text = percent(value);
    match tone {
        AlphaTone::Positive => text.green().to_string(),
        AlphaTone::Negative => text.red().to_string(),
        AlphaTone::Undefined => text,
    }
}

pub fn header(dashboard: &Dashboard) -> String {
    let bench = dashboard.benchmark();
    let window = match (bench.first_date(), bench.last_date()) {
        (Some(first), Some(last)) => format!("{} closes {first} → {last}", bench.len()),
        _ => "no benchmark data".yellow().to_string(),
    };
    format!(
        "{}\n{} holdings · benchmark {} ({window})",
        dashboard.title().bold(),
        dashboard.holdings().len(),
        dashboard.benchmark_symbol(),
    )
}

pub fn performance_table(dashboard: &Dashboard) -> String {
    let lines: Vec<PerformanceLine> = dashboard
        .results()
        .into_iter()
        .map(|r| PerformanceLine {
            row: r.row + 1,
            symbol: r.symbol,
            current_price: money(r.current_price),
            cost_basis: money(r.cost_basis),
            stock_return: percent(r.stock_return),
            benchmark_return: percent(r.benchmark_return),
            alpha: tinted_alpha(r.alpha, r.alpha_tone),
        })
        .collect();

    format!(
        "{}\n{}",
        format!("Performance vs. {}", dashboard.benchmark_symbol()).bold(),
        Table::new(lines).with(Style::rounded())
    )
}

pub fn editors_table(editors: &[RowEditor]) -> String {
    let lines: Vec<EditorLine> = editors
        .iter()
        .map(|e| EditorLine {
            row: e.row + 1,
            symbol: e.symbol.clone(),
            hold_duration: format!("{}. {}", e.hold_duration_index + 1, e.hold_duration),
            target_price: format!("{:.2}", e.target_price),
            stop_loss_price: format!("{:.2}", e.stop_loss_price),
        })
        .collect();

    let choices = HoldDuration::ALL
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {d}", i + 1))
        .collect::<Vec<_>>()
        .join("   ");

    format!(
        "{}\n{}",
        Table::new(lines).with(Style::rounded()),
        format!("Durations: {choices}").dimmed()
    )
}

#[derive(Serialize)]
struct JsonRow<'a> {
    #[serde(flatten)]
    row: &'a PerformanceRow,
    alpha_color: Option<&'static str>,
}

pub fn performance_json(dashboard: &Dashboard) -> anyhow::Result<String> {
    let results = dashboard.results();
    let rows: Vec<JsonRow<'_>> = results
        .iter()
        .map(|row| JsonRow {
            row,
            alpha_color: row.alpha_tone.color(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}
