use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::holding::{
    alpha_column, benchmark_return_column, Holding, HoldingsTable, COL_COST_BASIS,
    COL_COST_BASIS_TOTAL, COL_CURRENT_PRICE, COL_CURRENT_VALUE, COL_HOLD_DURATION,
    COL_PURCHASE_DATE, COL_STOCK_RETURN, COL_STOP_LOSS_PRICE, COL_SYMBOL, COL_TARGET_PRICE,
    REQUIRED_COLUMNS,
};
use crate::models::performance::HoldingPerformance;

/// Date layouts seen in brokerage exports, tried in order. `%Y` also accepts
/// a two-digit year, so `03/01/24` would read as year 3 under `%Y/%m/%d`:
/// the month-first layouts go first, two-digit year before four-digit.
const DATE_FORMATS: [&str; 4] = ["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// Parse a calendar date. A trailing time part (`2024-03-01 00:00:00`,
/// `2024-03-01T09:30:00Z`) is accepted and dropped.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let date_part = text
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(text);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Coerce a cell to a number. Empty, non-numeric and non-finite text all
/// become `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Read the holdings CSV at `path`, dropping every `cash_symbol` row.
pub fn read_holdings(path: impl AsRef<Path>, cash_symbol: &str) -> Result<HoldingsTable, CoreError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading holdings");
    let file = std::fs::File::open(path)
        .map_err(|e| CoreError::FileIO(format!("Cannot open {}: {e}", path.display())))?;
    read_holdings_from_reader(file, cash_symbol)
}

/// Read holdings from any CSV source. See [`read_holdings`].
pub fn read_holdings_from_reader<R: Read>(
    reader: R,
    cash_symbol: &str,
) -> Result<HoldingsTable, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true) // footers and short rows must not abort the load
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == required) {
            return Err(CoreError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    let mut skipped_cash = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > columns.len() {
            warn!(
                line = idx + 2,
                cells = record.len(),
                columns = columns.len(),
                "extra cells beyond the header are dropped"
            );
        }
        let raw_fields: HashMap<String, String> = columns
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        let holding = holding_from_fields(raw_fields, idx + 2);
        if holding.symbol.trim() == cash_symbol {
            skipped_cash += 1;
            continue;
        }
        rows.push(holding);
    }

    debug!(rows = rows.len(), skipped_cash, "holdings parsed");
    Ok(HoldingsTable { columns, rows })
}

/// `line` is the 1-based CSV line, for warnings only.
fn holding_from_fields(raw_fields: HashMap<String, String>, line: usize) -> Holding {
    let cell = |name: &str| raw_fields.get(name).map(String::as_str).unwrap_or("");

    let symbol = cell(COL_SYMBOL).to_string();

    let date_text = cell(COL_PURCHASE_DATE);
    let purchase_date = parse_date(date_text);
    if purchase_date.is_none() && !date_text.trim().is_empty() {
        warn!(line, %symbol, value = date_text, "unparseable purchase date");
    }

    let duration = cell(COL_HOLD_DURATION);
    let expected_hold_duration = (!duration.trim().is_empty()).then(|| duration.to_string());

    Holding {
        purchase_date,
        cost_basis_total: parse_number(cell(COL_COST_BASIS_TOTAL)),
        current_value: parse_number(cell(COL_CURRENT_VALUE)),
        expected_hold_duration,
        target_price: parse_number(cell(COL_TARGET_PRICE)),
        stop_loss_price: parse_number(cell(COL_STOP_LOSS_PRICE)),
        symbol,
        raw_fields,
    }
}

/// Output header: the input columns in order, then any derived column the
/// input didn't already have.
pub fn output_columns(table: &HoldingsTable, benchmark_symbol: &str) -> Vec<String> {
    let mut columns = table.columns.clone();
    for derived in derived_columns(benchmark_symbol) {
        if !columns.contains(&derived) {
            columns.push(derived);
        }
    }
    columns
}

fn derived_columns(benchmark_symbol: &str) -> [String; 5] {
    [
        benchmark_return_column(benchmark_symbol),
        COL_COST_BASIS.to_string(),
        COL_CURRENT_PRICE.to_string(),
        COL_STOCK_RETURN.to_string(),
        alpha_column(benchmark_symbol),
    ]
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the table and its derived figures as CSV. `performance[i]` belongs
/// to `table.rows[i]`; a missing entry writes empty derived cells.
pub fn write_holdings<W: Write>(
    writer: W,
    table: &HoldingsTable,
    performance: &[HoldingPerformance],
    benchmark_symbol: &str,
) -> Result<(), CoreError> {
    let columns = output_columns(table, benchmark_symbol);
    let bench_col = benchmark_return_column(benchmark_symbol);
    let alpha_col = alpha_column(benchmark_symbol);

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&columns)?;

    for (idx, holding) in table.rows.iter().enumerate() {
        let perf = performance.get(idx).copied().unwrap_or_default();
        let record: Vec<String> = columns
            .iter()
            .map(|column| {
                let raw = || holding.raw(column).unwrap_or_default().to_string();
                match column.as_str() {
                    c if c == bench_col => format_number(perf.benchmark_return),
                    c if c == alpha_col => format_number(perf.alpha),
                    COL_COST_BASIS => format_number(perf.cost_basis),
                    COL_CURRENT_PRICE => format_number(perf.current_price),
                    COL_STOCK_RETURN => format_number(perf.stock_return),
                    COL_SYMBOL => holding.symbol.clone(),
                    COL_PURCHASE_DATE => holding
                        .purchase_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(raw),
                    COL_HOLD_DURATION => holding
                        .expected_hold_duration
                        .clone()
                        .unwrap_or_else(raw),
                    COL_TARGET_PRICE => holding
                        .target_price
                        .map(|v| v.to_string())
                        .unwrap_or_else(raw),
                    COL_STOP_LOSS_PRICE => holding
                        .stop_loss_price
                        .map(|v| v.to_string())
                        .unwrap_or_else(raw),
                    _ => raw(),
                }
            })
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the table to `path`, replacing whatever is there.
pub fn write_holdings_file(
    path: impl AsRef<Path>,
    table: &HoldingsTable,
    performance: &[HoldingPerformance],
    benchmark_symbol: &str,
) -> Result<(), CoreError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .map_err(|e| CoreError::FileIO(format!("Cannot write {}: {e}", path.display())))?;
    write_holdings(std::io::BufWriter::new(file), table, performance, benchmark_symbol)?;
    info!(path = %path.display(), rows = table.len(), "holdings saved");
    Ok(())
}

/// Render the table as CSV text.
pub fn holdings_to_csv_string(
    table: &HoldingsTable,
    performance: &[HoldingPerformance],
    benchmark_symbol: &str,
) -> Result<String, CoreError> {
    let mut buf = Vec::new();
    write_holdings(&mut buf, table, performance, benchmark_symbol)?;
    String::from_utf8(buf).map_err(|e| CoreError::Serialization(e.to_string()))
}
