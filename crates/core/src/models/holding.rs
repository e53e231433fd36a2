use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Column names of the brokerage export ────────────────────────────

pub const COL_SYMBOL: &str = "Symbol";
pub const COL_PURCHASE_DATE: &str = "Purchase Date";
pub const COL_COST_BASIS_TOTAL: &str = "Cost Basis Total";
pub const COL_CURRENT_VALUE: &str = "Current Value";
pub const COL_HOLD_DURATION: &str = "Expected Hold Duration";
pub const COL_TARGET_PRICE: &str = "Target Price";
pub const COL_STOP_LOSS_PRICE: &str = "Stop Loss Price";

// Derived columns appended on save. The benchmark-specific ones are named
// after the ticker, see `benchmark_return_column` / `alpha_column`.
pub const COL_COST_BASIS: &str = "Cost Basis";
pub const COL_CURRENT_PRICE: &str = "Current Price";
pub const COL_STOCK_RETURN: &str = "Stock Return";

pub fn benchmark_return_column(benchmark_symbol: &str) -> String {
    format!("{benchmark_symbol} Return")
}

pub fn alpha_column(benchmark_symbol: &str) -> String {
    format!("Alpha vs {benchmark_symbol}")
}

/// Columns every holdings CSV must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_SYMBOL,
    COL_PURCHASE_DATE,
    COL_COST_BASIS_TOTAL,
    COL_CURRENT_VALUE,
    COL_HOLD_DURATION,
    COL_TARGET_PRICE,
    COL_STOP_LOSS_PRICE,
];

/// One position from the brokerage export.
///
/// Numeric fields are `None` when the cell was empty or not a number; that
/// never rejects the row. `raw_fields` keeps every original cell (keyed by
/// column name) so columns we don't interpret are written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,

    pub purchase_date: Option<NaiveDate>,

    pub cost_basis_total: Option<f64>,

    pub current_value: Option<f64>,

    /// Stored hold-duration text. Not constrained to the selector's choices
    /// until the row passes through an editor.
    pub expected_hold_duration: Option<String>,

    pub target_price: Option<f64>,

    pub stop_loss_price: Option<f64>,

    #[serde(default)]
    pub raw_fields: HashMap<String, String>,
}

impl Holding {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            purchase_date: None,
            cost_basis_total: None,
            current_value: None,
            expected_hold_duration: None,
            target_price: None,
            stop_loss_price: None,
            raw_fields: HashMap::new(),
        }
    }

    /// Builder-style setters, mostly useful in tests and fixtures.
    pub fn with_purchase_date(mut self, date: NaiveDate) -> Self {
        self.purchase_date = Some(date);
        self
    }

    pub fn with_values(mut self, cost_basis_total: f64, current_value: f64) -> Self {
        self.cost_basis_total = Some(cost_basis_total);
        self.current_value = Some(current_value);
        self
    }

    pub fn with_hold_duration(mut self, duration: impl Into<String>) -> Self {
        self.expected_hold_duration = Some(duration.into());
        self
    }

    pub fn with_targets(mut self, target_price: f64, stop_loss_price: f64) -> Self {
        self.target_price = Some(target_price);
        self.stop_loss_price = Some(stop_loss_price);
        self
    }

    /// Original cell text for a column, if the row came from a CSV.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.raw_fields.get(column).map(String::as_str)
    }
}

/// The single in-memory table: column order as read, plus the rows that
/// survived cash exclusion. A row's identifier is its index in `rows`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Holding>,
}

impl HoldingsTable {
    /// A table with the standard columns and the given rows.
    pub fn new(rows: Vec<Holding>) -> Self {
        Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&Holding> {
        self.rows.get(row)
    }

    pub fn get_mut(&mut self, row: usize) -> Option<&mut Holding> {
        self.rows.get_mut(row)
    }
}
