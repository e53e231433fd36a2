use chrono::NaiveDate;

use crate::models::holding::{Holding, HoldingsTable};
use crate::models::performance::HoldingPerformance;
use crate::models::price::BenchmarkSeries;

/// Benchmark move from the first close on or after `purchase_date` to the
/// latest close: `(end − start) / start`.
///
/// `None` when the purchase date is unknown, when the series has no trading
/// day on or after it (including an empty series), or when the result is not
/// finite.
pub fn benchmark_return(series: &BenchmarkSeries, purchase_date: Option<NaiveDate>) -> Option<f64> {
    let start = series.first_on_or_after(purchase_date?)?.price;
    let end = series.latest()?.price;
    finite((end - start) / start)
}

/// `(current_value − cost_basis) / cost_basis`, `None` when either side is
/// missing or the cost basis is zero.
pub fn stock_return(cost_basis: Option<f64>, current_value: Option<f64>) -> Option<f64> {
    let cost = cost_basis.filter(|c| *c != 0.0)?;
    let current = current_value?;
    finite((current - cost) / cost)
}

/// `stock_return − benchmark_return`, `None` if either is.
pub fn alpha(stock_return: Option<f64>, benchmark_return: Option<f64>) -> Option<f64> {
    finite(stock_return? - benchmark_return?)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Derives the per-holding figures. Pure: the same table and series always
/// give the same result.
pub struct ReturnsService;

impl ReturnsService {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, holding: &Holding, series: &BenchmarkSeries) -> HoldingPerformance {
        let cost_basis = holding.cost_basis_total;
        let current_price = holding.current_value;
        let stock_return = stock_return(cost_basis, current_price);
        let benchmark_return = benchmark_return(series, holding.purchase_date);

        HoldingPerformance {
            cost_basis,
            current_price,
            stock_return,
            benchmark_return,
            alpha: alpha(stock_return, benchmark_return),
        }
    }

    /// One entry per row, in row order.
    pub fn compute_all(&self, table: &HoldingsTable, series: &BenchmarkSeries) -> Vec<HoldingPerformance> {
        table
            .rows
            .iter()
            .map(|holding| self.compute(holding, series))
            .collect()
    }
}

impl Default for ReturnsService {
    fn default() -> Self {
        Self::new()
    }
}
