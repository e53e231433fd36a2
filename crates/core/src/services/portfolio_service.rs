use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::CoreError;
use crate::models::holding::HoldingsTable;
use crate::models::performance::HoldingPerformance;
use crate::models::price::BenchmarkSeries;
use crate::models::settings::Settings;
use crate::services::benchmark_service::BenchmarkService;
use crate::services::returns_service::ReturnsService;
use crate::storage::holdings_csv;

/// Everything one load produces: the holdings, the benchmark history they
/// were measured against, and the derived figures (one per row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub table: HoldingsTable,
    pub benchmark: BenchmarkSeries,
    pub performance: Vec<HoldingPerformance>,
    /// Last day of the requested benchmark window
    pub as_of: NaiveDate,
}

/// Runs the load stage: CSV in, benchmark fetched, returns derived.
pub struct PortfolioService {
    returns_service: ReturnsService,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self {
            returns_service: ReturnsService::new(),
        }
    }

    /// Load holdings from `settings.input_path` and measure them against the
    /// benchmark window `[settings.benchmark.start_date, today]`.
    ///
    /// CSV errors are returned. Benchmark errors are not: they leave the
    /// series empty and the benchmark-derived figures undefined.
    pub async fn load(
        &self,
        settings: &Settings,
        benchmark_service: &BenchmarkService,
        today: NaiveDate,
    ) -> Result<PortfolioSnapshot, CoreError> {
        let table = holdings_csv::read_holdings(&settings.input_path, &settings.cash_symbol)?;
        Ok(self.build(settings, benchmark_service, table, today).await)
    }

    /// Same as [`load`](Self::load) for a table that is already in memory.
    pub async fn build(
        &self,
        settings: &Settings,
        benchmark_service: &BenchmarkService,
        table: HoldingsTable,
        today: NaiveDate,
    ) -> PortfolioSnapshot {
        let benchmark = benchmark_service
            .fetch_history_or_empty(&settings.benchmark.symbol, settings.benchmark.start_date, today)
            .await;

        let performance = self.returns_service.compute_all(&table, &benchmark);

        info!(
            holdings = table.len(),
            benchmark = %settings.benchmark.symbol,
            benchmark_points = benchmark.len(),
            "portfolio loaded"
        );

        PortfolioSnapshot {
            table,
            benchmark,
            performance,
            as_of: today,
        }
    }

    /// Re-derive every row's figures against the snapshot's own series.
    pub fn recompute(&self, snapshot: &mut PortfolioSnapshot) {
        snapshot.performance = self
            .returns_service
            .compute_all(&snapshot.table, &snapshot.benchmark);
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
