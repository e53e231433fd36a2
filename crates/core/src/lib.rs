pub mod cache;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use cache::LoadCache;
use errors::CoreError;
use models::{
    duration::HoldDuration,
    editor::{RowEdits, RowEditor, WidgetState},
    holding::{Holding, HoldingsTable},
    performance::{AlphaTone, PerformanceRow},
    price::BenchmarkSeries,
    settings::Settings,
};
use providers::registry::PriceProviderRegistry;
use services::{
    benchmark_service::BenchmarkService,
    portfolio_service::{PortfolioService, PortfolioSnapshot},
};
use storage::holdings_csv;

/// Main entry point for the DryPowder core library.
///
/// One `Dashboard` is one editing session: the loaded holdings with their
/// derived figures, the editor values per row, and the save target.
/// Edits go straight into the in-memory rows; nothing touches disk until
/// [`save`](Self::save).
#[must_use]
pub struct Dashboard {
    settings: Settings,
    snapshot: PortfolioSnapshot,
    widgets: WidgetState,
    /// Tracks whether any edit has happened since the last load/save.
    dirty: bool,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("input", &self.settings.input_path)
            .field("rows", &self.snapshot.table.len())
            .field("benchmark", &self.settings.benchmark.symbol)
            .field("benchmark_points", &self.snapshot.benchmark.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Dashboard {
    /// Load with the default providers, measuring up to today.
    pub async fn load(settings: Settings) -> Result<Self, CoreError> {
        let registry = PriceProviderRegistry::new_with_defaults(&settings);
        Self::load_with_registry(settings, registry, today()).await
    }

    /// Load with an explicit provider registry and end date.
    pub async fn load_with_registry(
        settings: Settings,
        registry: PriceProviderRegistry,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let benchmark_service = BenchmarkService::new(registry);
        let snapshot = PortfolioService::new()
            .load(&settings, &benchmark_service, today)
            .await?;
        Ok(Self::from_snapshot(settings, snapshot))
    }

    /// Reuse the snapshot held in `cache`, loading (and storing) it first if
    /// the cache is empty. The session works on its own copy.
    pub async fn load_cached(
        cache: &LoadCache<PortfolioSnapshot>,
        settings: Settings,
        registry: PriceProviderRegistry,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        if let Some(snapshot) = cache.get() {
            info!("using cached portfolio snapshot");
            return Ok(Self::from_snapshot(settings, snapshot));
        }

        let dashboard = Self::load_with_registry(settings, registry, today).await?;
        cache.store(dashboard.snapshot.clone());
        Ok(dashboard)
    }

    /// Start a session over an already-loaded snapshot.
    ///
    /// Every row goes through its editors once, so a stored hold duration that
    /// is not one of the choices becomes the first choice, and missing prices
    /// become zero, exactly as the editors display them.
    pub fn from_snapshot(settings: Settings, snapshot: PortfolioSnapshot) -> Self {
        let mut dashboard = Self {
            settings,
            snapshot,
            widgets: WidgetState::new(),
            dirty: false,
        };
        dashboard.bind_editors();
        dashboard
    }

    // ── Read access ─────────────────────────────────────────────────

    #[must_use]
    pub fn title(&self) -> &str {
        &self.settings.title
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.snapshot.table.rows
    }

    #[must_use]
    pub fn table(&self) -> &HoldingsTable {
        &self.snapshot.table
    }

    #[must_use]
    pub fn benchmark(&self) -> &BenchmarkSeries {
        &self.snapshot.benchmark
    }

    #[must_use]
    pub fn benchmark_symbol(&self) -> &str {
        &self.settings.benchmark.symbol
    }

    #[must_use]
    pub fn as_of(&self) -> NaiveDate {
        self.snapshot.as_of
    }

    #[must_use]
    pub fn snapshot(&self) -> &PortfolioSnapshot {
        &self.snapshot
    }

    /// Whether anything was edited since the last load or save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ── Editors ─────────────────────────────────────────────────────

    /// The three editors of every row, in row order.
    #[must_use]
    pub fn row_editors(&self) -> Vec<RowEditor> {
        self.snapshot
            .table
            .rows
            .iter()
            .enumerate()
            .map(|(row, holding)| {
                let edits = self
                    .widgets
                    .get(row)
                    .copied()
                    .unwrap_or_else(|| RowEdits::defaults_for(holding));
                RowEditor::new(row, holding.symbol.clone(), edits)
            })
            .collect()
    }

    pub fn set_hold_duration(&mut self, row: usize, duration: HoldDuration) -> Result<(), CoreError> {
        self.edit_row(row, |edits| edits.hold_duration = duration)
    }

    pub fn set_target_price(&mut self, row: usize, price: f64) -> Result<(), CoreError> {
        ensure_finite("target price", price)?;
        self.edit_row(row, |edits| edits.target_price = price)
    }

    pub fn set_stop_loss_price(&mut self, row: usize, price: f64) -> Result<(), CoreError> {
        ensure_finite("stop-loss price", price)?;
        self.edit_row(row, |edits| edits.stop_loss_price = price)
    }

    // ── Results ─────────────────────────────────────────────────────

    /// The read-only results table: one line per row with alpha's tone.
    #[must_use]
    pub fn results(&self) -> Vec<PerformanceRow> {
        self.snapshot
            .table
            .rows
            .iter()
            .zip(&self.snapshot.performance)
            .enumerate()
            .map(|(row, (holding, perf))| PerformanceRow {
                row,
                symbol: holding.symbol.clone(),
                current_price: perf.current_price,
                cost_basis: perf.cost_basis,
                stock_return: perf.stock_return,
                benchmark_return: perf.benchmark_return,
                alpha: perf.alpha,
                alpha_tone: AlphaTone::from_alpha(perf.alpha),
            })
            .collect()
    }

    // ── Save ────────────────────────────────────────────────────────

    /// Write the whole table, edits included, to the configured output file.
    /// Overwrites it every time. Returns the path written.
    pub fn save(&mut self) -> Result<PathBuf, CoreError> {
        let path = self.settings.output_path.clone();
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write the whole table to `path`, replacing any existing file.
    pub fn save_to(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        holdings_csv::write_holdings_file(
            path,
            &self.snapshot.table,
            &self.snapshot.performance,
            &self.settings.benchmark.symbol,
        )?;
        self.dirty = false;
        Ok(())
    }

    /// The CSV that [`save`](Self::save) would write.
    pub fn to_csv_string(&self) -> Result<String, CoreError> {
        holdings_csv::holdings_to_csv_string(
            &self.snapshot.table,
            &self.snapshot.performance,
            &self.settings.benchmark.symbol,
        )
    }

    // ── Internal ────────────────────────────────────────────────────

    fn bind_editors(&mut self) {
        for (row, holding) in self.snapshot.table.rows.iter_mut().enumerate() {
            let edits = *self.widgets.entry(row, holding);
            edits.apply_to(holding);
        }
    }

    fn edit_row(&mut self, row: usize, edit: impl FnOnce(&mut RowEdits)) -> Result<(), CoreError> {
        let holding = self
            .snapshot
            .table
            .get_mut(row)
            .ok_or(CoreError::RowNotFound(row))?;
        let edits = self.widgets.entry(row, holding);
        edit(edits);
        edits.apply_to(holding);
        self.dirty = true;
        Ok(())
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::ValidationError(format!("{field} must be a finite number, got {value}")))
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
