use async_trait::async_trait;
use chrono::NaiveDate;
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use crate::storage::holdings_csv::parse_date;
use super::traits::PriceProvider;

const PROVIDER: &str = "Local CSV";

/// Benchmark history read from a local file in Yahoo's download layout
/// (`Date,Open,High,Low,Close,...`). Only `Date` and `Close` are used.
///
/// The file holds a single ticker, so the requested symbol is not checked.
pub struct CsvHistoryProvider {
    path: PathBuf,
}

impl CsvHistoryProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parse `Date`/`Close` rows from any reader, keeping those in `[from, to]`.
    /// Rows with an unreadable date or close are skipped.
    pub fn read_points<R: Read>(
        reader: R,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
        };
        let date_idx = find("Date")?;
        let close_idx = find("Close")?;

        let mut points = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(date) = record.get(date_idx).and_then(parse_date) else {
                continue;
            };
            let Some(price) = record.get(close_idx).and_then(|c| c.parse::<f64>().ok()) else {
                continue;
            };
            if date >= from && date <= to {
                points.push(PricePoint { date, price });
            }
        }
        Ok(points)
    }
}

#[async_trait]
impl PriceProvider for CsvHistoryProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_price_range(
        &self,
        _symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        debug!(path = %self.path.display(), "reading benchmark history file");
        let file = std::fs::File::open(&self.path)?;
        Self::read_points(file, from, to)
    }
}
