use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PricePoint;

/// Source of daily closing prices for the benchmark ticker.
///
/// Yahoo Finance, Alpha Vantage and a local CSV file each implement this.
/// The benchmark service only ever talks to the trait, so a provider can be
/// replaced or reordered without touching the return calculations.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Daily closes for `symbol` between `from` and `to` (both inclusive).
    /// Order is not guaranteed; callers sort.
    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}
