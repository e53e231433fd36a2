use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::price::BenchmarkSeries;
use crate::providers::registry::PriceProviderRegistry;

/// Fetches benchmark history from the registered providers.
///
/// Providers are tried in registration order. A provider that errors or
/// returns no usable closes is skipped and the next one is asked. There is
/// no retry of the same provider.
pub struct BenchmarkService {
    registry: PriceProviderRegistry,
}

impl BenchmarkService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of all registered providers, in fallback order.
    pub fn get_provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Daily closes for `symbol` in `[from, to]` from the first provider
    /// that delivers at least one valid close.
    ///
    /// Returns the last provider error when all of them fail.
    pub async fn fetch_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BenchmarkSeries, CoreError> {
        if from > to {
            return Err(CoreError::ValidationError(format!(
                "benchmark start ({from}) is after end ({to})"
            )));
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider(symbol.to_string()));
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_price_range(symbol, from, to).await {
                Ok(points) => {
                    let series = BenchmarkSeries::from_points(symbol, points);
                    if series.is_empty() {
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!("No valid closes for {symbol} between {from} and {to}"),
                        });
                        continue;
                    }
                    debug!(
                        provider = provider.name(),
                        %symbol,
                        points = series.len(),
                        "benchmark history fetched"
                    );
                    return Ok(series);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "benchmark provider failed");
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(symbol.to_string())))
    }

    /// Like [`fetch_history`](Self::fetch_history), but a failure yields an
    /// empty series. Every benchmark-derived figure is then undefined while
    /// the holdings still load.
    pub async fn fetch_history_or_empty(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> BenchmarkSeries {
        match self.fetch_history(symbol, from, to).await {
            Ok(series) => series,
            Err(e) => {
                warn!(
                    %symbol,
                    error = %e,
                    "benchmark history unavailable; benchmark returns will be empty"
                );
                BenchmarkSeries::empty(symbol)
            }
        }
    }
}
