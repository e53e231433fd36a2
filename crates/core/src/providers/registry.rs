use tracing::warn;

use crate::models::settings::Settings;

use super::alphavantage::AlphaVantageProvider;
use super::csv_history::CsvHistoryProvider;
use super::traits::PriceProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered list of benchmark history providers.
///
/// Registration order is priority order: the benchmark service asks the
/// first provider and falls back to the next one on failure.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the providers the settings allow.
    ///
    /// Order: local history file (if configured), Yahoo Finance, Alpha
    /// Vantage (if a key is configured). A configured file wins so that an
    /// offline setup never touches the network.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        if let Some(path) = &settings.benchmark.history_path {
            registry.register(Box::new(CsvHistoryProvider::new(path.clone())));
        }

        // Yahoo Finance — no API key needed (primary)
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => warn!(error = %e, "Yahoo Finance provider unavailable"),
        }

        // Alpha Vantage — requires API key (fallback)
        if let Some(key) = settings.api_key("alphavantage") {
            registry.register(Box::new(AlphaVantageProvider::new(key.to_string())));
        }

        registry
    }

    /// Register a new price provider at the lowest priority.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// All providers in priority order.
    pub fn providers(&self) -> Vec<&dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
