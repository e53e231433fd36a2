// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry, local CSV history, Yahoo construction
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::io::Write;

use drypowder_core::errors::CoreError;
use drypowder_core::models::price::PricePoint;
use drypowder_core::models::settings::Settings;
use drypowder_core::providers::csv_history::CsvHistoryProvider;
use drypowder_core::providers::registry::PriceProviderRegistry;
use drypowder_core::providers::traits::PriceProvider;
use drypowder_core::providers::yahoo_finance::YahooFinanceProvider;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

struct MockProvider {
    name: String,
}

impl MockProvider {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_price_range(
        &self,
        _symbol: &str,
        from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![PricePoint { date: from, price: 100.0 }])
    }
}

const YAHOO_DOWNLOAD: &str = "\
Date,Open,High,Low,Close,Adj Close,Volume
2023-12-29,476.49,477.03,473.30,475.31,470.92,122234100
2024-01-02,472.16,473.67,470.49,472.65,468.29,123623700
2024-01-03,470.43,471.19,468.17,468.79,464.47,103585900
2024-01-04,null,null,null,null,null,null
2024-01-05,468.30,470.96,466.43,467.92,463.61,86060800
";

// ═══════════════════════════════════════════════════════════════════
// PriceProviderRegistry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn new_creates_empty_registry() {
        let registry = PriceProviderRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.providers().is_empty());
    }

    #[test]
    fn default_creates_empty_registry() {
        let registry = PriceProviderRegistry::default();
        assert!(registry.is_empty());
    }

    #[test]
    fn register_keeps_priority_order() {
        let mut registry = PriceProviderRegistry::new();
        registry.register(Box::new(MockProvider::new("first")));
        registry.register(Box::new(MockProvider::new("second")));
        assert_eq!(registry.provider_names(), vec!["first", "second"]);
        assert_eq!(registry.providers()[0].name(), "first");
    }

    #[test]
    fn defaults_without_keys_have_no_alpha_vantage() {
        let registry = PriceProviderRegistry::new_with_defaults(&Settings::default());
        assert!(!registry.provider_names().contains(&"Alpha Vantage".to_string()));
        assert!(!registry.provider_names().contains(&"Local CSV".to_string()));
    }

    #[test]
    fn defaults_with_key_append_alpha_vantage_last() {
        let mut settings = Settings::default();
        settings.api_keys.insert("alphavantage".into(), "demo".into());
        let registry = PriceProviderRegistry::new_with_defaults(&settings);
        assert_eq!(registry.provider_names().last().map(String::as_str), Some("Alpha Vantage"));
    }

    #[test]
    fn defaults_with_history_file_put_it_first() {
        let mut settings = Settings::default();
        settings.benchmark.history_path = Some("spy.csv".into());
        let registry = PriceProviderRegistry::new_with_defaults(&settings);
        assert_eq!(registry.provider_names()[0], "Local CSV");
    }
}

// ═══════════════════════════════════════════════════════════════════
// CsvHistoryProvider
// ═══════════════════════════════════════════════════════════════════

mod csv_history {
    use super::*;

    #[test]
    fn reads_date_and_close_in_range() {
        let points = CsvHistoryProvider::read_points(
            YAHOO_DOWNLOAD.as_bytes(),
            date("2024-01-01"),
            date("2024-01-31"),
        )
        .unwrap();

        // 2023-12-29 is outside the window, the null row is skipped
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], PricePoint { date: date("2024-01-02"), price: 472.65 });
        assert_eq!(points[2].price, 467.92);
    }

    #[test]
    fn header_match_ignores_case() {
        let data = "date,close\n2024-01-02,10\n";
        let points =
            CsvHistoryProvider::read_points(data.as_bytes(), date("2024-01-01"), date("2024-12-31"))
                .unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn missing_close_column() {
        let data = "Date,Open\n2024-01-02,10\n";
        let err =
            CsvHistoryProvider::read_points(data.as_bytes(), date("2024-01-01"), date("2024-12-31"))
                .unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn(ref c) if c == "Close"));
    }

    #[tokio::test]
    async fn provider_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAHOO_DOWNLOAD.as_bytes()).unwrap();

        let provider = CsvHistoryProvider::new(file.path());
        assert_eq!(provider.name(), "Local CSV");

        let points = provider
            .get_price_range("SPY", date("2023-12-01"), date("2024-01-03"))
            .await
            .unwrap();
        assert_eq!(points.len(), 3);
    }

    #[tokio::test]
    async fn provider_missing_file_is_io_error() {
        let provider = CsvHistoryProvider::new("/no/such/history.csv");
        let err = provider
            .get_price_range("SPY", date("2024-01-01"), date("2024-01-31"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// YahooFinanceProvider (construction only; no network in tests)
// ═══════════════════════════════════════════════════════════════════

mod yahoo {
    use super::*;

    #[test]
    fn constructs_and_names_itself() {
        let provider = YahooFinanceProvider::new().unwrap();
        assert_eq!(provider.name(), "Yahoo Finance");
    }
}
