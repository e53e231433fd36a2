use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Alpha Vantage provider, used as a fallback when Yahoo Finance fails.
///
/// - **Free tier**: 25 requests/day.
/// - **Requires**: API key (settings `api_keys.alphavantage`).
/// - **Strategy**: one `TIME_SERIES_DAILY` call with full output per load,
///   filtered locally to the requested window.
pub struct AlphaVantageProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the provider at a different endpoint (proxies, test servers).
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }
}

// ── Alpha Vantage API response types ────────────────────────────────

#[derive(Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyData>>,

    #[serde(rename = "Note")]
    note: Option<String>,

    #[serde(rename = "Error Message")]
    error_message: Option<String>,

    /// Sent instead of data for premium-only parameters and some key problems.
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl TimeSeriesResponse {
    /// The daily series, or the reason Alpha Vantage gave for leaving it out.
    fn into_series(self, symbol: &str) -> Result<HashMap<String, DailyData>, CoreError> {
        if let Some(message) = self.error_message {
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message,
            });
        }

        let note = self.note.or(self.information);
        self.time_series.ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: note.unwrap_or_else(|| {
                format!("No time series data for {symbol}. API limit may be exceeded.")
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
struct DailyData {
    #[serde(rename = "4. close")]
    close: String,
}

/// Keep the dated closes inside `[from, to]`, skipping anything unparseable.
fn points_in_range(
    series: &HashMap<String, DailyData>,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<PricePoint> {
    let mut points: Vec<PricePoint> = series
        .iter()
        .filter_map(|(date_str, data)| {
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
            if date < from || date > to {
                return None;
            }
            let price: f64 = data.close.trim().parse().ok()?;
            Some(PricePoint { date, price })
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_price_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        debug!(%symbol, %from, %to, "requesting Alpha Vantage daily series");

        let resp: TimeSeriesResponse = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", &symbol.to_uppercase()),
                ("outputsize", "full"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse time series for {symbol}: {e}"),
            })?;

        let series = resp.into_series(symbol)?;
        Ok(points_in_range(&series, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_and_filters_daily_series() {
        let body = r#"{
            "Meta Data": {"2. Symbol": "SPY"},
            "Time Series (Daily)": {
                "2024-01-03": {"1. open": "1", "4. close": "470.50"},
                "2024-01-02": {"1. open": "1", "4. close": "472.65"},
                "2023-12-29": {"1. open": "1", "4. close": "475.31"},
                "2024-01-04": {"1. open": "1", "4. close": "n/a"}
            }
        }"#;
        let resp: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        let series = resp.time_series.unwrap();

        let points = points_in_range(&series, date("2024-01-01"), date("2024-01-31"));

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, date("2024-01-02"));
        assert_eq!(points[1].price, 470.50);
    }

    #[test]
    fn rate_limit_note_has_no_series() {
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        let resp: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        assert!(resp.time_series.is_none());
        assert!(resp.note.unwrap().contains("rate limit"));
    }

    #[test]
    fn premium_information_is_reported() {
        let body = r#"{"Information": "Thank you for using Alpha Vantage! The outputsize=full parameter value is a premium feature."}"#;
        let resp: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        let err = resp.into_series("SPY").unwrap_err();
        assert!(matches!(err, CoreError::Api { ref message, .. } if message.contains("premium")));
    }

    #[test]
    fn error_message_wins_over_note() {
        let body = r#"{"Error Message": "Invalid API call.", "Note": "slow down"}"#;
        let resp: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        let err = resp.into_series("SPY").unwrap_err();
        assert!(matches!(err, CoreError::Api { ref message, .. } if message == "Invalid API call."));
    }
}
