pub mod registry;
pub mod traits;

// Benchmark history sources
pub mod alphavantage;
pub mod csv_history;
pub mod yahoo_finance;
