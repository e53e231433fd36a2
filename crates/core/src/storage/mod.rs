pub mod holdings_csv;
