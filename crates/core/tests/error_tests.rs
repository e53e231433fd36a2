// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use drypowder_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "File I/O error: permission denied");
    }

    #[test]
    fn csv() {
        let err = CoreError::Csv("unequal lengths".into());
        assert_eq!(err.to_string(), "CSV error: unequal lengths");
    }

    #[test]
    fn missing_column() {
        let err = CoreError::MissingColumn("Purchase Date".into());
        assert_eq!(err.to_string(), "Missing required column: Purchase Date");
    }

    #[test]
    fn config() {
        let err = CoreError::Config("benchmark symbol must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: benchmark symbol must not be empty"
        );
    }

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: "HTTP 429".into(),
        };
        assert_eq!(err.to_string(), "API error (Yahoo Finance): HTTP 429");
    }

    #[test]
    fn no_provider() {
        let err = CoreError::NoProvider("SPY".into());
        assert_eq!(err.to_string(), "No benchmark provider available for SPY");
    }

    #[test]
    fn row_not_found() {
        let err = CoreError::RowNotFound(7);
        assert_eq!(err.to_string(), "Row not found: 7");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("target price must be a finite number, got NaN".into());
        assert!(err.to_string().starts_with("Validation failed: target price"));
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("no such file")));
    }

    #[test]
    fn from_toml_error() {
        let parse: Result<toml::Table, _> = toml::from_str("title = ");
        let err: CoreError = parse.unwrap_err().into();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn from_serde_json_error() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: CoreError = parse.unwrap_err().into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn from_csv_parse_error_is_csv() {
        let data = "a,b\n1,2,3\n";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let csv_err = reader.records().next().unwrap().unwrap_err();
        let err: CoreError = csv_err.into();
        assert!(matches!(err, CoreError::Csv(_)));
    }

    #[test]
    fn errors_are_debug() {
        let err = CoreError::RowNotFound(3);
        assert!(format!("{err:?}").contains("RowNotFound"));
    }
}
