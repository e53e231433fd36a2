use thiserror::Error;

/// Unified error type for the entire drypowder-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// Only I/O-side failures travel through this type to the user. Return
/// calculations never fail: undefined inputs produce `None` instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── File I/O / CSV ──────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No benchmark provider available for {0}")]
    NoProvider(String),

    // ── Editing ─────────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Row not found: {0}")]
    RowNotFound(usize),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        if e.is_io_error() {
            CoreError::FileIO(e.to_string())
        } else {
            CoreError::Csv(e.to_string())
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; the query holds the API key.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
