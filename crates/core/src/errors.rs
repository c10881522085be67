use thiserror::Error;

/// Unified error type for the entire foliolens-core library.
///
/// The analytics pipeline itself (classification, normalization, metrics,
/// insights) never fails. Only the collaborators around it return
/// `Result<T, CoreError>`: broker and rate providers, the LLM client,
/// configuration and the analysis history store.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O / Config ───────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ── Analysis history ────────────────────────────────────────────
    #[error("Invalid analysis id: {0}")]
    InvalidAnalysisId(String),

    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),

    #[error("Analysis content is required")]
    EmptyAnalysis,

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Holding not found in portfolio: {0}")]
    UnknownHolding(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::Deserialization(format!("CSV: {e}"))
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; the Gemini key travels in the
        // query string, so everything after '?' is dropped.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
