use thiserror::Error;

/// Unified error type for the entire dashboard core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Providers ───────────────────────────────────────────────────
    #[error("Provider error ({provider}): {message}")]
    ProviderUnavailable {
        provider: String,
        message: String,
    },

    // ── Universe cache ──────────────────────────────────────────────
    #[error("Universe cache unreadable: {0}")]
    CacheUnreadable(String),

    // ── Filtering / requests ────────────────────────────────────────
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    // ── Performance ─────────────────────────────────────────────────
    #[error("Insufficient data for {symbol}: fewer than two close prices in the window")]
    InsufficientData {
        symbol: String,
    },
}

impl CoreError {
    /// True for conditions the pipeline recovers from locally (fallback
    /// universe, empty matrix, cache re-resolution). `InvalidSelection`
    /// is the only kind that rejects the operation outright.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoreError::InvalidSelection(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::CacheUnreadable(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::CacheUnreadable(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs embedded in reqwest messages so
        // provider tokens never end up in logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::ProviderUnavailable {
            provider: "http".into(),
            message: sanitized,
        }
    }
}
