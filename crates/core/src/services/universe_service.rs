use tracing::warn;

use crate::models::symbol::SymbolUniverse;
use crate::providers::traits::ConstituentProvider;

/// Fixed fallback universe: one well-known liquid name per major IBOV
/// sector, used whenever the constituents source is unavailable.
const FALLBACK_TICKERS: [&str; 8] = [
    "PETR4", "VALE3", "ITUB4", "BBDC4", "B3SA3", "BBAS3", "ABEV3", "MGLU3",
];

/// Resolves the universe of tradable symbols for one index.
///
/// Wraps the external constituents source; resolution never fails — any
/// provider error (network, schema, outage) is logged and degrades to the
/// fixed fallback list. Persisting the result is the cache's job, not ours.
pub struct UniverseService {
    source: Box<dyn ConstituentProvider>,
    index: String,
    country: String,
}

impl UniverseService {
    pub fn new(
        source: Box<dyn ConstituentProvider>,
        index: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            source,
            index: index.into(),
            country: country.into(),
        }
    }

    /// Resolve the index universe from the external source.
    ///
    /// Rows are filtered to the configured index and suffix-normalized.
    /// Returns the fallback universe on provider failure, and also when the
    /// source answers but has no rows for the index (schema drift looks
    /// exactly like that).
    pub async fn resolve_universe(&self) -> SymbolUniverse {
        match self.source.fetch_constituents(&self.country).await {
            Ok(rows) => {
                let universe = SymbolUniverse::from_raw(
                    rows.iter()
                        .filter(|row| row.index == self.index)
                        .map(|row| row.symbol.as_str()),
                );
                if universe.is_empty() {
                    warn!(
                        provider = self.source.name(),
                        index = %self.index,
                        "constituents source returned no rows for index; using fallback universe"
                    );
                    Self::fallback_universe()
                } else {
                    universe
                }
            }
            Err(e) => {
                warn!(
                    provider = self.source.name(),
                    error = %e,
                    "failed to fetch index constituents; using fallback universe"
                );
                Self::fallback_universe()
            }
        }
    }

    /// The deterministic, non-empty universe used when resolution degrades.
    pub fn fallback_universe() -> SymbolUniverse {
        SymbolUniverse::from_raw(FALLBACK_TICKERS)
    }
}
