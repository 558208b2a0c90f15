use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::matrix::PriceMatrix;
use crate::models::price::{QuoteCache, QuoteRequest};
use crate::models::symbol::Symbol;
use crate::providers::traits::QuoteProvider;

/// Loads multi-symbol close-price matrices with explicit memoization.
///
/// Cache strategy: results are keyed by the exact deduplicated
/// `(symbols, start, end)` triple. A repeated request is served from the
/// cache without touching the provider; any different key fetches. Only
/// successful loads are memoized — a degraded (empty) result is retried on
/// the next call rather than pinned for the process lifetime.
pub struct PriceService {
    provider: Box<dyn QuoteProvider>,
}

impl PriceService {
    pub fn new(provider: Box<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Load the close-price matrix for `symbols` over `[start, end]`,
    /// both ends inclusive.
    ///
    /// Duplicate symbols are collapsed before the request (first occurrence
    /// wins). Total provider failure is not an error here: it is logged and
    /// degrades to an empty matrix. `Err` is reserved for requests that are
    /// invalid regardless of the provider.
    pub async fn load_prices(
        &self,
        cache: &mut QuoteCache,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix, CoreError> {
        if symbols.is_empty() {
            return Err(CoreError::InvalidSelection(
                "no symbols requested".to_string(),
            ));
        }
        if start > end {
            return Err(CoreError::InvalidSelection(format!(
                "start {start} is after end {end}"
            )));
        }

        let request = QuoteRequest::new(symbols, start, end);
        if let Some(matrix) = cache.get(&request) {
            debug!(
                symbols = request.symbols().len(),
                "serving close-price matrix from cache"
            );
            return Ok(matrix.clone());
        }

        match self
            .provider
            .close_history(request.symbols(), start, end)
            .await
        {
            Ok(matrix) => {
                cache.insert(request, matrix.clone());
                Ok(matrix)
            }
            Err(e) => {
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "quote provider failed; returning empty price matrix"
                );
                Ok(PriceMatrix::empty())
            }
        }
    }
}
