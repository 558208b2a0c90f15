use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::matrix::PriceMatrix;
use crate::models::symbol::Symbol;

/// One row from an index-constituents source: a raw (unsuffixed) ticker
/// plus the index it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constituent {
    pub symbol: String,
    pub index: String,
}

/// Trait abstraction for index-constituents sources.
///
/// The universe service filters the rows down to the configured index and
/// normalizes the tickers; a source only has to deliver the raw listing.
/// If the source goes away, only its implementation is replaced.
#[async_trait]
pub trait ConstituentProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// All listed stocks for a country, with their index membership.
    async fn fetch_constituents(&self, country: &str) -> Result<Vec<Constituent>, CoreError>;
}

/// Trait abstraction for close-price history sources.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Batched close-price history for `symbols` over `[start, end]`,
    /// both ends inclusive.
    ///
    /// A symbol the source cannot resolve must come back as an all-null
    /// column rather than failing the batch. `Err` is reserved for total
    /// source failure.
    async fn close_history(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix, CoreError>;
}
