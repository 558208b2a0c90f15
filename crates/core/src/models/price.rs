use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::matrix::PriceMatrix;
use super::symbol::Symbol;

/// A single close observation (date → closing price).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Memoization key for the price loader: the exact deduplicated symbol
/// sequence plus the inclusive date range. Two requests with the same
/// symbols in the same order over the same range are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteRequest {
    symbols: Vec<Symbol>,
    start: NaiveDate,
    end: NaiveDate,
}

impl QuoteRequest {
    /// Capture a request, deduplicating `symbols` (first occurrence wins).
    pub fn new(symbols: &[Symbol], start: NaiveDate, end: NaiveDate) -> Self {
        let mut deduped: Vec<Symbol> = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if !deduped.contains(symbol) {
                deduped.push(symbol.clone());
            }
        }
        Self {
            symbols: deduped,
            start,
            end,
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Explicit keyed store backing the price loader's memoization.
///
/// A repeated request must be served from here without touching the quote
/// provider; a request with any different key always fetches. Lives for the
/// process lifetime — there is no invalidation beyond restart.
#[derive(Debug, Clone, Default)]
pub struct QuoteCache {
    entries: HashMap<QuoteRequest, PriceMatrix>,
}

impl QuoteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request: &QuoteRequest) -> Option<&PriceMatrix> {
        self.entries.get(request)
    }

    pub fn insert(&mut self, request: QuoteRequest, matrix: PriceMatrix) {
        self.entries.insert(request, matrix);
    }

    /// Number of distinct memoized requests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
