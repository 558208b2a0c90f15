use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;
use tracing::warn;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::matrix::PriceMatrix;
use crate::models::price::PricePoint;
use crate::models::symbol::Symbol;

/// Yahoo Finance quote provider for close-price history.
///
/// - **Free**: no API key required.
/// - **No strict rate limits** (unofficial public API).
/// - **Coverage**: global equities — B3 symbols via the `.SA` suffix.
///
/// Uses the `yahoo_finance_api` crate, which wraps Yahoo Finance's public
/// endpoints. The batch is assembled one symbol at a time: a symbol Yahoo
/// cannot resolve becomes an all-null column, and only when every symbol
/// fails does the whole batch count as a provider failure.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector =
            yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::ProviderUnavailable {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to create connector: {e}"),
            })?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let month: time::Month = match date.month() {
            1 => time::Month::January,
            2 => time::Month::February,
            3 => time::Month::March,
            4 => time::Month::April,
            5 => time::Month::May,
            6 => time::Month::June,
            7 => time::Month::July,
            8 => time::Month::August,
            9 => time::Month::September,
            10 => time::Month::October,
            11 => time::Month::November,
            12 => time::Month::December,
            _ => unreachable!(),
        };

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| CoreError::ProviderUnavailable {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid date {date}: {e}"),
            })?
            .with_hms(0, 0, 0)
            .map_err(|e| CoreError::ProviderUnavailable {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid time for {date}: {e}"),
            })?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    /// Close series for one symbol over `[start, end]` inclusive.
    async fn close_series(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let from = Self::to_offset_datetime(start)?;
        // get_quote_history treats the end as exclusive
        let to = Self::to_offset_datetime(end + chrono::Duration::days(1))?;

        let resp = self
            .connector
            .get_quote_history(symbol.as_str(), from, to)
            .await
            .map_err(|e| CoreError::ProviderUnavailable {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::ProviderUnavailable {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                // Only in-range, plausible closes land in the matrix
                if date >= start && date <= end && q.close.is_finite() && q.close > 0.0 {
                    Some(PricePoint {
                        date,
                        close: q.close,
                    })
                } else {
                    None
                }
            })
            .collect();

        Ok(points)
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn close_history(
        &self,
        symbols: &[Symbol],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceMatrix, CoreError> {
        let mut series = Vec::with_capacity(symbols.len());
        let mut failures = 0usize;

        for symbol in symbols {
            match self.close_series(symbol, start, end).await {
                Ok(points) => series.push((symbol.as_str().to_string(), points)),
                Err(e) => {
                    // Unresolvable symbol → all-null column, batch survives
                    warn!(symbol = %symbol, error = %e, "no close history for symbol");
                    failures += 1;
                    series.push((symbol.as_str().to_string(), Vec::new()));
                }
            }
        }

        if !symbols.is_empty() && failures == symbols.len() {
            return Err(CoreError::ProviderUnavailable {
                provider: self.name().to_string(),
                message: format!("all {failures} symbols failed to fetch"),
            });
        }

        Ok(PriceMatrix::from_series(series))
    }
}
