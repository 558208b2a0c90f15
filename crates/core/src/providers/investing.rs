use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::{Constituent, ConstituentProvider};
use crate::errors::CoreError;

const BASE_URL: &str = "https://api.investing.com/api/financialdata/assets";

/// Investing.com listing provider for index constituents.
///
/// - **Free**: no API key required.
/// - **Coverage**: global equity listings with index membership, which is
///   what lets us narrow a whole country's stocks down to one index.
/// - **Endpoint**: `/stocks/{country}` returning a JSON array of rows.
///
/// The endpoint is unofficial and changes occasionally. Any failure here —
/// network, HTTP status, schema drift — surfaces as `ProviderUnavailable`,
/// and the universe service degrades to its fixed fallback list.
pub struct InvestingProvider {
    client: Client,
}

impl InvestingProvider {
    pub fn new() -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for InvestingProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Investing.com API response types ────────────────────────────────

#[derive(Deserialize)]
struct StockRow {
    symbol: String,
    #[serde(default)]
    index: String,
}

#[async_trait]
impl ConstituentProvider for InvestingProvider {
    fn name(&self) -> &str {
        "Investing.com"
    }

    async fn fetch_constituents(&self, country: &str) -> Result<Vec<Constituent>, CoreError> {
        let url = format!("{BASE_URL}/stocks/{country}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CoreError::ProviderUnavailable {
                provider: self.name().to_string(),
                message: format!("HTTP {} for {country} stock listing", response.status()),
            });
        }

        // Parse from the body text so schema drift is reported distinctly
        // from transport failures.
        let body = response.text().await?;
        let rows: Vec<StockRow> =
            serde_json::from_str(&body).map_err(|e| CoreError::ProviderUnavailable {
                provider: self.name().to_string(),
                message: format!("Unexpected listing schema for {country}: {e}"),
            })?;

        Ok(rows
            .into_iter()
            .map(|row| Constituent {
                symbol: row.symbol,
                index: row.index,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_rows_deserialize() {
        let body = r#"[
            {"symbol": "PETR4", "index": "IBOV"},
            {"symbol": "VALE3", "index": "IBOV"},
            {"symbol": "XPTO3"}
        ]"#;
        let rows: Vec<StockRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].symbol, "PETR4");
        assert_eq!(rows[0].index, "IBOV");
        // Rows without an index field still parse; the universe service
        // filters them out.
        assert_eq!(rows[2].index, "");
    }
}
