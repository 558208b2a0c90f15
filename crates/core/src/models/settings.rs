use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dashboard configuration. Everything the pipeline needs is passed in
/// here explicitly — there is no module-level state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Path of the universe cache artifact. Created on the first cache
    /// miss; persists across runs, no teardown.
    pub universe_cache_path: PathBuf,

    /// Index whose constituents form the universe (e.g., "IBOV").
    pub index: String,

    /// Country passed to the constituents provider (e.g., "brazil").
    pub country: String,

    /// Fixed historical range requested from the quote provider.
    pub history_start: NaiveDate,
    pub history_end: NaiveDate,

    /// Starting allocation per asset in the synthetic equal-weight
    /// portfolio.
    pub notional_per_asset: f64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            universe_cache_path: PathBuf::from("IBOV.csv"),
            index: "IBOV".to_string(),
            country: "brazil".to_string(),
            history_start: NaiveDate::from_ymd_opt(2010, 1, 1).expect("valid calendar date"),
            history_end: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid calendar date"),
            notional_per_asset: 1000.0,
        }
    }
}
