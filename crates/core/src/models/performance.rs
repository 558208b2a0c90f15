use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Outcome of the return computation for one asset over the window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ReturnOutcome {
    /// Signed fractional return: `last_close / first_close - 1`
    /// (0.05 means +5%).
    Return(f64),
    /// Fewer than two close prices in the window — no return can be
    /// computed. Never reported as a numeric zero.
    InsufficientData,
}

impl ReturnOutcome {
    pub fn as_return(&self) -> Option<f64> {
        match self {
            ReturnOutcome::Return(r) => Some(*r),
            ReturnOutcome::InsufficientData => None,
        }
    }

    /// The return, or the taxonomy error for callers that need one.
    pub fn require(&self, symbol: &str) -> Result<f64, CoreError> {
        match self {
            ReturnOutcome::Return(r) => Ok(*r),
            ReturnOutcome::InsufficientData => Err(CoreError::InsufficientData {
                symbol: symbol.to_string(),
            }),
        }
    }
}

/// Per-asset line of the performance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    /// Column name in the view (the suffixed ticker).
    pub symbol: String,
    pub outcome: ReturnOutcome,
}

/// Aggregate of the synthetic equal-weight portfolio: every included asset
/// starts at the same notional, so gains and losses offset at equal weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPerformance {
    /// `assets_included × notional_per_asset`
    pub initial_value: f64,
    /// Sum of `notional × (1 + return)` over the included assets.
    pub final_value: f64,
    /// `final_value / initial_value - 1`
    pub total_return: f64,
    /// Assets with a defined return; insufficient-data assets are excluded
    /// from both sums.
    pub assets_included: usize,
}

/// Everything the presentation layer needs to describe performance over the
/// selected window. Derived entirely from the filtered view — stateless,
/// recomputed on every filter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub notional_per_asset: f64,
    /// One line per view column, in column order. Assets without a defined
    /// return appear here flagged, never in the aggregate.
    pub assets: Vec<AssetPerformance>,
    /// `None` when no asset in the view had a defined return.
    pub portfolio: Option<PortfolioPerformance>,
}

impl PerformanceReport {
    /// The defined return for `symbol`, if it has one.
    pub fn asset_return(&self, symbol: &str) -> Option<f64> {
        self.assets
            .iter()
            .find(|a| a.symbol == symbol)
            .and_then(|a| a.outcome.as_return())
    }
}
