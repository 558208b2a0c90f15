use crate::errors::CoreError;
use crate::models::matrix::PriceMatrix;
use crate::models::performance::{
    AssetPerformance, PerformanceReport, PortfolioPerformance, ReturnOutcome,
};

/// Compute per-asset and equal-weight portfolio returns over a filtered view.
///
/// Per asset: `return = last_close / first_close - 1`, using the first and
/// last non-null closes in the window. An asset with fewer than two closes
/// gets the insufficient-data outcome — never a numeric zero — and is
/// excluded from the portfolio sums, so it cannot corrupt the aggregate.
///
/// Portfolio: every included asset starts at `notional_per_asset`; ending
/// value is `notional × (1 + return)`; the aggregate return is
/// `sum(ending) / sum(starting) - 1`. Whether a return is positive,
/// negative or zero is left to the presentation layer.
pub fn compute_performance(
    view: &PriceMatrix,
    notional_per_asset: f64,
) -> Result<PerformanceReport, CoreError> {
    if !notional_per_asset.is_finite() || notional_per_asset <= 0.0 {
        return Err(CoreError::InvalidSelection(format!(
            "notional per asset must be positive, got {notional_per_asset}"
        )));
    }

    let mut assets = Vec::with_capacity(view.column_count());
    let mut initial_value = 0.0;
    let mut final_value = 0.0;
    let mut assets_included = 0usize;

    for (col, name) in view.columns().iter().enumerate() {
        let mut observations = view.column_observations(col);
        let first = observations.next();
        // `last()` of the remainder is None when the column has fewer than
        // two closes in the window
        let last = observations.last();

        let outcome = match (first, last) {
            (Some(first_close), Some(last_close)) => {
                let asset_return = last_close / first_close - 1.0;
                initial_value += notional_per_asset;
                final_value += notional_per_asset * (1.0 + asset_return);
                assets_included += 1;
                ReturnOutcome::Return(asset_return)
            }
            _ => ReturnOutcome::InsufficientData,
        };

        assets.push(AssetPerformance {
            symbol: name.clone(),
            outcome,
        });
    }

    let portfolio = (assets_included > 0).then(|| PortfolioPerformance {
        initial_value,
        final_value,
        total_return: final_value / initial_value - 1.0,
        assets_included,
    });

    Ok(PerformanceReport {
        notional_per_asset,
        assets,
        portfolio,
    })
}
