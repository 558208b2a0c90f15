use crate::models::chart::ChartSeries;
use crate::models::matrix::PriceMatrix;

/// Extract chart-ready line series from a filtered view, one per column.
///
/// Null cells are dropped from each series (a line chart has nothing to
/// draw there). The canonical "Close" alias is a second name for an
/// existing column, not a column, so it does not produce an extra series.
pub fn chart_series(view: &PriceMatrix) -> Vec<ChartSeries> {
    view.columns()
        .iter()
        .filter_map(|name| {
            view.column_points(name).map(|points| ChartSeries {
                name: name.clone(),
                points,
            })
        })
        .collect()
}
