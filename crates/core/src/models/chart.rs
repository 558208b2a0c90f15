use serde::{Deserialize, Serialize};

use super::price::PricePoint;

/// One date-sorted line of the price chart.
///
/// The core computes all the numbers — the frontend only renders. Null
/// cells are dropped, so a series may span fewer dates than its view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Column name in the view (the suffixed ticker).
    pub name: String,
    pub points: Vec<PricePoint>,
}
