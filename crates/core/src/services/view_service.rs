use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::matrix::PriceMatrix;
use crate::models::symbol::Symbol;

/// Apply the user's symbol selection and date sub-range to a loaded matrix.
///
/// Pure function of its inputs — the input matrix is left untouched and a
/// new one is returned.
///
/// - `symbols` of `None` (or an empty slice) keeps every column: an empty
///   selection means "whole universe view".
/// - A selection of exactly one symbol makes the resulting column also
///   answer to the canonical `"Close"` name, so single- and multi-asset
///   views read the same downstream.
/// - `range` of `None` defaults to the matrix's full date span; retained
///   dates satisfy `range.0 <= d <= range.1`, inclusive on both ends.
///
/// Fails with `InvalidSelection` when a requested symbol is not a column
/// of `matrix`, or when the range is inverted. On rejection the caller
/// keeps whatever view it already had.
pub fn filter_view(
    matrix: &PriceMatrix,
    symbols: Option<&[Symbol]>,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<PriceMatrix, CoreError> {
    let selection = symbols.unwrap_or_default();

    let column_indices: Vec<usize> = if selection.is_empty() {
        (0..matrix.column_count()).collect()
    } else {
        selection
            .iter()
            .map(|symbol| {
                matrix.column_index(symbol.as_str()).ok_or_else(|| {
                    CoreError::InvalidSelection(format!(
                        "{symbol} is not a column of the loaded price matrix"
                    ))
                })
            })
            .collect::<Result<_, _>>()?
    };

    if let Some((from, to)) = range {
        if from > to {
            return Err(CoreError::InvalidSelection(format!(
                "date range is inverted: {from} > {to}"
            )));
        }
    }

    let view = match (range, matrix.first_date(), matrix.last_date()) {
        (Some((from, to)), _, _) => matrix.slice(&column_indices, from, to),
        (None, Some(first), Some(last)) => matrix.slice(&column_indices, first, last),
        // No rows to begin with: the slice bounds are irrelevant
        (None, _, _) => matrix.slice(&column_indices, NaiveDate::MIN, NaiveDate::MAX),
    };

    if selection.len() == 1 {
        let name = selection[0].as_str();
        return Ok(view.with_close_alias(name));
    }
    Ok(view)
}
