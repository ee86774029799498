//! Rich assertion helpers with diagnostic output.
//!
//! Every failure names the context and prints expected vs actual.

use shelf_types::Row;
use structure_engine::StructureState;

use crate::helpers::HarnessError;
use crate::oracle::OracleVerdict;

fn fmt_rows(rows: &[Row]) -> String {
    let parts: Vec<String> = rows.iter().map(|r| r.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Assert the active shelf rows of a column.
pub fn assert_active_rows(
    state: &StructureState,
    column: usize,
    expected: &[Row],
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual = state.active_rows(column);
    if actual == expected {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] column {} active rows: expected {}, got {}",
                ctx,
                column,
                fmt_rows(expected),
                fmt_rows(&actual),
            ),
        })
    }
}

/// Assert the live span panels of a column as `(from, to)` row pairs.
pub fn assert_live_spans(
    state: &StructureState,
    column: usize,
    expected: &[(Row, Row)],
    ctx: &str,
) -> Result<(), HarnessError> {
    let actual: Vec<(Row, Row)> = state
        .live_back_panels(column)
        .filter(|(key, _)| !key.is_custom())
        .map(|(_, p)| (p.from_row, p.to_row))
        .collect();
    if actual == expected {
        Ok(())
    } else {
        let fmt = |spans: &[(Row, Row)]| {
            spans
                .iter()
                .map(|(a, b)| format!("[{}, {}]", a, b))
                .collect::<Vec<_>>()
                .join(" ")
        };
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] column {} live panels: expected {}, got {}",
                ctx,
                column,
                fmt(expected),
                fmt(&actual),
            ),
        })
    }
}

/// Assert the global width within tolerance (cm).
pub fn assert_width(state: &StructureState, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    let actual = state.dimensions.width;
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!(
                "[{}] width: expected {:.3} cm, got {:.3} cm (tol={})",
                ctx, expected, actual, tol,
            ),
        })
    }
}

/// Assert every verdict passed, reporting the first failure.
pub fn assert_all_pass(verdicts: &[OracleVerdict], ctx: &str) -> Result<(), HarnessError> {
    match verdicts.iter().find(|v| !v.passed) {
        None => Ok(()),
        Some(failed) => Err(HarnessError::OracleFailure {
            oracle: failed.oracle_name.clone(),
            detail: format!("[{}] {}", ctx, failed.detail),
        }),
    }
}
