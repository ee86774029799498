//! Helper functions: error types and key constructors.

use shelf_types::{BackPanelKey, Row, ShelfKey};
use structure_engine::FacadeSlot;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("dispatch error: {message}")]
    DispatchError { message: String },

    #[error("{operation} rejected: {reason}")]
    Rejected { operation: String, reason: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },

    #[error("invalid row {value}: rows are whole or half numbers")]
    InvalidRow { value: f64 },
}

// ── Key Constructors ────────────────────────────────────────────────────────

/// Row from a number such as `2.0` or `1.5`.
pub fn row(value: f64) -> Result<Row, HarnessError> {
    let steps = value * 2.0;
    if value < 0.0 || steps.fract() != 0.0 || !steps.is_finite() {
        return Err(HarnessError::InvalidRow { value });
    }
    Ok(Row::from_half_steps(steps as u32))
}

/// The slot a user clicks at `row` in `column`: the real key on whole rows,
/// the virtual key on half rows.
pub fn slot_key(row: Row, column: usize) -> ShelfKey {
    if row.is_whole() {
        ShelfKey::real(row, column)
    } else {
        ShelfKey::virtual_slot(row, column)
    }
}

/// Real shelf key on a whole row.
pub fn shelf(row: u32, column: usize) -> ShelfKey {
    ShelfKey::real(Row::whole(row), column)
}

/// Span panel key starting at a whole row.
pub fn panel(row: u32, column: usize) -> BackPanelKey {
    BackPanelKey::span(Row::whole(row), column)
}

/// A single-slot facade group.
pub fn group(row: Row, column: usize) -> Vec<FacadeSlot> {
    vec![FacadeSlot::new(row, column)]
}

/// Rows from numbers, for comparing against `active_rows`.
pub fn rows(values: &[f64]) -> Result<Vec<Row>, HarnessError> {
    values.iter().map(|v| row(*v)).collect()
}
