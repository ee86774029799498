//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use shelf_types::{Row, ShelfKey, CM_TO_SCENE};
use structure_engine::{ShelfState, StructureState};

/// The result of a single oracle check.
#[derive(Debug, Clone)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: Some(value),
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: Some(value),
        }
    }
}

/// Tolerance for comparisons in centimetres.
const TOL_CM: f64 = 1e-6;

// ── Layout Oracles ──────────────────────────────────────────────────────────

/// Check the global width equals Σ(column widths) + thickness × (columns + 1).
pub fn check_total_width(state: &StructureState) -> OracleVerdict {
    let layout = state.layout();
    let expected = layout.total_width();
    let actual = state.dimensions.width;
    if (expected - actual).abs() < TOL_CM {
        OracleVerdict::pass_val(
            "total_width",
            format!("width {:.2} cm over {} columns", actual, state.columns()),
            actual,
        )
    } else {
        OracleVerdict::fail_val(
            "total_width",
            format!("width {:.4} cm, columns add up to {:.4} cm", actual, expected),
            actual,
        )
    }
}

/// Check each column starts one wall after the previous one ends, and the
/// structure is centred on x = 0.
pub fn check_column_positions(state: &StructureState) -> OracleVerdict {
    let layout = state.layout();
    let t = layout.thickness();
    let mut problems = Vec::new();

    if (layout.column_x(0) + layout.total_width() / 2.0).abs() > TOL_CM {
        problems.push(format!("column 0 starts at {:.4}", layout.column_x(0)));
    }
    for i in 1..state.columns() {
        let expected = layout.column_x(i - 1) + layout.column_width(i - 1) + t;
        if (layout.column_x(i) - expected).abs() > TOL_CM {
            problems.push(format!(
                "column {} at {:.4}, expected {:.4}",
                i,
                layout.column_x(i),
                expected
            ));
        }
    }

    if problems.is_empty() {
        OracleVerdict::pass(
            "column_positions",
            format!("{} columns laid out contiguously", state.columns()),
        )
    } else {
        OracleVerdict::fail("column_positions", problems.join("; "))
    }
}

/// Check every vertical panel sits on its wall line.
pub fn check_vertical_panels(state: &StructureState) -> OracleVerdict {
    let layout = state.layout();
    let expected = state.columns() + 1;
    if state.vertical_panels.len() != expected {
        return OracleVerdict::fail(
            "vertical_panels",
            format!(
                "{} vertical panels for {} columns",
                state.vertical_panels.len(),
                state.columns()
            ),
        );
    }
    let misplaced: Vec<usize> = state
        .vertical_panels
        .iter()
        .filter(|(k, p)| {
            (p.placement.position[0] - layout.wall_center_x(**k) * CM_TO_SCENE).abs() > TOL_CM
        })
        .map(|(k, _)| *k)
        .collect();
    if misplaced.is_empty() {
        OracleVerdict::pass("vertical_panels", format!("{} walls placed", expected))
    } else {
        OracleVerdict::fail("vertical_panels", format!("misplaced walls {:?}", misplaced))
    }
}

// ── Structural Oracles ──────────────────────────────────────────────────────

/// Check floor and ceiling shelves exist and are standard in every column.
pub fn check_floor_and_ceiling(state: &StructureState) -> OracleVerdict {
    let layout = state.layout();
    let mut problems = Vec::new();
    for column in 0..state.columns() {
        for row in [Row::FLOOR, layout.ceiling(column)] {
            match state.shelves.get(&ShelfKey::real(row, column)) {
                Some(shelf) if shelf.state == ShelfState::Standard => {}
                Some(shelf) => problems.push(format!("{}-{} is {:?}", row, column, shelf.state)),
                None => problems.push(format!("{}-{} missing", row, column)),
            }
        }
    }
    if problems.is_empty() {
        OracleVerdict::pass(
            "floor_and_ceiling",
            format!("{} columns have standard floor and ceiling", state.columns()),
        )
    } else {
        OracleVerdict::fail("floor_and_ceiling", problems.join("; "))
    }
}

/// Check span panels tile the gaps between adjacent active shelves.
///
/// Every gap has exactly one panel keyed by its lower row, and live span
/// panels exist only for current gaps.
pub fn check_back_panel_coverage(state: &StructureState) -> OracleVerdict {
    let mut problems = Vec::new();
    let mut live = 0;
    for column in 0..state.columns() {
        let rows = state.active_rows(column);
        for pair in rows.windows(2) {
            let key = shelf_types::BackPanelKey::span(pair[0], column);
            match state.back_panels.get(&key) {
                Some(panel) if panel.to_row == pair[1] => {
                    if panel.is_live() {
                        live += 1;
                    }
                }
                Some(panel) => problems.push(format!(
                    "{} ends at {}, expected {}",
                    key, panel.to_row, pair[1]
                )),
                None => problems.push(format!("gap {}..{} has no panel", pair[0], pair[1])),
            }
        }
        for (key, panel) in state.live_back_panels(column) {
            if key.is_custom() {
                continue;
            }
            if !rows.contains(&panel.from_row) || !rows.contains(&panel.to_row) {
                problems.push(format!("{} spans inactive rows", key));
            }
        }
    }
    if problems.is_empty() {
        OracleVerdict::pass_val(
            "back_panel_coverage",
            format!("{} live span panels", live),
            live as f64,
        )
    } else {
        OracleVerdict::fail("back_panel_coverage", problems.join("; "))
    }
}

/// Check every facade rests on active shelves at both ends.
pub fn check_facade_support(state: &StructureState) -> OracleVerdict {
    let unsupported: Vec<String> = state
        .facades
        .iter()
        .filter(|(_, f)| {
            [f.row, f.top_row].iter().any(|row| {
                !state
                    .shelves
                    .get(&ShelfKey::real(*row, f.column))
                    .is_some_and(|s| s.state.is_active())
            })
        })
        .map(|(key, _)| key.to_string())
        .collect();
    if unsupported.is_empty() {
        OracleVerdict::pass(
            "facade_support",
            format!("{} facades supported", state.facades.len()),
        )
    } else {
        OracleVerdict::fail(
            "facade_support",
            format!("unsupported facades: {}", unsupported.join(", ")),
        )
    }
}

/// Check keys and entity fields agree on column and row.
pub fn check_key_consistency(state: &StructureState) -> OracleVerdict {
    let columns = state.columns();
    let mut problems = Vec::new();
    for (key, shelf) in &state.shelves {
        if key.column != shelf.column || key.row != shelf.row || key.column >= columns {
            problems.push(key.to_string());
        }
        if key.is_virtual() && state.shelves.contains_key(&key.to_real()) {
            problems.push(format!("{} shadows a promoted shelf", key));
        }
    }
    for (key, facade) in &state.facades {
        if key.column != facade.column || key.column >= columns {
            problems.push(key.to_string());
        }
    }
    if problems.is_empty() {
        OracleVerdict::pass(
            "key_consistency",
            format!(
                "{} shelves, {} facades consistent",
                state.shelves.len(),
                state.facades.len()
            ),
        )
    } else {
        OracleVerdict::fail(
            "key_consistency",
            format!(
                "{} inconsistent keys: {:?}",
                problems.len(),
                &problems[..problems.len().min(5)]
            ),
        )
    }
}

// ── Aggregate Runner ────────────────────────────────────────────────────────

/// Run every oracle on a snapshot.
pub fn run_all_checks(state: &StructureState) -> Vec<OracleVerdict> {
    vec![
        check_total_width(state),
        check_column_positions(state),
        check_vertical_panels(state),
        check_floor_and_ceiling(state),
        check_back_panel_coverage(state),
        check_facade_support(state),
        check_key_consistency(state),
    ]
}
