//! Facade coupling: fitting drawers and doors onto slot groups and keeping
//! the shelves they mount to in place.

use serde::{Deserialize, Serialize};
use shelf_types::{FacadeKey, FacadeType, Placement, Row};
use tracing::{debug, info};

use crate::layout::Layout;
use crate::shelves::{clear_slot, ensure_support};
use crate::types::{Facade, FitReport, SkipReason, StructureError, StructureState};

/// A candidate facade position: the facade type's span starting at `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacadeSlot {
    pub column: usize,
    pub row: Row,
}

impl FacadeSlot {
    pub fn new(row: Row, column: usize) -> Self {
        Self { column, row }
    }
}

/// Whether a facade type can be chosen for a column.
///
/// `retire` is available whenever any facade exists; every other type needs
/// the column's height minus the feet to reach the facade height.
pub fn is_available(state: &StructureState, facade_type: FacadeType, column: usize) -> bool {
    match facade_type.height_cm() {
        None => !state.facades.is_empty(),
        Some(height) => {
            column < state.columns() && state.layout().effective_height(column) >= height
        }
    }
}

/// Every type selectable for a column, in catalogue order.
pub fn available_types(state: &StructureState, column: usize) -> Vec<FacadeType> {
    FacadeType::ALL
        .into_iter()
        .filter(|t| is_available(state, *t, column))
        .collect()
}

/// Fit one facade per group of contiguous slots.
///
/// A group that cannot be placed is skipped as a whole and reported.
pub fn fit(
    state: &mut StructureState,
    facade_type: FacadeType,
    groups: &[Vec<FacadeSlot>],
) -> Result<FitReport, StructureError> {
    if facade_type.is_retire() {
        return Err(StructureError::RetireIsNotFitted);
    }
    let mut report = FitReport::default();
    for (index, group) in groups.iter().enumerate() {
        if let Err(reason) = place_group(state, facade_type, group, &mut report) {
            debug!(group = index, ?reason, "facade group skipped");
            report.skipped_groups.push((index, reason));
        }
    }
    Ok(report)
}

fn place_group(
    state: &mut StructureState,
    facade_type: FacadeType,
    group: &[FacadeSlot],
    report: &mut FitReport,
) -> Result<(), SkipReason> {
    let first = group.first().ok_or(SkipReason::EmptyGroup)?;
    let column = first.column;
    if group.iter().any(|slot| slot.column != column) {
        return Err(SkipReason::MixedColumns);
    }
    if column >= state.columns() {
        return Err(SkipReason::OutOfRange);
    }
    if !is_available(state, facade_type, column) {
        return Err(SkipReason::InsufficientHeight);
    }

    let span = facade_type.span_half_steps();
    let mut rows: Vec<Row> = group.iter().map(|slot| slot.row).collect();
    rows.sort();
    rows.dedup();
    if !rows
        .windows(2)
        .all(|w| w[0].checked_offset(span) == Some(w[1]))
    {
        return Err(SkipReason::NotContiguous);
    }

    let bottom = rows[0];
    let top = rows[rows.len() - 1]
        .checked_offset(span)
        .ok_or(SkipReason::OutOfRange)?;
    if !state.layout().contains(top, column) {
        return Err(SkipReason::OutOfRange);
    }

    report
        .replaced
        .extend(remove_overlapping(state, column, bottom, top));

    let key = FacadeKey::new(facade_type, state.allocate_facade_sequence(), column);
    let placement = facade_placement(&state.layout(), column, bottom, top);
    state.facades.insert(
        key,
        Facade {
            facade_type,
            column,
            row: bottom,
            top_row: top,
            texture: None,
            placement,
        },
    );

    for row in [bottom, top] {
        if let Some(added) = ensure_support(state, row, column) {
            report.supports_added.push(added);
        }
    }
    if facade_type == FacadeType::Tiroir36 {
        for row in bottom.strictly_between(top) {
            clear_slot(state, row, column);
        }
    }

    info!(facade = %key, %bottom, %top, "facade fitted");
    report.placed.push(key);
    Ok(())
}

/// Delete every facade of `column` whose vertical extent touches or
/// intersects the span `bottom..top`.
fn remove_overlapping(state: &mut StructureState, column: usize, bottom: Row, top: Row) -> Vec<FacadeKey> {
    let layout = state.layout();
    let (lo, hi) = vertical_extent(&layout, bottom, top);
    let overlapping: Vec<FacadeKey> = state
        .facades
        .iter()
        .filter(|(_, facade)| facade.column == column)
        .filter(|(_, facade)| {
            let (a, b) = vertical_extent(&layout, facade.row, facade.top_row);
            a <= hi && lo <= b
        })
        .map(|(key, _)| *key)
        .collect();

    for key in &overlapping {
        debug!(facade = %key, "removing overlapped facade");
        state.facades.remove(key);
    }
    overlapping
}

/// Delete the selected facades. Shelves added to support them stay.
pub fn retire(state: &mut StructureState, selection: &[FacadeKey]) -> Result<Vec<FacadeKey>, StructureError> {
    if state.facades.is_empty() {
        return Err(StructureError::NothingToRetire);
    }
    let retired: Vec<FacadeKey> = selection
        .iter()
        .filter(|key| state.facades.remove(*key).is_some())
        .copied()
        .collect();
    info!(count = retired.len(), "facades retired");
    Ok(retired)
}

/// Bottom and top y of the opening between two shelves, in cm.
fn vertical_extent(layout: &Layout<'_>, bottom: Row, top: Row) -> (f64, f64) {
    (layout.row_y(bottom) + layout.thickness(), layout.row_y(top))
}

/// Placement of a facade covering the opening between two shelves, flush
/// with the front edge.
pub fn facade_placement(layout: &Layout<'_>, column: usize, bottom: Row, top: Row) -> Placement {
    let t = layout.thickness();
    let (lo, hi) = vertical_extent(layout, bottom, top);
    let depth = layout.dimensions().depth;
    Placement::from_cm(
        [layout.column_center_x(column), (lo + hi) / 2.0, depth / 2.0 + t / 2.0],
        [layout.column_width(column), hi - lo, t],
    )
}
