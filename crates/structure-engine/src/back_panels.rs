//! Back-panel synchronization.
//!
//! The synchronizer is the only writer of span panels. It regenerates one
//! panel per pair of vertically adjacent active shelves, so removing the
//! shelves between two active neighbours yields a single merged panel and
//! adding a shelf splits a panel in two. User flags survive as long as the
//! panel key does.

use std::collections::BTreeMap;

use shelf_types::{BackPanelKey, Placement, Row};
use tracing::debug;

use crate::layout::Layout;
use crate::types::{BackPanel, StructureError, StructureState};

/// Recompute every span panel from the current shelf state.
pub fn synchronize(state: &mut StructureState) {
    let columns = state.columns();
    let previous = std::mem::take(&mut state.back_panels);
    let mut next: BTreeMap<BackPanelKey, BackPanel> = previous
        .iter()
        .filter(|(key, panel)| key.is_custom() && panel.column < columns)
        .map(|(key, panel)| (*key, panel.clone()))
        .collect();

    for column in 0..columns {
        let rows = if state.column_shelves(column).next().is_some() {
            state.active_rows(column)
        } else {
            default_ladder(&state.layout(), column)
        };

        for pair in rows.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            let key = BackPanelKey::span(lower, column);
            next.insert(key, carry_over(&previous, key, column, lower, upper));
        }
    }

    // A panel the user removed keeps blocking its span after the span
    // disappears, as a permanently deleted tombstone.
    for (key, panel) in previous {
        if key.is_custom() || next.contains_key(&key) || panel.column >= columns {
            continue;
        }
        if panel.is_removed || panel.permanently_deleted {
            debug!(panel = %key, "keeping removed back panel as tombstone");
            next.insert(
                key,
                BackPanel {
                    is_removed: true,
                    permanently_deleted: true,
                    ..panel
                },
            );
        }
    }

    state.back_panels = next;
}

/// Build the panel for one span, inheriting user state from the prior panel
/// with the same key or, for half rows, from the whole-row sibling.
fn carry_over(
    previous: &BTreeMap<BackPanelKey, BackPanel>,
    key: BackPanelKey,
    column: usize,
    lower: Row,
    upper: Row,
) -> BackPanel {
    let mut panel = BackPanel::spanning(column, lower, upper);
    let prior = previous.get(&key);
    if let Some(prior) = prior {
        panel.is_removed = prior.is_removed;
        panel.permanently_deleted = prior.permanently_deleted;
        panel.texture = prior.texture.clone();
    }

    if !lower.is_whole() {
        if let Some(sibling) = previous.get(&BackPanelKey::span(lower.floor(), column)) {
            if panel.texture.is_none() {
                panel.texture = sibling.texture.clone();
            }
            if prior.is_none() {
                panel.is_removed = sibling.is_removed;
                panel.permanently_deleted = sibling.permanently_deleted;
            }
        }
    }

    if panel.permanently_deleted {
        panel.is_removed = true;
    }
    panel
}

/// Whole rows of a column with no shelf entities at all.
pub fn default_ladder(layout: &Layout<'_>, column: usize) -> Vec<Row> {
    (0..=layout.max_rows(column)).map(Row::whole).collect()
}

/// Placement of a panel filling the gap between two shelves at the back.
pub fn panel_placement(layout: &Layout<'_>, column: usize, lower: Row, upper: Row) -> Placement {
    let t = layout.thickness();
    let (y, height) = layout.gap(lower, upper);
    let depth = layout.dimensions().depth;
    Placement::from_cm(
        [layout.column_center_x(column), y, -depth / 2.0 + t / 2.0],
        [layout.column_width(column), height, t],
    )
}

/// Mark span panels as removed by the user and delete custom panels.
/// Returns how many panels changed.
pub fn remove_panels(state: &mut StructureState, keys: &[BackPanelKey]) -> usize {
    let mut changed = 0;
    for key in keys {
        if key.is_custom() {
            if state.back_panels.remove(key).is_some() {
                changed += 1;
            }
            continue;
        }
        if let Some(panel) = state.back_panels.get_mut(key) {
            if !panel.is_removed {
                panel.is_removed = true;
                changed += 1;
            }
        }
    }
    changed
}

/// Clear user removal from span panels, including tombstones.
pub fn restore_panels(state: &mut StructureState, keys: &[BackPanelKey]) -> usize {
    let mut changed = 0;
    for key in keys {
        if let Some(panel) = state.back_panels.get_mut(key) {
            if panel.is_removed || panel.permanently_deleted {
                panel.is_removed = false;
                panel.permanently_deleted = false;
                changed += 1;
            }
        }
    }
    changed
}

/// Add a user-authored panel between two rows of a column.
pub fn add_custom_panel(
    state: &mut StructureState,
    column: usize,
    from_row: Row,
    to_row: Row,
) -> Result<BackPanelKey, StructureError> {
    let columns = state.columns();
    if column >= columns {
        return Err(StructureError::ColumnOutOfRange { column, columns });
    }
    if from_row >= to_row || !state.layout().contains(to_row, column) {
        return Err(StructureError::InvalidPanelSpan {
            from: from_row,
            to: to_row,
        });
    }
    let key = BackPanelKey::new_custom();
    state
        .back_panels
        .insert(key, BackPanel::spanning(column, from_row, to_row));
    Ok(key)
}
