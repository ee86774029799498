//! Column mutations: duplicate, delete, resize and reset.
//!
//! Every per-column collection is renumbered together so that column
//! indices stay contiguous and each key still names its entity's column.

use std::collections::BTreeMap;

use shelf_types::{BackPanelKey, FacadeKey};
use tracing::info;

use crate::shelves::materialize_column;
use crate::types::{Shelf, StructureError, StructureState};

fn check_column(state: &StructureState, column: usize) -> Result<(), StructureError> {
    let columns = state.columns();
    if column >= columns {
        return Err(StructureError::ColumnOutOfRange { column, columns });
    }
    Ok(())
}

/// Longest accepted length of any dimension, in cm.
pub const MAX_LENGTH_CM: f64 = 10_000.0;

pub(crate) fn check_length(name: &'static str, value: f64) -> Result<(), StructureError> {
    if value.is_finite() && value > 0.0 && value <= MAX_LENGTH_CM {
        Ok(())
    } else {
        Err(StructureError::InvalidDimension { name, value })
    }
}

fn remap_map<V>(map: &mut BTreeMap<usize, V>, remap: &impl Fn(usize) -> Option<usize>) {
    *map = std::mem::take(map)
        .into_iter()
        .filter_map(|(k, v)| remap(k).map(|n| (n, v)))
        .collect();
}

/// Move every column-indexed entry to `remap(column)`, dropping entries
/// that map to `None`.
fn remap_columns(state: &mut StructureState, remap: &impl Fn(usize) -> Option<usize>) {
    remap_map(&mut state.column_widths, remap);
    remap_map(&mut state.column_heights, remap);

    state.shelves = std::mem::take(&mut state.shelves)
        .into_iter()
        .filter_map(|(key, mut shelf)| {
            let column = remap(key.column)?;
            shelf.column = column;
            Some((key.with_column(column), shelf))
        })
        .collect();

    state.back_panels = std::mem::take(&mut state.back_panels)
        .into_iter()
        .filter_map(|(key, mut panel)| {
            let column = remap(panel.column)?;
            panel.column = column;
            let key = match key {
                BackPanelKey::Span { row, .. } => BackPanelKey::span(row, column),
                custom @ BackPanelKey::Custom { .. } => custom,
            };
            Some((key, panel))
        })
        .collect();

    state.facades = std::mem::take(&mut state.facades)
        .into_iter()
        .filter_map(|(key, mut facade)| {
            let column = remap(key.column)?;
            facade.column = column;
            Some((key.with_column(column), facade))
        })
        .collect();
}

/// Σ(column widths) + thickness × (columns + 1).
pub fn recompute_width(state: &mut StructureState) {
    state.dimensions.width = state.layout().total_width();
}

/// Insert a copy of `column` right after it.
pub fn duplicate(state: &mut StructureState, column: usize) -> Result<(), StructureError> {
    check_column(state, column)?;
    let target = column + 1;
    let layout = state.layout();
    let (width, height) = (layout.column_width(column), layout.column_height(column));

    let shelves: Vec<(_, Shelf)> = state
        .column_shelves(column)
        .map(|(key, shelf)| {
            let mut shelf = shelf.clone();
            shelf.column = target;
            (key.with_column(target), shelf)
        })
        .collect();
    let panels: Vec<_> = state
        .back_panels
        .iter()
        .filter(|(_, panel)| panel.column == column)
        .map(|(key, panel)| {
            let mut panel = panel.clone();
            panel.column = target;
            let key = match key {
                BackPanelKey::Span { row, .. } => BackPanelKey::span(*row, target),
                BackPanelKey::Custom { .. } => BackPanelKey::new_custom(),
            };
            (key, panel)
        })
        .collect();
    let facades: Vec<_> = state
        .facades
        .iter()
        .filter(|(key, _)| key.column == column)
        .map(|(key, facade)| (key.facade_type, facade.clone()))
        .collect();

    remap_columns(state, &|k| Some(if k > column { k + 1 } else { k }));

    state.column_widths.insert(target, width);
    state.column_heights.insert(target, height);
    state.shelves.extend(shelves);
    state.back_panels.extend(panels);
    for (facade_type, mut facade) in facades {
        facade.column = target;
        let key = FacadeKey::new(facade_type, state.allocate_facade_sequence(), target);
        state.facades.insert(key, facade);
    }

    // Walls right of the source column move over; the new wall between
    // the source and its copy takes the source's left wall texture.
    let source_wall = state.vertical_textures.get(&column).cloned();
    remap_map(&mut state.vertical_textures, &|k| {
        Some(if k >= target { k + 1 } else { k })
    });
    if let Some(texture) = source_wall {
        state.vertical_textures.insert(target, texture);
    }

    state.dimensions.columns += 1;
    recompute_width(state);
    info!(column, columns = state.columns(), "column duplicated");
    Ok(())
}

/// Delete `column`, renumbering every column to its right.
pub fn delete(state: &mut StructureState, column: usize) -> Result<(), StructureError> {
    if state.columns() <= 1 {
        return Err(StructureError::LastColumn);
    }
    check_column(state, column)?;

    remap_columns(state, &|k| match k.cmp(&column) {
        std::cmp::Ordering::Less => Some(k),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(k - 1),
    });

    // A column takes its left wall with it; the first column its right one.
    let wall = if column == 0 { 1 } else { column };
    remap_map(&mut state.vertical_textures, &|k| match k.cmp(&wall) {
        std::cmp::Ordering::Less => Some(k),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(k - 1),
    });

    state.dimensions.columns -= 1;
    recompute_width(state);
    info!(column, columns = state.columns(), "column deleted");
    Ok(())
}

/// Set one column's width. The global width is settled by the caller.
pub fn set_width(state: &mut StructureState, column: usize, width: f64) -> Result<(), StructureError> {
    check_column(state, column)?;
    check_length("column width", width)?;
    state.column_widths.insert(column, width);
    Ok(())
}

/// Set one column's height. The shared global height follows it.
pub fn set_height(state: &mut StructureState, column: usize, height: f64) -> Result<(), StructureError> {
    check_column(state, column)?;
    check_length("column height", height)?;
    state.column_heights.insert(column, height);
    state.dimensions.height = height;
    materialize_column(state, column);
    prune_facades(state, column);
    Ok(())
}

/// Give every column the same height.
pub fn set_all_heights(state: &mut StructureState, height: f64) -> Result<(), StructureError> {
    check_length("height", height)?;
    state.dimensions.height = height;
    for column in 0..state.columns() {
        state.column_heights.insert(column, height);
        materialize_column(state, column);
        prune_facades(state, column);
    }
    Ok(())
}

/// Split a new overall width evenly across the columns.
pub fn redistribute_width(state: &mut StructureState, width: f64) -> Result<(), StructureError> {
    let columns = state.columns() as f64;
    let column_width = (width - state.dimensions.thickness * (columns + 1.0)) / columns;
    check_length("width", column_width)?;
    for column in 0..state.columns() {
        state.column_widths.insert(column, column_width);
    }
    recompute_width(state);
    Ok(())
}

/// Change the column count, resetting every per-column collection.
pub fn reset_columns(state: &mut StructureState, columns: usize) -> Result<(), StructureError> {
    if columns == 0 {
        return Err(StructureError::InvalidDimension {
            name: "columns",
            value: 0.0,
        });
    }
    let dims = &state.dimensions;
    state.column_widths = (0..columns).map(|c| (c, dims.cell_width)).collect();
    state.column_heights = (0..columns).map(|c| (c, dims.height)).collect();
    state.shelves.clear();
    state.back_panels.clear();
    state.facades.clear();
    state.vertical_textures.clear();
    state.dimensions.columns = columns;
    recompute_width(state);
    info!(columns, "column layout reset");
    Ok(())
}

/// Drop facades reaching above a column's ceiling.
fn prune_facades(state: &mut StructureState, column: usize) {
    let ceiling = state.layout().ceiling(column);
    state
        .facades
        .retain(|key, facade| key.column != column || facade.top_row <= ceiling);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlobalDimensions;
    use shelf_types::{Row, ShelfKey, Texture};

    fn state() -> StructureState {
        let mut s = StructureState::new(GlobalDimensions::default());
        for c in 0..s.columns() {
            materialize_column(&mut s, c);
        }
        s
    }

    #[test]
    fn duplicate_shifts_and_clones() {
        let mut s = state();
        s.column_widths.insert(1, 50.0);
        s.column_widths.insert(2, 20.0);
        s.shelves.get_mut(&ShelfKey::real(Row::whole(1), 2)).unwrap().texture =
            Some(Texture::new("ash"));

        duplicate(&mut s, 1).unwrap();

        assert_eq!(s.columns(), 4);
        assert_eq!(s.column_widths.values().copied().collect::<Vec<_>>(), vec![36.0, 50.0, 50.0, 20.0]);
        assert_eq!(
            s.shelves[&ShelfKey::real(Row::whole(1), 3)].texture,
            Some(Texture::new("ash"))
        );
        assert!(s.column_shelves(2).all(|(k, shelf)| k.column == 2 && shelf.column == 2));
        assert_eq!(s.dimensions.width, 36.0 + 50.0 + 50.0 + 20.0 + 10.0);
    }

    #[test]
    fn delete_refuses_the_last_column() {
        let mut s = StructureState::new(GlobalDimensions {
            columns: 1,
            ..GlobalDimensions::default()
        });
        assert_eq!(delete(&mut s, 0), Err(StructureError::LastColumn));
        assert_eq!(s.columns(), 1);
    }

    #[test]
    fn delete_cascades_to_entities() {
        let mut s = state();
        s.shelves.get_mut(&ShelfKey::real(Row::whole(2), 2)).unwrap().texture =
            Some(Texture::new("elm"));
        delete(&mut s, 1).unwrap();

        assert_eq!(s.columns(), 2);
        assert_eq!(s.column_widths.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(s.shelves.keys().all(|k| k.column < 2));
        assert_eq!(
            s.shelves[&ShelfKey::real(Row::whole(2), 1)].texture,
            Some(Texture::new("elm"))
        );
    }

    #[test]
    fn height_change_prunes_rows_and_moves_the_global_height() {
        let mut s = state();
        set_height(&mut s, 0, 78.0).unwrap();
        assert_eq!(s.dimensions.height, 78.0);
        assert_eq!(s.active_rows(0).last(), Some(&Row::whole(2)));
        assert!(s.column_shelves(0).all(|(k, _)| k.row <= Row::whole(2)));
        assert_eq!(s.active_rows(1).last(), Some(&Row::whole(3)));
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let mut s = state();
        assert!(set_width(&mut s, 0, -3.0).is_err());
        assert!(set_height(&mut s, 9, 100.0).is_err());
        assert!(redistribute_width(&mut s, 5.0).is_err());
        assert!(reset_columns(&mut s, 0).is_err());
    }
}
