use shelf_types::{FeetType, Placement};

use crate::back_panels::{panel_placement, synchronize};
use crate::facades::facade_placement;
use crate::layout::Layout;
use crate::shelves::materialize_column;
use crate::types::{StructureState, VerticalPanel};

/// Bring every derived part of the state up to date.
///
/// Runs once per committed mutation: default slots are filled in, back
/// panels are resynchronized, and every placement is recomputed from the
/// authoritative dimensions. Placements are never edited in place.
pub fn rebuild(state: &mut StructureState) {
    let columns = state.columns();
    state.shelves.retain(|key, _| key.column < columns);
    state.facades.retain(|key, _| key.column < columns);
    state.vertical_textures.retain(|wall, _| *wall <= columns);
    for column in 0..columns {
        materialize_column(state, column);
    }

    synchronize(state);
    place_entities(state);
}

fn place_entities(state: &mut StructureState) {
    let feet_type = state.feet.feet_type;
    let StructureState {
        dimensions,
        column_widths,
        column_heights,
        shelves,
        back_panels,
        facades,
        vertical_panels,
        vertical_textures,
        feet,
        ..
    } = state;
    let layout = Layout::new(dimensions, column_widths, column_heights, feet_type.height_cm());
    let t = layout.thickness();
    let depth = dimensions.depth;

    for shelf in shelves.values_mut() {
        shelf.placement = Placement::from_cm(
            [
                layout.column_center_x(shelf.column),
                layout.row_y(shelf.row) + t / 2.0,
                t / 2.0,
            ],
            [layout.column_width(shelf.column), t, depth - t],
        );
    }

    for panel in back_panels.values_mut() {
        panel.placement = panel_placement(&layout, panel.column, panel.from_row, panel.to_row);
    }

    for facade in facades.values_mut() {
        facade.placement = facade_placement(&layout, facade.column, facade.row, facade.top_row);
    }

    *vertical_panels = (0..=layout.columns())
        .map(|index| {
            let height = wall_height(&layout, index);
            let panel = VerticalPanel {
                index,
                texture: vertical_textures.get(&index).cloned(),
                placement: Placement::from_cm(
                    [
                        layout.wall_center_x(index),
                        layout.feet_height() + height / 2.0,
                        0.0,
                    ],
                    [t, height, depth],
                ),
            };
            (index, panel)
        })
        .collect();

    feet.placements = foot_placements(&layout, feet_type, depth);
}

/// A wall is as tall as the taller of the columns it bounds.
fn wall_height(layout: &Layout<'_>, index: usize) -> f64 {
    let left = index
        .checked_sub(1)
        .map(|c| layout.column_height(c))
        .unwrap_or(0.0);
    let right = if index < layout.columns() {
        layout.column_height(index)
    } else {
        0.0
    };
    left.max(right)
}

/// One foot under the front and one under the back of every wall.
fn foot_placements(layout: &Layout<'_>, feet_type: FeetType, depth: f64) -> Vec<Placement> {
    let height = feet_type.height_cm();
    if height <= 0.0 {
        return Vec::new();
    }
    let t = layout.thickness();
    let z = depth / 2.0 - t;
    (0..=layout.columns())
        .flat_map(|wall| {
            let x = layout.wall_center_x(wall);
            [-z, z].map(|z| Placement::from_cm([x, height / 2.0, z], [t, height, t]))
        })
        .collect()
}
