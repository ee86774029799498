//! Dimension/layout resolution.
//!
//! Pure functions of the authoritative dimensions. Nothing here is cached;
//! every call recomputes from the maps it borrows, so a layout can never go
//! stale relative to the state it was built from. Values are centimetres
//! with the x origin at the middle of the structure and y = 0 on the floor.

use std::collections::BTreeMap;

use shelf_types::Row;

use crate::types::GlobalDimensions;

/// Most rows a column can hold.
pub const MAX_ROWS: u32 = 500;

/// Number of shelf rows a column of `height` holds:
/// `max(1, floor((height - 2t) / (cell_height + t)) + 1)`, capped at
/// [`MAX_ROWS`].
///
/// The same figure is shown to the user as the shelf estimate while
/// choosing a column height.
pub fn estimated_rows(height: f64, thickness: f64, cell_height: f64) -> u32 {
    let pitch = cell_height + thickness;
    if pitch <= 0.0 {
        return 1;
    }
    let rows = ((height - 2.0 * thickness) / pitch).floor() + 1.0;
    if !rows.is_finite() || rows <= 1.0 {
        1
    } else if rows >= f64::from(MAX_ROWS) {
        MAX_ROWS
    } else {
        rows as u32
    }
}

/// Borrowed view resolving per-column geometry.
#[derive(Debug, Clone, Copy)]
pub struct Layout<'a> {
    dims: &'a GlobalDimensions,
    widths: &'a BTreeMap<usize, f64>,
    heights: &'a BTreeMap<usize, f64>,
    feet_height: f64,
}

impl<'a> Layout<'a> {
    pub fn new(
        dims: &'a GlobalDimensions,
        widths: &'a BTreeMap<usize, f64>,
        heights: &'a BTreeMap<usize, f64>,
        feet_height: f64,
    ) -> Self {
        Self {
            dims,
            widths,
            heights,
            feet_height,
        }
    }

    pub fn dimensions(&self) -> &GlobalDimensions {
        self.dims
    }

    pub fn columns(&self) -> usize {
        self.dims.columns
    }

    pub fn thickness(&self) -> f64 {
        self.dims.thickness
    }

    pub fn feet_height(&self) -> f64 {
        self.feet_height
    }

    /// Width of column `i`, falling back to the cell width for unknown columns.
    pub fn column_width(&self, i: usize) -> f64 {
        self.widths
            .get(&i)
            .copied()
            .unwrap_or(self.dims.cell_width)
            .max(0.0)
    }

    /// Height of column `i`, falling back to the global height.
    pub fn column_height(&self, i: usize) -> f64 {
        self.heights
            .get(&i)
            .copied()
            .unwrap_or(self.dims.height)
            .max(0.0)
    }

    /// Σ(column widths) + thickness × (columns + 1).
    pub fn total_width(&self) -> f64 {
        let columns = self.dims.columns;
        let widths: f64 = (0..columns).map(|k| self.column_width(k)).sum();
        widths + self.dims.thickness * (columns as f64 + 1.0)
    }

    /// Left edge of the wall on the left of column `i`.
    pub fn column_x(&self, i: usize) -> f64 {
        let t = self.dims.thickness;
        let offset: f64 = (0..i).map(|k| self.column_width(k) + t).sum();
        -self.total_width() / 2.0 + offset
    }

    /// Centre of the clear interior of column `i`.
    pub fn column_center_x(&self, i: usize) -> f64 {
        self.column_x(i) + self.dims.thickness + self.column_width(i) / 2.0
    }

    /// Centre of wall `k` (`0..=columns`).
    pub fn wall_center_x(&self, k: usize) -> f64 {
        self.column_x(k) + self.dims.thickness / 2.0
    }

    /// Distance between two whole rows.
    pub fn row_pitch(&self) -> f64 {
        self.dims.cell_height + self.dims.thickness
    }

    pub fn max_rows(&self, column: usize) -> u32 {
        estimated_rows(
            self.column_height(column),
            self.dims.thickness,
            self.dims.cell_height,
        )
    }

    /// Row of the fixed top shelf of a column.
    pub fn ceiling(&self, column: usize) -> Row {
        Row::whole(self.max_rows(column))
    }

    pub fn is_floor_or_ceiling(&self, row: Row, column: usize) -> bool {
        row == Row::FLOOR || row == self.ceiling(column)
    }

    /// Whether a row exists in a column.
    pub fn contains(&self, row: Row, column: usize) -> bool {
        column < self.dims.columns && row <= self.ceiling(column)
    }

    /// Y of the underside of a shelf at `row`.
    pub fn row_y(&self, row: Row) -> f64 {
        self.feet_height + row.as_f64() * self.row_pitch()
    }

    /// Clear gap between the shelves at `lower` and `upper`, as (centre y, height).
    pub fn gap(&self, lower: Row, upper: Row) -> (f64, f64) {
        let t = self.dims.thickness;
        let height = (self.row_y(upper) - self.row_y(lower) - t).max(0.0);
        (self.row_y(lower) + t + height / 2.0, height)
    }

    /// Column height minus the feet.
    pub fn effective_height(&self, column: usize) -> f64 {
        self.column_height(column) - self.feet_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dims(columns: usize) -> GlobalDimensions {
        GlobalDimensions {
            columns,
            ..GlobalDimensions::default()
        }
    }

    #[test]
    fn estimated_rows_matches_formula() {
        assert_eq!(estimated_rows(116.0, 2.0, 36.0), 3);
        assert_eq!(estimated_rows(154.0, 2.0, 36.0), 4);
        assert_eq!(estimated_rows(20.0, 2.0, 36.0), 1);
        assert_eq!(estimated_rows(0.0, 2.0, 36.0), 1);
    }

    #[test]
    fn estimated_rows_is_capped() {
        assert_eq!(estimated_rows(1e12, 2.0, 36.0), MAX_ROWS);
        assert_eq!(estimated_rows(1000.0, 2.0, 1e-9), MAX_ROWS);
        assert_eq!(estimated_rows(f64::INFINITY, 2.0, 36.0), 1);
    }

    #[test]
    fn x_positions_step_by_width_plus_thickness() {
        let d = dims(3);
        let widths = BTreeMap::from([(0, 36.0), (1, 50.0), (2, 20.0)]);
        let heights = BTreeMap::new();
        let layout = Layout::new(&d, &widths, &heights, 0.0);

        assert_relative_eq!(layout.total_width(), 106.0 + 8.0);
        assert_relative_eq!(layout.column_x(0), -57.0);
        assert_relative_eq!(layout.column_x(1), -57.0 + 38.0);
        assert_relative_eq!(layout.column_x(2), -57.0 + 38.0 + 52.0);
        // The right outer wall ends at +total/2.
        assert_relative_eq!(layout.column_x(3) + 2.0, 57.0);
    }

    #[test]
    fn stale_indices_fall_back_to_defaults() {
        let d = dims(1);
        let widths = BTreeMap::from([(0, 40.0)]);
        let heights = BTreeMap::from([(0, 80.0)]);
        let layout = Layout::new(&d, &widths, &heights, 0.0);

        assert_relative_eq!(layout.column_width(7), d.cell_width);
        assert_relative_eq!(layout.column_height(7), d.height);
    }

    #[test]
    fn gaps_start_above_the_lower_board() {
        let d = dims(1);
        let empty = BTreeMap::new();
        let layout = Layout::new(&d, &empty, &empty, 10.0);

        let (y, h) = layout.gap(Row::whole(0), Row::whole(1));
        assert_relative_eq!(h, 36.0);
        assert_relative_eq!(y, 10.0 + 2.0 + 18.0);
        let (_, h) = layout.gap(Row::whole(1), Row::whole(3));
        assert_relative_eq!(h, 2.0 * 38.0 - 2.0);
    }
}
