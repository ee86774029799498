use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shelf_types::{
    BackPanelKey, FacadeKey, FacadeType, FeetType, Placement, Row, ShelfClass, ShelfKey, Texture,
};

use crate::layout::Layout;

/// Authoritative global scalars, in centimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalDimensions {
    /// Overall width including every wall.
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Wall and shelf board thickness.
    pub thickness: f64,
    /// Default column width.
    pub cell_width: f64,
    /// Clear height of one row.
    pub cell_height: f64,
    pub columns: usize,
}

impl GlobalDimensions {
    /// Width of `columns` default-width columns with their walls.
    pub fn default_width(&self) -> f64 {
        self.cell_width * self.columns as f64 + self.thickness * (self.columns as f64 + 1.0)
    }
}

impl Default for GlobalDimensions {
    fn default() -> Self {
        let mut dims = Self {
            width: 0.0,
            height: 116.0,
            depth: 38.0,
            thickness: 2.0,
            cell_width: 36.0,
            cell_height: 36.0,
            columns: 3,
        };
        dims.width = dims.default_width();
        dims
    }
}

/// State of one shelf slot.
///
/// `Virtual` only occurs on half-row virtual keys; real keys hold
/// `Standard`, `Reinforced` or `Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelfState {
    Virtual,
    Standard,
    Reinforced,
    Removed,
}

impl ShelfState {
    /// Present, load-bearing shelf.
    pub fn is_active(self) -> bool {
        matches!(self, ShelfState::Standard | ShelfState::Reinforced)
    }

    pub fn class(self) -> Option<ShelfClass> {
        match self {
            ShelfState::Standard => Some(ShelfClass::Standard),
            ShelfState::Reinforced => Some(ShelfClass::Reinforced),
            _ => None,
        }
    }
}

impl From<ShelfClass> for ShelfState {
    fn from(class: ShelfClass) -> Self {
        match class {
            ShelfClass::Standard => ShelfState::Standard,
            ShelfClass::Reinforced => ShelfState::Reinforced,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    pub row: Row,
    pub column: usize,
    pub state: ShelfState,
    pub texture: Option<Texture>,
    pub placement: Placement,
}

impl Shelf {
    pub fn new(row: Row, column: usize, state: ShelfState) -> Self {
        Self {
            row,
            column,
            state,
            texture: None,
            placement: Placement::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackPanel {
    pub column: usize,
    /// Row of the shelf under the panel.
    pub from_row: Row,
    /// Row of the shelf over the panel.
    pub to_row: Row,
    /// Not currently covering its span.
    pub is_removed: bool,
    /// Removed by the user; never recreated by synchronization.
    pub permanently_deleted: bool,
    pub texture: Option<Texture>,
    pub placement: Placement,
}

impl BackPanel {
    pub fn spanning(column: usize, from_row: Row, to_row: Row) -> Self {
        Self {
            column,
            from_row,
            to_row,
            is_removed: false,
            permanently_deleted: false,
            texture: None,
            placement: Placement::default(),
        }
    }

    pub fn is_live(&self) -> bool {
        !self.is_removed && !self.permanently_deleted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facade {
    pub facade_type: FacadeType,
    pub column: usize,
    /// Row of the supporting shelf under the facade.
    pub row: Row,
    /// Row of the supporting shelf over the facade.
    pub top_row: Row,
    pub texture: Option<Texture>,
    pub placement: Placement,
}

/// Divider or outer wall. Index `k` is the wall on the left of column `k`;
/// index `columns` is the right outer wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalPanel {
    pub index: usize,
    pub texture: Option<Texture>,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeetState {
    pub feet_type: FeetType,
    pub texture: Option<Texture>,
    /// Derived, one front and one back foot per wall.
    pub placements: Vec<Placement>,
}

/// The complete structural state. Cloning it yields the read-only snapshot
/// handed to rendering and pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureState {
    pub dimensions: GlobalDimensions,
    pub column_widths: BTreeMap<usize, f64>,
    pub column_heights: BTreeMap<usize, f64>,
    pub shelves: BTreeMap<ShelfKey, Shelf>,
    pub back_panels: BTreeMap<BackPanelKey, BackPanel>,
    pub facades: BTreeMap<FacadeKey, Facade>,
    pub vertical_panels: BTreeMap<usize, VerticalPanel>,
    /// Per-wall texture overrides, the only persisted vertical panel data.
    pub vertical_textures: BTreeMap<usize, Texture>,
    pub feet: FeetState,
    pub next_facade_sequence: u64,
}

impl StructureState {
    /// Empty structure with one width/height entry per column.
    pub fn new(dimensions: GlobalDimensions) -> Self {
        let column_widths = (0..dimensions.columns)
            .map(|c| (c, dimensions.cell_width))
            .collect();
        let column_heights = (0..dimensions.columns)
            .map(|c| (c, dimensions.height))
            .collect();
        Self {
            dimensions,
            column_widths,
            column_heights,
            shelves: BTreeMap::new(),
            back_panels: BTreeMap::new(),
            facades: BTreeMap::new(),
            vertical_panels: BTreeMap::new(),
            vertical_textures: BTreeMap::new(),
            feet: FeetState::default(),
            next_facade_sequence: 0,
        }
    }

    pub fn layout(&self) -> Layout<'_> {
        Layout::new(
            &self.dimensions,
            &self.column_widths,
            &self.column_heights,
            self.feet.feet_type.height_cm(),
        )
    }

    pub fn columns(&self) -> usize {
        self.dimensions.columns
    }

    /// Shelves of one column in row order.
    pub fn column_shelves(&self, column: usize) -> impl Iterator<Item = (&ShelfKey, &Shelf)> {
        self.shelves.iter().filter(move |(k, _)| k.column == column)
    }

    /// Rows of the active (present, non-virtual) shelves of a column, ascending.
    pub fn active_rows(&self, column: usize) -> Vec<Row> {
        let mut rows: Vec<Row> = self
            .column_shelves(column)
            .filter(|(k, s)| !k.is_virtual() && s.state.is_active())
            .map(|(k, _)| k.row)
            .collect();
        rows.sort();
        rows.dedup();
        rows
    }

    /// Live back panels of a column.
    pub fn live_back_panels(&self, column: usize) -> impl Iterator<Item = (&BackPanelKey, &BackPanel)> {
        self.back_panels
            .iter()
            .filter(move |(_, p)| p.column == column && p.is_live())
    }

    /// Take the next facade sequence number.
    pub fn allocate_facade_sequence(&mut self) -> u64 {
        let seq = self.next_facade_sequence;
        self.next_facade_sequence += 1;
        seq
    }
}

/// Why a slot or group inside a selection was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Column or row outside the current structure.
    OutOfRange,
    /// Floor and ceiling shelves are fixed standard shelves.
    FloorOrCeiling,
    /// The slot holds no shelf the operation applies to.
    NotStructural,
    EmptyGroup,
    MixedColumns,
    NotContiguous,
    /// The facade does not fit in the column.
    InsufficientHeight,
}

/// Outcome of a shelf state operation over a selection of slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShelfReport {
    /// Canonical keys that changed state.
    pub applied: Vec<ShelfKey>,
    /// Shelves that became reinforced and were not before. Callers use
    /// this to price the reinforcement surcharge.
    pub newly_reinforced: usize,
    pub skipped: Vec<(ShelfKey, SkipReason)>,
}

/// Outcome of a facade fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    pub placed: Vec<FacadeKey>,
    /// Overlapping facades deleted to make room.
    pub replaced: Vec<FacadeKey>,
    /// Support shelves created or revived.
    pub supports_added: Vec<ShelfKey>,
    /// Index of each skipped group, with the reason.
    pub skipped_groups: Vec<(usize, SkipReason)>,
}

/// Errors from the structure engine. Each leaves the state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructureError {
    #[error("column {column} out of range (structure has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("cannot delete the last column")]
    LastColumn,

    #[error("invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("no column width edit in progress")]
    NoPendingEdit,

    #[error("a width edit for column {column} is already in progress")]
    EditInProgress { column: usize },

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("no facades to retire")]
    NothingToRetire,

    #[error("retire removes selected facades and cannot be fitted")]
    RetireIsNotFitted,

    #[error("custom panel rows {from}..{to} are invalid")]
    InvalidPanelSpan { from: Row, to: Row },
}
