use serde::{Deserialize, Serialize};
use shelf_types::{BackPanelKey, FacadeKey, FacadeType, FeetType, Row, ShelfClass, ShelfKey, Texture};
use structure_engine::{
    ColumnResize, FacadeSlot, FitReport, GlobalDimension, Quote, ShelfReport, StructureState,
    TextureTarget,
};

use crate::edit_state::EditState;

/// Messages from the UI to the engine.
///
/// Commands whose selection list is empty apply to the selection held in
/// the bridge's [`EditState`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    // -- Dimensions and columns --
    SetGlobalDimension {
        dimension: GlobalDimension,
    },
    ResizeColumn {
        column: usize,
        resize: ColumnResize,
    },
    /// Show a candidate column width without committing it.
    PreviewColumnWidth {
        column: usize,
        width: f64,
    },
    CancelColumnWidth,
    ApplyColumnWidth,
    DuplicateColumn {
        column: usize,
    },
    DeleteColumn {
        column: usize,
    },

    // -- Shelves --
    ApplyShelfState {
        #[serde(default)]
        slots: Vec<ShelfKey>,
        class: ShelfClass,
    },
    RemoveShelves {
        #[serde(default)]
        slots: Vec<ShelfKey>,
    },

    // -- Facades --
    /// Fit a facade type on slot groups. `retire` deletes the selected
    /// facades instead.
    FitFacade {
        facade_type: FacadeType,
        #[serde(default)]
        groups: Vec<Vec<FacadeSlot>>,
    },
    RetireFacades {
        #[serde(default)]
        keys: Vec<FacadeKey>,
    },

    // -- Back panels --
    RemoveBackPanels {
        #[serde(default)]
        keys: Vec<BackPanelKey>,
    },
    RestoreBackPanels {
        #[serde(default)]
        keys: Vec<BackPanelKey>,
    },
    AddCustomPanel {
        column: usize,
        from_row: Row,
        to_row: Row,
    },

    // -- Finish --
    SetTexture {
        target: TextureTarget,
        texture: Texture,
    },
    SetFeetType {
        feet_type: FeetType,
    },

    // -- Selection --
    SelectColumn {
        column: Option<usize>,
    },
    SelectShelves {
        slots: Vec<ShelfKey>,
    },
    SelectFacadeSlots {
        groups: Vec<Vec<FacadeSlot>>,
    },
    SelectFacades {
        keys: Vec<FacadeKey>,
    },
    SelectBackPanels {
        keys: Vec<BackPanelKey>,
    },
    SelectVerticalPanels {
        walls: Vec<usize>,
    },
    SelectFeet {
        selected: bool,
    },
    ClearSelection,

    // -- History --
    Undo,
    Redo,

    /// Ask for the current snapshot without changing anything.
    GetSnapshot,
}

/// What a committed command did, for the UI and the price display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationReport {
    Shelves {
        report: ShelfReport,
        /// Reinforcement surcharge for the shelves this command reinforced.
        surcharge: f64,
    },
    Facades {
        report: FitReport,
    },
    Retired {
        keys: Vec<FacadeKey>,
    },
    BackPanels {
        changed: usize,
    },
    CustomPanel {
        key: BackPanelKey,
    },
    Textured {
        count: usize,
    },
}

/// Messages from the engine to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi {
    /// The structure after a command. A rejected command carries the
    /// reason and the unchanged snapshot.
    StructureUpdated {
        snapshot: Box<StructureState>,
        quote: Quote,
        report: Option<OperationReport>,
        rejected: Option<String>,
    },

    /// The editing selection changed.
    SelectionChanged { edit: EditState },

    /// The message could not be handled.
    Error { message: String },
}
