pub mod back_panels;
pub mod columns;
pub mod config;
pub mod facades;
pub mod layout;
pub mod pricing;
pub mod rebuild;
pub mod shelves;
pub mod textures;
pub mod types;
pub mod undo;

use serde::{Deserialize, Serialize};
use shelf_types::{BackPanelKey, FacadeKey, FacadeType, FeetType, Row, ShelfClass, ShelfKey, Texture};
use tracing::{debug, info, instrument};

pub use config::{ConfigError, EngineConfig};
pub use facades::FacadeSlot;
pub use columns::MAX_LENGTH_CM;
pub use layout::{estimated_rows, Layout, MAX_ROWS};
pub use pricing::{PriceTable, Quote};
pub use textures::TextureTarget;
pub use types::*;

use crate::rebuild::rebuild;
use crate::undo::UndoStack;

/// A global dimension edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum GlobalDimension {
    /// Overall width, split evenly across the columns.
    Width(f64),
    /// Height of every column.
    Height(f64),
    Depth(f64),
    /// Column count. Resets every per-column collection.
    Columns(usize),
}

/// A single-column dimension edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "axis", content = "value", rename_all = "snake_case")]
pub enum ColumnResize {
    Width(f64),
    Height(f64),
}

/// A column width edit awaiting apply or cancel.
#[derive(Debug, Clone)]
struct PendingWidth {
    column: usize,
    before: StructureState,
}

/// The structural engine.
///
/// Owns the structure state and applies each user action as one
/// transaction: the action runs against a draft copy, derived data is
/// rebuilt, and the draft replaces the state in a single step. A rejected
/// action leaves the state untouched.
#[derive(Debug)]
pub struct Engine {
    state: StructureState,
    config: EngineConfig,
    history: UndoStack,
    pending_width: Option<PendingWidth>,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut state = StructureState::new(config.dimensions.clone());
        state.feet.feet_type = config.feet;
        columns::recompute_width(&mut state);
        rebuild(&mut state);
        info!(columns = state.columns(), width = state.dimensions.width, "engine created");
        Self {
            state,
            history: UndoStack::new(config.history_limit),
            config,
            pending_width: None,
        }
    }

    /// The current consistent snapshot.
    pub fn snapshot(&self) -> &StructureState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn layout(&self) -> Layout<'_> {
        self.state.layout()
    }

    pub fn quote(&self) -> Quote {
        pricing::quote(&self.state, &self.config.prices)
    }

    /// Shelf count shown while choosing a column height.
    pub fn estimated_rows(&self, height: f64) -> u32 {
        let d = &self.state.dimensions;
        estimated_rows(height, d.thickness, d.cell_height)
    }

    pub fn is_facade_available(&self, facade_type: FacadeType, column: usize) -> bool {
        facades::is_available(&self.state, facade_type, column)
    }

    pub fn available_facades(&self, column: usize) -> Vec<FacadeType> {
        facades::available_types(&self.state, column)
    }

    /// Column of the width edit in progress, if any.
    pub fn pending_width_column(&self) -> Option<usize> {
        self.pending_width.as_ref().map(|p| p.column)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Run `action` against a draft and commit it atomically.
    ///
    /// A pending width preview is discarded first. Commits that change
    /// nothing are not recorded in the history.
    fn commit<T>(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut StructureState, &EngineConfig) -> Result<T, StructureError>,
    ) -> Result<T, StructureError> {
        if let Some(pending) = self.pending_width.take() {
            debug!(column = pending.column, "discarding width preview");
            self.state = pending.before;
        }
        let mut draft = self.state.clone();
        let output = f(&mut draft, &self.config)?;
        rebuild(&mut draft);
        if draft != self.state {
            let previous = std::mem::replace(&mut self.state, draft);
            self.history.push(previous);
            debug!(action, "committed");
        }
        Ok(output)
    }

    // ── Dimensions ──────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn set_global_dimension(&mut self, dimension: GlobalDimension) -> Result<(), StructureError> {
        self.commit("set_global_dimension", |state, _| match dimension {
            GlobalDimension::Width(width) => columns::redistribute_width(state, width),
            GlobalDimension::Height(height) => columns::set_all_heights(state, height),
            GlobalDimension::Depth(depth) => {
                columns::check_length("depth", depth)?;
                state.dimensions.depth = depth;
                Ok(())
            }
            GlobalDimension::Columns(count) => columns::reset_columns(state, count),
        })
    }

    /// Resize one column in a single step. A width resize behaves like a
    /// preview immediately applied.
    #[instrument(skip(self))]
    pub fn resize_column(&mut self, column: usize, resize: ColumnResize) -> Result<(), StructureError> {
        match resize {
            ColumnResize::Width(width) => {
                self.preview_column_width(column, width)?;
                self.apply_column_width()
            }
            ColumnResize::Height(height) => self.commit("resize_column_height", |state, _| {
                columns::set_height(state, column, height)
            }),
        }
    }

    /// Show a column at a candidate width without committing it.
    ///
    /// The first preview saves the state to return to on cancel; further
    /// previews of the same column reuse it.
    #[instrument(skip(self))]
    pub fn preview_column_width(&mut self, column: usize, width: f64) -> Result<(), StructureError> {
        if let Some(pending) = &self.pending_width {
            if pending.column != column {
                return Err(StructureError::EditInProgress {
                    column: pending.column,
                });
            }
        }
        let mut draft = match &self.pending_width {
            Some(pending) => pending.before.clone(),
            None => self.state.clone(),
        };
        columns::set_width(&mut draft, column, width)?;
        rebuild(&mut draft);
        let before = match self.pending_width.take() {
            Some(pending) => pending.before,
            None => self.state.clone(),
        };
        self.state = draft;
        self.pending_width = Some(PendingWidth { column, before });
        Ok(())
    }

    /// Restore the state saved by the first preview.
    pub fn cancel_column_width(&mut self) -> Result<(), StructureError> {
        let pending = self.pending_width.take().ok_or(StructureError::NoPendingEdit)?;
        self.state = pending.before;
        debug!(column = pending.column, "width edit cancelled");
        Ok(())
    }

    /// Finalize the previewed width and settle the global width.
    pub fn apply_column_width(&mut self) -> Result<(), StructureError> {
        let pending = self.pending_width.take().ok_or(StructureError::NoPendingEdit)?;
        match self.config.legacy_width_increment {
            Some(step) => self.state.dimensions.width = pending.before.dimensions.width + step,
            None => columns::recompute_width(&mut self.state),
        }
        info!(
            column = pending.column,
            width = self.state.dimensions.width,
            "column width applied"
        );
        if self.state != pending.before {
            self.history.push(pending.before);
        }
        Ok(())
    }

    // ── Columns ─────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn duplicate_column(&mut self, column: usize) -> Result<(), StructureError> {
        self.commit("duplicate_column", |state, _| columns::duplicate(state, column))
    }

    #[instrument(skip(self))]
    pub fn delete_column(&mut self, column: usize) -> Result<(), StructureError> {
        self.commit("delete_column", |state, _| columns::delete(state, column))
    }

    // ── Shelves ─────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn apply_shelf_state(
        &mut self,
        slots: &[ShelfKey],
        class: ShelfClass,
    ) -> Result<ShelfReport, StructureError> {
        self.commit("apply_shelf_state", |state, _| {
            Ok(shelves::apply_class(state, slots, class))
        })
    }

    #[instrument(skip(self))]
    pub fn remove_shelves(&mut self, slots: &[ShelfKey]) -> Result<ShelfReport, StructureError> {
        self.commit("remove_shelves", |state, _| Ok(shelves::remove(state, slots)))
    }

    // ── Facades ─────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn fit_facade(
        &mut self,
        facade_type: FacadeType,
        groups: &[Vec<FacadeSlot>],
    ) -> Result<FitReport, StructureError> {
        self.commit("fit_facade", |state, _| {
            facades::fit(state, facade_type, groups)
        })
    }

    #[instrument(skip(self))]
    pub fn retire_facades(&mut self, selection: &[FacadeKey]) -> Result<Vec<FacadeKey>, StructureError> {
        self.commit("retire_facades", |state, _| facades::retire(state, selection))
    }

    // ── Back panels ─────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn remove_back_panels(&mut self, keys: &[BackPanelKey]) -> Result<usize, StructureError> {
        self.commit("remove_back_panels", |state, _| {
            Ok(back_panels::remove_panels(state, keys))
        })
    }

    #[instrument(skip(self))]
    pub fn restore_back_panels(&mut self, keys: &[BackPanelKey]) -> Result<usize, StructureError> {
        self.commit("restore_back_panels", |state, _| {
            Ok(back_panels::restore_panels(state, keys))
        })
    }

    #[instrument(skip(self))]
    pub fn add_custom_panel(
        &mut self,
        column: usize,
        from_row: Row,
        to_row: Row,
    ) -> Result<BackPanelKey, StructureError> {
        self.commit("add_custom_panel", |state, _| {
            back_panels::add_custom_panel(state, column, from_row, to_row)
        })
    }

    // ── Finish ──────────────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub fn set_texture(&mut self, target: &TextureTarget, texture: &Texture) -> Result<usize, StructureError> {
        self.commit("set_texture", |state, _| {
            Ok(textures::apply(state, target, texture))
        })
    }

    #[instrument(skip(self))]
    pub fn set_feet_type(&mut self, feet_type: FeetType) -> Result<(), StructureError> {
        self.commit("set_feet_type", |state, _| {
            state.feet.feet_type = feet_type;
            Ok(())
        })
    }

    // ── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<(), StructureError> {
        if let Some(pending) = self.pending_width.take() {
            self.state = pending.before;
        }
        let previous = self.history.pop_undo().ok_or(StructureError::NothingToUndo)?;
        let current = std::mem::replace(&mut self.state, previous);
        self.history.push_redo(current);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), StructureError> {
        if let Some(pending) = self.pending_width.take() {
            self.state = pending.before;
        }
        let next = self.history.pop_redo().ok_or(StructureError::NothingToRedo)?;
        let current = std::mem::replace(&mut self.state, next);
        self.history.push_undo_only(current);
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
