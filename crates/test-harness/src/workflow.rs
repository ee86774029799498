//! ConfiguratorBuilder: fluent API for scripting configurator sessions in tests.
//!
//! Wraps `configurator_bridge::dispatch()` to test the real dispatch path,
//! not a simulation. Rows are given as numbers (`2.0`, `1.5`) for readability.

use configurator_bridge::{EngineState, EngineToUi, OperationReport, UiToEngine};
use shelf_types::{BackPanelKey, FacadeKey, FacadeType, FeetType, ShelfClass, ShelfKey, Texture};
use structure_engine::{
    ColumnResize, EngineConfig, FacadeSlot, FitReport, GlobalDimension, Quote, ShelfReport,
    StructureState, TextureTarget,
};

use crate::assertions;
use crate::helpers::*;
use crate::oracle;

/// A fluent builder for driving and verifying a configurator in tests.
#[derive(Debug)]
pub struct ConfiguratorBuilder {
    pub state: EngineState,
    history: Vec<(String, String)>,
    auto_check: bool,
}

impl ConfiguratorBuilder {
    /// Start from the default three-column structure.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: EngineState::with_config(config),
            history: Vec::new(),
            auto_check: false,
        }
    }

    /// Enable auto-checking: after every command, run every oracle.
    pub fn with_auto_check(mut self) -> Self {
        self.auto_check = true;
        self
    }

    // ── Dimensions and Columns ──────────────────────────────────────────

    pub fn columns(&mut self, count: usize) -> Result<&mut Self, HarnessError> {
        self.send(
            "SetGlobalDimension(Columns)",
            UiToEngine::SetGlobalDimension {
                dimension: GlobalDimension::Columns(count),
            },
        )?;
        Ok(self)
    }

    pub fn height(&mut self, height: f64) -> Result<&mut Self, HarnessError> {
        self.send(
            "SetGlobalDimension(Height)",
            UiToEngine::SetGlobalDimension {
                dimension: GlobalDimension::Height(height),
            },
        )?;
        Ok(self)
    }

    pub fn width(&mut self, width: f64) -> Result<&mut Self, HarnessError> {
        self.send(
            "SetGlobalDimension(Width)",
            UiToEngine::SetGlobalDimension {
                dimension: GlobalDimension::Width(width),
            },
        )?;
        Ok(self)
    }

    /// Preview then apply a column width.
    pub fn column_width(&mut self, column: usize, width: f64) -> Result<&mut Self, HarnessError> {
        self.send(
            "ResizeColumn(Width)",
            UiToEngine::ResizeColumn {
                column,
                resize: ColumnResize::Width(width),
            },
        )?;
        Ok(self)
    }

    pub fn preview_width(&mut self, column: usize, width: f64) -> Result<&mut Self, HarnessError> {
        self.send(
            "PreviewColumnWidth",
            UiToEngine::PreviewColumnWidth { column, width },
        )?;
        Ok(self)
    }

    pub fn cancel_width(&mut self) -> Result<&mut Self, HarnessError> {
        self.send("CancelColumnWidth", UiToEngine::CancelColumnWidth)?;
        Ok(self)
    }

    pub fn apply_width(&mut self) -> Result<&mut Self, HarnessError> {
        self.send("ApplyColumnWidth", UiToEngine::ApplyColumnWidth)?;
        Ok(self)
    }

    pub fn column_height(&mut self, column: usize, height: f64) -> Result<&mut Self, HarnessError> {
        self.send(
            "ResizeColumn(Height)",
            UiToEngine::ResizeColumn {
                column,
                resize: ColumnResize::Height(height),
            },
        )?;
        Ok(self)
    }

    pub fn duplicate(&mut self, column: usize) -> Result<&mut Self, HarnessError> {
        self.send("DuplicateColumn", UiToEngine::DuplicateColumn { column })?;
        Ok(self)
    }

    pub fn delete(&mut self, column: usize) -> Result<&mut Self, HarnessError> {
        self.send("DeleteColumn", UiToEngine::DeleteColumn { column })?;
        Ok(self)
    }

    // ── Shelves ─────────────────────────────────────────────────────────

    /// Apply a class to the slots at `rows` of `column`.
    pub fn shelves(
        &mut self,
        column: usize,
        rows: &[f64],
        class: ShelfClass,
    ) -> Result<ShelfReport, HarnessError> {
        let slots = self.slots(column, rows)?;
        let report = self.send("ApplyShelfState", UiToEngine::ApplyShelfState { slots, class })?;
        shelf_report(report)
    }

    pub fn reinforce(&mut self, column: usize, rows: &[f64]) -> Result<ShelfReport, HarnessError> {
        self.shelves(column, rows, ShelfClass::Reinforced)
    }

    pub fn standard(&mut self, column: usize, rows: &[f64]) -> Result<ShelfReport, HarnessError> {
        self.shelves(column, rows, ShelfClass::Standard)
    }

    pub fn remove(&mut self, column: usize, rows: &[f64]) -> Result<ShelfReport, HarnessError> {
        let slots = self.slots(column, rows)?;
        let report = self.send("RemoveShelves", UiToEngine::RemoveShelves { slots })?;
        shelf_report(report)
    }

    // ── Facades ─────────────────────────────────────────────────────────

    /// Fit one facade over the contiguous slots starting at `rows`.
    pub fn fit(
        &mut self,
        facade_type: FacadeType,
        column: usize,
        rows: &[f64],
    ) -> Result<FitReport, HarnessError> {
        let slots = rows
            .iter()
            .map(|r| row(*r).map(|r| FacadeSlot::new(r, column)))
            .collect::<Result<Vec<_>, _>>()?;
        self.fit_groups(facade_type, vec![slots])
    }

    pub fn fit_groups(
        &mut self,
        facade_type: FacadeType,
        groups: Vec<Vec<FacadeSlot>>,
    ) -> Result<FitReport, HarnessError> {
        match self.send("FitFacade", UiToEngine::FitFacade { facade_type, groups })? {
            Some(OperationReport::Facades { report }) => Ok(report),
            other => Err(unexpected("FitFacade", other)),
        }
    }

    pub fn retire(&mut self, keys: Vec<FacadeKey>) -> Result<Vec<FacadeKey>, HarnessError> {
        match self.send("RetireFacades", UiToEngine::RetireFacades { keys })? {
            Some(OperationReport::Retired { keys }) => Ok(keys),
            other => Err(unexpected("RetireFacades", other)),
        }
    }

    // ── Back Panels ─────────────────────────────────────────────────────

    pub fn remove_panels(&mut self, keys: Vec<BackPanelKey>) -> Result<&mut Self, HarnessError> {
        self.send("RemoveBackPanels", UiToEngine::RemoveBackPanels { keys })?;
        Ok(self)
    }

    pub fn restore_panels(&mut self, keys: Vec<BackPanelKey>) -> Result<&mut Self, HarnessError> {
        self.send("RestoreBackPanels", UiToEngine::RestoreBackPanels { keys })?;
        Ok(self)
    }

    pub fn custom_panel(&mut self, column: usize, from: f64, to: f64) -> Result<BackPanelKey, HarnessError> {
        let msg = UiToEngine::AddCustomPanel {
            column,
            from_row: row(from)?,
            to_row: row(to)?,
        };
        match self.send("AddCustomPanel", msg)? {
            Some(OperationReport::CustomPanel { key }) => Ok(key),
            other => Err(unexpected("AddCustomPanel", other)),
        }
    }

    // ── Finish ──────────────────────────────────────────────────────────

    pub fn texture(&mut self, target: TextureTarget, name: &str) -> Result<usize, HarnessError> {
        let msg = UiToEngine::SetTexture {
            target,
            texture: Texture::new(name),
        };
        match self.send("SetTexture", msg)? {
            Some(OperationReport::Textured { count }) => Ok(count),
            other => Err(unexpected("SetTexture", other)),
        }
    }

    pub fn feet(&mut self, feet_type: FeetType) -> Result<&mut Self, HarnessError> {
        self.send("SetFeetType", UiToEngine::SetFeetType { feet_type })?;
        Ok(self)
    }

    // ── Selection ───────────────────────────────────────────────────────

    pub fn select_shelves(&mut self, column: usize, rows: &[f64]) -> Result<&mut Self, HarnessError> {
        let slots = self.slots(column, rows)?;
        self.send("SelectShelves", UiToEngine::SelectShelves { slots })?;
        Ok(self)
    }

    pub fn select_walls(&mut self, walls: Vec<usize>) -> Result<&mut Self, HarnessError> {
        self.send("SelectVerticalPanels", UiToEngine::SelectVerticalPanels { walls })?;
        Ok(self)
    }

    // ── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<&mut Self, HarnessError> {
        self.send("Undo", UiToEngine::Undo)?;
        Ok(self)
    }

    pub fn redo(&mut self) -> Result<&mut Self, HarnessError> {
        self.send("Redo", UiToEngine::Redo)?;
        Ok(self)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> &StructureState {
        self.state.engine.snapshot()
    }

    pub fn quote(&self) -> Quote {
        self.state.engine.quote()
    }

    /// Commands sent so far with their outcome.
    pub fn history(&self) -> &[(String, String)] {
        &self.history
    }

    pub fn facade_keys(&self, column: usize) -> Vec<FacadeKey> {
        self.snapshot()
            .facades
            .keys()
            .filter(|k| k.column == column)
            .copied()
            .collect()
    }

    // ── Inline Assertions ───────────────────────────────────────────────

    pub fn assert_active_rows(&self, column: usize, expected: &[f64]) -> Result<&Self, HarnessError> {
        assertions::assert_active_rows(self.snapshot(), column, &rows(expected)?, "builder")?;
        Ok(self)
    }

    pub fn assert_live_spans(&self, column: usize, expected: &[(f64, f64)]) -> Result<&Self, HarnessError> {
        let spans = expected
            .iter()
            .map(|(a, b)| Ok((row(*a)?, row(*b)?)))
            .collect::<Result<Vec<_>, HarnessError>>()?;
        assertions::assert_live_spans(self.snapshot(), column, &spans, "builder")?;
        Ok(self)
    }

    pub fn assert_width(&self, expected: f64) -> Result<&Self, HarnessError> {
        assertions::assert_width(self.snapshot(), expected, 1e-6, "builder")?;
        Ok(self)
    }

    pub fn assert_columns(&self, expected: usize) -> Result<&Self, HarnessError> {
        let actual = self.snapshot().columns();
        if actual == expected {
            Ok(self)
        } else {
            Err(HarnessError::AssertionFailed {
                detail: format!("expected {} columns, got {}", expected, actual),
            })
        }
    }

    // ── Oracle Integration ──────────────────────────────────────────────

    /// Run every oracle on the current snapshot.
    pub fn check_all(&self) -> Vec<oracle::OracleVerdict> {
        oracle::run_all_checks(self.snapshot())
    }

    // ── Internal Helpers ────────────────────────────────────────────────

    fn slots(&self, column: usize, rows: &[f64]) -> Result<Vec<ShelfKey>, HarnessError> {
        rows.iter()
            .map(|r| row(*r).map(|r| slot_key(r, column)))
            .collect()
    }

    /// Dispatch a message and turn the response into a result.
    fn send(&mut self, label: &str, msg: UiToEngine) -> Result<Option<OperationReport>, HarnessError> {
        let response = configurator_bridge::dispatch(&mut self.state, msg);
        match response {
            EngineToUi::StructureUpdated {
                rejected: Some(reason),
                ..
            } => {
                self.history.push((label.to_string(), format!("Rejected: {}", reason)));
                Err(HarnessError::Rejected {
                    operation: label.to_string(),
                    reason,
                })
            }
            EngineToUi::StructureUpdated { report, .. } => {
                self.history
                    .push((label.to_string(), "StructureUpdated".to_string()));
                // A width preview leaves the global width unsettled.
                if self.auto_check && self.state.engine.pending_width_column().is_none() {
                    assertions::assert_all_pass(&self.check_all(), label)?;
                }
                Ok(report)
            }
            EngineToUi::SelectionChanged { .. } => {
                self.history
                    .push((label.to_string(), "SelectionChanged".to_string()));
                Ok(None)
            }
            EngineToUi::Error { message } => {
                self.history.push((label.to_string(), format!("Error: {}", message)));
                Err(HarnessError::DispatchError { message })
            }
        }
    }
}

impl Default for ConfiguratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn shelf_report(report: Option<OperationReport>) -> Result<ShelfReport, HarnessError> {
    match report {
        Some(OperationReport::Shelves { report, .. }) => Ok(report),
        other => Err(unexpected("shelf command", other)),
    }
}

fn unexpected(label: &str, report: Option<OperationReport>) -> HarnessError {
    HarnessError::DispatchError {
        message: format!("{}: unexpected report {:?}", label, report),
    }
}
