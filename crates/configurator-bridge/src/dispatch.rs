use structure_engine::TextureTarget;
use tracing::{debug, warn};

use crate::edit_state::EditState;
use crate::engine_state::{BridgeError, EngineState};
use crate::messages::{EngineToUi, OperationReport, UiToEngine};

/// Dispatch a UI message to the engine and return a response.
///
/// Engine rejections come back as a `StructureUpdated` carrying the
/// unchanged snapshot and the reason; bridge-level failures become
/// `Error`.
pub fn dispatch(state: &mut EngineState, msg: UiToEngine) -> EngineToUi {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(BridgeError::Engine(e)) => {
            warn!(error = %e, "command rejected");
            structure_updated(state, None, Some(e.to_string()))
        }
        Err(e) => EngineToUi::Error {
            message: e.to_string(),
        },
    }
}

fn handle_message(state: &mut EngineState, msg: UiToEngine) -> Result<EngineToUi, BridgeError> {
    debug!(?msg, "dispatching");
    let engine = &mut state.engine;
    let edit = &mut state.edit;

    let report = match msg {
        // -- Dimensions and columns --
        UiToEngine::SetGlobalDimension { dimension } => {
            engine.set_global_dimension(dimension)?;
            None
        }
        UiToEngine::ResizeColumn { column, resize } => {
            engine.resize_column(column, resize)?;
            None
        }
        UiToEngine::PreviewColumnWidth { column, width } => {
            engine.preview_column_width(column, width)?;
            None
        }
        UiToEngine::CancelColumnWidth => {
            engine.cancel_column_width()?;
            None
        }
        UiToEngine::ApplyColumnWidth => {
            engine.apply_column_width()?;
            None
        }
        UiToEngine::DuplicateColumn { column } => {
            engine.duplicate_column(column)?;
            None
        }
        UiToEngine::DeleteColumn { column } => {
            engine.delete_column(column)?;
            None
        }

        // -- Shelves --
        UiToEngine::ApplyShelfState { slots, class } => {
            let slots = or_pending(slots, &edit.shelf.selected, "apply shelf state")?;
            let report = engine.apply_shelf_state(&slots, class)?;
            let surcharge = engine.config().prices.reinforcement_surcharge(&report);
            Some(OperationReport::Shelves { report, surcharge })
        }
        UiToEngine::RemoveShelves { slots } => {
            let slots = or_pending(slots, &edit.shelf.selected, "remove shelves")?;
            let report = engine.remove_shelves(&slots)?;
            Some(OperationReport::Shelves {
                report,
                surcharge: 0.0,
            })
        }

        // -- Facades --
        UiToEngine::FitFacade { facade_type, .. } if facade_type.is_retire() => {
            let keys = or_pending(Vec::new(), &edit.facade.selected, "retire facades")?;
            let keys = engine.retire_facades(&keys)?;
            edit.facade.selected.clear();
            Some(OperationReport::Retired { keys })
        }
        UiToEngine::FitFacade { facade_type, groups } => {
            let groups = or_pending(groups, &edit.facade.groups, "fit facade")?;
            let report = engine.fit_facade(facade_type, &groups)?;
            edit.facade.groups.clear();
            Some(OperationReport::Facades { report })
        }
        UiToEngine::RetireFacades { keys } => {
            let keys = or_pending(keys, &edit.facade.selected, "retire facades")?;
            let keys = engine.retire_facades(&keys)?;
            edit.facade.selected.clear();
            Some(OperationReport::Retired { keys })
        }

        // -- Back panels --
        UiToEngine::RemoveBackPanels { keys } => {
            let keys = or_pending(keys, &edit.backboard.selected, "remove back panels")?;
            let changed = engine.remove_back_panels(&keys)?;
            Some(OperationReport::BackPanels { changed })
        }
        UiToEngine::RestoreBackPanels { keys } => {
            let keys = or_pending(keys, &edit.backboard.selected, "restore back panels")?;
            let changed = engine.restore_back_panels(&keys)?;
            Some(OperationReport::BackPanels { changed })
        }
        UiToEngine::AddCustomPanel {
            column,
            from_row,
            to_row,
        } => {
            let key = engine.add_custom_panel(column, from_row, to_row)?;
            Some(OperationReport::CustomPanel { key })
        }

        // -- Finish --
        UiToEngine::SetTexture { target, texture } => {
            let target = resolve_texture_target(target, edit)?;
            let count = engine.set_texture(&target, &texture)?;
            clear_texture_selection(&target, edit);
            Some(OperationReport::Textured { count })
        }
        UiToEngine::SetFeetType { feet_type } => {
            engine.set_feet_type(feet_type)?;
            None
        }

        // -- Selection --
        UiToEngine::SelectColumn { column } => {
            edit.columns.selected = column;
            return Ok(selection_changed(state));
        }
        UiToEngine::SelectShelves { slots } => {
            edit.shelf.selected = slots;
            return Ok(selection_changed(state));
        }
        UiToEngine::SelectFacadeSlots { groups } => {
            edit.facade.groups = groups;
            return Ok(selection_changed(state));
        }
        UiToEngine::SelectFacades { keys } => {
            edit.facade.selected = keys;
            return Ok(selection_changed(state));
        }
        UiToEngine::SelectBackPanels { keys } => {
            edit.backboard.selected = keys;
            return Ok(selection_changed(state));
        }
        UiToEngine::SelectVerticalPanels { walls } => {
            edit.vertical_panels.selected = walls;
            return Ok(selection_changed(state));
        }
        UiToEngine::SelectFeet { selected } => {
            edit.feet.selected = selected;
            return Ok(selection_changed(state));
        }
        UiToEngine::ClearSelection => {
            edit.clear();
            return Ok(selection_changed(state));
        }

        // -- History --
        UiToEngine::Undo => {
            engine.undo()?;
            None
        }
        UiToEngine::Redo => {
            engine.redo()?;
            None
        }

        UiToEngine::GetSnapshot => None,
    };

    let columns = state.engine.snapshot().columns();
    state.edit.retain_columns(columns);
    Ok(structure_updated(state, report, None))
}

/// The explicit selection, or the pending one when none was sent.
fn or_pending<T: Clone>(given: Vec<T>, pending: &[T], operation: &'static str) -> Result<Vec<T>, BridgeError> {
    let selection = if given.is_empty() {
        pending.to_vec()
    } else {
        given
    };
    if selection.is_empty() {
        return Err(BridgeError::EmptySelection { operation });
    }
    Ok(selection)
}

/// Fill an empty texture target from the matching menu selection.
fn resolve_texture_target(target: TextureTarget, edit: &EditState) -> Result<TextureTarget, BridgeError> {
    if !target.is_empty() {
        return Ok(target);
    }
    let resolved = match target {
        TextureTarget::Shelves(_) => TextureTarget::Shelves(edit.shelf.selected.clone()),
        TextureTarget::BackPanels(_) => TextureTarget::BackPanels(edit.backboard.selected.clone()),
        TextureTarget::Facades(_) => TextureTarget::Facades(edit.facade.selected.clone()),
        TextureTarget::VerticalPanels(_) => {
            TextureTarget::VerticalPanels(edit.vertical_panels.selected.clone())
        }
        TextureTarget::Feet => TextureTarget::Feet,
    };
    if resolved.is_empty() {
        return Err(BridgeError::EmptySelection {
            operation: "set texture",
        });
    }
    Ok(resolved)
}

fn clear_texture_selection(target: &TextureTarget, edit: &mut EditState) {
    match target {
        TextureTarget::Shelves(_) => edit.shelf.selected.clear(),
        TextureTarget::BackPanels(_) => edit.backboard.selected.clear(),
        TextureTarget::Facades(_) => edit.facade.selected.clear(),
        TextureTarget::VerticalPanels(_) => edit.vertical_panels.selected.clear(),
        TextureTarget::Feet => edit.feet.selected = false,
    }
}

fn structure_updated(
    state: &EngineState,
    report: Option<OperationReport>,
    rejected: Option<String>,
) -> EngineToUi {
    EngineToUi::StructureUpdated {
        snapshot: Box::new(state.engine.snapshot().clone()),
        quote: state.engine.quote(),
        report,
        rejected,
    }
}

fn selection_changed(state: &EngineState) -> EngineToUi {
    EngineToUi::SelectionChanged {
        edit: state.edit.clone(),
    }
}
