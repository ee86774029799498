use approx::assert_relative_eq;
use configurator_bridge::*;
use shelf_types::*;
use structure_engine::{FacadeSlot, GlobalDimension, ShelfState, StructureState, TextureTarget};

// ── Helper functions ─────────────────────────────────────────────────────

fn snapshot(response: &EngineToUi) -> &StructureState {
    match response {
        EngineToUi::StructureUpdated { snapshot, .. } => snapshot,
        other => panic!("expected StructureUpdated, got {:?}", other),
    }
}

fn rejection(response: &EngineToUi) -> Option<&str> {
    match response {
        EngineToUi::StructureUpdated { rejected, .. } => rejected.as_deref(),
        other => panic!("expected StructureUpdated, got {:?}", other),
    }
}

fn report(response: &EngineToUi) -> &OperationReport {
    match response {
        EngineToUi::StructureUpdated {
            report: Some(report),
            ..
        } => report,
        other => panic!("expected a report, got {:?}", other),
    }
}

fn row(r: u32) -> Row {
    Row::whole(r)
}

// ── Tests ────────────────────────────────────────────────────────────────

#[test]
fn test_get_snapshot() {
    let mut state = EngineState::new();
    let response = dispatch(&mut state, UiToEngine::GetSnapshot);
    assert_eq!(snapshot(&response).columns(), 3);
    assert_eq!(rejection(&response), None);
}

#[test]
fn test_apply_reinforced_reports_surcharge() {
    let mut state = EngineState::new();
    let response = dispatch(
        &mut state,
        UiToEngine::ApplyShelfState {
            slots: vec![ShelfKey::real(row(1), 0), ShelfKey::real(row(2), 0)],
            class: ShelfClass::Reinforced,
        },
    );
    match report(&response) {
        OperationReport::Shelves { report, surcharge } => {
            assert_eq!(report.newly_reinforced, 2);
            assert_relative_eq!(*surcharge, 16.0);
        }
        other => panic!("unexpected report {:?}", other),
    }
}

#[test]
fn test_empty_slots_use_the_pending_selection() {
    let mut state = EngineState::new();
    let selected = dispatch(
        &mut state,
        UiToEngine::SelectShelves {
            slots: vec![ShelfKey::real(row(2), 1)],
        },
    );
    assert!(matches!(selected, EngineToUi::SelectionChanged { .. }));

    let response = dispatch(&mut state, UiToEngine::RemoveShelves { slots: vec![] });
    assert_eq!(
        snapshot(&response).shelves[&ShelfKey::real(row(2), 1)].state,
        ShelfState::Removed
    );
}

#[test]
fn test_empty_selection_is_an_error() {
    let mut state = EngineState::new();
    let response = dispatch(&mut state, UiToEngine::RemoveShelves { slots: vec![] });
    match response {
        EngineToUi::Error { message } => assert!(message.contains("remove shelves")),
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn test_rejection_keeps_the_snapshot() {
    let mut state = EngineState::new();
    let before = state.engine.snapshot().clone();
    let response = dispatch(&mut state, UiToEngine::DeleteColumn { column: 7 });

    assert!(rejection(&response).is_some_and(|r| r.contains("out of range")));
    assert_eq!(snapshot(&response), &before);
}

#[test]
fn test_fit_then_retire_through_selection() {
    let mut state = EngineState::new();
    dispatch(
        &mut state,
        UiToEngine::SelectFacadeSlots {
            groups: vec![vec![FacadeSlot::new(row(0), 2)]],
        },
    );
    let fitted = dispatch(
        &mut state,
        UiToEngine::FitFacade {
            facade_type: FacadeType::Porte36,
            groups: vec![],
        },
    );
    let placed = match report(&fitted) {
        OperationReport::Facades { report } => report.placed.clone(),
        other => panic!("unexpected report {:?}", other),
    };
    assert_eq!(placed.len(), 1);
    assert!(state.edit.facade.groups.is_empty());

    dispatch(&mut state, UiToEngine::SelectFacades { keys: placed.clone() });
    let retired = dispatch(
        &mut state,
        UiToEngine::FitFacade {
            facade_type: FacadeType::Retire,
            groups: vec![],
        },
    );
    assert_eq!(report(&retired), &OperationReport::Retired { keys: placed });
    assert!(snapshot(&retired).facades.is_empty());
}

#[test]
fn test_texture_selection_cleared_after_commit() {
    let mut state = EngineState::new();
    dispatch(&mut state, UiToEngine::SelectVerticalPanels { walls: vec![0, 3] });
    let response = dispatch(
        &mut state,
        UiToEngine::SetTexture {
            target: TextureTarget::VerticalPanels(vec![]),
            texture: Texture::new("oak"),
        },
    );

    assert_eq!(report(&response), &OperationReport::Textured { count: 2 });
    assert_eq!(
        snapshot(&response).vertical_panels[&3].texture,
        Some(Texture::new("oak"))
    );
    assert!(state.edit.vertical_panels.selected.is_empty());
}

#[test]
fn test_failed_texture_keeps_the_selection() {
    let mut state = EngineState::new();
    let response = dispatch(
        &mut state,
        UiToEngine::SetTexture {
            target: TextureTarget::Shelves(vec![]),
            texture: Texture::new("oak"),
        },
    );
    assert!(matches!(response, EngineToUi::Error { .. }));
}

#[test]
fn test_selection_follows_column_deletion() {
    let mut state = EngineState::new();
    dispatch(&mut state, UiToEngine::SelectColumn { column: Some(2) });
    dispatch(&mut state, UiToEngine::DeleteColumn { column: 0 });
    assert_eq!(state.edit.columns.selected, None);
}

#[test]
fn test_undo_redo() {
    let mut state = EngineState::new();
    dispatch(
        &mut state,
        UiToEngine::SetGlobalDimension {
            dimension: GlobalDimension::Columns(2),
        },
    );
    let undone = dispatch(&mut state, UiToEngine::Undo);
    assert_eq!(snapshot(&undone).columns(), 3);
    let redone = dispatch(&mut state, UiToEngine::Redo);
    assert_eq!(snapshot(&redone).columns(), 2);

    let nothing = dispatch(&mut state, UiToEngine::Redo);
    assert_eq!(rejection(&nothing), Some("nothing to redo"));
}
