//! Tests for the ConfiguratorBuilder workflow API.

use shelf_types::{FacadeType, FeetType};
use structure_engine::TextureTarget;
use test_harness::helpers::panel;
use test_harness::{ConfiguratorBuilder, HarnessError};

#[test]
fn default_builder_starts_with_three_columns() {
    let m = ConfiguratorBuilder::new();
    m.assert_columns(3).unwrap();
    m.assert_width(116.0).unwrap();
    m.assert_active_rows(0, &[0., 1., 2., 3.]).unwrap();
    assert!(m.history().is_empty());
}

#[test]
fn chained_column_commands() {
    let mut m = ConfiguratorBuilder::new();
    m.duplicate(0).unwrap().duplicate(0).unwrap().delete(4).unwrap();
    m.assert_columns(4).unwrap();
    m.assert_width(4.0 * 36.0 + 5.0 * 2.0).unwrap();
    assert_eq!(m.history().len(), 3);
}

#[test]
fn remove_reports_applied_slots() {
    let mut m = ConfiguratorBuilder::new();
    let report = m.remove(1, &[2.0]).unwrap();
    assert_eq!(report.applied.len(), 1);
    m.assert_active_rows(1, &[0., 1., 3.]).unwrap();
    m.assert_live_spans(1, &[(0., 1.), (1., 3.)]).unwrap();
}

#[test]
fn half_row_reinforce_promotes_the_slot() {
    let mut m = ConfiguratorBuilder::new();
    let report = m.reinforce(0, &[2.5]).unwrap();
    assert_eq!(report.newly_reinforced, 1);
    m.assert_active_rows(0, &[0., 1., 2., 2.5, 3.]).unwrap();
    assert_eq!(m.quote().reinforced_shelves, 1);
}

#[test]
fn rejected_commands_surface_as_errors() {
    let mut m = ConfiguratorBuilder::new();
    let err = m.delete(7).unwrap_err();
    assert!(
        matches!(err, HarnessError::Rejected { ref operation, .. } if operation == "DeleteColumn"),
        "unexpected error: {}",
        err
    );
    assert!(m.apply_width().is_err());
    assert!(m.history()[0].1.starts_with("Rejected"));
    m.assert_columns(3).unwrap();
}

#[test]
fn width_preview_then_cancel() {
    let mut m = ConfiguratorBuilder::new();
    m.preview_width(2, 60.0).unwrap();
    assert_eq!(m.snapshot().column_widths[&2], 60.0);
    m.cancel_width().unwrap();
    m.assert_width(116.0).unwrap();
    assert_eq!(m.snapshot().column_widths[&2], 36.0);
}

#[test]
fn column_width_commits_and_undoes() {
    let mut m = ConfiguratorBuilder::new();
    m.column_width(0, 46.0).unwrap();
    m.assert_width(126.0).unwrap();
    m.undo().unwrap();
    m.assert_width(116.0).unwrap();
    m.redo().unwrap();
    m.assert_width(126.0).unwrap();
}

#[test]
fn fit_and_retire_round_trip() {
    let mut m = ConfiguratorBuilder::new();
    let report = m.fit(FacadeType::Porte36, 1, &[1.0]).unwrap();
    assert_eq!(report.placed.len(), 1);
    assert_eq!(m.facade_keys(1), report.placed);

    let retired = m.retire(report.placed.clone()).unwrap();
    assert_eq!(retired, report.placed);
    assert!(m.facade_keys(1).is_empty());
}

#[test]
fn panels_and_custom_panels() {
    let mut m = ConfiguratorBuilder::new();
    m.remove_panels(vec![panel(0, 2)]).unwrap();
    m.assert_live_spans(2, &[(1., 2.), (2., 3.)]).unwrap();
    m.restore_panels(vec![panel(0, 2)]).unwrap();
    m.assert_live_spans(2, &[(0., 1.), (1., 2.), (2., 3.)]).unwrap();

    let key = m.custom_panel(2, 0.0, 3.0).unwrap();
    assert!(key.is_custom());
    assert!(m.snapshot().back_panels.contains_key(&key));
}

#[test]
fn texture_and_feet() {
    let mut m = ConfiguratorBuilder::new();
    let count = m
        .texture(TextureTarget::VerticalPanels(vec![0, 3]), "oak")
        .unwrap();
    assert_eq!(count, 2);

    m.feet(FeetType::Legs).unwrap();
    assert_eq!(m.snapshot().feet.feet_type, FeetType::Legs);
    assert_eq!(m.quote().foot_count, 8);
}

#[test]
fn selected_walls_receive_an_empty_texture_target() {
    let mut m = ConfiguratorBuilder::new();
    m.select_walls(vec![1, 2]).unwrap();
    let count = m
        .texture(TextureTarget::VerticalPanels(Vec::new()), "walnut")
        .unwrap();
    assert_eq!(count, 2);
    assert!(m.state.edit.vertical_panels.selected.is_empty());
}

#[test]
fn auto_check_runs_after_each_command() {
    let mut m = ConfiguratorBuilder::new().with_auto_check();
    m.height(154.0).unwrap();
    m.remove(0, &[3.0]).unwrap();
    m.fit(FacadeType::PorteHaut112, 0, &[0.0]).unwrap();
    m.column_height(1, 78.0).unwrap();
    m.columns(2).unwrap();
    assert!(m.check_all().iter().all(|v| v.passed));
}

#[test]
fn invalid_rows_are_rejected_before_dispatch() {
    let mut m = ConfiguratorBuilder::new();
    assert!(matches!(
        m.remove(0, &[1.25]),
        Err(HarnessError::InvalidRow { .. })
    ));
    assert!(m.history().is_empty());
}
