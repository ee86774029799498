//! Tests for verification oracles.

use shelf_types::{FacadeType, Row, ShelfKey};
use structure_engine::ShelfState;
use test_harness::helpers::panel;
use test_harness::oracle::*;
use test_harness::ConfiguratorBuilder;

/// A builder with a few edits in every column.
fn build_edited() -> ConfiguratorBuilder {
    let mut m = ConfiguratorBuilder::new();
    m.remove(0, &[2.0]).unwrap();
    m.reinforce(1, &[1.5]).unwrap();
    m.fit(FacadeType::Tiroir17, 2, &[0.0]).unwrap();
    m.remove_panels(vec![panel(1, 1)]).unwrap();
    m
}

// ── Layout Oracle Tests ─────────────────────────────────────────────────

#[test]
fn layout_oracles_pass_after_resizing() {
    let mut m = build_edited();
    m.column_width(1, 52.0).unwrap();
    m.duplicate(1).unwrap();
    let s = m.snapshot();
    for result in [
        check_total_width(s),
        check_column_positions(s),
        check_vertical_panels(s),
    ] {
        assert!(result.passed, "{}: {}", result.oracle_name, result.detail);
    }
}

#[test]
fn total_width_catches_drift() {
    let m = ConfiguratorBuilder::new();
    let mut s = m.snapshot().clone();
    s.dimensions.width += 3.0;
    let result = check_total_width(&s);
    assert!(!result.passed);
    assert_eq!(result.value, Some(119.0));
}

#[test]
fn vertical_panels_catches_missing_wall() {
    let m = ConfiguratorBuilder::new();
    let mut s = m.snapshot().clone();
    s.vertical_panels.remove(&3);
    assert!(!check_vertical_panels(&s).passed);
}

// ── Structural Oracle Tests ─────────────────────────────────────────────

#[test]
fn structural_oracles_pass_on_edited_structure() {
    let m = build_edited();
    let verdicts = run_all_checks(m.snapshot());
    assert_eq!(verdicts.len(), 7);
    for v in &verdicts {
        assert!(v.passed, "{}: {}", v.oracle_name, v.detail);
    }
}

#[test]
fn floor_and_ceiling_catches_removed_floor() {
    let m = ConfiguratorBuilder::new();
    let mut s = m.snapshot().clone();
    if let Some(shelf) = s.shelves.get_mut(&ShelfKey::real(Row::FLOOR, 1)) {
        shelf.state = ShelfState::Removed;
    }
    let result = check_floor_and_ceiling(&s);
    assert!(!result.passed);
    assert!(result.detail.contains("0-1"), "{}", result.detail);
}

#[test]
fn back_panel_coverage_counts_live_panels() {
    let m = build_edited();
    let result = check_back_panel_coverage(m.snapshot());
    assert!(result.passed, "{}", result.detail);
    // Column 0: [0,1] [1,3]. Column 1: [0,1] [1.5,2] [2,3] after removing
    // [1,1.5]. Column 2: [0,0.5] [0.5,1] [1,2] [2,3].
    assert_eq!(result.value, Some(9.0));
}

#[test]
fn back_panel_coverage_catches_stale_span() {
    let m = ConfiguratorBuilder::new();
    let mut s = m.snapshot().clone();
    if let Some(shelf) = s.shelves.get_mut(&ShelfKey::real(Row::whole(1), 0)) {
        shelf.state = ShelfState::Removed;
    }
    assert!(!check_back_panel_coverage(&s).passed);
}

#[test]
fn facade_support_catches_removed_support() {
    let mut m = ConfiguratorBuilder::new();
    m.fit(FacadeType::Porte36, 0, &[1.0]).unwrap();
    assert!(check_facade_support(m.snapshot()).passed);

    m.remove(0, &[2.0]).unwrap();
    let result = check_facade_support(m.snapshot());
    assert!(!result.passed);
    assert!(result.detail.contains("porte_36"), "{}", result.detail);
}

#[test]
fn key_consistency_catches_wrong_column() {
    let m = build_edited();
    let mut s = m.snapshot().clone();
    let key = ShelfKey::real(Row::whole(1), 2);
    if let Some(shelf) = s.shelves.get_mut(&key) {
        shelf.column = 0;
    }
    assert!(!check_key_consistency(&s).passed);
}
