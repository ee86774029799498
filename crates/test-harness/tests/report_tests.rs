//! Tests for the report module.

use shelf_types::FacadeType;
use test_harness::ConfiguratorBuilder;

#[test]
fn default_structure_report() {
    let m = ConfiguratorBuilder::new();
    let report = m.report();
    let text = report.to_text();
    assert!(text.contains("Columns (3)"), "{}", text);
    assert!(text.contains("shelves: 0 1 2 3"), "{}", text);
    assert!(text.contains("Back panels: 3 live, 0 removed"), "{}", text);
    assert!(!text.contains("Facades ("));
    assert!(report.all_passed());
}

#[test]
fn report_marks_reinforced_shelves_and_facades() {
    let mut m = ConfiguratorBuilder::new();
    m.reinforce(1, &[2.0]).unwrap();
    let fit = m.fit(FacadeType::Porte36, 0, &[1.0]).unwrap();

    let report = m.report();
    let text = report.to_text();
    assert!(text.contains("shelves: 0 1 2* 3"), "{}", text);
    assert!(text.contains("Facades (1)"), "{}", text);
    assert!(text.contains(&fit.placed[0].to_string()), "{}", text);
    assert!(text.contains("1 reinforced shelves"), "{}", text);
}

#[test]
fn report_lists_every_oracle() {
    let m = ConfiguratorBuilder::new();
    let text = m.report().to_string();
    assert!(text.contains("Oracle Results (7 checks)"), "{}", text);
    assert!(!text.contains("[FAIL]"), "{}", text);
}
