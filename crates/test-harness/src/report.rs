//! Structured text structure reports.
//!
//! Reports are plain text, not JSON, so a failing test can print the whole
//! structure in a readable form.

use std::fmt;

use shelf_types::FeetType;
use structure_engine::{Quote, ShelfState, StructureState};

use crate::oracle::{self, OracleVerdict};
use crate::workflow::ConfiguratorBuilder;

/// A complete structure report with all sections.
pub struct StructureReport {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub column_entries: Vec<ColumnEntry>,
    pub facade_entries: Vec<String>,
    pub feet: FeetType,
    pub quote: Quote,
    pub oracle_results: Vec<OracleVerdict>,
}

/// A single column's report entry.
pub struct ColumnEntry {
    pub index: usize,
    pub width: f64,
    pub height: f64,
    /// Active rows, reinforced ones marked with `*`.
    pub shelves: Vec<String>,
    pub live_panels: usize,
    pub removed_panels: usize,
}

impl StructureReport {
    pub fn from_state(state: &StructureState, quote: Quote) -> Self {
        let layout = state.layout();
        let column_entries = (0..state.columns())
            .map(|column| {
                let shelves = state
                    .column_shelves(column)
                    .filter(|(k, s)| !k.is_virtual() && s.state.is_active())
                    .map(|(k, s)| match s.state {
                        ShelfState::Reinforced => format!("{}*", k.row),
                        _ => k.row.to_string(),
                    })
                    .collect();
                let (live, removed): (Vec<_>, Vec<_>) = state
                    .back_panels
                    .values()
                    .filter(|p| p.column == column)
                    .partition(|p| p.is_live());
                ColumnEntry {
                    index: column,
                    width: layout.column_width(column),
                    height: layout.column_height(column),
                    shelves,
                    live_panels: live.len(),
                    removed_panels: removed.len(),
                }
            })
            .collect();

        let facade_entries = state
            .facades
            .iter()
            .map(|(key, f)| format!("{} rows {}..{}", key, f.row, f.top_row))
            .collect();

        Self {
            width: state.dimensions.width,
            height: state.dimensions.height,
            depth: state.dimensions.depth,
            column_entries,
            facade_entries,
            feet: state.feet.feet_type,
            quote,
            oracle_results: oracle::run_all_checks(state),
        }
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Shelf Structure Report ===\n\n");
        out.push_str(&format!(
            "Dimensions: {:.1} x {:.1} x {:.1} cm, feet {:?}\n",
            self.width, self.height, self.depth, self.feet,
        ));

        out.push_str(&format!("\nColumns ({}):\n", self.column_entries.len()));
        for entry in &self.column_entries {
            out.push_str(&format!(
                "  [{}] {:.1} x {:.1} cm | shelves: {}\n",
                entry.index,
                entry.width,
                entry.height,
                entry.shelves.join(" "),
            ));
            out.push_str(&format!(
                "      Back panels: {} live, {} removed\n",
                entry.live_panels, entry.removed_panels,
            ));
        }

        if !self.facade_entries.is_empty() {
            out.push_str(&format!("\nFacades ({}):\n", self.facade_entries.len()));
            for facade in &self.facade_entries {
                out.push_str(&format!("  {}\n", facade));
            }
        }

        out.push_str(&format!(
            "\nQuote: {} standard, {} reinforced shelves | {} facades | {} feet | total {:.2}\n",
            self.quote.standard_shelves,
            self.quote.reinforced_shelves,
            self.quote.facade_count,
            self.quote.foot_count,
            self.quote.total,
        ));

        out.push_str(&format!(
            "\nOracle Results ({} checks):\n",
            self.oracle_results.len()
        ));
        for v in &self.oracle_results {
            let status = if v.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
        }

        out
    }

    pub fn all_passed(&self) -> bool {
        self.oracle_results.iter().all(|v| v.passed)
    }
}

impl fmt::Display for StructureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl ConfiguratorBuilder {
    /// Generate a report of the current structure.
    pub fn report(&self) -> StructureReport {
        StructureReport::from_state(self.snapshot(), self.quote())
    }
}
