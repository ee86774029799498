//! Price folds over a structure snapshot.
//!
//! Pricing never mutates structure. The quote is recomputed from scratch
//! for every snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shelf_types::FacadeType;

use crate::types::{ShelfReport, ShelfState, StructureState};

/// Unit prices. Areas are in square metres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub standard_shelf: f64,
    pub reinforced_shelf: f64,
    /// Charged once per shelf that becomes reinforced.
    pub reinforcement_surcharge: f64,
    pub back_panel_per_m2: f64,
    pub vertical_panel_per_m2: f64,
    pub foot: f64,
    pub facades: BTreeMap<FacadeType, f64>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            standard_shelf: 14.0,
            reinforced_shelf: 22.0,
            reinforcement_surcharge: 8.0,
            back_panel_per_m2: 30.0,
            vertical_panel_per_m2: 45.0,
            foot: 3.5,
            facades: BTreeMap::from([
                (FacadeType::Tiroir17, 39.0),
                (FacadeType::Tiroir36, 55.0),
                (FacadeType::Porte36, 35.0),
                (FacadeType::PorteBas74, 59.0),
                (FacadeType::PorteHaut112, 79.0),
            ]),
        }
    }
}

impl PriceTable {
    /// Unknown types (and `retire`) cost nothing.
    pub fn facade_price(&self, facade_type: FacadeType) -> f64 {
        self.facades.get(&facade_type).copied().unwrap_or(0.0)
    }

    /// Surcharge for the shelves a single operation newly reinforced.
    pub fn reinforcement_surcharge(&self, report: &ShelfReport) -> f64 {
        report.newly_reinforced as f64 * self.reinforcement_surcharge
    }
}

/// Line items of a structure price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub standard_shelves: usize,
    pub reinforced_shelves: usize,
    pub shelves: f64,
    pub back_panel_area: f64,
    pub back_panels: f64,
    pub vertical_panel_area: f64,
    pub vertical_panels: f64,
    pub facade_count: usize,
    pub facades: f64,
    pub foot_count: usize,
    pub feet: f64,
    pub total: f64,
}

pub fn quote(state: &StructureState, prices: &PriceTable) -> Quote {
    let mut q = Quote::default();

    for (key, shelf) in &state.shelves {
        if key.is_virtual() {
            continue;
        }
        match shelf.state {
            ShelfState::Standard => q.standard_shelves += 1,
            ShelfState::Reinforced => q.reinforced_shelves += 1,
            ShelfState::Virtual | ShelfState::Removed => {}
        }
    }
    q.shelves = q.standard_shelves as f64 * prices.standard_shelf
        + q.reinforced_shelves as f64 * prices.reinforced_shelf;

    q.back_panel_area = state
        .back_panels
        .values()
        .filter(|p| p.is_live())
        .map(|p| p.placement.front_area())
        .sum();
    q.back_panels = q.back_panel_area * prices.back_panel_per_m2;

    q.vertical_panel_area = state
        .vertical_panels
        .values()
        .map(|p| p.placement.side_area())
        .sum();
    q.vertical_panels = q.vertical_panel_area * prices.vertical_panel_per_m2;

    q.facade_count = state.facades.len();
    q.facades = state
        .facades
        .keys()
        .map(|key| prices.facade_price(key.facade_type))
        .sum();

    q.foot_count = state.feet.placements.len();
    q.feet = q.foot_count as f64 * prices.foot;

    q.total = q.shelves + q.back_panels + q.vertical_panels + q.facades + q.feet;
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebuild::rebuild;
    use crate::types::GlobalDimensions;
    use approx::assert_relative_eq;

    #[test]
    fn default_structure_quote() {
        let mut s = StructureState::new(GlobalDimensions {
            columns: 1,
            ..GlobalDimensions::default()
        });
        rebuild(&mut s);
        let q = quote(&s, &PriceTable::default());

        assert_eq!(q.standard_shelves, 4);
        assert_eq!(q.reinforced_shelves, 0);
        // Three 36 x 36 cm panels.
        assert_relative_eq!(q.back_panel_area, 3.0 * 0.36 * 0.36, epsilon = 1e-9);
        assert_eq!(q.facade_count, 0);
        assert_relative_eq!(
            q.total,
            q.shelves + q.back_panels + q.vertical_panels,
            epsilon = 1e-9
        );
    }

    #[test]
    fn surcharge_counts_new_reinforcements() {
        let prices = PriceTable::default();
        let report = ShelfReport {
            newly_reinforced: 3,
            ..ShelfReport::default()
        };
        assert_relative_eq!(prices.reinforcement_surcharge(&report), 24.0);
        assert_eq!(prices.facade_price(FacadeType::Retire), 0.0);
    }
}
