use serde::{Deserialize, Serialize};
use shelf_types::{BackPanelKey, FacadeKey, ShelfKey};
use structure_engine::FacadeSlot;

/// Ephemeral selection state of the editing menus.
///
/// The engine never reads this directly. Dispatch uses it to fill in the
/// targets of a command that arrives without an explicit selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditState {
    pub columns: EditColumns,
    pub shelf: EditShelf,
    pub facade: EditFacade,
    pub backboard: EditBackboard,
    pub feet: EditFeet,
    pub vertical_panels: EditVerticalPanels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditColumns {
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditShelf {
    pub selected: Vec<ShelfKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditFacade {
    /// Slot groups waiting for a facade type.
    pub groups: Vec<Vec<FacadeSlot>>,
    /// Existing facades picked for retiring or texturing.
    pub selected: Vec<FacadeKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditBackboard {
    pub selected: Vec<BackPanelKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditFeet {
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditVerticalPanels {
    /// Wall indices.
    pub selected: Vec<usize>,
}

impl EditState {
    /// Drop every selection, as when the editing menu is closed.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Forget selections that refer to columns the structure no longer has.
    pub fn retain_columns(&mut self, columns: usize) {
        if self.columns.selected.is_some_and(|c| c >= columns) {
            self.columns.selected = None;
        }
        self.shelf.selected.retain(|k| k.column < columns);
        self.facade
            .groups
            .retain(|g| g.iter().all(|slot| slot.column < columns));
        self.facade.selected.retain(|k| k.column < columns);
        self.backboard.selected.retain(|k| match k {
            BackPanelKey::Span { column, .. } => *column < columns,
            BackPanelKey::Custom { .. } => true,
        });
        self.vertical_panels.selected.retain(|wall| *wall <= columns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_types::Row;

    #[test]
    fn stale_column_selections_are_dropped() {
        let mut edit = EditState::default();
        edit.columns.selected = Some(3);
        edit.shelf.selected = vec![ShelfKey::real(Row::whole(1), 0), ShelfKey::real(Row::whole(1), 3)];
        edit.vertical_panels.selected = vec![0, 3, 4];

        edit.retain_columns(3);

        assert_eq!(edit.columns.selected, None);
        assert_eq!(edit.shelf.selected, vec![ShelfKey::real(Row::whole(1), 0)]);
        assert_eq!(edit.vertical_panels.selected, vec![0, 3]);
    }
}
