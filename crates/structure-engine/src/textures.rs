use serde::{Deserialize, Serialize};
use shelf_types::{BackPanelKey, FacadeKey, ShelfKey, Texture};

use crate::types::StructureState;

/// Entities a texture is applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "keys", rename_all = "snake_case")]
pub enum TextureTarget {
    Shelves(Vec<ShelfKey>),
    BackPanels(Vec<BackPanelKey>),
    Facades(Vec<FacadeKey>),
    /// Wall indices, `0..=columns`.
    VerticalPanels(Vec<usize>),
    Feet,
}

impl TextureTarget {
    pub fn is_empty(&self) -> bool {
        match self {
            TextureTarget::Shelves(keys) => keys.is_empty(),
            TextureTarget::BackPanels(keys) => keys.is_empty(),
            TextureTarget::Facades(keys) => keys.is_empty(),
            TextureTarget::VerticalPanels(walls) => walls.is_empty(),
            TextureTarget::Feet => false,
        }
    }
}

/// Apply a texture override. Unknown keys are ignored. Returns how many
/// entities were updated.
pub fn apply(state: &mut StructureState, target: &TextureTarget, texture: &Texture) -> usize {
    let mut count = 0;
    match target {
        TextureTarget::Shelves(keys) => {
            for key in keys {
                if let Some(shelf) = state.shelves.get_mut(key) {
                    shelf.texture = Some(texture.clone());
                    count += 1;
                }
            }
        }
        TextureTarget::BackPanels(keys) => {
            for key in keys {
                if let Some(panel) = state.back_panels.get_mut(key) {
                    panel.texture = Some(texture.clone());
                    count += 1;
                }
            }
        }
        TextureTarget::Facades(keys) => {
            for key in keys {
                if let Some(facade) = state.facades.get_mut(key) {
                    facade.texture = Some(texture.clone());
                    count += 1;
                }
            }
        }
        TextureTarget::VerticalPanels(walls) => {
            let columns = state.columns();
            for wall in walls.iter().filter(|wall| **wall <= columns) {
                state.vertical_textures.insert(*wall, texture.clone());
                count += 1;
            }
        }
        TextureTarget::Feet => {
            state.feet.texture = Some(texture.clone());
            count = 1;
        }
    }
    count
}
