//! Shelf placement: the real/virtual slot state machine of every column.
//!
//! Each whole row holds a real shelf slot; each half row between two whole
//! rows holds a virtual slot until a structural state is applied to it, at
//! which point the virtual key is retired and the real key at the same row
//! takes over.

use shelf_types::{Row, ShelfClass, ShelfKey};
use tracing::debug;

use crate::types::{Shelf, ShelfReport, ShelfState, SkipReason, StructureState};

/// Fill in default slots for a column and drop slots above its ceiling.
///
/// Whole rows default to standard shelves and half rows to virtual slots,
/// except where the half row has already been promoted. Floor and ceiling
/// are forced back to standard.
pub fn materialize_column(state: &mut StructureState, column: usize) {
    let ceiling = state.layout().ceiling(column);

    state
        .shelves
        .retain(|key, _| key.column != column || key.row <= ceiling);

    for step in 0..=ceiling.half_steps() {
        let row = Row::from_half_steps(step);
        let real = ShelfKey::real(row, column);
        if row.is_whole() {
            state
                .shelves
                .entry(real)
                .or_insert_with(|| Shelf::new(row, column, ShelfState::Standard));
        } else if !state.shelves.contains_key(&real) {
            state
                .shelves
                .entry(real.to_virtual())
                .or_insert_with(|| Shelf::new(row, column, ShelfState::Virtual));
        }
    }

    for row in [Row::FLOOR, ceiling] {
        if let Some(shelf) = state.shelves.get_mut(&ShelfKey::real(row, column)) {
            shelf.state = ShelfState::Standard;
        }
    }
}

/// Apply a load class to every slot of a selection.
pub fn apply_class(state: &mut StructureState, slots: &[ShelfKey], class: ShelfClass) -> ShelfReport {
    let mut report = ShelfReport::default();
    for &slot in slots {
        match apply_one(state, slot, class) {
            Ok(newly_reinforced) => {
                report.applied.push(slot.to_real());
                if newly_reinforced {
                    report.newly_reinforced += 1;
                }
            }
            Err(reason) => {
                debug!(slot = %slot, ?reason, "shelf slot skipped");
                report.skipped.push((slot, reason));
            }
        }
    }
    report
}

/// Remove every slot of a selection.
pub fn remove(state: &mut StructureState, slots: &[ShelfKey]) -> ShelfReport {
    let mut report = ShelfReport::default();
    for &slot in slots {
        match remove_one(state, slot) {
            Ok(()) => report.applied.push(slot.to_real()),
            Err(reason) => {
                debug!(slot = %slot, ?reason, "shelf slot skipped");
                report.skipped.push((slot, reason));
            }
        }
    }
    report
}

/// Virtual/Reinforced/Removed → `class`. Returns whether the shelf became
/// reinforced without having been reinforced before.
fn apply_one(state: &mut StructureState, slot: ShelfKey, class: ShelfClass) -> Result<bool, SkipReason> {
    let layout = state.layout();
    if !layout.contains(slot.row, slot.column) {
        return Err(SkipReason::OutOfRange);
    }
    if class == ShelfClass::Reinforced && layout.is_floor_or_ceiling(slot.row, slot.column) {
        return Err(SkipReason::FloorOrCeiling);
    }

    let real = slot.to_real();
    let retired = if slot.row.is_whole() {
        None
    } else {
        state.shelves.remove(&real.to_virtual())
    };

    let target = ShelfState::from(class);
    let previous = state.shelves.get(&real).map(|s| s.state);
    let shelf = state
        .shelves
        .entry(real)
        .or_insert_with(|| Shelf::new(real.row, real.column, target));
    shelf.state = target;
    if shelf.texture.is_none() {
        shelf.texture = retired.and_then(|v| v.texture);
    }

    Ok(target == ShelfState::Reinforced && previous != Some(ShelfState::Reinforced))
}

/// Standard/Reinforced → Removed. A removed half-row shelf also hides the
/// virtual slot at its position.
fn remove_one(state: &mut StructureState, slot: ShelfKey) -> Result<(), SkipReason> {
    let layout = state.layout();
    if !layout.contains(slot.row, slot.column) {
        return Err(SkipReason::OutOfRange);
    }
    if layout.is_floor_or_ceiling(slot.row, slot.column) {
        return Err(SkipReason::FloorOrCeiling);
    }

    let real = slot.to_real();
    match state.shelves.get_mut(&real) {
        Some(shelf) if shelf.state.is_active() => shelf.state = ShelfState::Removed,
        _ => return Err(SkipReason::NotStructural),
    }

    if !slot.row.is_whole() {
        if let Some(virtual_slot) = state.shelves.get_mut(&real.to_virtual()) {
            virtual_slot.state = ShelfState::Removed;
        }
    }
    Ok(())
}

/// Make sure a standard-or-better shelf exists at `row`. Returns the key
/// when a shelf had to be created or revived.
pub fn ensure_support(state: &mut StructureState, row: Row, column: usize) -> Option<ShelfKey> {
    let key = ShelfKey::real(row, column);
    if state
        .shelves
        .get(&key)
        .is_some_and(|s| s.state.is_active())
    {
        return None;
    }
    apply_one(state, key, ShelfClass::Standard).ok().map(|_| key)
}

/// Blank a slot so nothing obstructs a drawer cavity: an active shelf is
/// removed and a virtual slot is hidden.
pub fn clear_slot(state: &mut StructureState, row: Row, column: usize) {
    let key = ShelfKey::real(row, column);
    if state.layout().is_floor_or_ceiling(row, column) {
        return;
    }
    if let Some(shelf) = state.shelves.get_mut(&key) {
        if shelf.state.is_active() {
            shelf.state = ShelfState::Removed;
        }
    }
    if let Some(virtual_slot) = state.shelves.get_mut(&key.to_virtual()) {
        virtual_slot.state = ShelfState::Removed;
    }
}
