use std::collections::VecDeque;

use crate::types::StructureState;

/// Two-stack undo/redo history of whole committed states.
///
/// Every mutation replaces the state in one step, so recording the state
/// it replaced is enough to reverse it.
#[derive(Debug)]
pub struct UndoStack {
    undo: VecDeque<StructureState>,
    redo: Vec<StructureState>,
    limit: usize,
}

impl UndoStack {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Record the state a commit replaced, clearing the redo stack.
    /// The oldest entry is dropped once the limit is reached.
    pub fn push(&mut self, previous: StructureState) {
        self.push_undo_only(previous);
        self.redo.clear();
    }

    /// Push onto the undo stack without clearing redo.
    /// Used by redo to re-populate the undo stack.
    pub fn push_undo_only(&mut self, previous: StructureState) {
        if self.limit == 0 {
            return;
        }
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(previous);
    }

    pub fn pop_undo(&mut self) -> Option<StructureState> {
        self.undo.pop_back()
    }

    pub fn push_redo(&mut self, state: StructureState) {
        self.redo.push(state);
    }

    pub fn pop_redo(&mut self) -> Option<StructureState> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlobalDimensions;

    fn state(columns: usize) -> StructureState {
        StructureState::new(GlobalDimensions {
            columns,
            ..GlobalDimensions::default()
        })
    }

    #[test]
    fn limit_drops_oldest() {
        let mut stack = UndoStack::new(2);
        stack.push(state(1));
        stack.push(state(2));
        stack.push(state(3));
        assert_eq!(stack.pop_undo().map(|s| s.columns()), Some(3));
        assert_eq!(stack.pop_undo().map(|s| s.columns()), Some(2));
        assert!(!stack.can_undo());
    }

    #[test]
    fn push_clears_redo() {
        let mut stack = UndoStack::new(5);
        stack.push_redo(state(1));
        assert!(stack.can_redo());
        stack.push(state(2));
        assert!(!stack.can_redo());
    }
}
