//! Snapshot-based undo history over graph documents.

use library::GraphDocument;

/// Bounded stack of graph snapshots. A snapshot is pushed before each
/// structural mutation; undo swaps the current state against the stack.
pub struct UndoHistory {
    undo: Vec<GraphDocument>,
    redo: Vec<GraphDocument>,
    limit: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(100)
    }
}

impl UndoHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    /// Record the state as it was before a mutation. Clears the redo branch.
    pub fn push(&mut self, snapshot: GraphDocument) {
        if self.undo.len() >= self.limit {
            self.undo.remove(0);
        }
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Step back. `current` is the state being left, kept for redo.
    pub fn undo(&mut self, current: GraphDocument) -> Option<GraphDocument> {
        let snapshot = self.undo.pop()?;
        self.redo.push(current);
        Some(snapshot)
    }

    /// Step forward again. `current` is kept for a subsequent undo.
    pub fn redo(&mut self, current: GraphDocument) -> Option<GraphDocument> {
        let snapshot = self.redo.pop()?;
        self.undo.push(current);
        Some(snapshot)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
