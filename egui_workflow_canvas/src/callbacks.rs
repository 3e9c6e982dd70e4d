//! Stable callback indirection.
//!
//! The node body renderer registry is built exactly once and must never be
//! rebuilt when the owner's callbacks change identity (rebuilding it would
//! remount every visible node, losing focus and measured layout). Renderers
//! therefore hold a [`CallbackCell`] — a shared mutable slot — instead of the
//! callbacks themselves. The owner swaps the slot's contents whenever its
//! handlers change; invocations always see the latest set, and every hook is
//! a no-op while unset.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use uuid::Uuid;

/// Node lifecycle hooks supplied by the owner. All optional.
#[derive(Default)]
pub struct CanvasCallbacks {
    pub on_data_change: Option<Box<dyn FnMut(Uuid, Value)>>,
    pub on_run: Option<Box<dyn FnMut(Uuid)>>,
    pub on_duplicate: Option<Box<dyn FnMut(Uuid)>>,
    pub on_delete: Option<Box<dyn FnMut(Uuid)>>,
    pub on_mark_draggable: Option<Box<dyn FnMut(Uuid)>>,
}

/// Shared mutable slot holding the current [`CanvasCallbacks`].
///
/// Cloning the cell clones the handle, not the callbacks; all clones observe
/// the same slot. The cell's identity is stable for the life of the canvas.
#[derive(Clone, Default)]
pub struct CallbackCell {
    inner: Rc<RefCell<CanvasCallbacks>>,
}

impl CallbackCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the callback set. The cell itself keeps its identity.
    pub fn set(&self, callbacks: CanvasCallbacks) {
        *self.inner.borrow_mut() = callbacks;
    }

    /// Identity comparison between two handles.
    pub fn same_cell(&self, other: &CallbackCell) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn data_change(&self, node_id: Uuid, data: Value) {
        if let Some(cb) = self.inner.borrow_mut().on_data_change.as_mut() {
            cb(node_id, data);
        }
    }

    pub fn run(&self, node_id: Uuid) {
        if let Some(cb) = self.inner.borrow_mut().on_run.as_mut() {
            cb(node_id);
        }
    }

    pub fn duplicate(&self, node_id: Uuid) {
        if let Some(cb) = self.inner.borrow_mut().on_duplicate.as_mut() {
            cb(node_id);
        }
    }

    pub fn delete(&self, node_id: Uuid) {
        if let Some(cb) = self.inner.borrow_mut().on_delete.as_mut() {
            cb(node_id);
        }
    }

    pub fn mark_draggable(&self, node_id: Uuid) {
        if let Some(cb) = self.inner.borrow_mut().on_mark_draggable.as_mut() {
            cb(node_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_hooks_are_noops() {
        let cell = CallbackCell::new();
        let id = Uuid::new_v4();
        cell.run(id);
        cell.duplicate(id);
        cell.delete(id);
        cell.mark_draggable(id);
        cell.data_change(id, Value::Null);
    }

    #[test]
    fn invocation_sees_the_latest_callbacks() {
        let cell = CallbackCell::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let sink = hits.clone();
        cell.set(CanvasCallbacks {
            on_run: Some(Box::new(move |_| sink.borrow_mut().push("first"))),
            ..Default::default()
        });
        cell.run(Uuid::new_v4());

        let sink = hits.clone();
        cell.set(CanvasCallbacks {
            on_run: Some(Box::new(move |_| sink.borrow_mut().push("second"))),
            ..Default::default()
        });
        cell.run(Uuid::new_v4());

        assert_eq!(*hits.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn clones_share_one_slot() {
        let cell = CallbackCell::new();
        let clone = cell.clone();
        assert!(cell.same_cell(&clone));

        let hits = Rc::new(RefCell::new(0));
        let sink = hits.clone();
        clone.set(CanvasCallbacks {
            on_delete: Some(Box::new(move |_| *sink.borrow_mut() += 1)),
            ..Default::default()
        });
        // Set through the clone, invoke through the original.
        cell.delete(Uuid::new_v4());
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn swapping_callbacks_keeps_cell_identity() {
        let cell = CallbackCell::new();
        let before = cell.clone();
        cell.set(CanvasCallbacks {
            on_run: Some(Box::new(|_| {})),
            ..Default::default()
        });
        cell.set(CanvasCallbacks::default());
        assert!(cell.same_cell(&before));
    }
}
