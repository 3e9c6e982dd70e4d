//! Drag-permission gate.
//!
//! Node bodies contain interactive content (text fields, buttons), so a drag
//! may only move a node when the gesture began on that node's header. The
//! gate is armed on header pointer-down and consulted at drag-start; an
//! unarmed drag never moves anything.

use uuid::Uuid;

/// The single "currently drag-armed node" slot. Allow-list semantics: a
/// drag-start for a node other than the armed one is denied, as is any
/// drag-start while disarmed.
#[derive(Debug, Default)]
pub struct DragGate {
    armed: Option<Uuid>,
}

impl DragGate {
    pub fn arm(&mut self, node_id: Uuid) {
        self.armed = Some(node_id);
    }

    /// Whether a drag of `node_id` may begin.
    pub fn permits(&self, node_id: Uuid) -> bool {
        self.armed == Some(node_id)
    }

    /// Reset on drag-stop, regardless of outcome.
    pub fn disarm(&mut self) {
        self.armed = None;
    }

    pub fn armed(&self) -> Option<Uuid> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_gate_denies_everything() {
        let gate = DragGate::default();
        assert!(!gate.permits(Uuid::new_v4()));
    }

    #[test]
    fn armed_gate_permits_only_that_node() {
        let mut gate = DragGate::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        gate.arm(a);
        assert!(gate.permits(a));
        assert!(!gate.permits(b));
    }

    #[test]
    fn disarm_resets_regardless_of_which_node_was_armed() {
        let mut gate = DragGate::default();
        let a = Uuid::new_v4();
        gate.arm(a);
        gate.disarm();
        assert!(!gate.permits(a));
        assert_eq!(gate.armed(), None);
    }

    #[test]
    fn rearming_replaces_the_previous_node() {
        let mut gate = DragGate::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        gate.arm(a);
        gate.arm(b);
        assert!(!gate.permits(a));
        assert!(gate.permits(b));
    }
}
