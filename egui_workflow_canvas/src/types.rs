//! Lightweight view types for the canvas.

use uuid::Uuid;

/// Information about a port for rendering and hit-testing.
#[derive(Clone, Debug, PartialEq)]
pub struct PortView {
    pub name: String,
    pub display_name: String,
    pub is_output: bool,
}

impl PortView {
    pub fn input(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_output: false,
        }
    }

    pub fn output(name: &str, display_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_output: true,
        }
    }
}

/// How a node should be displayed: its kind id (for coloring and the body
/// renderer lookup), title, and declared ports. A node whose kind has no
/// registered renderer is drawn as an inert placeholder.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub kind_id: String,
    pub title: String,
    pub ports: Vec<PortView>,
}

/// A connection between two ports (view data).
#[derive(Clone, Debug)]
pub struct EdgeView {
    pub id: Uuid,
    pub from_node: Uuid,
    pub from_port: String,
    pub to_node: Uuid,
    pub to_port: String,
}

/// An addable node kind, as listed by the palette.
#[derive(Clone, Debug)]
pub struct NodeKindInfo {
    pub kind_id: String,
    pub display_name: String,
}

/// Selection delta emitted toward the owner.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionChange {
    /// Exactly these nodes become selected.
    Select(Vec<Uuid>),
    /// Deselect everything (pane click).
    Clear,
}
