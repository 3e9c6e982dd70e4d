//! Node model for the workflow graph.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The closed catalog of node kinds the canvas knows how to render.
///
/// Kind strings from a loaded document that match no catalog entry are kept
/// verbatim in [`NodeKind::Unknown`] so the document still loads and the
/// canvas can render an inert placeholder instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    TextInput,
    ImageUpload,
    VideoUpload,
    Assistant,
    ImageGenerator,
    VideoGenerator,
    Preview,
    Unknown(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::TextInput => "text",
            NodeKind::ImageUpload => "image-upload",
            NodeKind::VideoUpload => "video-upload",
            NodeKind::Assistant => "assistant",
            NodeKind::ImageGenerator => "image-generator",
            NodeKind::VideoGenerator => "video-generator",
            NodeKind::Preview => "preview",
            NodeKind::Unknown(s) => s,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            NodeKind::TextInput => "Text",
            NodeKind::ImageUpload => "Image Upload",
            NodeKind::VideoUpload => "Video Upload",
            NodeKind::Assistant => "Assistant",
            NodeKind::ImageGenerator => "Image Generator",
            NodeKind::VideoGenerator => "Video Generator",
            NodeKind::Preview => "Preview",
            NodeKind::Unknown(_) => "Unknown",
        }
    }

    /// All kinds offered by the palette, in display order.
    pub fn palette() -> &'static [NodeKind] {
        &[
            NodeKind::TextInput,
            NodeKind::ImageUpload,
            NodeKind::VideoUpload,
            NodeKind::Assistant,
            NodeKind::ImageGenerator,
            NodeKind::VideoGenerator,
            NodeKind::Preview,
        ]
    }

    /// Default opaque payload for a freshly created node of this kind.
    pub fn default_data(&self) -> Value {
        match self {
            NodeKind::TextInput | NodeKind::Assistant => serde_json::json!({ "text": "" }),
            NodeKind::ImageGenerator | NodeKind::VideoGenerator => {
                serde_json::json!({ "prompt": "" })
            }
            NodeKind::ImageUpload | NodeKind::VideoUpload => serde_json::json!({ "url": null }),
            NodeKind::Preview | NodeKind::Unknown(_) => serde_json::json!({}),
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => NodeKind::TextInput,
            "image-upload" => NodeKind::ImageUpload,
            "video-upload" => NodeKind::VideoUpload,
            "assistant" => NodeKind::Assistant,
            "image-generator" => NodeKind::ImageGenerator,
            "video-generator" => NodeKind::VideoGenerator,
            "preview" => NodeKind::Preview,
            _ => NodeKind::Unknown(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(k: NodeKind) -> Self {
        k.as_str().to_string()
    }
}

/// A point in graph (canvas) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A positioned, typed unit of the workflow graph carrying opaque data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub kind: NodeKind,
    pub position: Position,
    /// Type-specific payload owned by the node content runtime. The model
    /// only compares it for equality and round-trips it unchanged.
    pub data: Value,
    /// Transient UI flag, never persisted.
    #[serde(skip)]
    pub selected: bool,
    /// Transient UI flag, never persisted.
    #[serde(skip)]
    pub dragging: bool,
}

impl Node {
    pub fn new(kind: NodeKind, position: Position) -> Self {
        let data = kind.default_data();
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            data,
            selected: false,
            dragging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        for kind in NodeKind::palette() {
            let s: String = kind.clone().into();
            assert_eq!(NodeKind::from(s), *kind);
        }
    }

    #[test]
    fn unrecognized_kind_is_preserved() {
        let kind = NodeKind::from("lora-trainer".to_string());
        assert_eq!(kind, NodeKind::Unknown("lora-trainer".to_string()));
        let s: String = kind.into();
        assert_eq!(s, "lora-trainer");
    }

    #[test]
    fn transient_flags_are_not_serialized() {
        let mut node = Node::new(NodeKind::TextInput, Position::new(1.0, 2.0));
        node.selected = true;
        node.dragging = true;
        let json = serde_json::to_string(&node).unwrap();
        assert!(!json.contains("selected"));
        assert!(!json.contains("dragging"));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert!(!back.selected);
        assert!(!back.dragging);
    }
}
