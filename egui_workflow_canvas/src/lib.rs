//! Standalone egui-based workflow canvas widget.
//!
//! This crate provides a reusable node-graph canvas with no domain-specific
//! dependencies. Users implement the [`CanvasDataSource`] trait to expose
//! their own graph, hand the widget a [`CallbackCell`] for node lifecycle
//! hooks, and apply the [`PendingActions`] returned by each frame to their
//! own model. The widget never mutates the graph it is shown.

pub mod callbacks;
pub mod drag_gate;
pub mod drawing;
pub mod edge;
pub mod interactions;
pub mod node_rendering;
pub mod palette;
pub mod state;
pub mod theme;
pub mod traits;
pub mod types;
pub mod viewport;
pub mod widget;

pub use callbacks::{CallbackCell, CanvasCallbacks};
pub use drag_gate::DragGate;
pub use state::CanvasState;
pub use theme::CanvasTheme;
pub use traits::{CanvasDataSource, CanvasMutator};
pub use types::*;
pub use viewport::Viewport;
pub use widget::{PendingActions, WorkflowCanvas};
