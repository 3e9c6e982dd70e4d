//! Core graph model for the workflow canvas.
//!
//! This crate holds the authoritative data model: nodes, edges, the port
//! catalog, the `{nodes, edges}` document exchange format, and the
//! [`WorkflowService`] through which all graph mutation flows. UI crates
//! read the graph and emit change intents; this crate is the single writer.

pub mod error;
pub mod model;
pub mod service;

pub use error::GraphError;
pub use model::document::GraphDocument;
pub use model::edge::{Edge, PortRef};
pub use model::graph::Graph;
pub use model::node::{Node, NodeKind, Position};
pub use model::ports::{PortDirection, PortSpec, ports_for};
pub use service::{NodeRemoval, WorkflowService};
