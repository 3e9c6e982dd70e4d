//! Data model for the workflow graph.

pub mod document;
pub mod edge;
pub mod graph;
pub mod node;
pub mod ports;
