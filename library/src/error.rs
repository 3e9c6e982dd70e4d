use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(Uuid),
    #[error("edge not found: {0}")]
    EdgeNotFound(Uuid),
    #[error("node {node} has no port named '{port}'")]
    PortNotFound { node: Uuid, port: String },
    #[error("connection must run from an output port to an input port")]
    InvalidDirection,
    #[error("connection source and target are the same node: {0}")]
    SelfConnection(Uuid),
    #[error("an identical connection already exists")]
    DuplicateEdge,
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
