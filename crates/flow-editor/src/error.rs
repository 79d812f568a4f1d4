//! Error types for the flow editor core
//!
//! Connection rejections are not errors; they are returned as
//! [`crate::rules::ConnectionCheck`] values. This enum only covers the
//! fallible edges of the crate: parsing, registry construction, explicit
//! edits against unknown ids and settings files.

use thiserror::Error;

use crate::types::NodeKind;

/// Result type alias using FlowEditorError
pub type Result<T> = std::result::Result<T, FlowEditorError>;

/// Errors that can occur in the flow editor core
#[derive(Debug, Error)]
pub enum FlowEditorError {
    /// A string did not name any node kind
    #[error("Unknown node kind: {0}")]
    UnknownNodeKind(String),

    /// A string did not name any line type
    #[error("Unknown line type: {0}")]
    UnknownLineType(String),

    /// A rule registry was built without a permission entry for a kind
    #[error("Rule registry has no permission entry for '{0}'")]
    MissingPermission(NodeKind),

    /// An edit tried to change the kind of an existing node
    #[error("Node '{node_id}' is a {expected} node and cannot become {found}")]
    KindChange {
        node_id: String,
        expected: NodeKind,
        found: NodeKind,
    },

    /// Node id not present in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Edge id not present in the graph
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
