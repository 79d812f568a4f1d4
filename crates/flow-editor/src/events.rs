//! Event types for editor notifications and runtime progress
//!
//! [`EditorEvent`]s flow out of the graph model to whatever displays
//! notifications (e.g. the "connection rejected" toast). [`ExecutionEvent`]s
//! flow in from the external runtime and are folded into the latest-value
//! snapshot the overlay renders.

use serde::{Deserialize, Serialize};

use crate::rules::Rejection;
use crate::types::{EdgeId, NodeId, NodeKind};

/// Trait for sending editor events
///
/// This abstracts over the transport mechanism (UI channel, mpsc, etc.)
/// so the graph model does not depend on any particular front end.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: EditorEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted by the graph model after a user gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditorEvent {
    /// A node was dropped onto the canvas
    #[serde(rename_all = "camelCase")]
    NodeAdded { node_id: NodeId, kind: NodeKind },

    /// A node was deleted, along with every edge touching it
    #[serde(rename_all = "camelCase")]
    NodeRemoved {
        node_id: NodeId,
        removed_edges: Vec<EdgeId>,
    },

    /// A connection was accepted
    #[serde(rename_all = "camelCase")]
    EdgeAdded {
        edge_id: EdgeId,
        source: NodeId,
        target: NodeId,
    },

    /// An edge was deleted
    #[serde(rename_all = "camelCase")]
    EdgeRemoved { edge_id: EdgeId },

    /// A connection was refused by the rules; nothing changed
    #[serde(rename_all = "camelCase")]
    ConnectionRejected {
        source: NodeId,
        target: NodeId,
        reason: Rejection,
        /// Localized text for the notification
        message: String,
    },

    /// Global edge style defaults changed
    EdgeStyleChanged,

    /// The whole graph was replaced by an external load
    #[serde(rename_all = "camelCase")]
    GraphLoaded {
        node_count: usize,
        edge_count: usize,
        dropped_edges: usize,
    },
}

/// Progress reported by the external runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ExecutionEvent {
    /// A node started executing
    #[serde(rename_all = "camelCase")]
    NodeStarted { node_id: NodeId },

    /// Progress update for a running node (0.0 to 1.0)
    #[serde(rename_all = "camelCase")]
    NodeProgress { node_id: NodeId, progress: f32 },

    /// A node paused for human input
    #[serde(rename_all = "camelCase")]
    WaitingForInput { node_id: NodeId },

    /// A node completed, optionally with an output value
    #[serde(rename_all = "camelCase")]
    NodeCompleted {
        node_id: NodeId,
        output: Option<serde_json::Value>,
    },

    /// A node failed
    #[serde(rename_all = "camelCase")]
    NodeFailed { node_id: NodeId, error: String },

    /// A node was on an untaken branch
    #[serde(rename_all = "camelCase")]
    NodeSkipped { node_id: NodeId },

    /// A new run is starting; prior state is discarded
    RunReset,
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: EditorEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<EditorEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<EditorEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: EditorEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .map_err(|_| EventError {
                message: "Event buffer poisoned".to_string(),
            })?
            .push(event);
        Ok(())
    }
}
