//! Execution overlay
//!
//! Projects the latest status and output snapshots reported by the external
//! runtime onto the canonical graph. [`derive_view`] is a pure function of
//! its inputs: it borrows the graph, never mutates it, and keeps no state
//! between calls, so it can run on every render.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::ExecutionEvent;
use crate::geometry::{edge_visual, EdgeDirection, EdgeVisual};
use crate::types::{FlowEdge, FlowGraph, FlowNode, NodeId, Position};

/// Execution state of a node as reported by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
    WaitingUser,
    Skipped,
    /// Any state name this version does not know
    #[serde(other)]
    Unknown,
}

impl ExecutionState {
    /// Whether the runtime's state machine allows moving from `self` to `next`
    ///
    /// The overlay renders whatever is reported; this is for consumers that
    /// want to sanity-check a status stream.
    pub fn can_transition_to(self, next: ExecutionState) -> bool {
        use ExecutionState::*;
        matches!(
            (self, next),
            (Idle, Running)
                | (Idle, Skipped)
                | (Running, Completed)
                | (Running, Failed)
                | (Running, WaitingUser)
                | (Running, Skipped)
                | (WaitingUser, Running)
        )
    }

    /// Completed, failed or skipped
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            ExecutionState::Completed | ExecutionState::Failed | ExecutionState::Skipped
        )
    }
}

/// One entry of the inbound status snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub state: ExecutionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NodeStatus {
    pub fn new(state: ExecutionState) -> Self {
        Self {
            state,
            progress: None,
            error: None,
        }
    }
}

/// Latest status per node id
pub type StatusSnapshot = HashMap<NodeId, NodeStatus>;

/// Latest output value per node id
pub type OutputSnapshot = HashMap<NodeId, Value>;

/// Highlight applied to a node while it executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderState {
    #[default]
    Plain,
    PulsePrimary,
    Success,
    Destructive,
    PulseWarning,
    Dimmed,
}

impl From<ExecutionState> for RenderState {
    fn from(state: ExecutionState) -> Self {
        match state {
            ExecutionState::Running => RenderState::PulsePrimary,
            ExecutionState::Completed => RenderState::Success,
            ExecutionState::Failed => RenderState::Destructive,
            ExecutionState::WaitingUser => RenderState::PulseWarning,
            ExecutionState::Skipped => RenderState::Dimmed,
            ExecutionState::Idle | ExecutionState::Unknown => RenderState::Plain,
        }
    }
}

/// Execution data attached to a node's view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExecution {
    pub execution_status: ExecutionState,
    pub execution_progress: Option<f32>,
    pub execution_error: Option<String>,
}

impl From<&NodeStatus> for NodeExecution {
    fn from(status: &NodeStatus) -> Self {
        Self {
            execution_status: status.state,
            execution_progress: status.progress,
            execution_error: status.error.clone(),
        }
    }
}

/// A node as rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    pub node: FlowNode,
    pub execution: Option<NodeExecution>,
    pub render_state: RenderState,
}

/// An edge as rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEdge {
    pub edge: FlowEdge,
    /// Output of the source node, for hover previews
    pub runtime_data: Option<Value>,
    pub direction: EdgeDirection,
    pub visual: EdgeVisual,
}

/// Render-only projection of a flow graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowView {
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<ViewEdge>,
}

impl FlowView {
    /// The graph this view was derived from
    pub fn canonical(&self) -> FlowGraph {
        FlowGraph {
            nodes: self.nodes.iter().map(|v| v.node.clone()).collect(),
            edges: self.edges.iter().map(|v| v.edge.clone()).collect(),
        }
    }

    pub fn node(&self, node_id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|v| v.node.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&ViewEdge> {
        self.edges.iter().find(|v| v.edge.id == edge_id)
    }
}

/// Overlay execution state onto `graph`
///
/// Snapshot entries for ids not in the graph are ignored. An edge whose
/// endpoints are missing from the graph is drawn forward.
pub fn derive_view(
    graph: &FlowGraph,
    statuses: &StatusSnapshot,
    outputs: &OutputSnapshot,
) -> FlowView {
    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let status = statuses.get(&node.id);
            ViewNode {
                node: node.clone(),
                execution: status.map(NodeExecution::from),
                render_state: status
                    .map(|s| RenderState::from(s.state))
                    .unwrap_or_default(),
            }
        })
        .collect();

    let positions: HashMap<&str, Position> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.position))
        .collect();

    let edges = graph
        .edges
        .iter()
        .map(|edge| {
            let direction = match (
                positions.get(edge.source.as_str()),
                positions.get(edge.target.as_str()),
            ) {
                (Some(source), Some(target)) => EdgeDirection::classify(*source, *target),
                _ => EdgeDirection::Forward,
            };
            ViewEdge {
                edge: edge.clone(),
                runtime_data: outputs.get(&edge.source).cloned(),
                direction,
                visual: edge_visual(edge, direction),
            }
        })
        .collect();

    FlowView { nodes, edges }
}

/// Latest-value fold of runtime execution events
///
/// Each event overwrites what was known about its node; nothing is queued.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionSnapshot {
    statuses: StatusSnapshot,
    outputs: OutputSnapshot,
}

impl ExecutionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> &StatusSnapshot {
        &self.statuses
    }

    pub fn outputs(&self) -> &OutputSnapshot {
        &self.outputs
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.outputs.is_empty()
    }

    /// Replace both maps with a wholesale snapshot from the runtime
    pub fn replace(&mut self, statuses: StatusSnapshot, outputs: OutputSnapshot) {
        self.statuses = statuses;
        self.outputs = outputs;
    }

    /// Fold one event into the snapshot
    pub fn apply(&mut self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::NodeStarted { node_id } => {
                self.set_state(node_id, ExecutionState::Running);
                if let Some(status) = self.statuses.get_mut(node_id) {
                    status.progress = None;
                    status.error = None;
                }
            }
            ExecutionEvent::NodeProgress { node_id, progress } => {
                self.set_state(node_id, ExecutionState::Running);
                if let Some(status) = self.statuses.get_mut(node_id) {
                    status.progress = Some(progress.clamp(0.0, 1.0));
                }
            }
            ExecutionEvent::WaitingForInput { node_id } => {
                self.set_state(node_id, ExecutionState::WaitingUser);
            }
            ExecutionEvent::NodeCompleted { node_id, output } => {
                self.set_state(node_id, ExecutionState::Completed);
                if let Some(status) = self.statuses.get_mut(node_id) {
                    status.progress = Some(1.0);
                }
                match output {
                    Some(value) => {
                        self.outputs.insert(node_id.clone(), value.clone());
                    }
                    None => {
                        self.outputs.remove(node_id);
                    }
                }
            }
            ExecutionEvent::NodeFailed { node_id, error } => {
                self.set_state(node_id, ExecutionState::Failed);
                if let Some(status) = self.statuses.get_mut(node_id) {
                    status.error = Some(error.clone());
                }
            }
            ExecutionEvent::NodeSkipped { node_id } => {
                self.set_state(node_id, ExecutionState::Skipped);
            }
            ExecutionEvent::RunReset => {
                self.statuses.clear();
                self.outputs.clear();
            }
        }
    }

    /// Derive the view of `graph` under this snapshot
    pub fn view(&self, graph: &FlowGraph) -> FlowView {
        derive_view(graph, &self.statuses, &self.outputs)
    }

    fn set_state(&mut self, node_id: &str, next: ExecutionState) {
        let status = self.statuses.entry(node_id.to_string()).or_default();
        if status.state != next && !status.state.can_transition_to(next) {
            log::debug!(
                "Node '{}' reported {:?} after {:?}",
                node_id,
                next,
                status.state
            );
        }
        status.state = next;
    }
}
