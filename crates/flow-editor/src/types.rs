//! Core types for flow graphs
//!
//! These types define the canonical graph the editor persists: node kinds,
//! their kind-specific payloads, edges and the data types stamped on them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FlowEditorError;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Named connection point on a node (e.g. `true`/`false` on a condition)
pub type HandleId = String;

/// The closed set of node kinds available in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Input,
    Output,
    Prompt,
    Model,
    Condition,
    Tool,
    Transform,
    Filter,
    Merge,
    Split,
    Database,
    Api,
    Storage,
    Loop,
    Delay,
    Switch,
    Embedding,
    Memory,
    Classifier,
    Group,
}

impl NodeKind {
    /// Every node kind, in palette order
    pub const ALL: [NodeKind; 20] = [
        NodeKind::Input,
        NodeKind::Output,
        NodeKind::Prompt,
        NodeKind::Model,
        NodeKind::Condition,
        NodeKind::Tool,
        NodeKind::Transform,
        NodeKind::Filter,
        NodeKind::Merge,
        NodeKind::Split,
        NodeKind::Database,
        NodeKind::Api,
        NodeKind::Storage,
        NodeKind::Loop,
        NodeKind::Delay,
        NodeKind::Switch,
        NodeKind::Embedding,
        NodeKind::Memory,
        NodeKind::Classifier,
        NodeKind::Group,
    ];

    /// The wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::Output => "output",
            NodeKind::Prompt => "prompt",
            NodeKind::Model => "model",
            NodeKind::Condition => "condition",
            NodeKind::Tool => "tool",
            NodeKind::Transform => "transform",
            NodeKind::Filter => "filter",
            NodeKind::Merge => "merge",
            NodeKind::Split => "split",
            NodeKind::Database => "database",
            NodeKind::Api => "api",
            NodeKind::Storage => "storage",
            NodeKind::Loop => "loop",
            NodeKind::Delay => "delay",
            NodeKind::Switch => "switch",
            NodeKind::Embedding => "embedding",
            NodeKind::Memory => "memory",
            NodeKind::Classifier => "classifier",
            NodeKind::Group => "group",
        }
    }

    /// Palette category
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeKind::Input | NodeKind::Output => NodeCategory::Io,
            NodeKind::Prompt
            | NodeKind::Model
            | NodeKind::Embedding
            | NodeKind::Memory
            | NodeKind::Classifier => NodeCategory::Ai,
            NodeKind::Condition
            | NodeKind::Switch
            | NodeKind::Transform
            | NodeKind::Filter
            | NodeKind::Merge
            | NodeKind::Split => NodeCategory::Logic,
            NodeKind::Database | NodeKind::Storage => NodeCategory::Data,
            NodeKind::Api | NodeKind::Tool => NodeCategory::Integration,
            NodeKind::Loop | NodeKind::Delay => NodeCategory::Flow,
            NodeKind::Group => NodeCategory::Layout,
        }
    }

    /// Outgoing handles rendered on the node
    ///
    /// Branching kinds expose one handle per branch; `output` exposes none.
    pub fn output_handles(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Output => &[],
            NodeKind::Condition => &["true", "false"],
            NodeKind::Loop => &["loop", "exit"],
            _ => &["output"],
        }
    }

    /// Incoming handles rendered on the node; `input` exposes none.
    pub fn input_handles(&self) -> &'static [&'static str] {
        match self {
            NodeKind::Input => &[],
            _ => &["input"],
        }
    }

    /// Whether this kind branches its flow (some downstream paths may be skipped)
    pub fn is_branching(&self) -> bool {
        matches!(self, NodeKind::Condition | NodeKind::Switch | NodeKind::Loop)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = FlowEditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FlowEditorError::UnknownNodeKind(s.to_string()))
    }
}

/// Palette grouping of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Graph entry and exit points
    Io,
    /// Prompts, models and other AI building blocks
    Ai,
    /// Branching and data shaping
    Logic,
    /// Databases and file storage
    Data,
    /// External APIs and tools
    Integration,
    /// Loops and timing
    Flow,
    /// Visual grouping only
    Layout,
}

/// Semantic type of the payload flowing along an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDataType {
    Text,
    Json,
    File,
    Signal,
    #[default]
    Any,
}

impl FlowDataType {
    /// Every data type
    pub const ALL: [FlowDataType; 5] = [
        FlowDataType::Text,
        FlowDataType::Json,
        FlowDataType::File,
        FlowDataType::Signal,
        FlowDataType::Any,
    ];

    /// Stroke colour for edges carrying this type
    pub fn color(&self) -> &'static str {
        match self {
            FlowDataType::Text => "#3b82f6",
            FlowDataType::Json => "#8b5cf6",
            FlowDataType::File => "#10b981",
            FlowDataType::Signal => "#f43f5e",
            FlowDataType::Any => "#94a3b8",
        }
    }

    /// Icon name shown in the edge tooltip
    pub fn icon(&self) -> &'static str {
        match self {
            FlowDataType::Text => "type",
            FlowDataType::Json => "braces",
            FlowDataType::File => "file",
            FlowDataType::Signal => "zap",
            FlowDataType::Any => "circle-dot",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowDataType::Text => "text",
            FlowDataType::Json => "json",
            FlowDataType::File => "file",
            FlowDataType::Signal => "signal",
            FlowDataType::Any => "any",
        }
    }
}

impl fmt::Display for FlowDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an edge path is drawn between its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Bezier,
    Straight,
    Step,
    Smoothstep,
}

impl FromStr for LineType {
    type Err = FlowEditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bezier" => Ok(LineType::Bezier),
            "straight" => Ok(LineType::Straight),
            "step" => Ok(LineType::Step),
            "smoothstep" => Ok(LineType::Smoothstep),
            other => Err(FlowEditorError::UnknownLineType(other.to_string())),
        }
    }
}

/// Arrow head drawn at the target end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    None,
    Arrow,
    #[default]
    ArrowClosed,
}

/// Canvas position (x grows to the right, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Kind-specific node payload
///
/// The variant determines the node's kind, so a node cannot change kind
/// without replacing its whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum NodeConfig {
    Input {
        #[serde(default)]
        input_type: FlowDataType,
        #[serde(default)]
        value: String,
    },
    Output {
        #[serde(default)]
        format: String,
    },
    Prompt {
        #[serde(default)]
        template: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        system_prompt: Option<String>,
    },
    Model {
        #[serde(default)]
        provider: String,
        #[serde(default)]
        model: String,
        #[serde(default)]
        temperature: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_tokens: Option<u32>,
    },
    Condition {
        #[serde(default)]
        expression: String,
    },
    Tool {
        #[serde(default)]
        tool_name: String,
        #[serde(default)]
        parameters: serde_json::Value,
    },
    Transform {
        #[serde(default)]
        expression: String,
    },
    Filter {
        #[serde(default)]
        expression: String,
    },
    Merge {
        #[serde(default)]
        strategy: String,
    },
    Split {
        #[serde(default)]
        delimiter: String,
    },
    Database {
        #[serde(default)]
        connection: String,
        #[serde(default)]
        query: String,
    },
    Api {
        #[serde(default)]
        url: String,
        #[serde(default)]
        method: String,
        #[serde(default)]
        headers: BTreeMap<String, String>,
    },
    Storage {
        #[serde(default)]
        path: String,
        #[serde(default)]
        operation: String,
    },
    Loop {
        #[serde(default)]
        max_iterations: u32,
    },
    Delay {
        #[serde(default)]
        duration_ms: u64,
    },
    Switch {
        #[serde(default)]
        expression: String,
        #[serde(default)]
        cases: Vec<String>,
    },
    Embedding {
        #[serde(default)]
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dimensions: Option<u32>,
    },
    Memory {
        #[serde(default)]
        memory_type: String,
        #[serde(default)]
        window: u32,
    },
    Classifier {
        #[serde(default)]
        categories: Vec<String>,
    },
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
}

impl NodeConfig {
    /// The payload a freshly dropped node of `kind` starts with
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Input => NodeConfig::Input {
                input_type: FlowDataType::Text,
                value: String::new(),
            },
            NodeKind::Output => NodeConfig::Output {
                format: "text".to_string(),
            },
            NodeKind::Prompt => NodeConfig::Prompt {
                template: String::new(),
                system_prompt: None,
            },
            NodeKind::Model => NodeConfig::Model {
                provider: String::new(),
                model: String::new(),
                temperature: 0.7,
                max_tokens: None,
            },
            NodeKind::Condition => NodeConfig::Condition {
                expression: String::new(),
            },
            NodeKind::Tool => NodeConfig::Tool {
                tool_name: String::new(),
                parameters: serde_json::Value::Object(Default::default()),
            },
            NodeKind::Transform => NodeConfig::Transform {
                expression: String::new(),
            },
            NodeKind::Filter => NodeConfig::Filter {
                expression: String::new(),
            },
            NodeKind::Merge => NodeConfig::Merge {
                strategy: "concat".to_string(),
            },
            NodeKind::Split => NodeConfig::Split {
                delimiter: "\n".to_string(),
            },
            NodeKind::Database => NodeConfig::Database {
                connection: String::new(),
                query: String::new(),
            },
            NodeKind::Api => NodeConfig::Api {
                url: String::new(),
                method: "GET".to_string(),
                headers: BTreeMap::new(),
            },
            NodeKind::Storage => NodeConfig::Storage {
                path: String::new(),
                operation: "read".to_string(),
            },
            NodeKind::Loop => NodeConfig::Loop { max_iterations: 10 },
            NodeKind::Delay => NodeConfig::Delay { duration_ms: 1000 },
            NodeKind::Switch => NodeConfig::Switch {
                expression: String::new(),
                cases: Vec::new(),
            },
            NodeKind::Embedding => NodeConfig::Embedding {
                model: String::new(),
                dimensions: None,
            },
            NodeKind::Memory => NodeConfig::Memory {
                memory_type: "buffer".to_string(),
                window: 10,
            },
            NodeKind::Classifier => NodeConfig::Classifier {
                categories: Vec::new(),
            },
            NodeKind::Group => NodeConfig::Group { color: None },
        }
    }

    /// The node kind this payload belongs to
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeConfig::Input { .. } => NodeKind::Input,
            NodeConfig::Output { .. } => NodeKind::Output,
            NodeConfig::Prompt { .. } => NodeKind::Prompt,
            NodeConfig::Model { .. } => NodeKind::Model,
            NodeConfig::Condition { .. } => NodeKind::Condition,
            NodeConfig::Tool { .. } => NodeKind::Tool,
            NodeConfig::Transform { .. } => NodeKind::Transform,
            NodeConfig::Filter { .. } => NodeKind::Filter,
            NodeConfig::Merge { .. } => NodeKind::Merge,
            NodeConfig::Split { .. } => NodeKind::Split,
            NodeConfig::Database { .. } => NodeKind::Database,
            NodeConfig::Api { .. } => NodeKind::Api,
            NodeConfig::Storage { .. } => NodeKind::Storage,
            NodeConfig::Loop { .. } => NodeKind::Loop,
            NodeConfig::Delay { .. } => NodeKind::Delay,
            NodeConfig::Switch { .. } => NodeKind::Switch,
            NodeConfig::Embedding { .. } => NodeKind::Embedding,
            NodeConfig::Memory { .. } => NodeKind::Memory,
            NodeConfig::Classifier { .. } => NodeKind::Classifier,
            NodeConfig::Group { .. } => NodeKind::Group,
        }
    }
}

/// User-editable node data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Display label
    pub label: String,
    /// Whether the runtime should pass input straight through this node
    #[serde(default)]
    pub bypassed: bool,
    /// Kind-specific fields
    #[serde(flatten)]
    pub config: NodeConfig,
}

/// A node instance in a flow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Position on the canvas
    pub position: Position,
    /// Label, bypass flag and kind-specific payload
    pub data: NodeData,
}

impl FlowNode {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        config: NodeConfig,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            data: NodeData {
                label: label.into(),
                bypassed: false,
                config,
            },
        }
    }

    /// The node's kind, derived from its payload
    pub fn kind(&self) -> NodeKind {
        self.data.config.kind()
    }
}

/// Render and type metadata carried by an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// Payload type, frozen at creation
    pub data_type: FlowDataType,
    /// Whether the flow animation is requested
    pub animated: bool,
    /// Path shape
    pub line_type: LineType,
    /// Stroke width in pixels
    pub stroke_width: f32,
    /// Arrow head at the target end
    #[serde(default)]
    pub marker_end: MarkerType,
    /// Optional text shown at the label anchor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for EdgeData {
    fn default() -> Self {
        Self {
            data_type: FlowDataType::Any,
            animated: false,
            line_type: LineType::default(),
            stroke_width: 2.0,
            marker_end: MarkerType::default(),
            label: None,
        }
    }
}

/// An edge connecting two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Source handle, when the source has more than one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleId>,
    /// Target handle, when the target has more than one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<HandleId>,
    /// Type and style metadata
    pub data: EdgeData,
}

impl FlowEdge {
    /// Whether this edge joins the given endpoints through the given handles
    pub fn joins(
        &self,
        source: &str,
        source_handle: Option<&str>,
        target: &str,
        target_handle: Option<&str>,
    ) -> bool {
        self.source == source
            && self.target == target
            && self.source_handle.as_deref() == source_handle
            && self.target_handle.as_deref() == target_handle
    }

    /// Whether either endpoint is the given node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// The canonical node and edge collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGraph {
    /// Nodes in the graph
    pub nodes: Vec<FlowNode>,
    /// Edges connecting nodes
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut FlowNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Find an edge by ID
    pub fn find_edge(&self, id: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Find an edge by ID (mutable)
    pub fn find_edge_mut(&mut self, id: &str) -> Option<&mut FlowEdge> {
        self.edges.iter_mut().find(|e| e.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    /// Get the IDs of nodes feeding into this node (upstream nodes)
    pub fn get_dependencies(&self, node_id: &str) -> Vec<NodeId> {
        self.incoming_edges(node_id)
            .map(|e| e.source.clone())
            .collect()
    }

    /// Get the IDs of nodes fed by this node (downstream nodes)
    pub fn get_dependents(&self, node_id: &str) -> Vec<NodeId> {
        self.outgoing_edges(node_id)
            .map(|e| e.target.clone())
            .collect()
    }

    /// Check whether an identical connection already exists
    pub fn has_connection(
        &self,
        source: &str,
        source_handle: Option<&str>,
        target: &str,
        target_handle: Option<&str>,
    ) -> bool {
        self.edges
            .iter()
            .any(|e| e.joins(source, source_handle, target, target_handle))
    }
}
