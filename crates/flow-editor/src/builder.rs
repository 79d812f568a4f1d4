//! Fluent builder for flow graphs
//!
//! Builds a graph without consulting the connection rules, which makes it
//! useful for fixtures and for assembling graphs that are then handed to
//! [`crate::graph::GraphModel::load`] (which does validate).

use crate::locale::{EnglishLocale, Localizer};
use crate::types::{EdgeData, FlowEdge, FlowGraph, FlowNode, NodeConfig, NodeKind, Position};

/// Fluent builder for constructing flow graphs
///
/// # Example
///
/// ```ignore
/// let graph = FlowBuilder::new()
///     .add_node("in", NodeKind::Input, (0.0, 0.0))
///     .add_node("model", NodeKind::Model, (200.0, 0.0))
///     .with_label("Summarizer")
///     .add_edge("in", "model")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct FlowBuilder {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    edge_counter: usize,
}

impl FlowBuilder {
    /// Create a new, empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the kind's default label and payload
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        kind: NodeKind,
        position: impl Into<Position>,
    ) -> Self {
        self.nodes.push(FlowNode::new(
            id,
            EnglishLocale.node_label(kind),
            NodeConfig::default_for(kind),
            position.into(),
        ));
        self
    }

    /// Set the label of the most recently added node
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.label = label.into();
        }
        self
    }

    /// Replace the payload of the most recently added node
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.config = config;
        }
        self
    }

    /// Mark the most recently added node as bypassed
    pub fn bypassed(mut self) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data.bypassed = true;
        }
        self
    }

    /// Add an edge between two nodes (auto-generates edge ID)
    pub fn add_edge(self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.push_edge(None, source.into(), None, target.into(), None)
    }

    /// Add an edge leaving and entering specific handles
    pub fn add_edge_with_handles(
        self,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.push_edge(
            None,
            source.into(),
            Some(source_handle.into()),
            target.into(),
            Some(target_handle.into()),
        )
    }

    /// Add an edge with an explicit ID
    pub fn add_edge_with_id(
        self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.push_edge(Some(edge_id.into()), source.into(), None, target.into(), None)
    }

    /// Replace the metadata of the most recently added edge
    pub fn with_edge_data(mut self, data: EdgeData) -> Self {
        if let Some(edge) = self.edges.last_mut() {
            edge.data = data;
        }
        self
    }

    fn push_edge(
        mut self,
        id: Option<String>,
        source: String,
        source_handle: Option<String>,
        target: String,
        target_handle: Option<String>,
    ) -> Self {
        self.edge_counter += 1;
        self.edges.push(FlowEdge {
            id: id.unwrap_or_else(|| format!("edge-{}", self.edge_counter)),
            source,
            target,
            source_handle,
            target_handle,
            data: EdgeData::default(),
        });
        self
    }

    /// Build the graph without validation
    pub fn build(self) -> FlowGraph {
        FlowGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FlowDataType;

    #[test]
    fn test_builder_modifiers_apply_to_last_item() {
        let graph = FlowBuilder::new()
            .add_node("a", NodeKind::Input, (0.0, 0.0))
            .add_node("b", NodeKind::Delay, (100.0, 0.0))
            .with_label("Pause")
            .with_config(NodeConfig::Delay { duration_ms: 5 })
            .bypassed()
            .add_edge_with_handles("a", "output", "b", "input")
            .build();

        let a = graph.find_node("a").unwrap();
        assert_eq!(a.data.label, "Input");
        assert!(!a.data.bypassed);

        let b = graph.find_node("b").unwrap();
        assert_eq!(b.data.label, "Pause");
        assert!(b.data.bypassed);
        assert_eq!(b.data.config, NodeConfig::Delay { duration_ms: 5 });

        let edge = &graph.edges[0];
        assert_eq!(edge.id, "edge-1");
        assert_eq!(edge.source_handle.as_deref(), Some("output"));
        assert_eq!(edge.data.data_type, FlowDataType::Any);
    }
}
