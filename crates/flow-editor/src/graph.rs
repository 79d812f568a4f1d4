//! Graph model: the only component that mutates the canonical graph
//!
//! Every mutation comes from a discrete user gesture (drop a node, drag a
//! connection, delete, restyle). A connect gesture is validated and
//! committed in one call, so no caller ever observes a half-applied edge.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FlowEditorError, Result};
use crate::events::{EditorEvent, EventSink, NullEventSink};
use crate::locale::{EnglishLocale, Localizer};
use crate::propagation::suggest_data_type;
use crate::registry::RuleRegistry;
use crate::rules::{ConnectionCheck, ConnectionRules, Rejection};
use crate::settings::EdgeStyleSettings;
use crate::types::{
    EdgeData, EdgeId, FlowEdge, FlowGraph, FlowNode, HandleId, NodeConfig, NodeData, NodeId,
    NodeKind, Position,
};
use crate::validation::{check_edge, GraphIssue};

/// A connect gesture from the editing UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub source_handle: Option<HandleId>,
    #[serde(default)]
    pub target_handle: Option<HandleId>,
}

impl ConnectRequest {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Connect through specific handles
    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }
}

/// What a connect gesture did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// A new edge was stored
    Connected(EdgeId),
    /// The rules refused the connection; the graph is unchanged
    Rejected(Rejection),
    /// Stale or redundant request (unknown node, or the edge already exists)
    Ignored,
}

impl ConnectOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectOutcome::Connected(_))
    }
}

/// Owner of the canonical node and edge collections
pub struct GraphModel {
    graph: FlowGraph,
    registry: Arc<RuleRegistry>,
    settings: EdgeStyleSettings,
    locale: Arc<dyn Localizer>,
    events: Arc<dyn EventSink>,
}

impl GraphModel {
    /// Create an empty model over the given rule set
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            graph: FlowGraph::new(),
            registry,
            settings: EdgeStyleSettings::default(),
            locale: Arc::new(EnglishLocale),
            events: Arc::new(NullEventSink),
        }
    }

    /// Use these edge style defaults instead of the built-in ones
    pub fn with_settings(mut self, settings: EdgeStyleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a different source of labels and messages
    pub fn with_locale(mut self, locale: Arc<dyn Localizer>) -> Self {
        self.locale = locale;
        self
    }

    /// Send editor events to `events`
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The canonical graph
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    /// Hand the canonical graph to a persistence collaborator
    pub fn into_graph(self) -> FlowGraph {
        self.graph
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Rule evaluator over this model's registry
    pub fn rules(&self) -> ConnectionRules<'_> {
        ConnectionRules::new(&self.registry)
    }

    pub fn settings(&self) -> &EdgeStyleSettings {
        &self.settings
    }

    /// Drop a node of `kind` with its default label and payload
    pub fn add_node(&mut self, kind: NodeKind, position: Position) -> NodeId {
        self.add_node_with(NodeConfig::default_for(kind), position)
    }

    /// Drop a node with a caller-supplied payload
    pub fn add_node_with(&mut self, config: NodeConfig, position: Position) -> NodeId {
        let kind = config.kind();
        let id = self.fresh_node_id(kind);
        let label = self.locale.node_label(kind);

        self.graph
            .nodes
            .push(FlowNode::new(id.clone(), label, config, position));

        log::debug!("Added {} node '{}'", kind, id);
        self.emit(EditorEvent::NodeAdded {
            node_id: id.clone(),
            kind,
        });
        id
    }

    /// Check a prospective connection without committing it
    ///
    /// Returns `None` if either node is unknown.
    pub fn check_connection(&self, source: &str, target: &str) -> Option<ConnectionCheck> {
        let source = self.graph.find_node(source)?;
        let target = self.graph.find_node(target)?;
        Some(self.rules().validate(source.kind(), target.kind()))
    }

    /// Validate and, if allowed, store a new edge
    pub fn connect(&mut self, request: ConnectRequest) -> ConnectOutcome {
        let kinds = self
            .graph
            .find_node(&request.source)
            .zip(self.graph.find_node(&request.target))
            .map(|(source, target)| (source.kind(), target.kind()));
        let Some((source_kind, target_kind)) = kinds else {
            log::debug!(
                "Ignoring connect '{}' -> '{}': node not found",
                request.source,
                request.target
            );
            return ConnectOutcome::Ignored;
        };

        if self.graph.has_connection(
            &request.source,
            request.source_handle.as_deref(),
            &request.target,
            request.target_handle.as_deref(),
        ) {
            log::debug!(
                "Ignoring connect '{}' -> '{}': already connected",
                request.source,
                request.target
            );
            return ConnectOutcome::Ignored;
        }

        if let Some(reason) = self.rules().validate(source_kind, target_kind).reason {
            log::debug!(
                "Rejected connect '{}' -> '{}': {}",
                request.source,
                request.target,
                reason
            );
            let message = self.locale.rejection_message(&reason);
            self.emit(EditorEvent::ConnectionRejected {
                source: request.source,
                target: request.target,
                reason: reason.clone(),
                message,
            });
            return ConnectOutcome::Rejected(reason);
        }

        let edge = FlowEdge {
            id: format!("edge-{}", Uuid::new_v4()),
            source: request.source,
            target: request.target,
            source_handle: request.source_handle,
            target_handle: request.target_handle,
            data: EdgeData {
                data_type: suggest_data_type(&self.registry, source_kind),
                animated: self.settings.default_animated,
                line_type: self.settings.default_line_type,
                stroke_width: self.settings.default_stroke_width,
                marker_end: self.settings.default_marker_type,
                label: None,
            },
        };

        log::debug!(
            "Connected '{}' -> '{}' as {} ({})",
            edge.source,
            edge.target,
            edge.id,
            edge.data.data_type
        );
        let event = EditorEvent::EdgeAdded {
            edge_id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
        };
        let edge_id = edge.id.clone();
        self.graph.edges.push(edge);
        self.emit(event);

        ConnectOutcome::Connected(edge_id)
    }

    /// Delete a node and every edge that references it
    pub fn delete_node(&mut self, node_id: &str) -> Option<FlowNode> {
        let index = self.graph.nodes.iter().position(|n| n.id == node_id)?;
        let node = self.graph.nodes.remove(index);

        let mut removed_edges = Vec::new();
        self.graph.edges.retain(|edge| {
            if edge.touches(node_id) {
                removed_edges.push(edge.id.clone());
                false
            } else {
                true
            }
        });

        log::debug!(
            "Deleted node '{}' and {} connected edge(s)",
            node_id,
            removed_edges.len()
        );
        self.emit(EditorEvent::NodeRemoved {
            node_id: node.id.clone(),
            removed_edges,
        });
        Some(node)
    }

    /// Delete a single edge
    pub fn delete_edge(&mut self, edge_id: &str) -> Option<FlowEdge> {
        let index = self.graph.edges.iter().position(|e| e.id == edge_id)?;
        let edge = self.graph.edges.remove(index);

        log::debug!("Deleted edge '{}'", edge_id);
        self.emit(EditorEvent::EdgeRemoved {
            edge_id: edge.id.clone(),
        });
        Some(edge)
    }

    /// Edit a node's label, bypass flag or payload
    ///
    /// The edit is applied to a copy and committed only if the node keeps
    /// its kind.
    pub fn update_node(&mut self, node_id: &str, edit: impl FnOnce(&mut NodeData)) -> Result<()> {
        let node = self
            .graph
            .find_node_mut(node_id)
            .ok_or_else(|| FlowEditorError::NodeNotFound(node_id.to_string()))?;

        let mut data = node.data.clone();
        edit(&mut data);

        let expected = node.kind();
        let found = data.config.kind();
        if expected != found {
            return Err(FlowEditorError::KindChange {
                node_id: node_id.to_string(),
                expected,
                found,
            });
        }

        node.data = data;
        log::debug!("Updated node '{}'", node_id);
        Ok(())
    }

    /// Flip a node's bypass flag, returning the new value
    pub fn toggle_bypass(&mut self, node_id: &str) -> Result<bool> {
        let node = self
            .graph
            .find_node_mut(node_id)
            .ok_or_else(|| FlowEditorError::NodeNotFound(node_id.to_string()))?;
        node.data.bypassed = !node.data.bypassed;
        Ok(node.data.bypassed)
    }

    /// Move a node on the canvas
    pub fn move_node(&mut self, node_id: &str, position: Position) -> Result<()> {
        let node = self
            .graph
            .find_node_mut(node_id)
            .ok_or_else(|| FlowEditorError::NodeNotFound(node_id.to_string()))?;
        node.position = position;
        Ok(())
    }

    /// Set or clear an edge's label
    pub fn set_edge_label(&mut self, edge_id: &str, label: Option<String>) -> Result<()> {
        let edge = self
            .graph
            .find_edge_mut(edge_id)
            .ok_or_else(|| FlowEditorError::EdgeNotFound(edge_id.to_string()))?;
        edge.data.label = label;
        Ok(())
    }

    /// Change the defaults used for edges created from now on
    pub fn set_edge_style_settings(&mut self, settings: EdgeStyleSettings) {
        self.settings = settings;
        self.emit(EditorEvent::EdgeStyleChanged);
    }

    /// Restyle every existing edge with the current defaults
    ///
    /// Only presentation changes; each edge keeps its data type and label.
    pub fn apply_style_to_all_edges(&mut self) {
        for edge in &mut self.graph.edges {
            edge.data.animated = self.settings.default_animated;
            edge.data.line_type = self.settings.default_line_type;
            edge.data.stroke_width = self.settings.default_stroke_width;
            edge.data.marker_end = self.settings.default_marker_type;
        }
        self.emit(EditorEvent::EdgeStyleChanged);
    }

    /// Replace the graph with one loaded from outside
    ///
    /// Nodes are kept as-is (first wins on duplicate ids). Each edge is
    /// re-validated; dangling, duplicate and rule-violating edges are
    /// dropped and returned as issues.
    pub fn load(&mut self, graph: FlowGraph) -> Vec<GraphIssue> {
        let FlowGraph { nodes, edges } = graph;
        let mut issues = Vec::new();

        let mut loaded = FlowGraph::new();
        let mut node_ids: HashSet<NodeId> = HashSet::new();
        for node in nodes {
            if node_ids.insert(node.id.clone()) {
                loaded.nodes.push(node);
            } else {
                issues.push(GraphIssue::DuplicateNodeId { node_id: node.id });
            }
        }

        let rules = ConnectionRules::new(&self.registry);
        let mut kept: Vec<FlowEdge> = Vec::new();
        let mut edge_ids: HashSet<EdgeId> = HashSet::new();
        for edge in edges {
            if edge_ids.contains(&edge.id) {
                issues.push(GraphIssue::DuplicateEdgeId { edge_id: edge.id });
                continue;
            }
            match check_edge(&loaded, kept.iter(), &edge, &rules) {
                Some(issue) => issues.push(issue),
                None => {
                    edge_ids.insert(edge.id.clone());
                    kept.push(edge);
                }
            }
        }
        loaded.edges = kept;

        for issue in &issues {
            log::warn!("Dropped on load: {}", issue);
        }
        log::info!(
            "Loaded graph with {} node(s) and {} edge(s)",
            loaded.nodes.len(),
            loaded.edges.len()
        );

        let event = EditorEvent::GraphLoaded {
            node_count: loaded.nodes.len(),
            edge_count: loaded.edges.len(),
            dropped_edges: issues.iter().filter(|i| i.edge_id().is_some()).count(),
        };
        self.graph = loaded;
        self.emit(event);

        issues
    }

    /// `{kind}-{unix millis}`, suffixed if several nodes land in the same millisecond
    fn fresh_node_id(&self, kind: NodeKind) -> NodeId {
        let base = format!("{}-{}", kind, Utc::now().timestamp_millis());
        if self.graph.find_node(&base).is_none() {
            return base;
        }
        let mut suffix = 1;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if self.graph.find_node(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn emit(&self, event: EditorEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Failed to deliver editor event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FlowBuilder;
    use crate::events::VecEventSink;
    use crate::types::{FlowDataType, LineType, MarkerType};

    fn model() -> GraphModel {
        let _ = env_logger::builder().is_test(true).try_init();
        GraphModel::new(Arc::new(RuleRegistry::standard()))
    }

    fn at(x: f64) -> Position {
        Position::new(x, 0.0)
    }

    #[test]
    fn test_add_node_defaults() {
        let mut model = model();
        let id = model.add_node(NodeKind::Model, at(0.0));

        assert!(id.starts_with("model-"));
        let node = model.graph().find_node(&id).unwrap();
        assert_eq!(node.kind(), NodeKind::Model);
        assert_eq!(node.data.label, "AI Model");
        assert!(!node.data.bypassed);
    }

    #[test]
    fn test_add_node_ids_are_unique() {
        let mut model = model();
        let ids: HashSet<NodeId> = (0..50)
            .map(|_| model.add_node(NodeKind::Transform, at(0.0)))
            .collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_connect_stamps_type_and_style() {
        let settings = EdgeStyleSettings {
            default_marker_type: MarkerType::Arrow,
            default_animated: false,
            default_line_type: LineType::Step,
            ..EdgeStyleSettings::default()
        };
        let mut model = model().with_settings(settings);
        let storage = model.add_node(NodeKind::Storage, at(0.0));
        let embed = model.add_node(NodeKind::Embedding, at(200.0));

        let outcome = model.connect(ConnectRequest::new(&storage, &embed));
        let ConnectOutcome::Connected(edge_id) = outcome else {
            panic!("Expected connection, got {:?}", outcome);
        };

        let edge = model.graph().find_edge(&edge_id).unwrap();
        assert_eq!(edge.data.data_type, FlowDataType::File);
        assert_eq!(edge.data.marker_end, MarkerType::Arrow);
        assert_eq!(edge.data.line_type, LineType::Step);
        assert!(!edge.data.animated);
        assert_eq!(edge.data.stroke_width, 2.0);
    }

    #[test]
    fn test_connect_keeps_handles() {
        let mut model = model();
        let cond = model.add_node(NodeKind::Condition, at(0.0));
        let out = model.add_node(NodeKind::Output, at(200.0));

        let outcome = model.connect(ConnectRequest::new(&cond, &out).with_handles("true", "input"));
        assert!(outcome.is_connected());
        let edge = &model.graph().edges[0];
        assert_eq!(edge.source_handle.as_deref(), Some("true"));
        assert_eq!(edge.target_handle.as_deref(), Some("input"));
        assert_eq!(edge.data.data_type, FlowDataType::Signal);
    }

    #[test]
    fn test_rejected_connect_leaves_graph_untouched() {
        let sink = Arc::new(VecEventSink::new());
        let mut model = model().with_event_sink(sink.clone());
        let input = model.add_node(NodeKind::Input, at(0.0));
        let output = model.add_node(NodeKind::Output, at(200.0));
        let before = model.graph().clone();
        sink.clear();

        let outcome = model.connect(ConnectRequest::new(&input, &output));
        assert_eq!(
            outcome,
            ConnectOutcome::Rejected(Rejection::NotPermitted {
                source_kind: NodeKind::Input,
                target_kind: NodeKind::Output,
            })
        );
        assert_eq!(model.graph(), &before);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            EditorEvent::ConnectionRejected { message, .. } => {
                assert_eq!(message, "Input cannot connect to output");
            }
            other => panic!("Expected ConnectionRejected, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_nodes_are_ignored_silently() {
        let sink = Arc::new(VecEventSink::new());
        let mut model = model().with_event_sink(sink.clone());
        let prompt = model.add_node(NodeKind::Prompt, at(0.0));
        sink.clear();

        assert_eq!(
            model.connect(ConnectRequest::new(&prompt, "model-gone")),
            ConnectOutcome::Ignored
        );
        assert_eq!(
            model.connect(ConnectRequest::new("ghost", &prompt)),
            ConnectOutcome::Ignored
        );
        assert!(model.graph().edges.is_empty());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_duplicate_connect_is_ignored() {
        let mut model = model();
        let prompt = model.add_node(NodeKind::Prompt, at(0.0));
        let llm = model.add_node(NodeKind::Model, at(200.0));

        assert!(model.connect(ConnectRequest::new(&prompt, &llm)).is_connected());
        assert_eq!(
            model.connect(ConnectRequest::new(&prompt, &llm)),
            ConnectOutcome::Ignored
        );
        assert_eq!(model.graph().edges.len(), 1);
    }

    #[test]
    fn test_every_edge_matches_rules_and_types() {
        let mut model = model();
        let ids: Vec<(NodeKind, NodeId)> = NodeKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| (*kind, model.add_node(*kind, at(i as f64 * 10.0))))
            .collect();

        for (_, source) in &ids {
            for (_, target) in &ids {
                model.connect(ConnectRequest::new(source, target));
            }
        }

        let rules = model.rules();
        let graph = model.graph();
        assert!(!graph.edges.is_empty());
        for edge in &graph.edges {
            let source = graph.find_node(&edge.source).unwrap().kind();
            let target = graph.find_node(&edge.target).unwrap().kind();
            assert!(rules.validate(source, target).is_valid);
            assert_eq!(edge.data.data_type, suggest_data_type(model.registry(), source));
            assert_ne!(source, NodeKind::Output);
            assert_ne!(target, NodeKind::Input);
        }
    }

    #[test]
    fn test_delete_node_cascades_edges() {
        let sink = Arc::new(VecEventSink::new());
        let mut model = model().with_event_sink(sink.clone());
        let input = model.add_node(NodeKind::Input, at(0.0));
        let prompt = model.add_node(NodeKind::Prompt, at(100.0));
        let llm = model.add_node(NodeKind::Model, at(200.0));
        let out = model.add_node(NodeKind::Output, at(300.0));
        model.connect(ConnectRequest::new(&input, &prompt));
        model.connect(ConnectRequest::new(&prompt, &llm));
        model.connect(ConnectRequest::new(&llm, &out));
        model.connect(ConnectRequest::new(&input, &llm));
        assert_eq!(model.graph().edges.len(), 4);
        sink.clear();

        let removed = model.delete_node(&llm).unwrap();
        assert_eq!(removed.id, llm);
        assert_eq!(model.graph().edges.len(), 1);
        assert!(model.graph().edges.iter().all(|e| !e.touches(&llm)));

        match &sink.events()[..] {
            [EditorEvent::NodeRemoved {
                node_id,
                removed_edges,
            }] => {
                assert_eq!(node_id, &llm);
                assert_eq!(removed_edges.len(), 3);
            }
            other => panic!("Expected one NodeRemoved, got {:?}", other),
        }

        assert!(model.delete_node(&llm).is_none());
    }

    #[test]
    fn test_delete_edge() {
        let mut model = model();
        let prompt = model.add_node(NodeKind::Prompt, at(0.0));
        let llm = model.add_node(NodeKind::Model, at(100.0));
        let ConnectOutcome::Connected(edge_id) = model.connect(ConnectRequest::new(&prompt, &llm))
        else {
            panic!("Expected connection");
        };

        assert!(model.delete_edge(&edge_id).is_some());
        assert!(model.graph().edges.is_empty());
        assert_eq!(model.graph().nodes.len(), 2);
        assert!(model.delete_edge(&edge_id).is_none());
    }

    #[test]
    fn test_update_node_cannot_change_kind() {
        let mut model = model();
        let id = model.add_node(NodeKind::Delay, at(0.0));

        model
            .update_node(&id, |data| {
                data.label = "Back off".to_string();
                data.config = NodeConfig::Delay { duration_ms: 30 };
            })
            .unwrap();
        let node = model.graph().find_node(&id).unwrap();
        assert_eq!(node.data.label, "Back off");
        assert_eq!(node.data.config, NodeConfig::Delay { duration_ms: 30 });

        let before = model.graph().clone();
        let result = model.update_node(&id, |data| {
            data.label = "Now a loop".to_string();
            data.config = NodeConfig::default_for(NodeKind::Loop);
        });
        assert!(matches!(
            result,
            Err(FlowEditorError::KindChange {
                expected: NodeKind::Delay,
                found: NodeKind::Loop,
                ..
            })
        ));
        assert_eq!(model.graph(), &before);

        assert!(matches!(
            model.update_node("nope", |_| {}),
            Err(FlowEditorError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_toggle_bypass_and_move() {
        let mut model = model();
        let id = model.add_node(NodeKind::Filter, at(0.0));

        assert!(model.toggle_bypass(&id).unwrap());
        assert!(!model.toggle_bypass(&id).unwrap());

        model.move_node(&id, Position::new(5.0, 6.0)).unwrap();
        assert_eq!(model.graph().find_node(&id).unwrap().position, Position::new(5.0, 6.0));
    }

    #[test]
    fn test_style_changes_never_retype_edges() {
        let mut model = model();
        let api = model.add_node(NodeKind::Api, at(0.0));
        let out = model.add_node(NodeKind::Output, at(100.0));
        let ConnectOutcome::Connected(edge_id) = model.connect(ConnectRequest::new(&api, &out))
        else {
            panic!("Expected connection");
        };
        model.set_edge_label(&edge_id, Some("response".to_string())).unwrap();

        model.set_edge_style_settings(EdgeStyleSettings {
            default_line_type: LineType::Straight,
            default_animated: false,
            ..EdgeStyleSettings::default()
        });
        let edge = model.graph().find_edge(&edge_id).unwrap();
        assert_eq!(edge.data.line_type, LineType::Bezier);

        model.apply_style_to_all_edges();
        let edge = model.graph().find_edge(&edge_id).unwrap();
        assert_eq!(edge.data.line_type, LineType::Straight);
        assert!(!edge.data.animated);
        assert_eq!(edge.data.data_type, FlowDataType::Json);
        assert_eq!(edge.data.label.as_deref(), Some("response"));
    }

    #[test]
    fn test_load_drops_invalid_edges() {
        let graph = FlowBuilder::new()
            .add_node("in", NodeKind::Input, (0.0, 0.0))
            .add_node("prompt", NodeKind::Prompt, (100.0, 0.0))
            .add_node("out", NodeKind::Output, (200.0, 0.0))
            .add_node("in", NodeKind::Model, (300.0, 0.0))
            .add_edge("in", "prompt")
            .add_edge("in", "out")
            .add_edge("prompt", "out")
            .add_edge("prompt", "gone")
            .add_edge("in", "prompt")
            .build();

        let sink = Arc::new(VecEventSink::new());
        let mut model = model().with_event_sink(sink.clone());
        let issues = model.load(graph);

        assert_eq!(model.graph().nodes.len(), 3);
        assert_eq!(model.graph().find_node("in").unwrap().kind(), NodeKind::Input);
        let kept: Vec<&str> = model.graph().edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(kept, vec!["edge-1", "edge-3"]);

        assert_eq!(issues.len(), 4);
        assert!(matches!(issues[0], GraphIssue::DuplicateNodeId { .. }));
        assert!(matches!(issues[1], GraphIssue::RuleViolation { .. }));
        assert!(matches!(issues[2], GraphIssue::UnknownNode { .. }));
        assert!(matches!(issues[3], GraphIssue::DuplicateConnection { .. }));

        assert_eq!(
            sink.events(),
            vec![EditorEvent::GraphLoaded {
                node_count: 3,
                edge_count: 2,
                dropped_edges: 3,
            }]
        );
    }

    #[test]
    fn test_check_connection() {
        let mut model = model();
        let tool = model.add_node(NodeKind::Tool, at(0.0));
        let out = model.add_node(NodeKind::Output, at(100.0));

        assert!(model.check_connection(&tool, &out).unwrap().is_valid);
        assert!(!model.check_connection(&out, &tool).unwrap().is_valid);
        assert!(model.check_connection(&tool, "missing").is_none());
        assert!(model.graph().edges.is_empty());
    }
}
