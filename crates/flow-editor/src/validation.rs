//! Whole-graph validation
//!
//! The graph model only ever stores edges that passed the connection rules,
//! but graphs can also arrive from outside (a persistence collaborator, a
//! test fixture). This module audits such a graph and reports every problem
//! found, not just the first.

use std::collections::HashSet;

use crate::rules::{ConnectionRules, Rejection};
use crate::types::{FlowEdge, FlowGraph};

/// A structural problem in a flow graph
#[derive(Debug, Clone, PartialEq)]
pub enum GraphIssue {
    /// Two nodes share an id
    DuplicateNodeId { node_id: String },
    /// Two edges share an id
    DuplicateEdgeId { edge_id: String },
    /// An edge references a node that does not exist
    UnknownNode { edge_id: String, node_id: String },
    /// An edge repeats an earlier edge's endpoints and handles
    DuplicateConnection { edge_id: String },
    /// An edge connects kinds the rules do not allow
    RuleViolation { edge_id: String, reason: Rejection },
}

impl GraphIssue {
    /// The edge this issue is about, if any
    pub fn edge_id(&self) -> Option<&str> {
        match self {
            Self::DuplicateNodeId { .. } => None,
            Self::DuplicateEdgeId { edge_id }
            | Self::UnknownNode { edge_id, .. }
            | Self::DuplicateConnection { edge_id }
            | Self::RuleViolation { edge_id, .. } => Some(edge_id),
        }
    }
}

impl std::fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateNodeId { node_id } => write!(f, "Duplicate node id '{}'", node_id),
            Self::DuplicateEdgeId { edge_id } => write!(f, "Duplicate edge id '{}'", edge_id),
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::DuplicateConnection { edge_id } => {
                write!(f, "Edge '{}' duplicates an existing connection", edge_id)
            }
            Self::RuleViolation { edge_id, reason } => {
                write!(f, "Edge '{}' is not allowed: {}", edge_id, reason)
            }
        }
    }
}

impl std::error::Error for GraphIssue {}

/// Validate a flow graph against the connection rules
///
/// Returns all issues found; an empty list means the graph is well formed.
pub fn validate_graph(graph: &FlowGraph, rules: &ConnectionRules<'_>) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    validate_node_ids(graph, &mut issues);

    let mut accepted: Vec<&FlowEdge> = Vec::new();
    let mut edge_ids: HashSet<&str> = HashSet::new();
    for edge in &graph.edges {
        if !edge_ids.insert(edge.id.as_str()) {
            issues.push(GraphIssue::DuplicateEdgeId {
                edge_id: edge.id.clone(),
            });
            continue;
        }
        match check_edge(graph, accepted.iter().copied(), edge, rules) {
            Some(issue) => issues.push(issue),
            None => accepted.push(edge),
        }
    }

    issues
}

/// Check one edge against the graph's nodes and the edges accepted before it
pub fn check_edge<'e>(
    graph: &FlowGraph,
    accepted: impl IntoIterator<Item = &'e FlowEdge>,
    edge: &FlowEdge,
    rules: &ConnectionRules<'_>,
) -> Option<GraphIssue> {
    let Some(source) = graph.find_node(&edge.source) else {
        return Some(GraphIssue::UnknownNode {
            edge_id: edge.id.clone(),
            node_id: edge.source.clone(),
        });
    };
    let Some(target) = graph.find_node(&edge.target) else {
        return Some(GraphIssue::UnknownNode {
            edge_id: edge.id.clone(),
            node_id: edge.target.clone(),
        });
    };

    let duplicate = accepted.into_iter().any(|other| {
        other.joins(
            &edge.source,
            edge.source_handle.as_deref(),
            &edge.target,
            edge.target_handle.as_deref(),
        )
    });
    if duplicate {
        return Some(GraphIssue::DuplicateConnection {
            edge_id: edge.id.clone(),
        });
    }

    rules
        .validate(source.kind(), target.kind())
        .reason
        .map(|reason| GraphIssue::RuleViolation {
            edge_id: edge.id.clone(),
            reason,
        })
}

fn validate_node_ids(graph: &FlowGraph, issues: &mut Vec<GraphIssue>) {
    let mut seen: HashSet<&str> = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.id.as_str()) {
            issues.push(GraphIssue::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FlowBuilder;
    use crate::registry::RuleRegistry;
    use crate::types::NodeKind;

    fn audit(graph: &FlowGraph) -> Vec<GraphIssue> {
        let registry = RuleRegistry::standard();
        validate_graph(graph, &ConnectionRules::new(&registry))
    }

    #[test]
    fn test_valid_graph() {
        let graph = FlowBuilder::new()
            .add_node("in", NodeKind::Input, (0.0, 0.0))
            .add_node("prompt", NodeKind::Prompt, (200.0, 0.0))
            .add_node("model", NodeKind::Model, (400.0, 0.0))
            .add_node("out", NodeKind::Output, (600.0, 0.0))
            .add_edge("in", "prompt")
            .add_edge("prompt", "model")
            .add_edge("model", "out")
            .build();

        let issues = audit(&graph);
        assert!(issues.is_empty(), "Expected no issues, got: {:?}", issues);
    }

    #[test]
    fn test_edge_references_missing_node() {
        let graph = FlowBuilder::new()
            .add_node("in", NodeKind::Input, (0.0, 0.0))
            .add_edge("in", "missing")
            .build();

        assert_eq!(
            audit(&graph),
            vec![GraphIssue::UnknownNode {
                edge_id: "edge-1".to_string(),
                node_id: "missing".to_string(),
            }]
        );
    }

    #[test]
    fn test_rule_violation() {
        let graph = FlowBuilder::new()
            .add_node("in", NodeKind::Input, (0.0, 0.0))
            .add_node("out", NodeKind::Output, (100.0, 0.0))
            .add_edge("in", "out")
            .add_edge("out", "in")
            .build();

        let issues = audit(&graph);
        assert_eq!(issues.len(), 2);
        assert!(issues
            .iter()
            .all(|i| matches!(i, GraphIssue::RuleViolation { .. })));
    }

    #[test]
    fn test_duplicates() {
        let graph = FlowBuilder::new()
            .add_node("p", NodeKind::Prompt, (0.0, 0.0))
            .add_node("p", NodeKind::Prompt, (0.0, 50.0))
            .add_node("m", NodeKind::Model, (100.0, 0.0))
            .add_edge_with_id("e", "p", "m")
            .add_edge_with_id("e", "p", "m")
            .add_edge_with_id("f", "p", "m")
            .build();

        let issues = audit(&graph);
        assert!(issues.contains(&GraphIssue::DuplicateNodeId {
            node_id: "p".to_string()
        }));
        assert!(issues.contains(&GraphIssue::DuplicateEdgeId {
            edge_id: "e".to_string()
        }));
        assert!(issues.contains(&GraphIssue::DuplicateConnection {
            edge_id: "f".to_string()
        }));
    }

    #[test]
    fn test_collects_multiple_issues() {
        let graph = FlowBuilder::new()
            .add_node("out", NodeKind::Output, (0.0, 0.0))
            .add_node("in", NodeKind::Input, (100.0, 0.0))
            .add_edge("out", "in")
            .add_edge("in", "ghost")
            .build();

        let issues = audit(&graph);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].edge_id(), Some("edge-1"));
        assert_eq!(issues[1].edge_id(), Some("edge-2"));
        assert!(issues[0].to_string().contains("not allowed"));
    }
}
