//! Flow Editor - typed connection rules and execution overlay
//!
//! This crate is the core of a visual pipeline editor in which users wire
//! typed node blocks (inputs, AI models, transforms, branches, loops,
//! integrations, outputs) into a directed graph. It provides:
//!
//! - A frozen rule registry deciding which node kinds may connect
//! - Connection validation with dual enforcement of target restrictions
//! - Data types stamped on each edge when it is created
//! - A graph model applying user gestures atomically
//! - A pure overlay projecting runtime status and output onto the graph
//!
//! # Architecture
//!
//! - `RuleRegistry`: permission, restriction and output-type tables, built once
//! - `ConnectionRules`: validates a source/target kind pair against a registry
//! - `GraphModel`: owns the canonical graph; the only thing that mutates it
//! - `derive_view`: re-derives the render view on every call, never mutates
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use flow_editor::{ConnectRequest, GraphModel, NodeKind, Position, RuleRegistry};
//!
//! let mut model = GraphModel::new(Arc::new(RuleRegistry::standard()));
//! let prompt = model.add_node(NodeKind::Prompt, Position::new(0.0, 0.0));
//! let llm = model.add_node(NodeKind::Model, Position::new(240.0, 0.0));
//! assert!(model.connect(ConnectRequest::new(&prompt, &llm)).is_connected());
//! ```

pub mod builder;
pub mod error;
pub mod events;
pub mod geometry;
pub mod graph;
pub mod locale;
pub mod overlay;
pub mod propagation;
pub mod registry;
pub mod rules;
pub mod settings;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::FlowBuilder;
pub use error::{FlowEditorError, Result};
pub use events::{EditorEvent, EventSink, ExecutionEvent};
pub use graph::{ConnectOutcome, ConnectRequest, GraphModel};
pub use overlay::{derive_view, ExecutionSnapshot, ExecutionState, FlowView, RenderState};
pub use propagation::suggest_data_type;
pub use registry::{Permission, RuleRegistry, RuleRegistryBuilder};
pub use rules::{ConnectionCheck, ConnectionRules, Rejection};
pub use settings::EdgeStyleSettings;
pub use types::{
    EdgeData, FlowDataType, FlowEdge, FlowGraph, FlowNode, LineType, MarkerType, NodeConfig,
    NodeKind, Position,
};
pub use validation::{validate_graph, GraphIssue};
