//! User-facing strings
//!
//! The graph model asks a [`Localizer`] for default node labels and
//! rejection notifications. String catalogues live with the front end; the
//! built-in [`EnglishLocale`] is what the core uses when none is supplied.

use crate::rules::Rejection;
use crate::types::NodeKind;

/// Source of user-facing text
pub trait Localizer: Send + Sync {
    /// Default label for a newly dropped node
    fn node_label(&self, kind: NodeKind) -> String;

    /// Notification text for a refused connection
    fn rejection_message(&self, reason: &Rejection) -> String;
}

/// Built-in English strings
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLocale;

impl Localizer for EnglishLocale {
    fn node_label(&self, kind: NodeKind) -> String {
        let label = match kind {
            NodeKind::Input => "Input",
            NodeKind::Output => "Output",
            NodeKind::Prompt => "Prompt",
            NodeKind::Model => "AI Model",
            NodeKind::Condition => "Condition",
            NodeKind::Tool => "Tool",
            NodeKind::Transform => "Transform",
            NodeKind::Filter => "Filter",
            NodeKind::Merge => "Merge",
            NodeKind::Split => "Split",
            NodeKind::Database => "Database",
            NodeKind::Api => "API Request",
            NodeKind::Storage => "Storage",
            NodeKind::Loop => "Loop",
            NodeKind::Delay => "Delay",
            NodeKind::Switch => "Switch",
            NodeKind::Embedding => "Embedding",
            NodeKind::Memory => "Memory",
            NodeKind::Classifier => "Classifier",
            NodeKind::Group => "Group",
        };
        label.to_string()
    }

    fn rejection_message(&self, reason: &Rejection) -> String {
        let text = reason.to_string();
        let mut chars = text.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => text,
        }
    }
}
