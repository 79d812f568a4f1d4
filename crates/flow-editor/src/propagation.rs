//! Data type stamping for new edges
//!
//! An edge's type is looked up once, when the edge is created, and then
//! frozen. Later edits to the source node never re-type existing edges.

use crate::registry::RuleRegistry;
use crate::types::{FlowDataType, NodeKind};

/// Data type for an edge leaving a `source` node; `any` when undeclared
pub fn suggest_data_type(registry: &RuleRegistry, source: NodeKind) -> FlowDataType {
    registry
        .declared_output_type(source)
        .unwrap_or(FlowDataType::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Permission;

    #[test]
    fn test_storage_produces_files() {
        let registry = RuleRegistry::standard();
        assert_eq!(suggest_data_type(&registry, NodeKind::Storage), FlowDataType::File);
        assert_eq!(suggest_data_type(&registry, NodeKind::Prompt), FlowDataType::Text);
        assert_eq!(suggest_data_type(&registry, NodeKind::Api), FlowDataType::Json);
    }

    #[test]
    fn test_undeclared_falls_back_to_any() {
        let registry = RuleRegistry::standard();
        assert_eq!(suggest_data_type(&registry, NodeKind::Group), FlowDataType::Any);

        let bare = NodeKind::ALL
            .iter()
            .fold(RuleRegistry::builder(), |b, kind| b.permit(*kind, Permission::Any))
            .build()
            .unwrap();
        for kind in NodeKind::ALL {
            assert_eq!(suggest_data_type(&bare, kind), FlowDataType::Any);
        }
    }
}
