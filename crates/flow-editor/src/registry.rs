//! Rule registry for node kinds
//!
//! Holds the four rule tables the connection engine consults:
//!
//! 1. **Permissions**: what each source kind declares it may connect to
//! 2. **Restrictions**: which sources a target kind accepts
//! 3. **Universal targets**: kinds any source may reach, even unlisted
//! 4. **Default output types**: the data type stamped on new edges
//!
//! A registry is built once and never mutated. Pass it (usually behind an
//! `Arc`) to whatever needs it; tests can build alternate rule sets with
//! [`RuleRegistryBuilder`].
//!
//! # Usage
//!
//! ```ignore
//! let registry = Arc::new(RuleRegistry::standard());
//! let rules = ConnectionRules::new(&registry);
//! assert!(rules.validate(NodeKind::Prompt, NodeKind::Model).is_valid);
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{FlowEditorError, Result};
use crate::types::{FlowDataType, NodeKind};

/// Outgoing-connection permission declared by a source kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    /// May connect to any target (still subject to target restrictions)
    Any,
    /// May connect to the listed targets; an empty list means no outgoing edges
    Only(Vec<NodeKind>),
}

/// Fallback for kinds without an entry; unreachable for built registries
static NO_PERMISSION: Permission = Permission::Only(Vec::new());

impl Permission {
    /// A permission that allows nothing
    pub fn none() -> Self {
        Permission::Only(Vec::new())
    }

    /// Whether the permission explicitly lists no targets
    pub fn is_empty(&self) -> bool {
        matches!(self, Permission::Only(targets) if targets.is_empty())
    }

    /// Whether this permission licenses `target` on its own
    pub fn allows(&self, target: NodeKind) -> bool {
        match self {
            Permission::Any => true,
            Permission::Only(targets) => targets.contains(&target),
        }
    }
}

/// Immutable set of connection rules and type metadata
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    permissions: HashMap<NodeKind, Permission>,
    restrictions: HashMap<NodeKind, Vec<NodeKind>>,
    universal_targets: HashSet<NodeKind>,
    output_types: HashMap<NodeKind, FlowDataType>,
}

impl RuleRegistry {
    /// Start building a custom rule set
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    /// The rule set shipped with the editor
    pub fn standard() -> Self {
        use NodeKind::*;

        let builder = RuleRegistry::builder()
            // Entry and exit points
            .allow(
                Input,
                &[
                    Prompt, Model, Transform, Filter, Condition, Split, Embedding, Classifier,
                    Memory, Api, Database, Tool, Loop, Switch, Delay, Storage,
                ],
            )
            .permit(Output, Permission::none())
            // AI building blocks
            .allow(Prompt, &[Model, Classifier, Transform, Merge, Output, Memory])
            .allow(
                Model,
                &[
                    Output, Transform, Condition, Filter, Tool, Prompt, Merge, Split, Switch,
                    Storage, Memory, Classifier, Loop, Delay, Database, Api,
                ],
            )
            .allow(Embedding, &[Memory, Database, Storage, Classifier, Output, Transform])
            .allow(Memory, &[Model, Prompt, Output, Transform])
            .allow(Classifier, &[Condition, Switch, Output, Transform, Model, Merge])
            // Logic
            .permit(Condition, Permission::Any)
            .permit(Switch, Permission::Any)
            .permit(Transform, Permission::Any)
            .allow(Filter, &[Output, Transform, Model, Merge, Condition, Loop, Split])
            .allow(Merge, &[Output, Model, Transform, Prompt, Filter, Condition, Storage])
            .allow(Split, &[Model, Transform, Filter, Loop, Tool, Api, Prompt])
            // Integrations and data
            .allow(Tool, &[Output, Model, Transform, Merge, Condition, Filter])
            .allow(Api, &[Transform, Filter, Model, Output, Condition, Merge, Database])
            .allow(Database, &[Transform, Filter, Model, Output, Merge, Prompt, Embedding])
            .allow(Storage, &[Transform, Model, Output, Embedding, Split])
            // Flow control and layout
            .permit(Loop, Permission::Any)
            .permit(Delay, Permission::Any)
            .permit(Group, Permission::Any);

        let builder = builder
            .universal(Transform)
            .universal(Merge)
            .universal(Delay)
            .universal(Group)
            .restrict(
                Model,
                &[
                    Input, Prompt, Memory, Merge, Transform, Tool, Split, Filter, Database, Api,
                    Storage, Loop, Condition, Switch, Classifier, Delay, Group,
                ],
            )
            .restrict(
                Output,
                &[
                    Model, Transform, Tool, Condition, Filter, Merge, Database, Api, Storage,
                    Switch, Loop, Delay, Classifier, Embedding, Memory, Prompt, Group,
                ],
            )
            .restrict(Embedding, &[Input, Database, Storage, Transform, Split, Loop, Group])
            .restrict(Memory, &[Embedding, Model, Prompt, Input, Transform])
            .restrict(
                Merge,
                &[
                    Model, Prompt, Tool, Filter, Database, Api, Classifier, Transform, Condition,
                    Switch, Loop, Group, Delay, Split,
                ],
            )
            .restrict(
                Condition,
                &[
                    Model, Transform, Filter, Classifier, Api, Tool, Input, Merge, Loop, Delay,
                    Switch, Condition, Group,
                ],
            );

        // `output` and `group` declare no output type and fall back to `any`.
        let builder = builder
            .output_type(Input, FlowDataType::Text)
            .output_type(Prompt, FlowDataType::Text)
            .output_type(Model, FlowDataType::Text)
            .output_type(Condition, FlowDataType::Signal)
            .output_type(Tool, FlowDataType::Json)
            .output_type(Transform, FlowDataType::Json)
            .output_type(Filter, FlowDataType::Json)
            .output_type(Merge, FlowDataType::Json)
            .output_type(Split, FlowDataType::Json)
            .output_type(Database, FlowDataType::Json)
            .output_type(Api, FlowDataType::Json)
            .output_type(Storage, FlowDataType::File)
            .output_type(Loop, FlowDataType::Any)
            .output_type(Delay, FlowDataType::Signal)
            .output_type(Switch, FlowDataType::Signal)
            .output_type(Embedding, FlowDataType::Json)
            .output_type(Memory, FlowDataType::Text)
            .output_type(Classifier, FlowDataType::Text);

        // Coverage of every kind is asserted in tests.
        builder.freeze()
    }

    /// Outgoing permission declared by `source`
    pub fn permission(&self, source: NodeKind) -> &Permission {
        self.permissions.get(&source).unwrap_or(&NO_PERMISSION)
    }

    /// Sources `target` accepts, if it restricts them at all
    pub fn restriction(&self, target: NodeKind) -> Option<&[NodeKind]> {
        self.restrictions.get(&target).map(Vec::as_slice)
    }

    /// Whether unlisted sources may still reach `target`
    pub fn is_universal_target(&self, target: NodeKind) -> bool {
        self.universal_targets.contains(&target)
    }

    /// Universal targets in palette order
    pub fn universal_targets(&self) -> Vec<NodeKind> {
        NodeKind::ALL
            .iter()
            .copied()
            .filter(|k| self.universal_targets.contains(k))
            .collect()
    }

    /// Declared output type, if any
    pub fn declared_output_type(&self, kind: NodeKind) -> Option<FlowDataType> {
        self.output_types.get(&kind).copied()
    }

    /// Number of kinds with a permission entry
    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for [`RuleRegistry`]
///
/// `build` fails unless every node kind has a permission entry.
#[derive(Debug, Default)]
pub struct RuleRegistryBuilder {
    permissions: HashMap<NodeKind, Permission>,
    restrictions: HashMap<NodeKind, Vec<NodeKind>>,
    universal_targets: HashSet<NodeKind>,
    output_types: HashMap<NodeKind, FlowDataType>,
}

impl RuleRegistryBuilder {
    /// Set the permission entry for `source`, replacing any earlier one
    pub fn permit(mut self, source: NodeKind, permission: Permission) -> Self {
        self.permissions.insert(source, permission);
        self
    }

    /// Shorthand for `permit(source, Permission::Only(targets))`
    pub fn allow(self, source: NodeKind, targets: &[NodeKind]) -> Self {
        let unique: BTreeSet<NodeKind> = targets.iter().copied().collect();
        self.permit(source, Permission::Only(unique.into_iter().collect()))
    }

    /// Only accept connections into `target` from the listed sources
    pub fn restrict(mut self, target: NodeKind, sources: &[NodeKind]) -> Self {
        let unique: BTreeSet<NodeKind> = sources.iter().copied().collect();
        self.restrictions.insert(target, unique.into_iter().collect());
        self
    }

    /// Open `target` to sources that do not list it
    pub fn universal(mut self, target: NodeKind) -> Self {
        self.universal_targets.insert(target);
        self
    }

    /// Declare the default output type of `kind`
    pub fn output_type(mut self, kind: NodeKind, data_type: FlowDataType) -> Self {
        self.output_types.insert(kind, data_type);
        self
    }

    /// Freeze the tables
    pub fn build(self) -> Result<RuleRegistry> {
        if let Some(missing) = NodeKind::ALL
            .iter()
            .find(|kind| !self.permissions.contains_key(kind))
        {
            return Err(FlowEditorError::MissingPermission(*missing));
        }

        Ok(self.freeze())
    }

    fn freeze(self) -> RuleRegistry {
        RuleRegistry {
            permissions: self.permissions,
            restrictions: self.restrictions,
            universal_targets: self.universal_targets,
            output_types: self.output_types,
        }
    }
}
