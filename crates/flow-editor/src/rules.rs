//! Connection rules between node kinds
//!
//! Decides whether a `source -> target` connection is allowed. The check
//! runs in two independent stages:
//!
//! - the **source** side: terminal kinds, then the source's permission entry,
//!   with universal targets accepted even when the source does not list them;
//! - the **target** side: the target's restriction entry, checked for every
//!   connection that got past the source side.
//!
//! A target can therefore veto a connection the source believes is licensed.
//! UI messages are keyed on [`RejectionStage`], so both stages must stay
//! separate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{Permission, RuleRegistry};
use crate::types::NodeKind;

/// Which part of the rule evaluation rejected a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionStage {
    /// `output` source or `input` target
    Terminal,
    /// The source's permission entry
    Permission,
    /// The target's restriction entry
    Restriction,
}

/// Why a connection was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Rejection {
    #[error("output kinds cannot have outgoing connections")]
    SourceIsOutput,

    #[error("input kinds cannot receive incoming connections")]
    TargetIsInput,

    #[error("{source_kind} nodes cannot have outgoing connections")]
    NoOutgoing { source_kind: NodeKind },

    #[error("{source_kind} cannot connect to {target_kind}")]
    NotPermitted {
        source_kind: NodeKind,
        target_kind: NodeKind,
    },

    #[error("{target_kind} only accepts connections from: {}", join_kinds(allowed))]
    RestrictedSource {
        source_kind: NodeKind,
        target_kind: NodeKind,
        allowed: Vec<NodeKind>,
    },
}

impl Rejection {
    /// The evaluation stage that produced this rejection
    pub fn stage(&self) -> RejectionStage {
        match self {
            Rejection::SourceIsOutput | Rejection::TargetIsInput => RejectionStage::Terminal,
            Rejection::NoOutgoing { .. } | Rejection::NotPermitted { .. } => {
                RejectionStage::Permission
            }
            Rejection::RestrictedSource { .. } => RejectionStage::Restriction,
        }
    }
}

fn join_kinds(kinds: &[NodeKind]) -> String {
    kinds
        .iter()
        .map(NodeKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of checking a single connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionCheck {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Rejection>,
}

impl ConnectionCheck {
    fn accept() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    fn reject(reason: Rejection) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason),
        }
    }

    /// Convert into a `Result` for `?`-style callers
    pub fn into_result(self) -> Result<(), Rejection> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

/// Evaluates connections against a rule registry
#[derive(Debug, Clone, Copy)]
pub struct ConnectionRules<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> ConnectionRules<'a> {
    /// Create an evaluator over the given tables
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Decide whether `source -> target` may be connected
    pub fn validate(&self, source: NodeKind, target: NodeKind) -> ConnectionCheck {
        if source == NodeKind::Output {
            return ConnectionCheck::reject(Rejection::SourceIsOutput);
        }
        if target == NodeKind::Input {
            return ConnectionCheck::reject(Rejection::TargetIsInput);
        }

        if let Err(reason) = self.check_source(source, target) {
            return ConnectionCheck::reject(reason);
        }

        // Always re-checked, however the source side passed.
        if let Some(allowed) = self.registry.restriction(target) {
            if !allowed.contains(&source) {
                return ConnectionCheck::reject(Rejection::RestrictedSource {
                    source_kind: source,
                    target_kind: target,
                    allowed: allowed.to_vec(),
                });
            }
        }

        ConnectionCheck::accept()
    }

    /// Every target kind `source` can currently connect to
    pub fn allowed_targets(&self, source: NodeKind) -> Vec<NodeKind> {
        NodeKind::ALL
            .iter()
            .copied()
            .filter(|target| self.validate(source, *target).is_valid)
            .collect()
    }

    fn check_source(&self, source: NodeKind, target: NodeKind) -> Result<(), Rejection> {
        match self.registry.permission(source) {
            permission if permission.is_empty() => Err(Rejection::NoOutgoing {
                source_kind: source,
            }),
            Permission::Any => Ok(()),
            permission if permission.allows(target) => Ok(()),
            _ if self.registry.is_universal_target(target) => Ok(()),
            _ => Err(Rejection::NotPermitted {
                source_kind: source,
                target_kind: target,
            }),
        }
    }
}
