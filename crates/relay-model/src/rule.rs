//! Rules and channel descriptors.
//!
//! A rule is an atomic guarded transition fragment: when its guard
//! holds, its assignments and channel effects happen together in one
//! master step. Exactly one rule fires per step; the translator encodes
//! that by disjoining the per-rule transitions.

use std::collections::BTreeSet;
use std::fmt;

use crate::expr::ExprId;
use crate::hierarchy::VarPath;
use crate::types::PrimType;

/// Identifier of an elaborated scope (node).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Identifier of a channel, unique across the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChanId(pub u32);

impl fmt::Display for ChanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a rule, dense in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub u32);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A channel: a one-slot mailbox between a writer node and a reader
/// node, realized downstream as a payload variable plus a presence bit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelDescriptor {
    pub id: ChanId,
    /// Canonical path of the channel leaf in the hierarchy.
    pub path: VarPath,
    /// Element type of the payload.
    pub ty: PrimType,
    pub writer: NodeId,
    pub reader: NodeId,
}

/// An atomic guarded transition fragment.
#[derive(Clone, Debug)]
pub struct Rule {
    pub id: RuleId,
    /// Path of the node this rule belongs to.
    pub node: VarPath,
    pub name: String,
    /// Boolean firing condition; `None` means always enabled.
    pub guard: Option<ExprId>,
    /// Next-state assignments `target := value`. Targets are unique
    /// within one rule.
    pub assigns: Vec<(VarPath, ExprId)>,
    /// Channel sends: set the payload and raise the presence bit.
    pub writes: Vec<(ChanId, ExprId)>,
    /// Channel receives: lower the presence bit.
    pub consumes: Vec<ChanId>,
    /// Transitive closure of every expression the rule mentions.
    pub used_exprs: BTreeSet<ExprId>,
}

impl Rule {
    /// The expression ids the rule mentions directly: guard, assignment
    /// right-hand sides, and written payloads.
    pub fn expr_roots(&self) -> Vec<ExprId> {
        self.guard
            .iter()
            .copied()
            .chain(self.assigns.iter().map(|(_, value)| *value))
            .chain(self.writes.iter().map(|(_, value)| *value))
            .collect()
    }
}
