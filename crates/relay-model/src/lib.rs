//! Elaborated reactive models.
//!
//! A model is a hierarchical composition of *nodes* that read and write
//! typed *state variables* and exchange messages on typed *channels*.
//! Elaboration flattens that composition into the canonical form the
//! translator consumes:
//!
//! - **StateNode**: the canonical state hierarchy, a rose tree whose
//!   leaves are state variables (with initial values) and channels.
//! - **ExprMap**: a content-addressed DAG holding every arithmetic and
//!   boolean expression exactly once.
//! - **Rule**: an atomic guarded transition fragment — guard,
//!   next-state assignments, channel sends and receives.
//! - **ChannelDescriptor**: a one-slot mailbox between a writer node
//!   and a reader node.
//! - **FaultConfig**: how nodes are allowed to misbehave.
//!
//! [`ModelBuilder`] is the programmatic elaborator; there is no surface
//! syntax here. Everything produced is immutable from the translator's
//! point of view.

#![deny(unsafe_code)]

mod builder;
mod errors;
mod expr;
mod fault;
mod hierarchy;
mod program;
mod rule;
mod types;

pub use builder::{ModelBuilder, RuleBuilder, VarId};
pub use errors::{ElabError, ElabResult};
pub use expr::{ExprId, ExprMap, ExprNode, ExprOp, VarRef};
pub use fault::{FaultClass, FaultConfig};
pub use hierarchy::{StateLeaf, StateNode, VarPath};
pub use program::ElaboratedProgram;
pub use rule::{ChanId, ChannelDescriptor, NodeId, Rule, RuleId};
pub use types::{Const, PrimType};
