//! AST of the emitted transition system.
//!
//! One [`Document`] holds everything the renderer serializes for one
//! system: constant declarations, the state type, the initial-state
//! formula, the per-rule and master transitions, the system
//! declaration, and the generated queries.

use serde::{Deserialize, Serialize};

use crate::expr::{BaseType, Expr};
use crate::name::Name;

/// One typed slot of the state type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateVarDecl {
    pub name: Name,
    pub ty: BaseType,
}

impl StateVarDecl {
    pub fn new(name: Name, ty: BaseType) -> Self {
        StateVarDecl { name, ty }
    }
}

/// A state type: latched state variables plus non-latched inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateType {
    pub name: Name,
    pub vars: Vec<StateVarDecl>,
    pub inputs: Vec<StateVarDecl>,
}

/// A named state formula over a state type (used for initial states).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateFormula {
    pub name: Name,
    pub state_type: Name,
    pub pred: Expr,
}

/// A transition relation over `state.*` / `next.*`, with its shared
/// subexpressions bound up front. Bindings are ordered: every let
/// variable is defined before any later binding or the predicate uses
/// it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub name: Name,
    pub state_type: Name,
    pub bindings: Vec<(Name, Expr)>,
    pub pred: Expr,
}

/// A named constant. Kept for completeness of the surface; the
/// translator currently emits none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstDecl {
    pub name: Name,
    pub ty: BaseType,
    pub value: Expr,
}

/// The system declaration tying state type, initial states, and master
/// transition together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionSystem {
    pub name: Name,
    pub state_type: Name,
    pub init: Name,
    pub transition: Name,
}

/// A property query against a declared system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Property name; only used for rendering comments.
    pub name: String,
    pub system: Name,
    pub pred: Expr,
}

/// Everything emitted for one translated system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub consts: Vec<ConstDecl>,
    pub state_type: StateType,
    pub init: StateFormula,
    /// Per-rule transitions first, master transition last.
    pub transitions: Vec<Transition>,
    pub system: TransitionSystem,
    pub queries: Vec<Query>,
}
