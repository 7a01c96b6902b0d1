//! Elaboration error types.

use crate::expr::ExprId;
use crate::rule::ChanId;

/// Errors raised while elaborating a model or checking the structural
/// invariants of an elaborated program.
#[derive(Debug, thiserror::Error)]
pub enum ElabError {
    #[error("duplicate declaration '{child}' under '{parent}'")]
    DuplicateSibling { parent: String, child: String },

    #[error("rule '{rule}' assigns '{target}' more than once")]
    DuplicateTarget { rule: String, target: String },

    #[error("rule '{rule}' assigns undeclared variable '{target}'")]
    UnknownVariable { rule: String, target: String },

    #[error("channel {0} is not declared")]
    UnknownChannel(ChanId),

    #[error("channel '{0}' has no leaf in the state hierarchy")]
    MissingChannelLeaf(String),

    #[error("expression {0} is missing from the expression map")]
    MissingExpr(ExprId),

    #[error("expression {id} refers to undeclared variable '{path}'")]
    UnboundVarRef { id: ExprId, path: String },

    #[error("rule '{rule}' carries a stale used-expression set")]
    StaleExprSet { rule: String },
}

/// Result type alias for elaboration.
pub type ElabResult<T> = Result<T, ElabError>;
