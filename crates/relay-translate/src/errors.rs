//! Translation error types.
//!
//! Every error is fatal: the downstream checker cannot consume a
//! partial transition system soundly, so the translator never emits
//! one. Nothing here is retried or caught and continued across.

use relay_model::{ChanId, ElabError, ExprId, RuleId, VarPath};

/// Errors raised while translating an elaborated program.
///
/// `Elaboration` carries upstream design-rule failures. `Unsupported`
/// names a model feature with no sound lowering. The remaining variants
/// are structural invariants the elaborator is supposed to guarantee;
/// tripping one means the input was built by hand or by a buggy
/// elaborator, and each reports the offending identifier.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("elaboration failed: {0}")]
    Elaboration(#[from] ElabError),

    #[error("unsupported feature: {feature}")]
    Unsupported { feature: String },

    #[error("expression {0} is missing from the expression map")]
    MissingExpr(ExprId),

    #[error("expression graph has a cycle through {0}")]
    CyclicExpr(ExprId),

    #[error("assignment target '{0}' is not a state variable")]
    UnknownTarget(VarPath),

    #[error("channel {0} is not declared")]
    UnknownChannel(ChanId),

    #[error("rule {rule} constrains '{target}' twice")]
    DuplicateTarget { rule: RuleId, target: VarPath },

    #[error("fault configuration names unknown node '{0}'")]
    UnknownFaultNode(String),
}

impl TranslateError {
    pub(crate) fn unsupported(feature: impl Into<String>) -> Self {
        TranslateError::Unsupported {
            feature: feature.into(),
        }
    }
}

/// Result type alias for translation.
pub type TranslateResult<T> = Result<T, TranslateError>;
