//! Error types for kernel rules.
//!
//! Every rule rejects rather than returning a wrong result. The variants
//! follow the failure taxonomy of the kernel and always name the rule that
//! rejected, together with the offending sub-term, judgment or context.

use crate::context::Context;
use crate::expr::{Expr, Name};

/// Errors raised when a kernel rule's guard does not hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// A rule was applied to a judgment or context entry of the wrong shape.
    #[error("{rule}: expected {expected}, found {found}")]
    ShapeMismatch {
        rule: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Combined sub-theorems live in different contexts, or a weakening
    /// target does not extend the theorem's context.
    #[error("{rule}: context mismatch: [{expected}] vs [{found}]")]
    ContextMismatch {
        rule: &'static str,
        expected: Context,
        found: Context,
    },

    /// Wrong number of arguments, or a negative declared arity.
    #[error("{rule}: arity mismatch for `{name}`: expected {expected}, found {found}")]
    ArityMismatch {
        rule: &'static str,
        name: Name,
        expected: String,
        found: i64,
    },

    /// A name resolves to nothing in the context.
    #[error("{rule}: unbound name `{name}`")]
    UnboundName { rule: &'static str, name: Name },

    /// Two formulas that must agree (up to binder names) differ.
    #[error("{rule}: formula mismatch: expected {expected}, found {found}")]
    FormulaMismatch {
        rule: &'static str,
        expected: Expr,
        found: Expr,
    },

    /// A declaration would shadow a name already declared in the context.
    #[error("{rule}: `{name}` is already declared")]
    NameClash { rule: &'static str, name: Name },
}

impl KernelError {
    /// The name of the rule that rejected.
    pub fn rule(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { rule, .. }
            | Self::ContextMismatch { rule, .. }
            | Self::ArityMismatch { rule, .. }
            | Self::UnboundName { rule, .. }
            | Self::FormulaMismatch { rule, .. }
            | Self::NameClash { rule, .. } => rule,
        }
    }
}

/// Result alias used throughout the kernel.
pub type Result<T> = std::result::Result<T, KernelError>;
