//! Errors raised while checking a proof script.
//!
//! Every failure aborts the whole run. Each variant carries `at`, the
//! breadcrumb path of the declaration being checked when it failed
//! (`assume `h` / any `c` / assertion `lac``).

use natded_kernel::{Expr, Judgment, KernelError};

#[derive(Debug, thiserror::Error)]
pub enum ElabError {
    /// A kernel rule rejected, including unresolved names.
    #[error("{at}: {source}")]
    Kernel {
        at: String,
        #[source]
        source: KernelError,
    },

    /// An assertion's derived judgment differs from its declared formula.
    #[error("{at}: declared {declared}, derived {derived}")]
    FormulaMismatch {
        at: String,
        declared: Expr,
        derived: Judgment,
    },

    #[error("{at}: empty block")]
    EmptyBlock { at: String },

    /// A pooled theorem cannot be discharged by the closing scope.
    #[error("{at}: cannot generalize `{name}` ({judgment}) over {binder}")]
    Ungeneralizable {
        at: String,
        name: String,
        judgment: Judgment,
        binder: &'static str,
    },

    #[error("{at}: scopes nested deeper than {limit}")]
    ScopeDepth { at: String, limit: usize },

    #[error("invalid options: {0}")]
    Options(#[from] toml::de::Error),

    #[error("invalid script: {0}")]
    Script(#[from] serde_json::Error),
}

impl ElabError {
    /// The underlying kernel rejection, if any.
    pub fn kernel(&self) -> Option<&KernelError> {
        match self {
            ElabError::Kernel { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ElabError>;
