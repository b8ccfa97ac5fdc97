//! # natded kernel
//!
//! A natural-deduction proof kernel for many-sorted first-order logic with
//! function and predicate binders.
//!
//! Soundness is by construction: a [`Theorem`] can only be produced by the
//! rules implemented in [`theorem`], starting from the empty context. Nothing
//! outside that module can build one, deserialize one, or edit one.
//!
//! ## Architecture
//!
//! ```text
//! Expr / subst          ← de Bruijn expressions and substitution combinators
//!     │
//! Context               ← persistent, newest-first declarations and hypotheses
//!     │
//! Theorem               ← (Context, Judgment), formation and ND rules
//! ```
//!
//! Binders are nameless: `Bound(0)` refers to the innermost enclosing binder,
//! and binder display names are ignored by equality. Free variables are
//! referred to by name and resolved against the context.

pub mod context;
pub mod error;
pub mod expr;
pub mod fingerprint;
pub mod print;
pub mod subst;
pub mod theorem;

pub use context::{Context, ContextEntry, EntryKind};
pub use error::{KernelError, Result};
pub use expr::{Expr, Name, Sort, Type, VarRef};
pub use fingerprint::Fingerprint;
pub use theorem::{Judgment, Theorem};
