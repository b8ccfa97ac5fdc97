//! # natded elaborator
//!
//! Checks proof scripts against the natded kernel.
//!
//! A script is a tree of [`Decl`]s. Assertions prove a formula with a
//! [`Proof`] tree and pool the resulting theorem by name; `any`, `any_func`,
//! `any_pred` and `assume` open scopes whose pooled theorems are
//! generalized over the scope's binder when it closes. Surface formulas are
//! [`Syntax`] trees, turned into kernel expressions by [`builder`] through
//! formation rules only.
//!
//! The elaborator is untrusted: every theorem it returns was produced by the
//! kernel's rules.

pub mod builder;
pub mod elaborate;
pub mod error;
pub mod options;
pub mod pool;
pub mod script;
pub mod syntax;

pub use elaborate::{Elaborator, check_script};
pub use error::{ElabError, Result};
pub use options::ElabOptions;
pub use pool::Pool;
pub use script::{Decl, Proof};
pub use syntax::Syntax;
