//! Theorems: the trusted part of the system.
//!
//! A [`Theorem`] pairs a [`Context`] with a [`Judgment`]. Its constructor is
//! private to this module, and the only code that can call it lives in the
//! child modules [`formation`] and [`deduction`]. Every rule there checks its
//! guard and rejects rather than producing a wrong result, so any theorem in
//! circulation was derived from the empty context by sound rules.
//!
//! Rules that combine several theorems require their contexts to be equal.
//! Rules that change the context pop exactly the front entry.

mod deduction;
mod formation;

use crate::context::{Context, ContextEntry, EntryKind};
use crate::error::{KernelError, Result};
use crate::expr::{Expr, Name, Type};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use std::sync::Arc;

/// What a theorem asserts about its context.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    /// The expression is well-formed with the given type.
    HasType(Expr, Type),
    /// The formula is provable.
    Provable(Expr),
}

impl Judgment {
    /// The expression the judgment is about.
    pub fn expr(&self) -> &Expr {
        match self {
            Judgment::HasType(e, _) | Judgment::Provable(e) => e,
        }
    }
}

/// A judgment derived under a context.
///
/// Cheap to clone; the context and judgment are shared.
#[derive(Debug, Clone)]
pub struct Theorem(Arc<TheoremCell>);

#[derive(Debug)]
struct TheoremCell {
    context: Context,
    judgment: Judgment,
}

impl Theorem {
    fn mk_(context: Context, judgment: Judgment) -> Self {
        Theorem(Arc::new(TheoremCell { context, judgment }))
    }

    pub fn context(&self) -> &Context {
        &self.0.context
    }

    pub fn judgment(&self) -> &Judgment {
        &self.0.judgment
    }

    /// The proved formula, if this is a `Provable` judgment.
    pub fn formula(&self) -> Option<&Expr> {
        match self.judgment() {
            Judgment::Provable(p) => Some(p),
            Judgment::HasType(..) => None,
        }
    }

    /// Restate the judgment under `ctx`, which must extend this theorem's
    /// context at the front.
    pub fn weaken(&self, ctx: &Context) -> Result<Theorem> {
        if self.context() == ctx {
            return Ok(self.clone());
        }
        if !self.context().is_suffix_of(ctx) {
            return Err(KernelError::ContextMismatch {
                rule: "weaken",
                expected: ctx.clone(),
                found: self.context().clone(),
            });
        }
        Ok(Theorem::mk_(ctx.clone(), self.judgment().clone()))
    }
}

impl PartialEq for Theorem {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.context() == other.context() && self.judgment() == other.judgment())
    }
}

impl Serialize for Theorem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Theorem", 2)?;
        s.serialize_field("context", self.context())?;
        s.serialize_field("judgment", self.judgment())?;
        s.end()
    }
}

// ─── Guards shared by the rule modules ─────────────────────────────────────

fn same_context(rule: &'static str, expected: &Context, found: &Context) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(KernelError::ContextMismatch {
            rule,
            expected: expected.clone(),
            found: found.clone(),
        })
    }
}

fn same_formula(rule: &'static str, expected: &Expr, found: &Expr) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(KernelError::FormulaMismatch {
            rule,
            expected: expected.clone(),
            found: found.clone(),
        })
    }
}

fn shape(rule: &'static str, expected: &'static str, found: impl ToString) -> KernelError {
    KernelError::ShapeMismatch {
        rule,
        expected,
        found: found.to_string(),
    }
}

fn provable<'a>(rule: &'static str, t: &'a Theorem) -> Result<&'a Expr> {
    t.formula()
        .ok_or_else(|| shape(rule, "a provable judgment", t.judgment()))
}

fn has_type<'a>(rule: &'static str, t: &'a Theorem) -> Result<(&'a Expr, Type)> {
    match t.judgment() {
        Judgment::HasType(e, ty) => Ok((e, *ty)),
        other => Err(shape(rule, "a formation judgment", other)),
    }
}

fn term<'a>(rule: &'static str, t: &'a Theorem) -> Result<&'a Expr> {
    match has_type(rule, t)? {
        (e, Type::TERM) => Ok(e),
        _ => Err(shape(rule, "a term", t.judgment())),
    }
}

fn formula<'a>(rule: &'static str, t: &'a Theorem) -> Result<&'a Expr> {
    match has_type(rule, t)? {
        (e, Type::FORMULA) => Ok(e),
        _ => Err(shape(rule, "a formula", t.judgment())),
    }
}

/// The front entry of `ctx` and the context below it.
fn front<'a>(rule: &'static str, ctx: &'a Context) -> Result<(&'a ContextEntry, &'a Context)> {
    ctx.split_first()
        .ok_or_else(|| shape(rule, "a non-empty context", "the empty context"))
}

/// The front entry of `ctx`, which must declare a symbol of a type accepted
/// by `accept`.
fn front_decl<'a>(
    rule: &'static str,
    ctx: &'a Context,
    expected: &'static str,
    accept: impl Fn(Type) -> bool,
) -> Result<(&'a Name, Type, &'a Context)> {
    let (entry, rest) = front(rule, ctx)?;
    match entry.kind {
        EntryKind::VarDecl(ty) if accept(ty) => Ok((&entry.name, ty, rest)),
        _ => Err(shape(rule, expected, entry)),
    }
}

#[cfg(test)]
mod tests;
