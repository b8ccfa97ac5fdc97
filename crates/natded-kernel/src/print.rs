//! Human-readable printing.
//!
//! Binders print under their stored names, primed (`x'`, `x''`, …) until the
//! name differs from every enclosing binder's printed name and from every
//! free name in the expression. Printing therefore never changes which
//! binder an occurrence appears to refer to. An index escaping the
//! expression by `i` levels prints as `#i`.

use crate::context::{Context, ContextEntry, EntryKind};
use crate::expr::{Expr, Name, Sort, Type, VarRef};
use crate::theorem::{Judgment, Theorem};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

impl Display for Sort {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Term => f.write_str("Term"),
            Sort::Prop => f.write_str("Prop"),
        }
    }
}

fn write_function(f: &mut Formatter<'_>, arity: usize, sort: Sort) -> fmt::Result {
    match arity {
        0 => write!(f, "{sort}"),
        1 => write!(f, "Term → {sort}"),
        k => write!(f, "Term^{k} → {sort}"),
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Type::Function { arity, sort } => write_function(f, arity, sort),
            Type::Schema {
                arg_arity,
                arg_sort,
                arity,
                sort,
            } => {
                f.write_str("(")?;
                write_function(f, arg_arity, arg_sort)?;
                f.write_str(") ⇒ (")?;
                write_function(f, arity, sort)?;
                f.write_str(")")
            }
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut free = BTreeSet::new();
        self.visit_refs(0, &mut |_, r| {
            if let VarRef::Free(x) = r {
                free.insert(x.clone());
            }
        });
        Printer {
            free,
            binders: Vec::new(),
        }
        .expr(f, self)
    }
}

struct Printer {
    free: BTreeSet<Name>,
    /// Printed binder names, innermost last.
    binders: Vec<String>,
}

impl Printer {
    fn expr(&mut self, f: &mut Formatter<'_>, e: &Expr) -> fmt::Result {
        match e {
            Expr::Var(r) => self.var(f, r),
            Expr::Func(r, args) => {
                self.var(f, r)?;
                if args.is_empty() {
                    return Ok(());
                }
                f.write_str("(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.expr(f, a)?;
                }
                f.write_str(")")
            }
            Expr::Schema(r, arg) => {
                self.var(f, r)?;
                f.write_str("[")?;
                self.expr(f, arg)?;
                f.write_str("]")
            }
            Expr::Top => f.write_str("⊤"),
            Expr::Bottom => f.write_str("⊥"),
            Expr::Not(p) => {
                f.write_str("¬")?;
                self.expr(f, p)
            }
            Expr::Eq(a, b) => self.binary(f, a, "=", b),
            Expr::And(a, b) => self.binary(f, a, "∧", b),
            Expr::Or(a, b) => self.binary(f, a, "∨", b),
            Expr::Implies(a, b) => self.binary(f, a, "→", b),
            Expr::Iff(a, b) => self.binary(f, a, "↔", b),
            Expr::Forall(x, p) => self.binder(f, "∀", x, "", p),
            Expr::Exists(x, p) => self.binder(f, "∃", x, "", p),
            Expr::Unique(x, p) => self.binder(f, "∃!", x, "", p),
            Expr::ForallFunc(x, k, _, p) => self.binder(f, "∀", x, &format!("/{k}"), p),
            Expr::Lam(x, p) => self.binder(f, "λ", x, "", p),
        }
    }

    fn var(&self, f: &mut Formatter<'_>, r: &VarRef) -> fmt::Result {
        match r {
            VarRef::Free(x) => f.write_str(x),
            VarRef::Bound(i) => {
                let i = *i as usize;
                match self.binders.len().checked_sub(i + 1) {
                    Some(at) => f.write_str(&self.binders[at]),
                    None => write!(f, "#{}", i - self.binders.len()),
                }
            }
        }
    }

    fn binary(&mut self, f: &mut Formatter<'_>, a: &Expr, op: &str, b: &Expr) -> fmt::Result {
        f.write_str("(")?;
        self.expr(f, a)?;
        write!(f, " {op} ")?;
        self.expr(f, b)?;
        f.write_str(")")
    }

    fn binder(
        &mut self,
        f: &mut Formatter<'_>,
        symbol: &str,
        name: &Name,
        suffix: &str,
        body: &Expr,
    ) -> fmt::Result {
        let mut printed = name.to_string();
        while self.free.contains(printed.as_str()) || self.binders.contains(&printed) {
            printed.push('\'');
        }
        write!(f, "({symbol}{printed}{suffix}, ")?;
        self.binders.push(printed);
        let result = self.expr(f, body);
        self.binders.pop();
        result?;
        f.write_str(")")
    }
}

impl Display for Judgment {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Judgment::HasType(e, ty) => write!(f, "{e} : {ty}"),
            Judgment::Provable(p) => write!(f, "⊢ {p}"),
        }
    }
}

impl Display for ContextEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EntryKind::VarDecl(ty) => write!(f, "{} : {ty}", self.name),
            EntryKind::Hypothesis(p) => write!(f, "{} : {p}", self.name),
        }
    }
}

/// Oldest entry first, comma separated.
impl Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<&ContextEntry> = self.iter().collect();
        entries.reverse();
        for (i, e) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl Display for Theorem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.context().is_empty() {
            write!(f, "{} ", self.context())?;
        }
        match self.judgment() {
            Judgment::HasType(e, ty) => write!(f, "⊢ {e} : {ty}"),
            Judgment::Provable(p) => write!(f, "⊢ {p}"),
        }
    }
}
