//! Expressions, sorts and types.
//!
//! Terms and formulas share one representation. Binders are nameless:
//! a `Bound(i)` occurrence refers to the `i`-th enclosing binder counting
//! outwards from the occurrence, `0` being the innermost. The name stored in
//! a binder node is for display only and is ignored by equality.
//!
//! An expression is *well-formed at depth d* iff every `Bound(i)` found
//! under `n` binders satisfies `i < n + d`. Standalone expressions must be
//! well-formed at depth 0. The combinators in [`crate::subst`] may produce
//! expressions that are *one binder short* (well-formed at depth 1 only);
//! the caller must then wrap them in exactly one binder.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a free variable, function, predicate or schema symbol.
pub type Name = Arc<str>;

/// The two sorts of the logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    /// Individuals.
    Term,
    /// Propositions.
    Prop,
}

/// The type of a declared symbol or of a well-formed expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    /// A first-order symbol taking `arity` terms and producing `sort`.
    ///
    /// Arity 0 with sort `Term` is a term; arity 0 with sort `Prop` is a
    /// formula.
    Function { arity: usize, sort: Sort },

    /// A second-order symbol taking one argument of type
    /// `Function { arity: arg_arity, sort: arg_sort }` and producing
    /// `Function { arity, sort }`.
    Schema {
        arg_arity: usize,
        arg_sort: Sort,
        arity: usize,
        sort: Sort,
    },
}

impl Type {
    /// The type of terms.
    pub const TERM: Type = Type::Function {
        arity: 0,
        sort: Sort::Term,
    };

    /// The type of formulas.
    pub const FORMULA: Type = Type::Function {
        arity: 0,
        sort: Sort::Prop,
    };

    pub fn function(arity: usize, sort: Sort) -> Self {
        Type::Function { arity, sort }
    }

    /// Whether this is the type of a function or predicate symbol, as
    /// opposed to a term variable or a schema.
    pub fn is_func_or_pred(&self) -> bool {
        matches!(self, Type::Function { .. }) && *self != Type::TERM
    }
}

/// Reference to a variable or symbol occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarRef {
    Free(Name),
    Bound(u32),
}

impl VarRef {
    pub fn free(name: &str) -> Self {
        VarRef::Free(Name::from(name))
    }

    /// The de Bruijn index, if this is a bound reference.
    pub fn index(&self) -> Option<u32> {
        match self {
            VarRef::Bound(i) => Some(*i),
            VarRef::Free(_) => None,
        }
    }
}

/// A term or formula.
///
/// Equality is structural and alpha-invariant: binder names are ignored,
/// free names and de Bruijn indices are compared exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Var(VarRef),
    Func(VarRef, Vec<Expr>),
    Schema(VarRef, Arc<Expr>),
    Eq(Arc<Expr>, Arc<Expr>),
    Top,
    Bottom,
    Not(Arc<Expr>),
    And(Arc<Expr>, Arc<Expr>),
    Or(Arc<Expr>, Arc<Expr>),
    Implies(Arc<Expr>, Arc<Expr>),
    Iff(Arc<Expr>, Arc<Expr>),
    Forall(Name, Arc<Expr>),
    Exists(Name, Arc<Expr>),
    Unique(Name, Arc<Expr>),
    /// Binds one function (term sort) or predicate (prop sort) symbol.
    ForallFunc(Name, usize, Sort, Arc<Expr>),
    /// Binds one term variable; raises the body's arity by one.
    Lam(Name, Arc<Expr>),
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        use Expr::*;
        match (self, other) {
            (Var(a), Var(b)) => a == b,
            (Func(f, xs), Func(g, ys)) => f == g && xs == ys,
            (Schema(f, x), Schema(g, y)) => f == g && x == y,
            (Top, Top) | (Bottom, Bottom) => true,
            (Not(a), Not(b)) => a == b,
            (Eq(a1, b1), Eq(a2, b2))
            | (And(a1, b1), And(a2, b2))
            | (Or(a1, b1), Or(a2, b2))
            | (Implies(a1, b1), Implies(a2, b2))
            | (Iff(a1, b1), Iff(a2, b2)) => a1 == a2 && b1 == b2,
            (Forall(_, a), Forall(_, b))
            | (Exists(_, a), Exists(_, b))
            | (Unique(_, a), Unique(_, b))
            | (Lam(_, a), Lam(_, b)) => a == b,
            (ForallFunc(_, k1, s1, a), ForallFunc(_, k2, s2, b)) => {
                k1 == k2 && s1 == s2 && a == b
            }
            _ => false,
        }
    }
}

impl Eq for Expr {}

/// A leaf handed to the callback of [`Expr::map_leaves`].
///
/// Arguments of `Func` and `Schema` leaves have already been rewritten.
pub(crate) enum Leaf<'a> {
    Var(&'a VarRef),
    Func(&'a VarRef, Vec<Expr>),
    Schema(&'a VarRef, Expr),
}

impl Leaf<'_> {
    /// The de Bruijn index of the leaf's head, if bound.
    pub(crate) fn bound(&self) -> Option<u32> {
        match self {
            Leaf::Var(r) | Leaf::Func(r, _) | Leaf::Schema(r, _) => r.index(),
        }
    }

    pub(crate) fn is_var(&self) -> bool {
        matches!(self, Leaf::Var(_))
    }

    /// Rebuild the leaf with a different head.
    pub(crate) fn with_ref(self, r: VarRef) -> Expr {
        match self {
            Leaf::Var(_) => Expr::Var(r),
            Leaf::Func(_, args) => Expr::Func(r, args),
            Leaf::Schema(_, arg) => Expr::Schema(r, Arc::new(arg)),
        }
    }

    /// Rebuild the leaf unchanged.
    pub(crate) fn into_expr(self) -> Expr {
        match self {
            Leaf::Var(r) => Expr::Var(r.clone()),
            Leaf::Func(r, args) => Expr::Func(r.clone(), args),
            Leaf::Schema(r, arg) => Expr::Schema(r.clone(), Arc::new(arg)),
        }
    }
}

impl Expr {
    pub fn free_var(name: &str) -> Self {
        Expr::Var(VarRef::free(name))
    }

    pub fn not(p: Expr) -> Self {
        Expr::Not(Arc::new(p))
    }

    pub fn equals(a: Expr, b: Expr) -> Self {
        Expr::Eq(Arc::new(a), Arc::new(b))
    }

    pub fn and(p: Expr, q: Expr) -> Self {
        Expr::And(Arc::new(p), Arc::new(q))
    }

    pub fn or(p: Expr, q: Expr) -> Self {
        Expr::Or(Arc::new(p), Arc::new(q))
    }

    pub fn implies(p: Expr, q: Expr) -> Self {
        Expr::Implies(Arc::new(p), Arc::new(q))
    }

    pub fn iff(p: Expr, q: Expr) -> Self {
        Expr::Iff(Arc::new(p), Arc::new(q))
    }

    pub fn forall(name: &str, body: Expr) -> Self {
        Expr::Forall(Name::from(name), Arc::new(body))
    }

    pub fn exists(name: &str, body: Expr) -> Self {
        Expr::Exists(Name::from(name), Arc::new(body))
    }

    pub fn lam(name: &str, body: Expr) -> Self {
        Expr::Lam(Name::from(name), Arc::new(body))
    }

    /// The traversal primitive underlying every substitution combinator.
    ///
    /// Walks the expression tracking `n`, the number of binders between the
    /// root and the current node, and rebuilds it with `f` applied at each
    /// `Var`, `Func` and `Schema` leaf. The root is visited at depth `n`.
    pub(crate) fn map_leaves<F>(&self, n: u32, f: &mut F) -> Expr
    where
        F: FnMut(u32, Leaf<'_>) -> Expr,
    {
        fn sub<F>(e: &Arc<Expr>, n: u32, f: &mut F) -> Arc<Expr>
        where
            F: FnMut(u32, Leaf<'_>) -> Expr,
        {
            Arc::new(e.map_leaves(n, f))
        }

        match self {
            Expr::Var(r) => f(n, Leaf::Var(r)),
            Expr::Func(r, args) => {
                let args = args.iter().map(|a| a.map_leaves(n, &mut *f)).collect();
                f(n, Leaf::Func(r, args))
            }
            Expr::Schema(r, arg) => {
                let arg = arg.map_leaves(n, &mut *f);
                f(n, Leaf::Schema(r, arg))
            }
            Expr::Top | Expr::Bottom => self.clone(),
            Expr::Not(a) => Expr::Not(sub(a, n, f)),
            Expr::Eq(a, b) => Expr::Eq(sub(a, n, f), sub(b, n, f)),
            Expr::And(a, b) => Expr::And(sub(a, n, f), sub(b, n, f)),
            Expr::Or(a, b) => Expr::Or(sub(a, n, f), sub(b, n, f)),
            Expr::Implies(a, b) => Expr::Implies(sub(a, n, f), sub(b, n, f)),
            Expr::Iff(a, b) => Expr::Iff(sub(a, n, f), sub(b, n, f)),
            Expr::Forall(x, b) => Expr::Forall(x.clone(), sub(b, n + 1, f)),
            Expr::Exists(x, b) => Expr::Exists(x.clone(), sub(b, n + 1, f)),
            Expr::Unique(x, b) => Expr::Unique(x.clone(), sub(b, n + 1, f)),
            Expr::ForallFunc(x, k, s, b) => Expr::ForallFunc(x.clone(), *k, *s, sub(b, n + 1, f)),
            Expr::Lam(x, b) => Expr::Lam(x.clone(), sub(b, n + 1, f)),
        }
    }

    /// Read-only counterpart of [`Expr::map_leaves`]: calls `f` with the
    /// depth and head of every leaf.
    pub(crate) fn visit_refs<F>(&self, n: u32, f: &mut F)
    where
        F: FnMut(u32, &VarRef),
    {
        match self {
            Expr::Var(r) => f(n, r),
            Expr::Func(r, args) => {
                f(n, r);
                for a in args {
                    a.visit_refs(n, f);
                }
            }
            Expr::Schema(r, arg) => {
                f(n, r);
                arg.visit_refs(n, f);
            }
            Expr::Top | Expr::Bottom => {}
            Expr::Not(a) => a.visit_refs(n, f),
            Expr::Eq(a, b)
            | Expr::And(a, b)
            | Expr::Or(a, b)
            | Expr::Implies(a, b)
            | Expr::Iff(a, b) => {
                a.visit_refs(n, f);
                b.visit_refs(n, f);
            }
            Expr::Forall(_, b)
            | Expr::Exists(_, b)
            | Expr::Unique(_, b)
            | Expr::ForallFunc(_, _, _, b)
            | Expr::Lam(_, b) => b.visit_refs(n + 1, f),
        }
    }

    /// Whether the expression is well-formed under `d` enclosing binders,
    /// i.e. no bound index escapes more than `d` levels.
    pub fn is_closed_at(&self, d: u32) -> bool {
        let mut ok = true;
        self.visit_refs(0, &mut |n, r| {
            if let VarRef::Bound(i) = r {
                ok &= *i < n + d;
            }
        });
        ok
    }

    /// Whether no bound index escapes the expression.
    pub fn is_closed(&self) -> bool {
        self.is_closed_at(0)
    }

    /// Whether `name` occurs free anywhere in the expression.
    pub fn mentions(&self, name: &str) -> bool {
        let mut found = false;
        self.visit_refs(0, &mut |_, r| {
            if let VarRef::Free(x) = r {
                found |= &**x == name;
            }
        });
        found
    }

    /// The body under exactly `k` leading lambdas, or `None` if the
    /// expression has fewer.
    pub fn strip_lams(&self, k: usize) -> Option<&Expr> {
        let mut e = self;
        for _ in 0..k {
            match e {
                Expr::Lam(_, body) => e = body,
                _ => return None,
            }
        }
        Some(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(i: u32) -> Expr {
        Expr::Var(VarRef::Bound(i))
    }

    #[test]
    fn binder_names_do_not_matter() {
        let body = Expr::Func(VarRef::free("P"), vec![b(0)]);
        assert_eq!(Expr::forall("x", body.clone()), Expr::forall("y", body.clone()));
        assert_eq!(Expr::lam("x", body.clone()), Expr::lam("z", body));
    }

    #[test]
    fn free_names_and_indices_matter() {
        assert_ne!(Expr::free_var("x"), Expr::free_var("y"));
        assert_ne!(Expr::forall("x", b(0)), Expr::exists("x", b(0)));
        let p = Expr::Func(VarRef::free("P"), vec![]);
        assert_ne!(Expr::and(p.clone(), Expr::Top), Expr::and(Expr::Top, p));
    }

    #[test]
    fn closedness_tracks_binder_depth() {
        let body = Expr::forall("y", Expr::equals(b(0), b(1)));
        assert!(!body.is_closed());
        assert!(body.is_closed_at(1));
        assert!(Expr::forall("x", body).is_closed());
    }

    #[test]
    fn strip_lams_requires_enough_binders() {
        let e = Expr::lam("x", Expr::lam("y", Expr::equals(b(1), b(0))));
        assert_eq!(e.strip_lams(2), Some(&Expr::equals(b(1), b(0))));
        assert!(e.strip_lams(3).is_none());
        assert_eq!(e.strip_lams(0), Some(&e));
    }

    #[test]
    fn func_or_pred_excludes_terms() {
        assert!(!Type::TERM.is_func_or_pred());
        assert!(Type::FORMULA.is_func_or_pred());
        assert!(Type::function(2, Sort::Term).is_func_or_pred());
    }
}
