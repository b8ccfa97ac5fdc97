//! Capture-avoiding substitution and index-shift combinators.
//!
//! All combinators are pure and built on [`Expr::map_leaves`]. Each one
//! states the well-formedness class it expects and the class it returns:
//!
//! - *closed*: well-formed at depth 0;
//! - *one short*: well-formed at depth 1, the single escaping index standing
//!   for a binder the caller is about to add or has just removed;
//! - *k short*: well-formed at depth `k`.

use crate::expr::{Expr, Leaf, Name, VarRef};

impl Expr {
    /// Replace every free term variable `name` by `t`.
    ///
    /// Pre: `t` is closed, so depths elsewhere are unaffected.
    /// Post: same class as `self`.
    pub fn replace_var(&self, name: &str, t: &Expr) -> Expr {
        debug_assert!(t.is_closed());
        self.map_leaves(0, &mut |_, leaf| match leaf {
            Leaf::Var(VarRef::Free(x)) if &**x == name => t.clone(),
            leaf => leaf.into_expr(),
        })
    }

    /// Turn free term variables `name` into the index of a binder placed
    /// directly above `self`.
    ///
    /// Pre: closed. Post: one short.
    pub fn make_bound(&self, name: &str) -> Expr {
        self.map_leaves(0, &mut |n, leaf| match leaf {
            Leaf::Var(VarRef::Free(x)) if &**x == name => Expr::Var(VarRef::Bound(n)),
            leaf => leaf.into_expr(),
        })
    }

    /// Turn `Func` heads naming `name` into the index of a binder placed
    /// directly above `self`.
    ///
    /// Pre: closed. Post: one short.
    pub fn make_bound_func(&self, name: &str) -> Expr {
        self.map_leaves(0, &mut |n, leaf| match leaf {
            Leaf::Func(VarRef::Free(x), args) if &**x == name => {
                Expr::Func(VarRef::Bound(n), args)
            }
            leaf => leaf.into_expr(),
        })
    }

    /// Inverse of [`Expr::make_bound`]: the escaping index becomes the free
    /// name `name`, wherever it occurs.
    ///
    /// Pre: one short. Post: closed.
    pub fn make_free(&self, name: &str) -> Expr {
        let name = Name::from(name);
        self.map_leaves(0, &mut |n, leaf| match leaf.bound() {
            Some(i) if i == n => leaf.with_ref(VarRef::Free(name.clone())),
            Some(i) if i > n => leaf.with_ref(VarRef::Bound(i - 1)),
            _ => leaf.into_expr(),
        })
    }

    /// Substitute `t` for the escaping index, eliminating one binder.
    ///
    /// `t` is shifted by the local depth at each insertion point, so it may
    /// itself be open. Pre: one short. Post: closed (when `t` is).
    pub fn make_replace(&self, t: &Expr) -> Expr {
        self.make_replace_multi(std::slice::from_ref(t))
    }

    /// Shift every escaping index up by `k`, for re-embedding an open
    /// expression under `k` extra binders.
    ///
    /// Pre: d short. Post: d short, relative to a root `k` binders higher.
    pub fn make_gap(&self, k: u32) -> Expr {
        if k == 0 {
            return self.clone();
        }
        self.map_leaves(0, &mut |n, leaf| match leaf.bound() {
            Some(i) if i >= n => leaf.with_ref(VarRef::Bound(i + k)),
            _ => leaf.into_expr(),
        })
    }

    /// Simultaneously substitute `ts` for the `ts.len()` escaping indices.
    ///
    /// The leftmost argument replaces the outermost binder: for the body of
    /// `λx1 … λxk, e`, `ts[0]` replaces `x1` and `ts[k-1]` replaces `xk`.
    /// Each argument is shifted by the local depth at its insertion point.
    ///
    /// Pre: `k` short. Post: closed (when the arguments are).
    pub fn make_replace_multi(&self, ts: &[Expr]) -> Expr {
        let k = ts.len() as u32;
        if k == 0 {
            return self.clone();
        }
        self.map_leaves(0, &mut |n, leaf| match leaf.bound() {
            Some(i) if i >= n && i < n + k => {
                debug_assert!(leaf.is_var(), "application headed by a substituted term binder");
                if leaf.is_var() {
                    ts[(k - 1 - (i - n)) as usize].make_gap(n)
                } else {
                    leaf.into_expr()
                }
            }
            Some(i) if i >= n + k => leaf.with_ref(VarRef::Bound(i - k)),
            _ => leaf.into_expr(),
        })
    }

    /// Substitute the closed lambda `lam` for the escaping function or
    /// predicate binder, beta-reducing each application `F(a1, …, ak)`.
    ///
    /// `lam` must have exactly `arity` leading lambdas; the caller checks
    /// this (see [`Expr::strip_lams`]). Applications whose argument count
    /// differs from `arity` are left untouched.
    ///
    /// Pre: one short, `lam` closed. Post: closed.
    pub fn make_replace_func(&self, lam: &Expr, arity: usize) -> Expr {
        debug_assert!(lam.is_closed());
        let body = lam.strip_lams(arity);
        self.map_leaves(0, &mut |n, leaf| match (leaf.bound(), body) {
            (Some(i), Some(body)) if i == n => match leaf {
                Leaf::Func(_, args) if args.len() == arity => body.make_replace_multi(&args),
                leaf => leaf.into_expr(),
            },
            (Some(i), _) if i > n => leaf.with_ref(VarRef::Bound(i - 1)),
            _ => leaf.into_expr(),
        })
    }
}
