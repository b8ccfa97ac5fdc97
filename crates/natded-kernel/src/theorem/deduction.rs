//! Natural-deduction rules: judgments `Provable(p)`.
//!
//! Each rule pattern-matches the shape of its premises, requires premises to
//! share one context, and compares shared subformulas up to binder names.
//! Instantiation rules never search: the caller supplies the exact witness
//! and the kernel checks the substitution syntactically.

use super::*;
use crate::expr::{Sort, VarRef};

impl Theorem {
    /// `Γ ⊢ p` for a hypothesis `h : p` in `Γ` (the nearest entry named `h`).
    pub fn assumption(ctx: &Context, name: &str) -> Result<Theorem> {
        const RULE: &str = "assumption";
        let entry = ctx.lookup(name).ok_or_else(|| KernelError::UnboundName {
            rule: RULE,
            name: Name::from(name),
        })?;
        match &entry.kind {
            EntryKind::Hypothesis(p) => Ok(Theorem::proved(ctx, p.clone())),
            EntryKind::VarDecl(_) => Err(shape(RULE, "a hypothesis", entry)),
        }
    }

    // ─── Conjunction ───────────────────────────────────────────────────────

    pub fn and_intro(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        const RULE: &str = "and_intro";
        same_context(RULE, p.context(), q.context())?;
        let e = Expr::and(provable(RULE, p)?.clone(), provable(RULE, q)?.clone());
        Ok(p.derive(e))
    }

    /// `p ∧ q` gives `p`.
    pub fn and_left(t: &Theorem) -> Result<Theorem> {
        match provable("and_left", t)? {
            Expr::And(p, _) => Ok(t.derive(Expr::clone(p))),
            other => Err(shape("and_left", "a conjunction", other)),
        }
    }

    /// `p ∧ q` gives `q`.
    pub fn and_right(t: &Theorem) -> Result<Theorem> {
        match provable("and_right", t)? {
            Expr::And(_, q) => Ok(t.derive(Expr::clone(q))),
            other => Err(shape("and_right", "a conjunction", other)),
        }
    }

    // ─── Disjunction ───────────────────────────────────────────────────────

    /// `p` and a well-formed `q` give `p ∨ q`.
    pub fn or_left(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        const RULE: &str = "or_left";
        same_context(RULE, p.context(), q.context())?;
        let e = Expr::or(provable(RULE, p)?.clone(), formula(RULE, q)?.clone());
        Ok(p.derive(e))
    }

    /// A well-formed `p` and `q` give `p ∨ q`.
    pub fn or_right(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        const RULE: &str = "or_right";
        same_context(RULE, p.context(), q.context())?;
        let e = Expr::or(formula(RULE, p)?.clone(), provable(RULE, q)?.clone());
        Ok(q.derive(e))
    }

    /// `p ∨ q`, `p → r` and `q → r` give `r`.
    pub fn or_elim(or: &Theorem, left: &Theorem, right: &Theorem) -> Result<Theorem> {
        const RULE: &str = "or_elim";
        same_context(RULE, or.context(), left.context())?;
        same_context(RULE, or.context(), right.context())?;
        let Expr::Or(p, q) = provable(RULE, or)? else {
            return Err(shape(RULE, "a disjunction", or.judgment()));
        };
        let (p2, r) = implication(RULE, left)?;
        let (q2, r2) = implication(RULE, right)?;
        same_formula(RULE, p, p2)?;
        same_formula(RULE, q, q2)?;
        same_formula(RULE, r, r2)?;
        Ok(or.derive(r.clone()))
    }

    // ─── Implication ───────────────────────────────────────────────────────

    /// Discharge the front hypothesis `h : p`: `Γ, h : p ⊢ q` gives
    /// `Γ ⊢ p → q`.
    pub fn implies_intro(t: &Theorem) -> Result<Theorem> {
        const RULE: &str = "implies_intro";
        let q = provable(RULE, t)?;
        let (entry, rest) = front(RULE, t.context())?;
        let EntryKind::Hypothesis(p) = &entry.kind else {
            return Err(shape(RULE, "a hypothesis in front of the context", entry));
        };
        Ok(Theorem::proved(rest, Expr::implies(p.clone(), q.clone())))
    }

    /// `p → q` and `p` give `q`.
    pub fn implies_elim(imp: &Theorem, arg: &Theorem) -> Result<Theorem> {
        const RULE: &str = "implies_elim";
        same_context(RULE, imp.context(), arg.context())?;
        let (p, q) = implication(RULE, imp)?;
        same_formula(RULE, p, provable(RULE, arg)?)?;
        Ok(imp.derive(q.clone()))
    }

    // ─── Negation, truth, falsity ──────────────────────────────────────────

    /// `p → ⊥` gives `¬p`.
    pub fn not_intro(t: &Theorem) -> Result<Theorem> {
        const RULE: &str = "not_intro";
        let (p, bottom) = implication(RULE, t)?;
        same_formula(RULE, &Expr::Bottom, bottom)?;
        Ok(t.derive(Expr::not(p.clone())))
    }

    /// `¬p` and `p` give `⊥`.
    pub fn not_elim(not: &Theorem, arg: &Theorem) -> Result<Theorem> {
        const RULE: &str = "not_elim";
        same_context(RULE, not.context(), arg.context())?;
        let Expr::Not(p) = provable(RULE, not)? else {
            return Err(shape(RULE, "a negation", not.judgment()));
        };
        same_formula(RULE, p, provable(RULE, arg)?)?;
        Ok(not.derive(Expr::Bottom))
    }

    pub fn true_intro(ctx: &Context) -> Theorem {
        Theorem::proved(ctx, Expr::Top)
    }

    /// `⊥` and a well-formed `p` give `p`.
    pub fn false_elim(bottom: &Theorem, goal: &Theorem) -> Result<Theorem> {
        const RULE: &str = "false_elim";
        same_context(RULE, bottom.context(), goal.context())?;
        same_formula(RULE, &Expr::Bottom, provable(RULE, bottom)?)?;
        Ok(bottom.derive(formula(RULE, goal)?.clone()))
    }

    /// Reductio ad absurdum: `¬p → ⊥` gives `p`.
    pub fn raa(t: &Theorem) -> Result<Theorem> {
        const RULE: &str = "raa";
        let (not_p, bottom) = implication(RULE, t)?;
        same_formula(RULE, &Expr::Bottom, bottom)?;
        let Expr::Not(p) = not_p else {
            return Err(shape(RULE, "a negated antecedent", not_p));
        };
        Ok(t.derive(Expr::clone(p)))
    }

    // ─── Biconditional ─────────────────────────────────────────────────────

    /// `p → q` and `q → p` give `p ↔ q`.
    pub fn iff_intro(forward: &Theorem, backward: &Theorem) -> Result<Theorem> {
        const RULE: &str = "iff_intro";
        same_context(RULE, forward.context(), backward.context())?;
        let (p, q) = implication(RULE, forward)?;
        let (q2, p2) = implication(RULE, backward)?;
        same_formula(RULE, p, p2)?;
        same_formula(RULE, q, q2)?;
        Ok(forward.derive(Expr::iff(p.clone(), q.clone())))
    }

    /// `p ↔ q` gives `p → q`.
    pub fn iff_left(t: &Theorem) -> Result<Theorem> {
        match provable("iff_left", t)? {
            Expr::Iff(p, q) => Ok(t.derive(Expr::implies(Expr::clone(p), Expr::clone(q)))),
            other => Err(shape("iff_left", "a biconditional", other)),
        }
    }

    /// `p ↔ q` gives `q → p`.
    pub fn iff_right(t: &Theorem) -> Result<Theorem> {
        match provable("iff_right", t)? {
            Expr::Iff(p, q) => Ok(t.derive(Expr::implies(Expr::clone(q), Expr::clone(p)))),
            other => Err(shape("iff_right", "a biconditional", other)),
        }
    }

    // ─── Equality ──────────────────────────────────────────────────────────

    /// A well-formed term `a` gives `a = a`.
    pub fn eq_intro(t: &Theorem) -> Result<Theorem> {
        let a = term("eq_intro", t)?;
        Ok(t.derive(Expr::equals(a.clone(), a.clone())))
    }

    /// Leibniz substitution. From the motive `λx, p`, `a = b` and a proof of
    /// `p[a/x]`, derive `p[b/x]`.
    pub fn eq_elim(motive: &Theorem, eq: &Theorem, of: &Theorem) -> Result<Theorem> {
        const RULE: &str = "eq_elim";
        same_context(RULE, motive.context(), eq.context())?;
        same_context(RULE, motive.context(), of.context())?;
        let p = unary_motive(RULE, motive)?;
        let Expr::Eq(a, b) = provable(RULE, eq)? else {
            return Err(shape(RULE, "an equation", eq.judgment()));
        };
        same_formula(RULE, &p.make_replace(a), provable(RULE, of)?)?;
        Ok(of.derive(p.make_replace(b)))
    }

    // ─── First-order quantifiers ───────────────────────────────────────────

    /// Generalize over the front term variable `x`: `Γ, x ⊢ p` gives
    /// `Γ ⊢ ∀x, p`.
    pub fn forall_intro(t: &Theorem) -> Result<Theorem> {
        const RULE: &str = "forall_intro";
        let p = provable(RULE, t)?;
        let (name, _, rest) =
            front_decl(RULE, t.context(), "a term variable declaration", |ty| ty == Type::TERM)?;
        Ok(Theorem::proved(
            rest,
            Expr::Forall(name.clone(), Arc::new(p.make_bound(name))),
        ))
    }

    /// `∀x, p` and a well-formed term `a` give `p[a/x]`.
    pub fn forall_elim(t: &Theorem, a: &Theorem) -> Result<Theorem> {
        const RULE: &str = "forall_elim";
        same_context(RULE, t.context(), a.context())?;
        let Expr::Forall(_, p) = provable(RULE, t)? else {
            return Err(shape(RULE, "a universal", t.judgment()));
        };
        Ok(t.derive(p.make_replace(term(RULE, a)?)))
    }

    /// From the motive `λx, p`, a witness `a` and a proof of `p[a/x]`,
    /// derive `∃x, p`.
    pub fn exists_intro(motive: &Theorem, witness: &Theorem, of: &Theorem) -> Result<Theorem> {
        const RULE: &str = "exists_intro";
        same_context(RULE, motive.context(), witness.context())?;
        same_context(RULE, motive.context(), of.context())?;
        let Expr::Lam(x, _) = has_type(RULE, motive)?.0 else {
            return Err(shape(RULE, "a lambda motive", motive.judgment()));
        };
        let p = unary_motive(RULE, motive)?;
        let a = term(RULE, witness)?;
        same_formula(RULE, &p.make_replace(a), provable(RULE, of)?)?;
        Ok(of.derive(Expr::Exists(x.clone(), Arc::new(p.clone()))))
    }

    /// `∃x, p` and `∀y, p[y/x] → q`, with `y` not free in `q`, give `q`.
    pub fn exists_elim(ex: &Theorem, all: &Theorem) -> Result<Theorem> {
        const RULE: &str = "exists_elim";
        same_context(RULE, ex.context(), all.context())?;
        let Expr::Exists(_, p) = provable(RULE, ex)? else {
            return Err(shape(RULE, "an existential", ex.judgment()));
        };
        let Expr::Forall(_, body) = provable(RULE, all)? else {
            return Err(shape(RULE, "a universal", all.judgment()));
        };
        let Expr::Implies(p2, q) = &**body else {
            return Err(shape(RULE, "a universal implication", all.judgment()));
        };
        same_formula(RULE, p, p2)?;
        if !q.is_closed() {
            return Err(shape(RULE, "a conclusion independent of the witness", all.judgment()));
        }
        Ok(ex.derive(Expr::clone(q)))
    }

    /// `∃x, p` and `∀y ∀z, p[y] ∧ p[z] → y = z` give `∃!x, p`.
    pub fn unique_intro(ex: &Theorem, unique: &Theorem) -> Result<Theorem> {
        const RULE: &str = "unique_intro";
        same_context(RULE, ex.context(), unique.context())?;
        let Expr::Exists(x, p) = provable(RULE, ex)? else {
            return Err(shape(RULE, "an existential", ex.judgment()));
        };
        same_formula(RULE, &uniqueness(x, p), provable(RULE, unique)?)?;
        Ok(ex.derive(Expr::Unique(x.clone(), p.clone())))
    }

    /// `∃!x, p` gives `∃x, p`.
    pub fn unique_left(t: &Theorem) -> Result<Theorem> {
        match provable("unique_left", t)? {
            Expr::Unique(x, p) => Ok(t.derive(Expr::Exists(x.clone(), p.clone()))),
            other => Err(shape("unique_left", "a unique existential", other)),
        }
    }

    /// `∃!x, p` gives `∀y ∀z, p[y] ∧ p[z] → y = z`.
    pub fn unique_right(t: &Theorem) -> Result<Theorem> {
        match provable("unique_right", t)? {
            Expr::Unique(x, p) => Ok(t.derive(uniqueness(x, p))),
            other => Err(shape("unique_right", "a unique existential", other)),
        }
    }

    // ─── Second-order quantifiers ──────────────────────────────────────────

    /// Generalize over the front function symbol `f` (term sort, positive
    /// arity): `Γ, f ⊢ p` gives `Γ ⊢ ∀f, p`.
    pub fn forall_func_intro(t: &Theorem) -> Result<Theorem> {
        Theorem::forall_symbol_intro("forall_func_intro", t, Sort::Term)
    }

    /// Generalize over the front predicate symbol `P` (prop sort, any arity).
    pub fn forall_pred_intro(t: &Theorem) -> Result<Theorem> {
        Theorem::forall_symbol_intro("forall_pred_intro", t, Sort::Prop)
    }

    /// `∀f/k, p` and a lambda `λx1 … λxk, e : (k, Term)` give `p[λ…/f]`,
    /// beta-reduced.
    pub fn forall_func_elim(t: &Theorem, lam: &Theorem) -> Result<Theorem> {
        Theorem::forall_symbol_elim("forall_func_elim", t, lam, Sort::Term)
    }

    /// `∀P/k, p` and a lambda `λx1 … λxk, q : (k, Prop)` give `p[λ…/P]`,
    /// beta-reduced.
    pub fn forall_pred_elim(t: &Theorem, lam: &Theorem) -> Result<Theorem> {
        Theorem::forall_symbol_elim("forall_pred_elim", t, lam, Sort::Prop)
    }

    fn forall_symbol_intro(rule: &'static str, t: &Theorem, sort: Sort) -> Result<Theorem> {
        let p = provable(rule, t)?;
        let expected = match sort {
            Sort::Term => "a function symbol declaration",
            Sort::Prop => "a predicate symbol declaration",
        };
        let (name, ty, rest) = front_decl(rule, t.context(), expected, |ty| {
            ty.is_func_or_pred() && matches!(ty, Type::Function { sort: s, .. } if s == sort)
        })?;
        let Type::Function { arity, .. } = ty else {
            return Err(shape(rule, expected, ty));
        };
        Ok(Theorem::proved(
            rest,
            Expr::ForallFunc(name.clone(), arity, sort, Arc::new(p.make_bound_func(name))),
        ))
    }

    fn forall_symbol_elim(
        rule: &'static str,
        t: &Theorem,
        lam: &Theorem,
        sort: Sort,
    ) -> Result<Theorem> {
        same_context(rule, t.context(), lam.context())?;
        let Expr::ForallFunc(name, arity, s, p) = provable(rule, t)? else {
            return Err(shape(rule, "a second-order universal", t.judgment()));
        };
        if *s != sort {
            return Err(shape(rule, "a universal of the matching sort", t.judgment()));
        }
        let (e, ty) = has_type(rule, lam)?;
        if ty != Type::function(*arity, sort) {
            return Err(KernelError::ArityMismatch {
                rule,
                name: name.clone(),
                expected: Type::function(*arity, sort).to_string(),
                found: type_arity(ty),
            });
        }
        if e.strip_lams(*arity).is_none() {
            return Err(shape(rule, "an instantiation by lambda abstraction", e));
        }
        Ok(t.derive(p.make_replace_func(e, *arity)))
    }

    fn proved(ctx: &Context, p: Expr) -> Theorem {
        Theorem::mk_(ctx.clone(), Judgment::Provable(p))
    }

    /// A provable judgment in the same context as `self`.
    fn derive(&self, p: Expr) -> Theorem {
        Theorem::proved(self.context(), p)
    }
}

fn implication<'a>(rule: &'static str, t: &'a Theorem) -> Result<(&'a Expr, &'a Expr)> {
    match provable(rule, t)? {
        Expr::Implies(p, q) => Ok((&**p, &**q)),
        other => Err(shape(rule, "an implication", other)),
    }
}

/// The body `p` of a motive `λx, p : (1, Prop)`, one binder short.
fn unary_motive<'a>(rule: &'static str, motive: &'a Theorem) -> Result<&'a Expr> {
    match has_type(rule, motive)? {
        (Expr::Lam(_, p), ty) if ty == Type::function(1, Sort::Prop) => Ok(&**p),
        _ => Err(shape(rule, "a unary predicate lambda", motive.judgment())),
    }
}

/// `∀y ∀z, p[y] ∧ p[z] → y = z` for the one-short body `p` of `∃x, p`.
///
/// Under the two new binders `z` is index 0 and `y` index 1, so `p` itself
/// already speaks about `z` and `p` shifted by one speaks about `y`.
fn uniqueness(x: &Name, p: &Expr) -> Expr {
    let y = Expr::Var(VarRef::Bound(1));
    let z = Expr::Var(VarRef::Bound(0));
    let body = Expr::implies(Expr::and(p.make_gap(1), p.clone()), Expr::equals(y, z));
    Expr::Forall(x.clone(), Arc::new(Expr::Forall(x.clone(), Arc::new(body))))
}

fn type_arity(ty: Type) -> i64 {
    match ty {
        Type::Function { arity, .. } | Type::Schema { arity, .. } => arity as i64,
    }
}
