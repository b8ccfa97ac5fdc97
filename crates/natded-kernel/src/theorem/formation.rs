//! Formation rules: judgments `HasType(e, T)`.
//!
//! The expression builder calls only these rules, so every expression that
//! reaches a deduction rule has been checked against its context.

use super::*;
use crate::expr::VarRef;

impl Theorem {
    /// `x : Term` for a declared term variable `x`.
    pub fn var_mk(ctx: &Context, name: &str) -> Result<Theorem> {
        const RULE: &str = "var_mk";
        let entry = lookup(RULE, ctx, name)?;
        match entry.kind {
            EntryKind::VarDecl(Type::TERM) => Ok(Theorem::mk_(
                ctx.clone(),
                Judgment::HasType(Expr::Var(VarRef::Free(entry.name.clone())), Type::TERM),
            )),
            _ => Err(shape(RULE, "a term variable", entry)),
        }
    }

    /// `f(a1, …, ak) : Term` or `P(a1, …, ak) : Formula` for a declared
    /// function or predicate symbol of arity `k`.
    pub fn func_mk(ctx: &Context, name: &str, args: &[Theorem]) -> Result<Theorem> {
        const RULE: &str = "func_mk";
        let entry = lookup(RULE, ctx, name)?;
        let (arity, sort) = match entry.kind {
            EntryKind::VarDecl(ty @ Type::Function { arity, sort }) if ty.is_func_or_pred() => {
                (arity, sort)
            }
            _ => return Err(shape(RULE, "a function or predicate symbol", entry)),
        };
        if args.len() != arity {
            return Err(KernelError::ArityMismatch {
                rule: RULE,
                name: entry.name.clone(),
                expected: arity.to_string(),
                found: args.len() as i64,
            });
        }
        let mut exprs = Vec::with_capacity(args.len());
        for arg in args {
            same_context(RULE, ctx, arg.context())?;
            exprs.push(term(RULE, arg)?.clone());
        }
        Ok(Theorem::mk_(
            ctx.clone(),
            Judgment::HasType(
                Expr::Func(VarRef::Free(entry.name.clone()), exprs),
                Type::function(0, sort),
            ),
        ))
    }

    /// `S[e] : (k2, s2)` for a declared schema `S : (k1, s1) ⇒ (k2, s2)` and
    /// an argument `e : (k1, s1)`.
    pub fn schema_mk(ctx: &Context, name: &str, arg: &Theorem) -> Result<Theorem> {
        const RULE: &str = "schema_mk";
        let entry = lookup(RULE, ctx, name)?;
        let EntryKind::VarDecl(Type::Schema {
            arg_arity,
            arg_sort,
            arity,
            sort,
        }) = entry.kind
        else {
            return Err(shape(RULE, "a schema symbol", entry));
        };
        same_context(RULE, ctx, arg.context())?;
        let (e, ty) = has_type(RULE, arg)?;
        if ty != Type::function(arg_arity, arg_sort) {
            return Err(shape(RULE, "an argument matching the schema's domain", arg.judgment()));
        }
        Ok(Theorem::mk_(
            ctx.clone(),
            Judgment::HasType(
                Expr::Schema(VarRef::Free(entry.name.clone()), Arc::new(e.clone())),
                Type::function(arity, sort),
            ),
        ))
    }

    /// `a = b : Formula`.
    pub fn eq_mk(a: &Theorem, b: &Theorem) -> Result<Theorem> {
        const RULE: &str = "eq_mk";
        same_context(RULE, a.context(), b.context())?;
        let e = Expr::equals(term(RULE, a)?.clone(), term(RULE, b)?.clone());
        Ok(a.formed(e))
    }

    /// `⊤ : Formula`.
    pub fn top_mk(ctx: &Context) -> Theorem {
        Theorem::mk_(ctx.clone(), Judgment::HasType(Expr::Top, Type::FORMULA))
    }

    /// `⊥ : Formula`.
    pub fn bottom_mk(ctx: &Context) -> Theorem {
        Theorem::mk_(ctx.clone(), Judgment::HasType(Expr::Bottom, Type::FORMULA))
    }

    /// `¬p : Formula`.
    pub fn not_mk(p: &Theorem) -> Result<Theorem> {
        let e = Expr::not(formula("not_mk", p)?.clone());
        Ok(p.formed(e))
    }

    pub fn and_mk(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        Theorem::connective("and_mk", p, q, Expr::and)
    }

    pub fn or_mk(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        Theorem::connective("or_mk", p, q, Expr::or)
    }

    pub fn implies_mk(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        Theorem::connective("implies_mk", p, q, Expr::implies)
    }

    pub fn iff_mk(p: &Theorem, q: &Theorem) -> Result<Theorem> {
        Theorem::connective("iff_mk", p, q, Expr::iff)
    }

    /// `∀x, p : Formula` from `p : Formula` under a context whose front
    /// entry declares the term variable `x`. Pops that entry.
    pub fn forall_mk(body: &Theorem) -> Result<Theorem> {
        Theorem::quantifier("forall_mk", body, Expr::Forall)
    }

    /// `∃x, p : Formula`; see [`Theorem::forall_mk`].
    pub fn exists_mk(body: &Theorem) -> Result<Theorem> {
        Theorem::quantifier("exists_mk", body, Expr::Exists)
    }

    /// `∃!x, p : Formula`; see [`Theorem::forall_mk`].
    pub fn unique_mk(body: &Theorem) -> Result<Theorem> {
        Theorem::quantifier("unique_mk", body, Expr::Unique)
    }

    /// `∀F, p : Formula` from `p : Formula` under a context whose front
    /// entry declares the function or predicate symbol `F`. Pops that entry.
    pub fn forall_func_mk(body: &Theorem) -> Result<Theorem> {
        const RULE: &str = "forall_func_mk";
        let p = formula(RULE, body)?;
        let (name, ty, rest) = front_decl(
            RULE,
            body.context(),
            "a function or predicate declaration",
            |ty| ty.is_func_or_pred(),
        )?;
        let Type::Function { arity, sort } = ty else {
            return Err(shape(RULE, "a function or predicate declaration", ty));
        };
        let e = Expr::ForallFunc(name.clone(), arity, sort, Arc::new(p.make_bound_func(name)));
        Ok(Theorem::mk_(
            rest.clone(),
            Judgment::HasType(e, Type::FORMULA),
        ))
    }

    /// `λx, e : (k+1, s)` from `e : (k, s)` under a context whose front
    /// entry declares the term variable `x`. Pops that entry.
    pub fn lam_mk(body: &Theorem) -> Result<Theorem> {
        const RULE: &str = "lam_mk";
        let (e, ty) = has_type(RULE, body)?;
        let Type::Function { arity, sort } = ty else {
            return Err(shape(RULE, "a function-typed body", body.judgment()));
        };
        let (name, _, rest) = front_decl(RULE, body.context(), "a term variable declaration", |ty| {
            ty == Type::TERM
        })?;
        Ok(Theorem::mk_(
            rest.clone(),
            Judgment::HasType(
                Expr::Lam(name.clone(), Arc::new(e.make_bound(name))),
                Type::function(arity + 1, sort),
            ),
        ))
    }

    fn formed(&self, e: Expr) -> Theorem {
        Theorem::mk_(self.context().clone(), Judgment::HasType(e, Type::FORMULA))
    }

    fn connective(
        rule: &'static str,
        p: &Theorem,
        q: &Theorem,
        mk: fn(Expr, Expr) -> Expr,
    ) -> Result<Theorem> {
        same_context(rule, p.context(), q.context())?;
        let e = mk(formula(rule, p)?.clone(), formula(rule, q)?.clone());
        Ok(p.formed(e))
    }

    fn quantifier(
        rule: &'static str,
        body: &Theorem,
        mk: fn(Name, Arc<Expr>) -> Expr,
    ) -> Result<Theorem> {
        let p = formula(rule, body)?;
        let (name, _, rest) = front_decl(rule, body.context(), "a term variable declaration", |ty| {
            ty == Type::TERM
        })?;
        Ok(Theorem::mk_(
            rest.clone(),
            Judgment::HasType(mk(name.clone(), Arc::new(p.make_bound(name))), Type::FORMULA),
        ))
    }
}

fn lookup<'a>(rule: &'static str, ctx: &'a Context, name: &str) -> Result<&'a ContextEntry> {
    ctx.lookup(name).ok_or_else(|| KernelError::UnboundName {
        rule,
        name: Name::from(name),
    })
}
