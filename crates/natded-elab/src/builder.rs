//! Expression builder: surface syntax to formation theorems.
//!
//! Every node is produced by the matching kernel formation rule. A binder
//! extends the context with a declaration, the body is built under the
//! extended context, and the matching context-changing rule (`forall_mk`,
//! `lam_mk`, …) pops it again, so bound indices are only ever created by the
//! kernel.
//!
//! Declarations may not shadow, so a binder whose surface name is already
//! present in the context is declared under a primed name (`x'`, `x''`, …)
//! and occurrences in its body are renamed accordingly.

use natded_kernel::{Context, EntryKind, Judgment, KernelError, Result, Sort, Theorem, Type};

use crate::syntax::Syntax;

/// Build the formation theorem of `syntax` under `ctx`.
pub fn build(ctx: &Context, syntax: &Syntax) -> Result<Theorem> {
    Builder::default().build(ctx, syntax)
}

/// Build `syntax` and require it to be a formula.
pub fn build_formula(ctx: &Context, syntax: &Syntax) -> Result<Theorem> {
    build_typed(ctx, syntax, Type::FORMULA, "a formula")
}

/// Build `syntax` and require it to be a term.
pub fn build_term(ctx: &Context, syntax: &Syntax) -> Result<Theorem> {
    build_typed(ctx, syntax, Type::TERM, "a term")
}

fn build_typed(ctx: &Context, syntax: &Syntax, ty: Type, expected: &'static str) -> Result<Theorem> {
    let thm = build(ctx, syntax)?;
    match thm.judgment() {
        Judgment::HasType(_, found) if *found == ty => Ok(thm),
        other => Err(KernelError::ShapeMismatch {
            rule: "build",
            expected,
            found: other.to_string(),
        }),
    }
}

/// A name not yet present in `ctx`, derived from `name` by priming.
pub fn fresh_name(ctx: &Context, name: &str) -> String {
    let mut fresh = name.to_string();
    while ctx.lookup(&fresh).is_some() {
        fresh.push('\'');
    }
    fresh
}

#[derive(Default)]
struct Builder {
    /// Surface binder names and the context names they were declared as,
    /// innermost last.
    renames: Vec<(String, String)>,
}

impl Builder {
    /// The context name a surface reference denotes.
    ///
    /// Names declared for primed binders are hidden from the surface: `x'`
    /// never reaches the binder that `x` was primed to.
    fn resolve<'a>(&'a self, name: &'a str) -> Result<&'a str> {
        if let Some((_, declared)) = self.renames.iter().rev().find(|(surface, _)| surface == name) {
            return Ok(declared.as_str());
        }
        if self.renames.iter().any(|(_, declared)| declared == name) {
            return Err(KernelError::UnboundName {
                rule: "build",
                name: name.into(),
            });
        }
        Ok(name)
    }

    fn build(&mut self, ctx: &Context, syntax: &Syntax) -> Result<Theorem> {
        match syntax {
            Syntax::Var { name } => {
                let name = self.resolve(name)?;
                match ctx.lookup(name).map(|e| &e.kind) {
                    Some(EntryKind::VarDecl(ty)) if ty.is_func_or_pred() => {
                        Theorem::func_mk(ctx, name, &[])
                    }
                    _ => Theorem::var_mk(ctx, name),
                }
            }
            Syntax::App { head, args } => {
                let args = args
                    .iter()
                    .map(|a| self.build(ctx, a))
                    .collect::<Result<Vec<_>>>()?;
                Theorem::func_mk(ctx, self.resolve(head)?, &args)
            }
            Syntax::Schema { head, arg } => {
                let arg = self.build(ctx, arg)?;
                Theorem::schema_mk(ctx, self.resolve(head)?, &arg)
            }
            Syntax::Eq { lhs, rhs } => Theorem::eq_mk(&self.build(ctx, lhs)?, &self.build(ctx, rhs)?),
            Syntax::True => Ok(Theorem::top_mk(ctx)),
            Syntax::False => Ok(Theorem::bottom_mk(ctx)),
            Syntax::Not { arg } => Theorem::not_mk(&self.build(ctx, arg)?),
            Syntax::And { lhs, rhs } => Theorem::and_mk(&self.build(ctx, lhs)?, &self.build(ctx, rhs)?),
            Syntax::Or { lhs, rhs } => Theorem::or_mk(&self.build(ctx, lhs)?, &self.build(ctx, rhs)?),
            Syntax::Implies { lhs, rhs } => {
                Theorem::implies_mk(&self.build(ctx, lhs)?, &self.build(ctx, rhs)?)
            }
            Syntax::Iff { lhs, rhs } => Theorem::iff_mk(&self.build(ctx, lhs)?, &self.build(ctx, rhs)?),
            Syntax::Forall { var, body } => {
                let body = self.under_var(ctx, var, body)?;
                Theorem::forall_mk(&body)
            }
            Syntax::Exists { var, body } => {
                let body = self.under_var(ctx, var, body)?;
                Theorem::exists_mk(&body)
            }
            Syntax::Unique { var, body } => {
                let body = self.under_var(ctx, var, body)?;
                Theorem::unique_mk(&body)
            }
            Syntax::ForallFunc { name, arity, body } => {
                let body = self.under_func(ctx, name, *arity, Sort::Term, body)?;
                Theorem::forall_func_mk(&body)
            }
            Syntax::ForallPred { name, arity, body } => {
                let body = self.under_func(ctx, name, *arity, Sort::Prop, body)?;
                Theorem::forall_func_mk(&body)
            }
            Syntax::Lam { var, body } => {
                let body = self.under_var(ctx, var, body)?;
                Theorem::lam_mk(&body)
            }
        }
    }

    fn under_var(&mut self, ctx: &Context, var: &str, body: &Syntax) -> Result<Theorem> {
        let declared = fresh_name(ctx, var);
        let inner = ctx.extend_var(&declared)?;
        self.scoped(&inner, var, declared, body)
    }

    fn under_func(
        &mut self,
        ctx: &Context,
        name: &str,
        arity: i64,
        sort: Sort,
        body: &Syntax,
    ) -> Result<Theorem> {
        let declared = fresh_name(ctx, name);
        let inner = ctx.extend_func(&declared, arity, sort)?;
        self.scoped(&inner, name, declared, body)
    }

    fn scoped(&mut self, inner: &Context, surface: &str, declared: String, body: &Syntax) -> Result<Theorem> {
        self.renames.push((surface.to_string(), declared));
        let result = self.build(inner, body);
        self.renames.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use natded_kernel::Expr;

    fn base() -> Context {
        Context::empty()
            .extend_func("L", 2, Sort::Prop)
            .unwrap()
            .extend_func("f", 1, Sort::Term)
            .unwrap()
            .extend_func("P", 0, Sort::Prop)
            .unwrap()
            .extend_var("x")
            .unwrap()
    }

    fn formula(ctx: &Context, s: &Syntax) -> Expr {
        match build_formula(ctx, s).unwrap().judgment() {
            Judgment::HasType(e, _) => e.clone(),
            Judgment::Provable(_) => unreachable!(),
        }
    }

    #[test]
    fn binders_are_closed_by_the_kernel() {
        let ctx = base();
        let s = Syntax::forall(
            "y",
            Syntax::app("L", vec![Syntax::var("y"), Syntax::app("f", vec![Syntax::var("x")])]),
        );
        let thm = build(&ctx, &s).unwrap();
        assert_eq!(thm.context(), &ctx);
        insta::assert_snapshot!(thm.judgment().to_string(), @"(∀y, L(y, f(x))) : Prop");
    }

    #[test]
    fn clashing_binder_names_are_primed() {
        let ctx = base();
        // ∀x, L(x, x) where x is also declared in the context
        let s = Syntax::forall("x", Syntax::app("L", vec![Syntax::var("x"), Syntax::var("x")]));
        let e = formula(&ctx, &s);
        assert!(!e.mentions("x"));
        insta::assert_snapshot!(e.to_string(), @"(∀x', L(x', x'))");

        // The outer x stays free next to a bound one.
        let mixed = Syntax::exists("x", Syntax::app("L", vec![Syntax::var("x")]));
        assert!(build(&ctx, &mixed).is_err());
        let mixed = Syntax::and(
            Syntax::exists("x", Syntax::app("L", vec![Syntax::var("x"), Syntax::var("x")])),
            Syntax::equals(Syntax::var("x"), Syntax::var("x")),
        );
        insta::assert_snapshot!(formula(&ctx, &mixed).to_string(), @"((∃x', L(x', x')) ∧ (x = x))");
    }

    #[test]
    fn primed_binder_names_stay_hidden() {
        let ctx = base();
        // ∀x, L(x, x') with no x' declared: the binder is declared as x',
        // but the surface x' still names nothing.
        let s = Syntax::forall("x", Syntax::app("L", vec![Syntax::var("x"), Syntax::var("x'")]));
        assert!(matches!(
            build(&ctx, &s),
            Err(KernelError::UnboundName { rule: "build", ref name }) if &**name == "x'"
        ));

        // A surface binder named x' is renamed past the hidden one.
        let s = Syntax::forall(
            "x",
            Syntax::forall("x'", Syntax::app("L", vec![Syntax::var("x"), Syntax::var("x'")])),
        );
        insta::assert_snapshot!(formula(&ctx, &s).to_string(), @"(∀x', (∀x'', L(x', x'')))");

        // Once declared in the context, x' is an ordinary free name.
        let ctx = ctx.extend_var("x'").unwrap();
        let s = Syntax::forall("x", Syntax::app("L", vec![Syntax::var("x"), Syntax::var("x'")]));
        insta::assert_snapshot!(formula(&ctx, &s).to_string(), @"(∀x'', L(x'', x'))");
    }

    #[test]
    fn nullary_predicates_build_from_vars() {
        let ctx = base();
        let e = formula(&ctx, &Syntax::implies(Syntax::var("P"), Syntax::True));
        insta::assert_snapshot!(e.to_string(), @"(P → ⊤)");
    }

    #[test]
    fn lambdas_and_predicate_binders() {
        let ctx = base();
        let lam = build(
            &ctx,
            &Syntax::lam("a", Syntax::lam("b", Syntax::app("L", vec![Syntax::var("b"), Syntax::var("a")]))),
        )
        .unwrap();
        assert_eq!(
            lam.judgment(),
            &Judgment::HasType(
                Expr::lam(
                    "a",
                    Expr::lam(
                        "b",
                        Expr::Func(
                            natded_kernel::VarRef::free("L"),
                            vec![
                                Expr::Var(natded_kernel::VarRef::Bound(0)),
                                Expr::Var(natded_kernel::VarRef::Bound(1)),
                            ]
                        )
                    )
                ),
                Type::function(2, Sort::Prop)
            )
        );

        let s = Syntax::forall_pred(
            "S",
            1,
            Syntax::implies(Syntax::app("S", vec![Syntax::var("x")]), Syntax::app("S", vec![Syntax::var("x")])),
        );
        insta::assert_snapshot!(formula(&ctx, &s).to_string(), @"(∀S/1, (S(x) → S(x)))");
    }

    #[test]
    fn kind_errors_surface_from_the_kernel() {
        let ctx = base();
        assert!(matches!(
            build(&ctx, &Syntax::var("nope")),
            Err(KernelError::UnboundName { .. })
        ));
        assert!(matches!(
            build(&ctx, &Syntax::app("L", vec![Syntax::var("x")])),
            Err(KernelError::ArityMismatch { .. })
        ));
        assert!(matches!(
            build_formula(&ctx, &Syntax::var("x")),
            Err(KernelError::ShapeMismatch { rule: "build", .. })
        ));
        assert!(build_term(&ctx, &Syntax::app("f", vec![Syntax::var("x")])).is_ok());
    }

    #[test]
    fn fresh_names_skip_every_entry() {
        let ctx = base().extend_var("x'").unwrap();
        assert_eq!(fresh_name(&ctx, "x"), "x''");
        assert_eq!(fresh_name(&ctx, "z"), "z");
    }
}
