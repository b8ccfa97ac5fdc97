//! The script interpreter.
//!
//! [`Elaborator::check_decl`] walks a declaration tree depth-first, left to
//! right, dispatching every proof node to one kernel rule. Scoped
//! declarations push a pool table, extend the context, check their body,
//! then pop the table and generalize each entry over the scope's binder
//! before merging it into the parent table. The first failure aborts the
//! run.

use natded_kernel::{Context, Judgment, KernelError, Name, Sort, Theorem};
use tracing::{debug, trace};

use crate::builder::{build, build_formula, build_term};
use crate::error::{ElabError, Result};
use crate::options::ElabOptions;
use crate::pool::{Pool, Table};
use crate::script::{Decl, Proof};
use crate::syntax::Syntax;

/// What a scope binds, and so how its entries are discharged on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binder {
    Var,
    Func,
    Pred,
    Hyp,
}

impl Binder {
    fn describe(self) -> &'static str {
        match self {
            Binder::Var => "a term variable",
            Binder::Func => "a function symbol",
            Binder::Pred => "a predicate symbol",
            Binder::Hyp => "a hypothesis",
        }
    }
}

#[derive(Debug, Default)]
pub struct Elaborator {
    pool: Pool,
    options: ElabOptions,
    /// Labels of the declarations being checked, outermost first.
    trail: Vec<String>,
}

impl Elaborator {
    pub fn new(options: ElabOptions) -> Self {
        Self {
            pool: Pool::new(),
            options,
            trail: Vec::new(),
        }
    }

    pub fn options(&self) -> &ElabOptions {
        &self.options
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn into_pool(self) -> Pool {
        self.pool
    }

    /// Check `decl` under `ctx` and return its theorem.
    ///
    /// On failure the pool is restored to its state on entry: nothing the
    /// failed run pooled survives, and the elaborator can be reused.
    pub fn check_decl(&mut self, ctx: &Context, decl: &Decl) -> Result<Theorem> {
        let saved = self.pool.clone();
        let trail = self.trail.len();
        let result = self.decl(ctx, decl);
        if result.is_err() {
            self.pool = saved;
            self.trail.truncate(trail);
        }
        result
    }

    /// Check a proof tree under `ctx`.
    pub fn check_proof(&self, ctx: &Context, proof: &Proof) -> Result<Theorem> {
        trace!(rule = proof.rule(), "dispatch");
        let k = |r: std::result::Result<Theorem, KernelError>| r.map_err(|e| self.kernel(e));
        match proof {
            Proof::As { name } => self.resolve(ctx, name),
            Proof::Form { expr } => k(build(ctx, expr)),

            Proof::AndIntro { left, right } => {
                k(Theorem::and_intro(&self.check_proof(ctx, left)?, &self.check_proof(ctx, right)?))
            }
            Proof::AndLeft { of } => k(Theorem::and_left(&self.check_proof(ctx, of)?)),
            Proof::AndRight { of } => k(Theorem::and_right(&self.check_proof(ctx, of)?)),

            Proof::OrLeft { of, right } => {
                let of = self.check_proof(ctx, of)?;
                k(build_formula(ctx, right).and_then(|q| Theorem::or_left(&of, &q)))
            }
            Proof::OrRight { left, of } => {
                let p = k(build_formula(ctx, left))?;
                k(Theorem::or_right(&p, &self.check_proof(ctx, of)?))
            }
            Proof::OrElim { or, left, right } => k(Theorem::or_elim(
                &self.check_proof(ctx, or)?,
                &self.check_proof(ctx, left)?,
                &self.check_proof(ctx, right)?,
            )),

            Proof::ImpliesElim { imp, arg } => k(Theorem::implies_elim(
                &self.check_proof(ctx, imp)?,
                &self.check_proof(ctx, arg)?,
            )),

            Proof::NotIntro { of } => k(Theorem::not_intro(&self.check_proof(ctx, of)?)),
            Proof::NotElim { not, arg } => k(Theorem::not_elim(
                &self.check_proof(ctx, not)?,
                &self.check_proof(ctx, arg)?,
            )),

            Proof::IffIntro { forward, backward } => k(Theorem::iff_intro(
                &self.check_proof(ctx, forward)?,
                &self.check_proof(ctx, backward)?,
            )),
            Proof::IffLeft { of } => k(Theorem::iff_left(&self.check_proof(ctx, of)?)),
            Proof::IffRight { of } => k(Theorem::iff_right(&self.check_proof(ctx, of)?)),

            Proof::TrueIntro => Ok(Theorem::true_intro(ctx)),
            Proof::FalseElim { of, goal } => {
                let of = self.check_proof(ctx, of)?;
                k(build_formula(ctx, goal).and_then(|goal| Theorem::false_elim(&of, &goal)))
            }
            Proof::Raa { of } => k(Theorem::raa(&self.check_proof(ctx, of)?)),

            Proof::EqIntro { term } => k(build_term(ctx, term).and_then(|t| Theorem::eq_intro(&t))),
            Proof::EqElim { motive, eq, of } => {
                let motive = k(build(ctx, motive))?;
                let eq = self.check_proof(ctx, eq)?;
                k(Theorem::eq_elim(&motive, &eq, &self.check_proof(ctx, of)?))
            }

            Proof::ForallElim { of, term } => {
                let of = self.check_proof(ctx, of)?;
                k(build_term(ctx, term).and_then(|t| Theorem::forall_elim(&of, &t)))
            }
            Proof::ExistsIntro {
                motive,
                witness,
                of,
            } => {
                let motive = k(build(ctx, motive))?;
                let witness = k(build_term(ctx, witness))?;
                k(Theorem::exists_intro(&motive, &witness, &self.check_proof(ctx, of)?))
            }
            Proof::ExistsElim { ex, all } => k(Theorem::exists_elim(
                &self.check_proof(ctx, ex)?,
                &self.check_proof(ctx, all)?,
            )),

            Proof::UniqueIntro { ex, unique } => k(Theorem::unique_intro(
                &self.check_proof(ctx, ex)?,
                &self.check_proof(ctx, unique)?,
            )),
            Proof::UniqueLeft { of } => k(Theorem::unique_left(&self.check_proof(ctx, of)?)),
            Proof::UniqueRight { of } => k(Theorem::unique_right(&self.check_proof(ctx, of)?)),

            Proof::ForallFuncElim { of, lam } => {
                let of = self.check_proof(ctx, of)?;
                k(build(ctx, lam).and_then(|lam| Theorem::forall_func_elim(&of, &lam)))
            }
            Proof::ForallPredElim { of, lam } => {
                let of = self.check_proof(ctx, of)?;
                k(build(ctx, lam).and_then(|lam| Theorem::forall_pred_elim(&of, &lam)))
            }
        }
    }

    fn decl(&mut self, ctx: &Context, decl: &Decl) -> Result<Theorem> {
        // Blocks are transparent in breadcrumbs.
        let labelled = !matches!(decl, Decl::Block { .. });
        if labelled {
            self.trail.push(decl.label());
        }
        let thm = match decl {
            Decl::Block { decls } => {
                let mut last = None;
                for d in decls {
                    last = Some(self.decl(ctx, d)?);
                }
                last.ok_or_else(|| ElabError::EmptyBlock { at: self.at() })?
            }
            Decl::Assertion {
                name,
                formula,
                proof,
            } => self.assertion(ctx, name, formula.as_ref(), proof)?,
            Decl::Any { name, body } => {
                let inner = ctx.extend_var(name).map_err(|e| self.kernel(e))?;
                self.scope(&inner, Binder::Var, body)?
            }
            Decl::AnyFunc { name, arity, body } => {
                let inner = ctx
                    .extend_func(name, *arity, Sort::Term)
                    .map_err(|e| self.kernel(e))?;
                self.scope(&inner, Binder::Func, body)?
            }
            Decl::AnyPred { name, arity, body } => {
                let inner = ctx
                    .extend_func(name, *arity, Sort::Prop)
                    .map_err(|e| self.kernel(e))?;
                self.scope(&inner, Binder::Pred, body)?
            }
            Decl::Assume {
                name,
                formula,
                body,
            } => {
                let inner = build_formula(ctx, formula)
                    .and_then(|p| ctx.extend_hyp(name, &p))
                    .map_err(|e| self.kernel(e))?;
                self.scope(&inner, Binder::Hyp, body)?
            }
        };
        if labelled {
            self.trail.pop();
        }
        Ok(thm)
    }

    fn assertion(
        &mut self,
        ctx: &Context,
        name: &str,
        formula: Option<&Syntax>,
        proof: &Proof,
    ) -> Result<Theorem> {
        let thm = self.check_proof(ctx, proof)?;
        if let Some(formula) = formula {
            let declared = build_formula(ctx, formula).map_err(|e| self.kernel(e))?;
            let declared = declared.judgment().expr();
            if thm.formula() != Some(declared) {
                return Err(ElabError::FormulaMismatch {
                    at: self.at(),
                    declared: declared.clone(),
                    derived: thm.judgment().clone(),
                });
            }
        }
        let fingerprint = thm.fingerprint();
        debug!(
            name,
            depth = self.pool.depth(),
            fingerprint = fingerprint.short(12),
            judgment = %thm.judgment(),
            "registered theorem"
        );
        self.pool.add_theorem(name, thm.clone());
        Ok(thm)
    }

    /// Check `body` in a new pool table under `inner`, then discharge the
    /// front entry of `inner` from the table and from the result.
    fn scope(&mut self, inner: &Context, binder: Binder, body: &Decl) -> Result<Theorem> {
        let limit = self.options.max_scope_depth;
        if self.pool.depth() > limit {
            return Err(ElabError::ScopeDepth { at: self.at(), limit });
        }
        self.pool.push();
        let at = self.at();
        debug!(scope = %at, depth = self.pool.depth(), "opened scope");

        let result = self.decl(inner, body)?;
        let table = self.pool.pop().unwrap_or_default();
        let mut generalized = Table::new();
        for (name, thm) in &table {
            generalized.insert(name.clone(), self.generalize(binder, name, thm)?);
        }
        debug!(scope = %at, discharged = generalized.len(), "closed scope");
        self.pool.merge(generalized);
        self.generalize(binder, "the scope's result", &result)
    }

    fn generalize(&self, binder: Binder, name: &str, thm: &Theorem) -> Result<Theorem> {
        let rule: fn(&Theorem) -> natded_kernel::Result<Theorem> = match (binder, thm.judgment()) {
            (Binder::Var, Judgment::Provable(_)) => Theorem::forall_intro,
            (Binder::Var, Judgment::HasType(..)) => Theorem::lam_mk,
            (Binder::Func, Judgment::Provable(_)) => Theorem::forall_func_intro,
            (Binder::Pred, Judgment::Provable(_)) => Theorem::forall_pred_intro,
            (Binder::Hyp, Judgment::Provable(_)) => Theorem::implies_intro,
            (_, judgment) => {
                return Err(ElabError::Ungeneralizable {
                    at: self.at(),
                    name: name.to_string(),
                    judgment: judgment.clone(),
                    binder: binder.describe(),
                });
            }
        };
        rule(thm).map_err(|e| self.kernel(e))
    }

    /// Resolve an `as` reference: the pool first, weakened to `ctx`, then
    /// a hypothesis of `ctx`.
    fn resolve(&self, ctx: &Context, name: &str) -> Result<Theorem> {
        let found = match self.pool.lookup(name) {
            Some(thm) => thm.weaken(ctx),
            None if self.options.hypothesis_fallback => Theorem::assumption(ctx, name),
            None => Err(KernelError::UnboundName {
                rule: "as",
                name: Name::from(name),
            }),
        };
        found.map_err(|e| self.kernel(e))
    }

    fn at(&self) -> String {
        if self.trail.is_empty() {
            "script".to_string()
        } else {
            self.trail.join(" / ")
        }
    }

    fn kernel(&self, source: KernelError) -> ElabError {
        ElabError::Kernel {
            at: self.at(),
            source,
        }
    }
}

/// Check `decl` under `ctx` with default options, returning its theorem and
/// the final pool.
pub fn check_script(ctx: &Context, decl: &Decl) -> Result<(Theorem, Pool)> {
    let mut elab = Elaborator::default();
    let thm = elab.check_decl(ctx, decl)?;
    Ok((thm, elab.into_pool()))
}
