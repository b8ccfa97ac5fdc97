//! Content fingerprints of expressions and theorems.
//!
//! A fingerprint is a SHA-256 digest of the de Bruijn form. Binder names are
//! never fed to the hasher, so alpha-equal expressions share a fingerprint.
//! The elaborator logs fingerprints to correlate pool entries across runs.

use crate::context::{Context, EntryKind};
use crate::expr::{Expr, Sort, Type, VarRef};
use crate::theorem::{Judgment, Theorem};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    /// The first `n` hex digits, for log lines.
    pub fn short(&self, n: usize) -> &str {
        self.0.get(..n).unwrap_or(&self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feeds tagged tokens in a stable prefix order.
struct FingerprintBuilder {
    hasher: Sha256,
}

impl FingerprintBuilder {
    fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    fn tag(&mut self, tag: &str) -> &mut Self {
        self.hasher.update(tag.as_bytes());
        self.hasher.update(b"\n");
        self
    }

    fn name(&mut self, name: &str) -> &mut Self {
        self.hasher.update((name.len() as u64).to_le_bytes());
        self.hasher.update(name.as_bytes());
        self
    }

    fn int(&mut self, value: u64) -> &mut Self {
        self.hasher.update(value.to_le_bytes());
        self
    }

    fn sort(&mut self, sort: Sort) -> &mut Self {
        self.tag(match sort {
            Sort::Term => "term",
            Sort::Prop => "prop",
        })
    }

    fn ty(&mut self, ty: Type) -> &mut Self {
        match ty {
            Type::Function { arity, sort } => self.tag("fn").int(arity as u64).sort(sort),
            Type::Schema {
                arg_arity,
                arg_sort,
                arity,
                sort,
            } => self
                .tag("schema")
                .int(arg_arity as u64)
                .sort(arg_sort)
                .int(arity as u64)
                .sort(sort),
        }
    }

    fn var(&mut self, r: &VarRef) -> &mut Self {
        match r {
            VarRef::Free(x) => self.tag("free").name(x),
            VarRef::Bound(i) => self.tag("bound").int(u64::from(*i)),
        }
    }

    fn expr(&mut self, e: &Expr) -> &mut Self {
        match e {
            Expr::Var(r) => self.tag("var").var(r),
            Expr::Func(r, args) => {
                self.tag("func").var(r).int(args.len() as u64);
                for a in args {
                    self.expr(a);
                }
                self
            }
            Expr::Schema(r, arg) => self.tag("schema").var(r).expr(arg),
            Expr::Eq(a, b) => self.tag("eq").expr(a).expr(b),
            Expr::Top => self.tag("top"),
            Expr::Bottom => self.tag("bottom"),
            Expr::Not(p) => self.tag("not").expr(p),
            Expr::And(a, b) => self.tag("and").expr(a).expr(b),
            Expr::Or(a, b) => self.tag("or").expr(a).expr(b),
            Expr::Implies(a, b) => self.tag("implies").expr(a).expr(b),
            Expr::Iff(a, b) => self.tag("iff").expr(a).expr(b),
            Expr::Forall(_, p) => self.tag("forall").expr(p),
            Expr::Exists(_, p) => self.tag("exists").expr(p),
            Expr::Unique(_, p) => self.tag("unique").expr(p),
            Expr::ForallFunc(_, k, s, p) => self.tag("forall_func").int(*k as u64).sort(*s).expr(p),
            Expr::Lam(_, p) => self.tag("lam").expr(p),
        }
    }

    fn context(&mut self, ctx: &Context) -> &mut Self {
        self.tag("context").int(ctx.len() as u64);
        for entry in ctx {
            self.name(&entry.name);
            match &entry.kind {
                EntryKind::VarDecl(ty) => self.tag("decl").ty(*ty),
                EntryKind::Hypothesis(p) => self.tag("hyp").expr(p),
            };
        }
        self
    }

    fn judgment(&mut self, j: &Judgment) -> &mut Self {
        match j {
            Judgment::HasType(e, ty) => self.tag("has_type").expr(e).ty(*ty),
            Judgment::Provable(p) => self.tag("provable").expr(p),
        }
    }

    fn finish(&mut self) -> Fingerprint {
        let hash = std::mem::take(&mut self.hasher).finalize();
        Fingerprint(format!("{hash:x}"))
    }
}

impl Expr {
    pub fn fingerprint(&self) -> Fingerprint {
        FingerprintBuilder::new().expr(self).finish()
    }
}

impl Theorem {
    /// Digest of the context and the judgment.
    pub fn fingerprint(&self) -> Fingerprint {
        FingerprintBuilder::new()
            .context(self.context())
            .judgment(self.judgment())
            .finish()
    }
}
