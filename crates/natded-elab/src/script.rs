//! Declaration and proof trees.
//!
//! Both are plain data with internally tagged JSON forms, so scripts can be
//! stored and loaded as fixtures. Formulas, witnesses and motives are
//! [`Syntax`] and are built against the context in force at the node.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::syntax::Syntax;

/// A declaration in a proof script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decl", rename_all = "snake_case")]
pub enum Decl {
    /// Checked in order; yields the last declaration's theorem.
    Block { decls: Vec<Decl> },
    /// Checks `proof`, compares it with `formula` when given, and pools the
    /// result under `name`.
    Assertion {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        formula: Option<Syntax>,
        proof: Proof,
    },
    /// Opens a scope with a fresh term variable.
    Any { name: String, body: Box<Decl> },
    /// Opens a scope with a fresh function symbol of term sort.
    AnyFunc {
        name: String,
        arity: i64,
        body: Box<Decl>,
    },
    /// Opens a scope with a fresh predicate symbol.
    AnyPred {
        name: String,
        arity: i64,
        body: Box<Decl>,
    },
    /// Opens a scope with a hypothesis.
    Assume {
        name: String,
        formula: Syntax,
        body: Box<Decl>,
    },
}

impl Decl {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Breadcrumb label, e.g. ``any `c` ``.
    pub fn label(&self) -> String {
        match self {
            Decl::Block { .. } => "block".to_string(),
            Decl::Assertion { name, .. } => format!("assertion `{name}`"),
            Decl::Any { name, .. } => format!("any `{name}`"),
            Decl::AnyFunc { name, .. } => format!("any_func `{name}`"),
            Decl::AnyPred { name, .. } => format!("any_pred `{name}`"),
            Decl::Assume { name, .. } => format!("assume `{name}`"),
        }
    }

    pub fn block(decls: Vec<Decl>) -> Self {
        Decl::Block { decls }
    }

    pub fn assertion(name: &str, formula: Option<Syntax>, proof: Proof) -> Self {
        Decl::Assertion {
            name: name.to_string(),
            formula,
            proof,
        }
    }

    pub fn any(name: &str, body: Decl) -> Self {
        Decl::Any {
            name: name.to_string(),
            body: Box::new(body),
        }
    }

    pub fn any_func(name: &str, arity: i64, body: Decl) -> Self {
        Decl::AnyFunc {
            name: name.to_string(),
            arity,
            body: Box::new(body),
        }
    }

    pub fn any_pred(name: &str, arity: i64, body: Decl) -> Self {
        Decl::AnyPred {
            name: name.to_string(),
            arity,
            body: Box::new(body),
        }
    }

    pub fn assume(name: &str, formula: Syntax, body: Decl) -> Self {
        Decl::Assume {
            name: name.to_string(),
            formula,
            body: Box::new(body),
        }
    }
}

/// A proof tree. Each node names one kernel rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Proof {
    /// A pooled theorem, or a hypothesis of the current context.
    As { name: String },
    /// The formation theorem of an expression.
    Form { expr: Syntax },

    AndIntro { left: Box<Proof>, right: Box<Proof> },
    AndLeft { of: Box<Proof> },
    AndRight { of: Box<Proof> },

    /// `p` gives `p ∨ right`.
    OrLeft { of: Box<Proof>, right: Syntax },
    /// `q` gives `left ∨ q`.
    OrRight { left: Syntax, of: Box<Proof> },
    OrElim {
        or: Box<Proof>,
        left: Box<Proof>,
        right: Box<Proof>,
    },

    ImpliesElim { imp: Box<Proof>, arg: Box<Proof> },

    NotIntro { of: Box<Proof> },
    NotElim { not: Box<Proof>, arg: Box<Proof> },

    IffIntro { forward: Box<Proof>, backward: Box<Proof> },
    IffLeft { of: Box<Proof> },
    IffRight { of: Box<Proof> },

    TrueIntro,
    FalseElim { of: Box<Proof>, goal: Syntax },
    Raa { of: Box<Proof> },

    EqIntro { term: Syntax },
    /// Rewrites `of : motive(a)` along `eq : a = b`.
    EqElim {
        motive: Syntax,
        eq: Box<Proof>,
        of: Box<Proof>,
    },

    ForallElim { of: Box<Proof>, term: Syntax },
    ExistsIntro {
        motive: Syntax,
        witness: Syntax,
        of: Box<Proof>,
    },
    ExistsElim { ex: Box<Proof>, all: Box<Proof> },

    UniqueIntro { ex: Box<Proof>, unique: Box<Proof> },
    UniqueLeft { of: Box<Proof> },
    UniqueRight { of: Box<Proof> },

    ForallFuncElim { of: Box<Proof>, lam: Syntax },
    ForallPredElim { of: Box<Proof>, lam: Syntax },
}

impl Proof {
    /// The serialized tag of this node.
    pub fn rule(&self) -> &'static str {
        match self {
            Proof::As { .. } => "as",
            Proof::Form { .. } => "form",
            Proof::AndIntro { .. } => "and_intro",
            Proof::AndLeft { .. } => "and_left",
            Proof::AndRight { .. } => "and_right",
            Proof::OrLeft { .. } => "or_left",
            Proof::OrRight { .. } => "or_right",
            Proof::OrElim { .. } => "or_elim",
            Proof::ImpliesElim { .. } => "implies_elim",
            Proof::NotIntro { .. } => "not_intro",
            Proof::NotElim { .. } => "not_elim",
            Proof::IffIntro { .. } => "iff_intro",
            Proof::IffLeft { .. } => "iff_left",
            Proof::IffRight { .. } => "iff_right",
            Proof::TrueIntro => "true_intro",
            Proof::FalseElim { .. } => "false_elim",
            Proof::Raa { .. } => "raa",
            Proof::EqIntro { .. } => "eq_intro",
            Proof::EqElim { .. } => "eq_elim",
            Proof::ForallElim { .. } => "forall_elim",
            Proof::ExistsIntro { .. } => "exists_intro",
            Proof::ExistsElim { .. } => "exists_elim",
            Proof::UniqueIntro { .. } => "unique_intro",
            Proof::UniqueLeft { .. } => "unique_left",
            Proof::UniqueRight { .. } => "unique_right",
            Proof::ForallFuncElim { .. } => "forall_func_elim",
            Proof::ForallPredElim { .. } => "forall_pred_elim",
        }
    }

    pub fn by(name: &str) -> Self {
        Proof::As {
            name: name.to_string(),
        }
    }

    pub fn and_left(of: Proof) -> Self {
        Proof::AndLeft { of: Box::new(of) }
    }

    pub fn and_right(of: Proof) -> Self {
        Proof::AndRight { of: Box::new(of) }
    }

    pub fn implies_elim(imp: Proof, arg: Proof) -> Self {
        Proof::ImpliesElim {
            imp: Box::new(imp),
            arg: Box::new(arg),
        }
    }

    pub fn not_intro(of: Proof) -> Self {
        Proof::NotIntro { of: Box::new(of) }
    }

    pub fn not_elim(not: Proof, arg: Proof) -> Self {
        Proof::NotElim {
            not: Box::new(not),
            arg: Box::new(arg),
        }
    }

    pub fn forall_elim(of: Proof, term: Syntax) -> Self {
        Proof::ForallElim {
            of: Box::new(of),
            term,
        }
    }

    /// Instantiate successive universals with `terms`, outermost first.
    pub fn forall_elims(of: Proof, terms: impl IntoIterator<Item = Syntax>) -> Self {
        terms.into_iter().fold(of, Proof::forall_elim)
    }

    pub fn exists_elim(ex: Proof, all: Proof) -> Self {
        Proof::ExistsElim {
            ex: Box::new(ex),
            all: Box::new(all),
        }
    }
}
