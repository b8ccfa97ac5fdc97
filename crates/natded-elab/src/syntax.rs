//! Named surface syntax for formulas, terms and lambdas.
//!
//! Surface trees refer to every variable and symbol by name. They carry no
//! de Bruijn indices; [`crate::builder`] resolves names against a context
//! and produces kernel expressions through formation rules only.

use serde::{Deserialize, Serialize};

/// A surface expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Syntax {
    /// A term variable, or a nullary function or predicate symbol.
    Var { name: String },
    /// A function or predicate symbol applied to terms.
    App { head: String, args: Vec<Syntax> },
    /// A schema symbol applied to its argument.
    Schema { head: String, arg: Box<Syntax> },
    Eq { lhs: Box<Syntax>, rhs: Box<Syntax> },
    True,
    False,
    Not { arg: Box<Syntax> },
    And { lhs: Box<Syntax>, rhs: Box<Syntax> },
    Or { lhs: Box<Syntax>, rhs: Box<Syntax> },
    Implies { lhs: Box<Syntax>, rhs: Box<Syntax> },
    Iff { lhs: Box<Syntax>, rhs: Box<Syntax> },
    Forall { var: String, body: Box<Syntax> },
    Exists { var: String, body: Box<Syntax> },
    Unique { var: String, body: Box<Syntax> },
    /// Quantifies over a function symbol of the given arity.
    ForallFunc { name: String, arity: i64, body: Box<Syntax> },
    /// Quantifies over a predicate symbol of the given arity.
    ForallPred { name: String, arity: i64, body: Box<Syntax> },
    Lam { var: String, body: Box<Syntax> },
}

impl Syntax {
    pub fn var(name: &str) -> Self {
        Syntax::Var {
            name: name.to_string(),
        }
    }

    pub fn app(head: &str, args: Vec<Syntax>) -> Self {
        Syntax::App {
            head: head.to_string(),
            args,
        }
    }

    pub fn schema(head: &str, arg: Syntax) -> Self {
        Syntax::Schema {
            head: head.to_string(),
            arg: Box::new(arg),
        }
    }

    pub fn equals(lhs: Syntax, rhs: Syntax) -> Self {
        Syntax::Eq {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `¬(lhs = rhs)`
    pub fn neq(lhs: Syntax, rhs: Syntax) -> Self {
        Syntax::not(Syntax::equals(lhs, rhs))
    }

    pub fn not(arg: Syntax) -> Self {
        Syntax::Not { arg: Box::new(arg) }
    }

    pub fn and(lhs: Syntax, rhs: Syntax) -> Self {
        Syntax::And {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn or(lhs: Syntax, rhs: Syntax) -> Self {
        Syntax::Or {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn implies(lhs: Syntax, rhs: Syntax) -> Self {
        Syntax::Implies {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn iff(lhs: Syntax, rhs: Syntax) -> Self {
        Syntax::Iff {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn forall(var: &str, body: Syntax) -> Self {
        Syntax::Forall {
            var: var.to_string(),
            body: Box::new(body),
        }
    }

    pub fn exists(var: &str, body: Syntax) -> Self {
        Syntax::Exists {
            var: var.to_string(),
            body: Box::new(body),
        }
    }

    pub fn unique(var: &str, body: Syntax) -> Self {
        Syntax::Unique {
            var: var.to_string(),
            body: Box::new(body),
        }
    }

    pub fn forall_func(name: &str, arity: i64, body: Syntax) -> Self {
        Syntax::ForallFunc {
            name: name.to_string(),
            arity,
            body: Box::new(body),
        }
    }

    pub fn forall_pred(name: &str, arity: i64, body: Syntax) -> Self {
        Syntax::ForallPred {
            name: name.to_string(),
            arity,
            body: Box::new(body),
        }
    }

    pub fn lam(var: &str, body: Syntax) -> Self {
        Syntax::Lam {
            var: var.to_string(),
            body: Box::new(body),
        }
    }
}
