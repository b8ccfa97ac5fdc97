//! Persistent contexts of declarations and hypotheses.
//!
//! A context is an immutable, newest-first list. Extending it yields a new
//! value that shares its tail with the old one, so every theorem stays valid
//! against the context it was proved in while elaboration continues
//! elsewhere.
//!
//! Contexts can only be grown through the `extend_*` operations below, and
//! can only shrink through the context-changing kernel rules.

use crate::error::{KernelError, Result};
use crate::expr::{Expr, Name, Sort, Type};
use crate::theorem::{Judgment, Theorem};
use serde::ser::{Serialize, Serializer};
use std::sync::Arc;

/// What a context entry introduces.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A variable, function, predicate or schema symbol.
    VarDecl(Type),
    /// An assumed formula.
    Hypothesis(Expr),
}

/// A named context entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ContextEntry {
    pub name: Name,
    pub kind: EntryKind,
}

impl ContextEntry {
    pub fn is_decl(&self) -> bool {
        matches!(self.kind, EntryKind::VarDecl(_))
    }
}

#[derive(Debug)]
struct Node {
    entry: ContextEntry,
    tail: Context,
    len: usize,
}

/// An ordered, newest-first sequence of context entries.
///
/// Equality is exact sequence equality (hypothesis formulas compared up to
/// binder names).
#[derive(Debug, Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty context.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.head.as_ref().map_or(0, |n| n.len)
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate newest entry first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { cur: self }
    }

    /// The most recently added entry and the context below it.
    pub fn split_first(&self) -> Option<(&ContextEntry, &Context)> {
        self.head.as_deref().map(|n| (&n.entry, &n.tail))
    }

    /// The nearest entry named `name`.
    pub fn lookup(&self, name: &str) -> Option<&ContextEntry> {
        self.iter().find(|e| &*e.name == name)
    }

    /// Declare a term variable.
    pub fn extend_var(&self, name: &str) -> Result<Context> {
        self.declare("extend_var", name, Type::TERM)
    }

    /// Declare a function (`Sort::Term`) or predicate (`Sort::Prop`) symbol.
    ///
    /// The arity comes from untrusted input and is validated here.
    pub fn extend_func(&self, name: &str, arity: i64, sort: Sort) -> Result<Context> {
        let arity = check_arity("extend_func", name, arity)?;
        self.declare("extend_func", name, Type::function(arity, sort))
    }

    /// Declare a schema symbol taking a `(arg_arity, arg_sort)` argument and
    /// producing an `(arity, sort)` result.
    pub fn extend_schema(
        &self,
        name: &str,
        arg_arity: i64,
        arg_sort: Sort,
        arity: i64,
        sort: Sort,
    ) -> Result<Context> {
        let ty = Type::Schema {
            arg_arity: check_arity("extend_schema", name, arg_arity)?,
            arg_sort,
            arity: check_arity("extend_schema", name, arity)?,
            sort,
        };
        self.declare("extend_schema", name, ty)
    }

    /// Assume a formula.
    ///
    /// `formula` must be the formation theorem `HasType(p, Formula)` for `p`,
    /// proved in exactly this context. No proof of `p` is required.
    pub fn extend_hyp(&self, name: &str, formula: &Theorem) -> Result<Context> {
        const RULE: &str = "extend_hyp";
        if formula.context() != self {
            return Err(KernelError::ContextMismatch {
                rule: RULE,
                expected: self.clone(),
                found: formula.context().clone(),
            });
        }
        let p = match formula.judgment() {
            Judgment::HasType(p, ty) if *ty == Type::FORMULA => p.clone(),
            other => {
                return Err(KernelError::ShapeMismatch {
                    rule: RULE,
                    expected: "a formula formation judgment",
                    found: other.to_string(),
                });
            }
        };
        if self.lookup(name).is_some_and(ContextEntry::is_decl) {
            return Err(KernelError::NameClash {
                rule: RULE,
                name: Name::from(name),
            });
        }
        Ok(self.push(Name::from(name), EntryKind::Hypothesis(p)))
    }

    /// Whether `self` is a contiguous trailing sub-sequence of `other`,
    /// i.e. `other` = extra entries ++ `self`.
    pub fn is_suffix_of(&self, other: &Context) -> bool {
        let Some(extra) = other.len().checked_sub(self.len()) else {
            return false;
        };
        let mut tail = other;
        for _ in 0..extra {
            match tail.split_first() {
                Some((_, rest)) => tail = rest,
                None => return false,
            }
        }
        tail == self
    }

    fn declare(&self, rule: &'static str, name: &str, ty: Type) -> Result<Context> {
        if self.lookup(name).is_some() {
            return Err(KernelError::NameClash {
                rule,
                name: Name::from(name),
            });
        }
        Ok(self.push(Name::from(name), EntryKind::VarDecl(ty)))
    }

    fn push(&self, name: Name, kind: EntryKind) -> Context {
        Context {
            head: Some(Arc::new(Node {
                entry: ContextEntry { name, kind },
                tail: self.clone(),
                len: self.len() + 1,
            })),
        }
    }
}

fn check_arity(rule: &'static str, name: &str, arity: i64) -> Result<usize> {
    usize::try_from(arity).map_err(|_| KernelError::ArityMismatch {
        rule,
        name: Name::from(name),
        expected: "a non-negative arity".to_string(),
        found: arity,
    })
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            match (&a.head, &b.head) {
                (None, None) => return true,
                (Some(x), Some(y)) => {
                    if Arc::ptr_eq(x, y) {
                        return true;
                    }
                    if x.len != y.len || x.entry != y.entry {
                        return false;
                    }
                    a = &x.tail;
                    b = &y.tail;
                }
                _ => return false,
            }
        }
    }
}

/// Iterator over a context, newest entry first.
pub struct Iter<'a> {
    cur: &'a Context,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ContextEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur.head.as_deref()?;
        self.cur = &node.tail;
        Some(&node.entry)
    }
}

impl<'a> IntoIterator for &'a Context {
    type Item = &'a ContextEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Serialize for Context {
    /// Serialized oldest entry first, the order in which it was built.
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut entries: Vec<&ContextEntry> = self.iter().collect();
        entries.reverse();
        serializer.collect_seq(entries)
    }
}
