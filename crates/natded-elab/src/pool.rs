//! The scoped theorem pool.
//!
//! A stack of name → theorem tables, innermost last. The root table is
//! always present. Lookup searches innermost first, so an inner name
//! shadows an outer one without deleting it.

use std::collections::BTreeMap;

use natded_kernel::Theorem;

pub type Table = BTreeMap<String, Theorem>;

#[derive(Debug, Clone)]
pub struct Pool {
    scopes: Vec<Table>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    pub fn new() -> Self {
        Self {
            scopes: vec![Table::new()],
        }
    }

    /// Number of tables, the root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push(&mut self) {
        self.scopes.push(Table::new());
    }

    /// Remove and return the innermost table. The root table is never
    /// popped.
    pub fn pop(&mut self) -> Option<Table> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Insert into the innermost table, replacing any same-named entry.
    pub fn add_theorem(&mut self, name: impl Into<String>, thm: Theorem) {
        self.innermost_mut().insert(name.into(), thm);
    }

    /// Insert every entry of `table` into the innermost table, overriding
    /// same-named entries.
    pub fn merge(&mut self, table: Table) {
        self.innermost_mut().extend(table);
    }

    pub fn lookup(&self, name: &str) -> Option<&Theorem> {
        self.scopes.iter().rev().find_map(|t| t.get(name))
    }

    pub fn innermost(&self) -> &Table {
        // `scopes` is never empty.
        &self.scopes[self.scopes.len() - 1]
    }

    fn innermost_mut(&mut self) -> &mut Table {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}
