//! [`SymbolTable`] — the nested scope tree every validator pass and the
//! resolver share.
//!
//! Shaped after `semantic::symbol_table::table::SymbolTable` (arena of
//! symbols plus a scope stack reached through
//! `enter_scope`/`exit_scope`/`find_by_qualified_name`), generalized from
//! per-file scopes keyed by source position to scopes keyed purely by
//! qualified id, so the same table can represent a single parsed document
//! or several merged ones without caring which file a scope came from.

use smol_str::SmolStr;

use crate::element::ElementKind;
use crate::intern::Interned;

use super::scope::Scope;
use super::symbol::{Symbol, SymbolId};

/// Nested scope tree plus the flat symbol arena it indexes into.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A fresh table with just the root scope (qualified name `""`).
    pub fn new() -> Self {
        Self {
            symbols: Vec::new(),
            scopes: vec![Scope::new("", None)],
        }
    }

    pub const ROOT: usize = 0;

    /// Find or create every scope along `qualified_name`'s `::`-separated
    /// path, returning the index of the final (innermost) scope. Passing
    /// `""` returns the root scope.
    pub fn get_or_create_scope(&mut self, qualified_name: &str) -> usize {
        if qualified_name.is_empty() {
            return Self::ROOT;
        }
        let mut current = Self::ROOT;
        let mut prefix = String::new();
        for segment in qualified_name.split("::") {
            if !prefix.is_empty() {
                prefix.push_str("::");
            }
            prefix.push_str(segment);
            current = match self.scopes[current].get_child(segment) {
                Some(idx) => idx,
                None => {
                    let idx = self.scopes.len();
                    self.scopes.push(Scope::new(prefix.clone(), Some(current)));
                    self.scopes[current]
                        .children
                        .insert(SmolStr::new(segment), idx);
                    idx
                }
            };
        }
        current
    }

    /// Find the scope for `qualified_name` without creating it.
    pub fn find_scope(&self, qualified_name: &str) -> Option<usize> {
        if qualified_name.is_empty() {
            return Some(Self::ROOT);
        }
        let mut current = Self::ROOT;
        for segment in qualified_name.split("::") {
            current = self.scopes[current].get_child(segment)?;
        }
        Some(current)
    }

    pub fn scope(&self, scope_id: usize) -> &Scope {
        &self.scopes[scope_id]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Declare `name` in `scope_id`. If `name` is already declared locally
    /// in that scope, returns the existing symbol instead of inserting a
    /// duplicate — callers that must reject redeclaration (E3004) check
    /// this case themselves before calling insert.
    pub fn insert(
        &mut self,
        name: impl Into<Interned>,
        qualified_name: impl Into<Interned>,
        kind: ElementKind,
        scope_id: usize,
    ) -> SymbolId {
        let name = name.into();
        if let Some(existing) = self.scopes[scope_id].get_local(&name) {
            return existing;
        }
        let id = SymbolId(self.symbols.len());
        self.symbols
            .push(Symbol::new(name.clone(), qualified_name, kind, scope_id));
        self.scopes[scope_id].symbols.insert(name, id);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Look up a symbol by its fully qualified name (e.g. `"Pkg::A::b"`),
    /// without creating any scope.
    pub fn find_by_qualified_name(&self, qualified_name: &str) -> Option<SymbolId> {
        let (scope_path, local) = match qualified_name.rsplit_once("::") {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, qualified_name),
        };
        let scope_id = match scope_path {
            Some(path) => self.find_scope(path)?,
            None => Self::ROOT,
        };
        self.scopes[scope_id].get_local(local)
    }

    /// Resolve `name` as seen from `scope_id`.
    ///
    /// A name containing `::` is treated as fully qualified and looked up
    /// from the root regardless of `scope_id` (matches
    /// [`find_by_qualified_name`](Self::find_by_qualified_name)). An
    /// unqualified name is resolved by walking outward from `scope_id`
    /// through each enclosing scope's locally declared symbols, stopping
    /// at the first match — inner declarations shadow outer ones.
    pub fn resolve(&self, scope_id: usize, name: &str) -> Option<SymbolId> {
        if name.contains("::") {
            return self.find_by_qualified_name(name);
        }
        let mut current = Some(scope_id);
        while let Some(idx) = current {
            if let Some(sym) = self.scopes[idx].get_local(name) {
                return Some(sym);
            }
            current = self.scopes[idx].parent;
        }
        None
    }
}
