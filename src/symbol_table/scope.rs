//! [`Scope`] — one node in the nested namespace tree the symbol table
//! resolves names against.

use rustc_hash::FxHashMap;

use crate::intern::Interned;

use super::symbol::SymbolId;

/// One lexical scope: a namespace, package, definition, or usage body.
/// Scopes nest by qualified id rather than by source file, so the same
/// tree serves both a single parsed document and a merged multi-file
/// model.
#[derive(Clone, Debug)]
pub struct Scope {
    /// Fully qualified id of the element that owns this scope (empty
    /// string for the implicit root scope).
    pub qualified_name: Interned,
    pub parent: Option<usize>,
    pub(super) symbols: FxHashMap<Interned, SymbolId>,
    pub(super) children: FxHashMap<Interned, usize>,
}

impl Scope {
    pub(super) fn new(qualified_name: impl Into<Interned>, parent: Option<usize>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            parent,
            symbols: FxHashMap::default(),
            children: FxHashMap::default(),
        }
    }

    /// Symbol declared directly in this scope under `name`, if any.
    pub fn get_local(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    /// Child scope index declared directly under this scope, if any.
    pub fn get_child(&self, name: &str) -> Option<usize> {
        self.children.get(name).copied()
    }

    pub fn local_symbol_names(&self) -> impl Iterator<Item = &Interned> {
        self.symbols.keys()
    }
}
