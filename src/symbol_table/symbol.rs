//! [`Symbol`] — one named, resolvable entry in a [`super::SymbolTable`].

use crate::element::ElementKind;
use crate::intern::Interned;

/// Index into the symbol table's flat arena, returned by
/// [`super::SymbolTable::insert`] and accepted by
/// [`super::SymbolTable::get`]/`get_mut`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(super) usize);

/// A named element as seen by the resolver: its unqualified name, the
/// element it resolves to, and the scope it was declared in.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Interned,
    pub qualified_name: Interned,
    pub kind: ElementKind,
    pub scope_id: usize,
}

impl Symbol {
    pub fn new(
        name: impl Into<Interned>,
        qualified_name: impl Into<Interned>,
        kind: ElementKind,
        scope_id: usize,
    ) -> Self {
        Self {
            name: name.into(),
            qualified_name: qualified_name.into(),
            kind,
            scope_id,
        }
    }
}
