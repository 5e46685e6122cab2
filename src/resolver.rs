//! Name resolution with "did you mean" fuzzy suggestions.
//!
//! Uses `semantic::symbol_table::table::SymbolTable`'s own resolution
//! methods for the exact-match half, and borrows the Levenshtein-distance
//! suggestion idiom a unified-sql-lsp `ColumnResolver` uses when a name
//! fails to resolve.

use crate::element::ElementKind;
use crate::symbol_table::{Symbol, SymbolId, SymbolTable};

/// Wraps a [`SymbolTable`] with the resolution entry points the validator
/// calls: exact lookup plus a fuzzy fallback for diagnostics.
pub struct Resolver<'a> {
    table: &'a SymbolTable,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    /// Resolve `name` as seen from `scope_id`. See
    /// [`SymbolTable::resolve`] for the qualified/unqualified rule.
    pub fn resolve(&self, scope_id: usize, name: &str) -> Option<SymbolId> {
        self.table.resolve(scope_id, name)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.table.get(id)
    }

    /// Up to `k` symbols whose unqualified name is closest to `name` by
    /// Levenshtein distance, restricted to `kind` when given. A candidate
    /// is included only if its distance is within `max(2, name.len() / 3)`
    /// — far enough apart and it's not worth suggesting. Ties break by
    /// distance first, then lexicographically by qualified name for a
    /// stable, deterministic order.
    pub fn find_similar(
        &self,
        name: &str,
        kind: Option<ElementKind>,
        k: usize,
    ) -> Vec<&Symbol> {
        let threshold = (name.len() / 3).max(2);
        let mut candidates: Vec<(usize, &Symbol)> = self
            .table
            .symbols()
            .filter(|sym| kind.is_none_or(|want| want == sym.kind))
            .map(|sym| (levenshtein(name, sym.name.as_str()), sym))
            .filter(|(dist, _)| *dist <= threshold)
            .collect();
        candidates.sort_by(|(da, a), (db, b)| {
            da.cmp(db).then_with(|| a.qualified_name.cmp(&b.qualified_name))
        });
        candidates.truncate(k);
        candidates.into_iter().map(|(_, sym)| sym).collect()
    }
}

/// Iterative two-row Levenshtein edit distance between `a` and `b`.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_identical_strings_is_zero() {
        assert_eq!(levenshtein("Widget", "Widget"), 0);
    }

    #[test]
    fn levenshtein_single_substitution_is_one() {
        assert_eq!(levenshtein("Widget", "Widgwt"), 1);
    }

    #[test]
    fn find_similar_suggests_close_misspelling() {
        let mut table = SymbolTable::new();
        let pkg = table.get_or_create_scope("Pkg");
        table.insert("Widget", "Pkg::Widget", ElementKind::PartDef, pkg);
        table.insert("Gadget", "Pkg::Gadget", ElementKind::PartDef, pkg);
        let resolver = Resolver::new(&table);
        let suggestions = resolver.find_similar("Widgt", None, 3);
        assert_eq!(suggestions[0].qualified_name, "Pkg::Widget");
    }

    #[test]
    fn find_similar_excludes_far_away_names() {
        let mut table = SymbolTable::new();
        let pkg = table.get_or_create_scope("Pkg");
        table.insert("CompletelyUnrelated", "Pkg::CompletelyUnrelated", ElementKind::PartDef, pkg);
        let resolver = Resolver::new(&table);
        assert!(resolver.find_similar("Xy", None, 3).is_empty());
    }

    #[test]
    fn find_similar_respects_kind_filter() {
        let mut table = SymbolTable::new();
        let pkg = table.get_or_create_scope("Pkg");
        table.insert("Widget", "Pkg::Widget", ElementKind::PartDef, pkg);
        table.insert("Widgex", "Pkg::Widgex", ElementKind::PartUsage, pkg);
        let resolver = Resolver::new(&table);
        let suggestions = resolver.find_similar("Widge", Some(ElementKind::PartUsage), 3);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].qualified_name, "Pkg::Widgex");
    }
}
