//! Builds the [`SymbolTable`] a validation run shares across every pass.

use crate::model::SemanticModel;
use crate::symbol_table::SymbolTable;

/// Insert every element into the scope its `parent_id` names, declaring it
/// under its local (last `::`-segment) name. Elements are visited in
/// authoring order, so a name's first declaration always wins the scope
/// slot — later duplicates are left for the caller (E3004) to report
/// against the table's existing entry.
pub fn build_symbol_table(model: &SemanticModel) -> SymbolTable {
    let mut table = SymbolTable::new();
    for element in model.elements() {
        let scope_id = match &element.parent_id {
            Some(parent) => table.get_or_create_scope(parent),
            None => SymbolTable::ROOT,
        };
        table.insert(element.local_name(), element.id.clone(), element.kind, scope_id);
    }
    table
}
