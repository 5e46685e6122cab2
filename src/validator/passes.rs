//! The eight diagnostic passes (E3001-E3008) plus the abstract-instantiation
//! warning. Each pass is a free function over a shared, already-built
//! [`SymbolTable`] so passes never re-walk the model to resolve names.
//!
//! Follows `hir::resolve` (undefined-reference checks) and
//! `hir::diagnostics` (diagnostic codes/messages), with the redefinition
//! and multiplicity checks generalized from `interchange::editing`'s
//! `set_property`/`set_variation` validation helpers.

use rustc_hash::FxHashMap;

use crate::diagnostic::{Diagnostic, DiagnosticCode, DiagnosticStore, Note};
use crate::element::{Element, ElementKind};
use crate::model::SemanticModel;
use crate::relationship::RelationshipKind;
use crate::resolver::Resolver;
use crate::symbol_table::SymbolTable;

/// The scope an element's own name was declared in — the scope searches
/// for its unqualified references should start from.
fn element_scope(table: &SymbolTable, element: &Element) -> usize {
    match &element.parent_id {
        Some(parent) => table.find_scope(parent).unwrap_or(SymbolTable::ROOT),
        None => SymbolTable::ROOT,
    }
}

fn suggest(resolver: &Resolver, name: &str, kind: Option<ElementKind>) -> Option<Note> {
    resolver
        .find_similar(name, kind, 1)
        .first()
        .map(|sym| Note::new(format!("did you mean `{}`?", sym.qualified_name)))
}

/// E3001: a usage's `typed_by` reference does not resolve to any element.
pub fn undefined_type(model: &SemanticModel, table: &SymbolTable, suggest_corrections: bool, store: &mut DiagnosticStore) {
    let resolver = Resolver::new(table);
    for element in model.elements() {
        let scope = element_scope(table, element);
        for type_ref in &element.typed_by {
            if resolver.resolve(scope, type_ref).is_none() {
                let mut diag = Diagnostic::new(
                    DiagnosticCode::E3001,
                    format!("undefined type `{type_ref}`"),
                    element.id.clone(),
                );
                if suggest_corrections {
                    if let Some(note) = suggest(&resolver, type_ref, None) {
                        diag = diag.with_note(note);
                    }
                }
                store.push(diag);
            }
        }
    }
}

/// E3002: a `redefines` target does not resolve to any feature in an
/// ancestor definition.
pub fn undefined_feature(model: &SemanticModel, table: &SymbolTable, suggest_corrections: bool, store: &mut DiagnosticStore) {
    let resolver = Resolver::new(table);
    for element in model.elements() {
        let scope = element_scope(table, element);
        for redefined_ref in &element.redefines {
            if resolver.resolve(scope, redefined_ref).is_none() {
                let mut diag = Diagnostic::new(
                    DiagnosticCode::E3002,
                    format!("undefined feature `{redefined_ref}`"),
                    element.id.clone(),
                );
                if suggest_corrections {
                    if let Some(note) = suggest(&resolver, redefined_ref, None) {
                        diag = diag.with_note(note);
                    }
                }
                store.push(diag);
            }
        }
    }
}

/// E3003: an `import`'s target namespace does not resolve.
pub fn undefined_namespace(model: &SemanticModel, table: &SymbolTable, suggest_corrections: bool, store: &mut DiagnosticStore) {
    let resolver = Resolver::new(table);
    for rel in model.relationships() {
        if rel.kind != RelationshipKind::Import {
            continue;
        }
        let scope = table.find_scope(&rel.source).unwrap_or(SymbolTable::ROOT);
        // the target of an import is always a qualified name, but the
        // trailing `::*`/`::**` wildcard marker was already stripped by
        // the parser before it reached this model.
        if resolver.resolve(scope, &rel.target).is_none() && table.find_scope(&rel.target).is_none() {
            let mut diag = Diagnostic::new(
                DiagnosticCode::E3003,
                format!("undefined namespace `{}`", rel.target),
                rel.source.clone(),
            );
            if suggest_corrections {
                if let Some(note) = suggest(&resolver, &rel.target, None) {
                    diag = diag.with_note(note);
                }
            }
            store.push(diag);
        }
    }
}

/// E3004: two elements declared under the same parent with the same local
/// name. Reported against the later (in authoring order) declaration.
pub fn duplicate_name(model: &SemanticModel, store: &mut DiagnosticStore) {
    let mut seen: FxHashMap<(Option<String>, &str), &Element> = FxHashMap::default();
    for element in model.elements() {
        let name = element.local_name();
        let key = (element.parent_id.as_ref().map(|p| p.to_string()), name);
        if let Some(first) = seen.get(&key) {
            store.push(
                Diagnostic::new(
                    DiagnosticCode::E3004,
                    format!("duplicate name `{name}` in this scope"),
                    element.id.clone(),
                )
                .with_note(Note::new(format!("first declared as `{}`", first.id))),
            );
        } else {
            seen.insert(key, element);
        }
    }
}

/// E3005: a cycle in the directed graph of `specializes`/`typed_by` edges,
/// found with a white/gray/black DFS. Every element on a discovered cycle
/// is reported once.
pub fn circular_specialization(model: &SemanticModel, store: &mut DiagnosticStore) {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut color: FxHashMap<&str, Color> = FxHashMap::default();
    for element in model.elements() {
        color.insert(element.id.as_str(), Color::White);
    }

    let mut stack: Vec<&str> = Vec::new();
    let mut reported: FxHashMap<&str, ()> = FxHashMap::default();

    fn visit<'a>(
        id: &'a str,
        model: &'a SemanticModel,
        color: &mut FxHashMap<&'a str, Color>,
        stack: &mut Vec<&'a str>,
        reported: &mut FxHashMap<&'a str, ()>,
        store: &mut DiagnosticStore,
    ) {
        match color.get(id) {
            Some(Color::Black) | None => return,
            Some(Color::Gray) => {
                // found the back-edge; report every node from its first
                // occurrence on the stack to the top as the cycle.
                if let Some(start) = stack.iter().position(|s| *s == id) {
                    for &member in &stack[start..] {
                        if reported.insert(member, ()).is_none() {
                            store.push(Diagnostic::new(
                                DiagnosticCode::E3005,
                                format!("circular specialization involving `{member}`"),
                                member,
                            ));
                        }
                    }
                }
                return;
            }
            Some(Color::White) => {}
        }
        color.insert(id, Color::Gray);
        stack.push(id);
        if let Some(element) = model.get(id) {
            for target in element.specializes.iter().chain(element.typed_by.iter()) {
                visit(target, model, color, stack, reported, store);
            }
        }
        stack.pop();
        color.insert(id, Color::Black);
    }

    let ids: Vec<&str> = model.elements().map(|e| e.id.as_str()).collect();
    for id in ids {
        if color.get(id) == Some(&Color::White) {
            visit(id, model, &mut color, &mut stack, &mut reported, store);
        }
    }
}

/// KerML classifiers a feature-shaped kind (`Feature`, `Step`, `Expression`,
/// `Connector`, `Parameter`, ...) may be typed by, per §4.4's compatibility
/// table: "any KerML classifier ... and the corresponding SysML definition
/// kinds."
fn is_kerml_classifier(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Class
            | ElementKind::DataType
            | ElementKind::Structure
            | ElementKind::Association
            | ElementKind::AssociationStructure
            | ElementKind::Interaction
            | ElementKind::Behavior
            | ElementKind::Function
            | ElementKind::Predicate
            | ElementKind::Classifier
            | ElementKind::Type
    )
}

/// The KerML feature-shaped kinds that get the broad "any classifier or
/// definition" compatibility rule instead of a single `matching_def` pairing.
fn is_kerml_feature_shaped(kind: ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Feature
            | ElementKind::Step
            | ElementKind::Expression
            | ElementKind::BooleanExpression
            | ElementKind::Invariant
            | ElementKind::Connector
            | ElementKind::BindingConnector
            | ElementKind::Parameter
    )
}

/// Whether `usage_kind` may legally be typed by something resolving to
/// `resolved_kind`, per §4.4's type-compatibility table.
fn type_compatible(usage_kind: ElementKind, resolved_kind: ElementKind) -> bool {
    // A usage is always compatible with its paired Def (PartUsage/PartDef,
    // ActionUsage/ActionDef, ...).
    if usage_kind.matching_def() == Some(resolved_kind) {
        return true;
    }
    // Part usages are additionally compatible with ItemDef (items are
    // parts' supertypes in SysML v2).
    if usage_kind == ElementKind::PartUsage && resolved_kind == ElementKind::ItemDef {
        return true;
    }
    // State usages are compatible with ActionDef (state-action pattern).
    if usage_kind == ElementKind::StateUsage && resolved_kind == ElementKind::ActionDef {
        return true;
    }
    // Any usage is compatible with Package/LibraryPackage (opaque library
    // references).
    if usage_kind.is_usage() && matches!(resolved_kind, ElementKind::Package | ElementKind::LibraryPackage) {
        return true;
    }
    // KerML Feature/Step/Expression/Connector/Parameter are compatible with
    // any KerML classifier and with the corresponding SysML definition
    // kinds.
    if is_kerml_feature_shaped(usage_kind) && (is_kerml_classifier(resolved_kind) || resolved_kind.is_definition()) {
        return true;
    }
    // Parameter is compatible with every definition kind.
    if usage_kind == ElementKind::Parameter && resolved_kind.is_definition() {
        return true;
    }
    false
}

/// E3006: a usage's resolved type is incompatible with the usage's own kind
/// per the compatibility table in §4.4 (e.g. a `PartUsage` typed by a
/// `RequirementDef`, or any usage typed by another usage instead of a
/// definition).
pub fn type_mismatch(model: &SemanticModel, table: &SymbolTable, store: &mut DiagnosticStore) {
    let resolver = Resolver::new(table);
    for element in model.elements() {
        let scope = element_scope(table, element);
        for type_ref in &element.typed_by {
            let Some(symbol_id) = resolver.resolve(scope, type_ref) else {
                continue; // already reported by undefined_type
            };
            let Some(resolved_kind) = resolver.symbol(symbol_id).map(|s| s.kind) else {
                continue;
            };
            if !type_compatible(element.kind, resolved_kind) {
                store.push(Diagnostic::new(
                    DiagnosticCode::E3006,
                    format!(
                        "`{type_ref}` (a `{resolved_kind:?}`) is not a valid type for `{}` (a `{:?}`)",
                        element.local_name(),
                        element.kind,
                    ),
                    element.id.clone(),
                ));
            }
        }
    }
}

/// E3007: multiplicity bounds must be non-negative integers with
/// `lower <= upper`, where either bound may independently be negative and
/// be reported even if the other bound is absent or non-numeric. A bound of
/// `*` (unbounded) is written as the literal string `"*"` and is always
/// treated as satisfying the upper-bound half of the check.
pub fn multiplicity_law(model: &SemanticModel, store: &mut DiagnosticStore) {
    for element in model.elements() {
        let lower_val = element
            .multiplicity_lower
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok());
        if let Some(lower_val) = lower_val {
            if lower_val < 0 {
                store.push(Diagnostic::new(
                    DiagnosticCode::E3007,
                    format!("multiplicity lower bound {lower_val} is negative"),
                    element.id.clone(),
                ));
            }
        }

        let Some(upper) = element.multiplicity_upper.as_deref() else {
            continue;
        };
        if upper == "*" {
            continue;
        }
        let Ok(upper_val) = upper.parse::<i64>() else {
            continue; // non-numeric upper bound is a parser-level concern
        };
        if upper_val < 0 {
            store.push(Diagnostic::new(
                DiagnosticCode::E3007,
                format!("multiplicity upper bound {upper_val} is negative"),
                element.id.clone(),
            ));
        } else if let Some(lower_val) = lower_val {
            if upper_val < lower_val {
                store.push(Diagnostic::new(
                    DiagnosticCode::E3007,
                    format!("multiplicity upper bound {upper_val} is less than lower bound {lower_val}"),
                    element.id.clone(),
                ));
            }
        }
    }
}

/// A multiplicity bound parsed to a finite integer, or `None` for an
/// absent, non-numeric, or unbounded (`"*"`) bound — the widening checks
/// in [`redefinition_compatibility`] only compare bounds that are finite
/// on both sides.
fn finite_bound(bound: Option<&str>) -> Option<i64> {
    bound.and_then(|s| s.parse::<i64>().ok())
}

/// E3008: a redefining feature must not widen the multiplicity of the
/// feature it redefines — its lower bound must not be less than the
/// redefined feature's lower bound, and its upper bound must not exceed
/// the redefined feature's upper bound, whenever both sides are finite.
pub fn redefinition_compatibility(model: &SemanticModel, store: &mut DiagnosticStore) {
    for element in model.elements() {
        for redefined_id in &element.redefines {
            let Some(redefined) = model.get(redefined_id) else {
                continue; // undefined target is an undefined_feature concern
            };

            if let (Some(child_lower), Some(parent_lower)) = (
                finite_bound(element.multiplicity_lower.as_deref()),
                finite_bound(redefined.multiplicity_lower.as_deref()),
            ) {
                if child_lower < parent_lower {
                    store.push(Diagnostic::new(
                        DiagnosticCode::E3008,
                        format!(
                            "`{}` widens multiplicity: lower bound {child_lower} is less than `{redefined_id}`'s lower bound {parent_lower}",
                            element.local_name()
                        ),
                        element.id.clone(),
                    ));
                }
            }

            if let (Some(child_upper), Some(parent_upper)) = (
                finite_bound(element.multiplicity_upper.as_deref()),
                finite_bound(redefined.multiplicity_upper.as_deref()),
            ) {
                if child_upper > parent_upper {
                    store.push(Diagnostic::new(
                        DiagnosticCode::E3008,
                        format!(
                            "`{}` widens multiplicity: upper bound {child_upper} exceeds `{redefined_id}`'s upper bound {parent_upper}",
                            element.local_name()
                        ),
                        element.id.clone(),
                    ));
                }
            }
        }
    }
}

/// Warning: an element whose resolved type is an abstract definition, and
/// which is not itself marked abstract, instantiates an abstract type
/// directly.
pub fn abstract_instantiation(model: &SemanticModel, table: &SymbolTable, store: &mut DiagnosticStore) {
    let resolver = Resolver::new(table);
    for element in model.elements() {
        if element.is_abstract || !element.kind.is_usage() {
            continue;
        }
        let scope = element_scope(table, element);
        for type_ref in &element.typed_by {
            let Some(symbol_id) = resolver.resolve(scope, type_ref) else {
                continue;
            };
            let Some(resolved_qualified) = resolver.symbol(symbol_id).map(|s| s.qualified_name.clone()) else {
                continue;
            };
            let Some(resolved) = model.get(&resolved_qualified) else {
                continue;
            };
            if resolved.is_abstract {
                store.push(Diagnostic::new(
                    DiagnosticCode::AbstractInstantiation,
                    format!("`{type_ref}` is abstract and should not be instantiated directly"),
                    element.id.clone(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol_table::SymbolTable;

    fn table_with(entries: &[(&str, &str, ElementKind)]) -> SymbolTable {
        let mut table = SymbolTable::new();
        for (name, qualified, kind) in entries {
            let scope = match qualified.rsplit_once("::") {
                Some((prefix, _)) => table.get_or_create_scope(prefix),
                None => SymbolTable::ROOT,
            };
            table.insert(*name, *qualified, *kind, scope);
        }
        table
    }

    #[test]
    fn part_usage_is_compatible_with_item_def() {
        assert!(type_compatible(ElementKind::PartUsage, ElementKind::ItemDef));
    }

    #[test]
    fn state_usage_is_compatible_with_action_def() {
        assert!(type_compatible(ElementKind::StateUsage, ElementKind::ActionDef));
    }

    #[test]
    fn any_usage_is_compatible_with_package() {
        assert!(type_compatible(ElementKind::PartUsage, ElementKind::Package));
        assert!(type_compatible(ElementKind::ActionUsage, ElementKind::LibraryPackage));
    }

    #[test]
    fn kerml_feature_is_compatible_with_any_classifier() {
        assert!(type_compatible(ElementKind::Feature, ElementKind::Class));
        assert!(type_compatible(ElementKind::Step, ElementKind::Behavior));
    }

    #[test]
    fn parameter_is_compatible_with_any_definition() {
        assert!(type_compatible(ElementKind::Parameter, ElementKind::RequirementDef));
    }

    #[test]
    fn mismatched_def_kind_is_rejected() {
        assert!(!type_compatible(ElementKind::PartUsage, ElementKind::RequirementDef));
    }

    #[test]
    fn type_mismatch_flags_wrong_def_kind() {
        let mut model = SemanticModel::new();
        let mut req_def = Element::new("Pkg::ReqDef", ElementKind::RequirementDef).with_parent("Pkg");
        req_def.name = Some("ReqDef".into());
        model.insert_element(req_def);
        let mut usage = Element::new("Pkg::u1", ElementKind::PartUsage).with_parent("Pkg");
        usage.typed_by.push("ReqDef".into());
        model.insert_element(usage);

        let table = table_with(&[("ReqDef", "Pkg::ReqDef", ElementKind::RequirementDef)]);
        let mut store = DiagnosticStore::new();
        type_mismatch(&model, &table, &mut store);
        assert_eq!(store.iter().filter(|d| d.code == DiagnosticCode::E3006).count(), 1);
    }

    #[test]
    fn multiplicity_law_flags_negative_upper_even_without_lower() {
        let mut model = SemanticModel::new();
        let mut el = Element::new("Pkg::A", ElementKind::PartUsage);
        el.multiplicity_upper = Some("-1".into());
        model.insert_element(el);

        let mut store = DiagnosticStore::new();
        multiplicity_law(&model, &mut store);
        assert_eq!(store.iter().filter(|d| d.code == DiagnosticCode::E3007).count(), 1);
    }

    #[test]
    fn multiplicity_law_allows_star_upper() {
        let mut model = SemanticModel::new();
        let mut el = Element::new("Pkg::A", ElementKind::PartUsage);
        el.multiplicity_lower = Some("0".into());
        el.multiplicity_upper = Some("*".into());
        model.insert_element(el);

        let mut store = DiagnosticStore::new();
        multiplicity_law(&model, &mut store);
        assert!(store.is_empty());
    }

    #[test]
    fn suggest_corrections_flag_gates_help_notes() {
        let mut model = SemanticModel::new();
        let mut def = Element::new("Pkg::WidgetDef", ElementKind::PartDef).with_parent("Pkg");
        def.name = Some("WidgetDef".into());
        model.insert_element(def);
        let mut usage = Element::new("Pkg::u1", ElementKind::PartUsage).with_parent("Pkg");
        usage.typed_by.push("WidgetDeg".into());
        model.insert_element(usage);

        let table = table_with(&[("WidgetDef", "Pkg::WidgetDef", ElementKind::PartDef)]);
        let mut store = DiagnosticStore::new();
        undefined_type(&model, &table, false, &mut store);
        let diag = store.iter().find(|d| d.code == DiagnosticCode::E3001).unwrap();
        assert!(diag.notes.is_empty());
    }
}
