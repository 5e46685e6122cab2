//! Pattern-based structural delete with ownership cascade and relationship
//! sweep.
//!
//! Follows `interchange::editing::ChangeTracker::remove_element`
//! (cascades through `owned_elements`, sweeps `relationships.retain`,
//! `swap_remove`s from `roots`), generalized from a single target id to a
//! [`QueryPattern`] chain and from an in-place mutation to a pure
//! model-to-model transform.

use rustc_hash::FxHashSet;

use crate::intern::Interned;
use crate::model::SemanticModel;
use crate::query::{PatternKind, QueryPattern};

/// What a [`delete`] call removed.
#[derive(Clone, Debug, Default)]
pub struct DeleteResult {
    pub model: SemanticModel,
    /// Every removed element's id, in the original model's authoring
    /// order. Includes elements cascaded away because their owner was
    /// removed, not just the ones the pattern matched directly.
    pub deleted: Vec<Interned>,
    /// Relationships dropped because one endpoint no longer exists.
    pub swept_relationships: Vec<Interned>,
}

fn link_matches(link: &QueryPattern, model: &SemanticModel, id: &str) -> bool {
    match link.kind {
        PatternKind::Exact => id == link.base,
        PatternKind::Direct => model
            .get(id)
            .and_then(|e| e.parent_id.as_deref())
            .is_some_and(|parent| parent == link.base),
        PatternKind::Recursive => {
            id == link.base
                || id
                    .strip_prefix(link.base.as_str())
                    .is_some_and(|rest| rest.starts_with("::"))
        }
    }
}

fn pattern_matches(pattern: &QueryPattern, model: &SemanticModel, id: &str) -> bool {
    pattern.iter().any(|link| link_matches(link, model, id))
}

/// Delete every element `pattern` matches, plus every element transitively
/// owned by a match (an owned element cannot outlive its owner), then
/// sweep any relationship left dangling a reference to a removed element.
pub fn delete(model: &SemanticModel, pattern: &QueryPattern) -> DeleteResult {
    let mut to_delete: FxHashSet<Interned> = FxHashSet::default();
    let mut worklist: Vec<Interned> = Vec::new();

    for element in model.elements() {
        if pattern_matches(pattern, model, element.id.as_str()) && to_delete.insert(element.id.clone()) {
            worklist.push(element.id.clone());
        }
    }
    while let Some(id) = worklist.pop() {
        for child in model.children_of(&id) {
            if to_delete.insert(child.id.clone()) {
                worklist.push(child.id.clone());
            }
        }
    }

    let mut new_model = SemanticModel::new();
    new_model.source_file = model.source_file.clone();
    let mut deleted = Vec::new();
    for element in model.elements() {
        if to_delete.contains(element.id.as_str()) {
            deleted.push(element.id.clone());
        } else {
            new_model.insert_element(element.clone());
        }
    }

    let mut swept_relationships = Vec::new();
    for rel in model.relationships() {
        let dangling = to_delete.contains(rel.source.as_str()) || to_delete.contains(rel.target.as_str());
        if dangling {
            swept_relationships.push(rel.id.clone());
        } else {
            new_model.insert_relationship(rel.clone());
        }
    }

    DeleteResult {
        model: new_model,
        deleted,
        swept_relationships,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, ElementKind};
    use crate::relationship::{Relationship, RelationshipKind};

    fn sample_model() -> SemanticModel {
        let mut model = SemanticModel::new();
        model.insert_element(Element::new("Pkg", ElementKind::Package));
        model.insert_element(Element::new("Pkg::A", ElementKind::PartDef).with_parent("Pkg"));
        model.insert_element(Element::new("Pkg::A::Child", ElementKind::PartUsage).with_parent("Pkg::A"));
        model.insert_element(Element::new("Pkg::B", ElementKind::PartDef).with_parent("Pkg"));
        model.insert_relationship(Relationship::new(
            "r1",
            RelationshipKind::Specialization,
            "Pkg::B",
            "Pkg::A",
        ));
        model
    }

    #[test]
    fn exact_delete_cascades_to_owned_children() {
        let model = sample_model();
        let pattern = QueryPattern::parse("Pkg::A").unwrap();
        let result = delete(&model, &pattern);
        assert!(!result.model.contains("Pkg::A"));
        assert!(!result.model.contains("Pkg::A::Child"));
        assert!(result.model.contains("Pkg::B"));
    }

    #[test]
    fn delete_sweeps_dangling_relationship() {
        let model = sample_model();
        let pattern = QueryPattern::parse("Pkg::A").unwrap();
        let result = delete(&model, &pattern);
        assert_eq!(result.swept_relationships, vec!["r1".to_string()]);
        assert_eq!(result.model.relationship_count(), 0);
    }

    #[test]
    fn recursive_delete_removes_whole_subtree_in_one_pattern() {
        let model = sample_model();
        let pattern = QueryPattern::parse("Pkg::**").unwrap();
        let result = delete(&model, &pattern);
        assert_eq!(result.model.element_count(), 0);
        assert_eq!(result.deleted.len(), 4);
    }

    #[test]
    fn direct_pattern_deletes_only_immediate_children() {
        let model = sample_model();
        let pattern = QueryPattern::parse("Pkg::*").unwrap();
        let result = delete(&model, &pattern);
        assert!(result.model.contains("Pkg"));
        assert!(!result.model.contains("Pkg::A"));
        assert!(!result.model.contains("Pkg::A::Child")); // cascaded
        assert!(!result.model.contains("Pkg::B"));
    }
}
