//! Fragment merge: UPSERT a whole model into a scope of another model.
//!
//! Follows `interchange::editing::ChangeTracker::reparent`
//! and `add_element` (moving a subtree under a new owner, rewriting
//! `owner`/`owned_elements`), generalized from moving one existing element
//! to remapping and grafting an entire fragment model under a target
//! scope, with repeated-merge idempotency for metadata borrowed from
//! `set_property`'s replace-not-append semantics.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::element::Element;
use crate::intern::Interned;
use crate::model::SemanticModel;
use crate::relationship::{Relationship, RelationshipKind};

/// Controls whether [`merge`] may synthesize missing ancestor scopes and
/// whether it clears `target_scope`'s existing direct children first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeOptions {
    /// If `target_scope` (or any ancestor of it) does not exist in the
    /// base model, create minimal `Package` placeholders for it instead
    /// of failing.
    pub create_scope: bool,
    /// If `true`, drop every base element that is a direct child of
    /// `target_scope` (and, transitively, everything *those* own, so no
    /// element is left referencing a parent that no longer exists) before
    /// grafting the fragment in. This is how an order-sensitive upsert
    /// replaces a scope's contents wholesale instead of appending to them.
    pub replace_scope: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            create_scope: true,
            replace_scope: false,
        }
    }
}

/// What a successful [`merge`] did.
#[derive(Clone, Debug, Default)]
pub struct MergeResult {
    pub model: SemanticModel,
    /// Ids (already remapped into the target scope) of elements that did
    /// not exist in the base model before this merge.
    pub added: Vec<Interned>,
    /// Ids of elements that existed in the base model and were
    /// overwritten by the fragment's version.
    pub replaced: Vec<Interned>,
}

/// Structural reasons [`merge`] can't proceed, for callers that want a
/// typed error instead of matching on `None`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MergeOutcome {
    #[error("target scope `{target_scope}` does not exist and create_scope is disabled")]
    TargetScopeMissing { target_scope: String },
}

/// Remap a fragment-relative id onto its place under `target_scope` in the
/// merged model. A fragment id is always grafted whole — `"Widget::Part"`
/// becomes `"Pkg::Sub::Widget::Part"` — since qualified ids are already
/// unique within the fragment, regardless of how many distinct root trees
/// it contains.
fn remap_id(old_id: &str, target_scope: &str) -> String {
    if target_scope.is_empty() {
        old_id.to_string()
    } else {
        format!("{target_scope}::{old_id}")
    }
}

/// Rewrite `reference` through `id_map` if it names a fragment-internal
/// element; otherwise leave it untouched — it names something outside the
/// fragment (a library name, a builtin, or an element already in `base`)
/// and must survive the merge verbatim.
fn remap_reference(reference: &str, id_map: &FxHashMap<String, String>) -> Interned {
    match id_map.get(reference) {
        Some(new_id) => Interned::from(new_id.as_str()),
        None => Interned::from(reference),
    }
}

/// Every id that is a direct child of `scope`, plus everything transitively
/// owned by one of those children, so removing them never leaves a
/// dangling `parent_id` behind.
fn direct_children_and_their_descendants(model: &SemanticModel, scope: &str) -> FxHashSet<String> {
    let mut doomed: FxHashSet<String> = FxHashSet::default();
    let mut worklist: Vec<String> = model
        .children_of(scope)
        .map(|e| e.id.to_string())
        .collect();
    for id in &worklist {
        doomed.insert(id.clone());
    }
    while let Some(id) = worklist.pop() {
        for child in model.children_of(&id) {
            if doomed.insert(child.id.to_string()) {
                worklist.push(child.id.to_string());
            }
        }
    }
    doomed
}

/// Merge `fragment` into `base` under `target_scope`, remapping every
/// fragment element and relationship id onto the target scope's
/// namespace. An element whose remapped id already exists in `base` is
/// replaced outright — including its trivia and metadata, which are never
/// accumulated across repeated merges of the same fragment — rather than
/// field-by-field merged. Qualified-name references inside fragment
/// elements (`typed_by`, `specializes`, `redefines`, `references`) and
/// relationship endpoints are rewritten through the same id map only when
/// they name another fragment element; references to anything else are
/// preserved verbatim, since they point outside the fragment. Returns
/// `None` if `target_scope` doesn't exist and `options.create_scope` is
/// `false`; see [`MergeOutcome`] for a typed alternative via [`try_merge`].
pub fn merge(
    base: &SemanticModel,
    fragment: &SemanticModel,
    target_scope: &str,
    options: MergeOptions,
) -> Option<MergeResult> {
    let mut merged = base.clone();

    if !target_scope.is_empty() && !merged.contains(target_scope) {
        if !options.create_scope {
            return None;
        }
        let mut prefix = String::new();
        for segment in target_scope.split("::") {
            let parent = if prefix.is_empty() { None } else { Some(prefix.clone()) };
            if !prefix.is_empty() {
                prefix.push_str("::");
            }
            prefix.push_str(segment);
            if !merged.contains(&prefix) {
                let mut scope_element = Element::new(prefix.clone(), crate::element::ElementKind::Package)
                    .with_name(segment);
                if let Some(parent) = parent {
                    scope_element = scope_element.with_parent(parent);
                }
                merged.insert_element(scope_element);
            }
        }
    }

    if options.replace_scope && !target_scope.is_empty() {
        let doomed = direct_children_and_their_descendants(&merged, target_scope);
        if !doomed.is_empty() {
            let survivors: Vec<Element> = merged
                .elements()
                .filter(|e| !doomed.contains(e.id.as_str()))
                .cloned()
                .collect();
            let surviving_rels: Vec<_> = merged
                .relationships()
                .filter(|r| !doomed.contains(r.source.as_str()) && !doomed.contains(r.target.as_str()))
                .cloned()
                .collect();
            let mut rebuilt = SemanticModel::new();
            rebuilt.source_file = merged.source_file.clone();
            for element in survivors {
                rebuilt.insert_element(element);
            }
            for rel in surviving_rels {
                rebuilt.insert_relationship(rel);
            }
            merged = rebuilt;
        }
    }

    // Fragment-internal id map, built before any remapped element is
    // inserted so every reference rewrite below sees the complete set of
    // fragment-internal ids regardless of visitation order.
    let id_map: FxHashMap<String, String> = fragment
        .elements()
        .map(|e| (e.id.to_string(), remap_id(e.id.as_str(), target_scope)))
        .collect();

    let mut added = Vec::new();
    let mut replaced = Vec::new();

    for element in fragment.elements() {
        let new_id = id_map[element.id.as_str()].clone();

        let mut remapped = element.clone();
        remapped.id = new_id.clone().into();
        remapped.parent_id = match &element.parent_id {
            Some(parent) => Some(remap_reference(parent, &id_map)),
            None if target_scope.is_empty() => None,
            None => Some(target_scope.into()),
        };
        remapped.typed_by = element.typed_by.iter().map(|r| remap_reference(r, &id_map)).collect();
        remapped.specializes = element.specializes.iter().map(|r| remap_reference(r, &id_map)).collect();
        remapped.redefines = element.redefines.iter().map(|r| remap_reference(r, &id_map)).collect();
        remapped.references = element.references.iter().map(|r| remap_reference(r, &id_map)).collect();

        // Removing before re-inserting (rather than overwriting in place)
        // moves a replaced element to the end of iteration order, same as
        // a freshly-added one — giving the fragment's authoring order to
        // both added and replaced elements per the merge ordering rule,
        // instead of leaving a replaced element pinned at its old base
        // position.
        if merged.remove_element(&new_id).is_some() {
            replaced.push(Interned::from(new_id.as_str()));
        } else {
            added.push(Interned::from(new_id.as_str()));
        }
        merged.insert_element(remapped);
    }

    let remapped_rels: Vec<Relationship> = fragment
        .relationships()
        .map(|rel| {
            let mut remapped = rel.clone();
            remapped.source = remap_reference(rel.source.as_str(), &id_map);
            remapped.target = remap_reference(rel.target.as_str(), &id_map);
            remapped
        })
        .collect();

    // Drop any existing relationship whose (kind, source, target) identity
    // a fragment relationship is about to recreate, so a repeated merge of
    // the same fragment doesn't duplicate it — mirrors the replace-not-grow
    // treatment elements already get above.
    let incoming: FxHashSet<(RelationshipKind, Interned, Interned)> = remapped_rels
        .iter()
        .map(|r| (r.kind, r.source.clone(), r.target.clone()))
        .collect();
    merged.retain_relationships(|existing| {
        !incoming.contains(&(existing.kind, existing.source.clone(), existing.target.clone()))
    });

    for remapped in remapped_rels {
        merged.insert_relationship(remapped);
    }

    // Target-scope reset (mandatory): the fragment can only author
    // elements *under* target_scope, never target_scope's own record, so
    // the scope's accumulated trivia/metadata from prior merges is always
    // cleared here rather than grown — this is what keeps repeated
    // upserts of a `#SourceFile`-annotated fragment from piling up
    // duplicate prefix metadata on the scope they land in.
    if !target_scope.is_empty() {
        if let Some(target_element) = merged.get_mut(target_scope) {
            target_element.leading_trivia.clear();
            target_element.trailing_trivia.clear();
            target_element.metadata.clear();
            target_element.prefix_metadata.clear();
        }
    }

    Some(MergeResult {
        model: merged,
        added,
        replaced,
    })
}

/// Like [`merge`] but returns a typed [`MergeOutcome`] error instead of
/// `None` when the target scope is missing.
pub fn try_merge(
    base: &SemanticModel,
    fragment: &SemanticModel,
    target_scope: &str,
    options: MergeOptions,
) -> Result<MergeResult, MergeOutcome> {
    merge(base, fragment, target_scope, options).ok_or_else(|| MergeOutcome::TargetScopeMissing {
        target_scope: target_scope.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::relationship::{Relationship, RelationshipKind};

    fn fragment_with_one_root() -> SemanticModel {
        let mut fragment = SemanticModel::new();
        fragment.insert_element(Element::new("Widget", ElementKind::PartDef));
        fragment.insert_element(Element::new("Widget::Part", ElementKind::PartUsage).with_parent("Widget"));
        fragment
    }

    #[test]
    fn merge_into_missing_scope_creates_it_by_default() {
        let base = SemanticModel::new();
        let fragment = fragment_with_one_root();
        let result = merge(&base, &fragment, "Pkg::Sub", MergeOptions::default()).unwrap();
        assert!(result.model.contains("Pkg"));
        assert!(result.model.contains("Pkg::Sub"));
        assert!(result.model.contains("Pkg::Sub::Widget"));
        assert!(result.model.contains("Pkg::Sub::Widget::Part"));
    }

    #[test]
    fn merge_fails_without_create_scope_when_target_missing() {
        let base = SemanticModel::new();
        let fragment = fragment_with_one_root();
        let options = MergeOptions {
            create_scope: false,
            ..MergeOptions::default()
        };
        assert!(merge(&base, &fragment, "Pkg::Sub", options).is_none());
        assert!(matches!(
            try_merge(&base, &fragment, "Pkg::Sub", options),
            Err(MergeOutcome::TargetScopeMissing { .. })
        ));
    }

    #[test]
    fn merge_preserves_unrelated_base_children() {
        let mut base = SemanticModel::new();
        base.insert_element(Element::new("Pkg", ElementKind::Package));
        base.insert_element(Element::new("Pkg::Other", ElementKind::PartDef).with_parent("Pkg"));
        let fragment = fragment_with_one_root();
        let result = merge(&base, &fragment, "Pkg", MergeOptions::default()).unwrap();
        assert!(result.model.contains("Pkg::Other"));
        assert!(result.model.contains("Pkg::Widget"));
    }

    #[test]
    fn repeated_merge_does_not_accumulate_metadata() {
        let base = SemanticModel::new();
        let mut fragment = fragment_with_one_root();
        fragment.get_mut("Widget").unwrap().leading_trivia.push("// note".to_string());

        let once = merge(&base, &fragment, "Pkg", MergeOptions::default()).unwrap();
        let twice = merge(&once.model, &fragment, "Pkg", MergeOptions::default()).unwrap();

        let element = twice.model.get("Pkg::Widget").unwrap();
        assert_eq!(element.leading_trivia.len(), 1);
        assert_eq!(twice.replaced, vec!["Pkg::Widget".to_string(), "Pkg::Widget::Part".to_string()]);
    }

    #[test]
    fn target_scope_prefix_metadata_is_cleared_not_accumulated() {
        use crate::element::MetadataUsage;

        let mut base = SemanticModel::new();
        let mut pkg = Element::new("Pkg", ElementKind::Package);
        pkg.prefix_metadata.push(MetadataUsage { annotation: "SourceFile".into() });
        base.insert_element(pkg);

        let mut fragment = SemanticModel::new();
        let mut elem = Element::new("Elem", ElementKind::PartDef);
        elem.prefix_metadata.push(MetadataUsage { annotation: "SourceFile".into() });
        fragment.insert_element(elem);

        let mut merged = merge(&base, &fragment, "Pkg", MergeOptions::default()).unwrap();
        for _ in 0..3 {
            merged = merge(&merged.model, &fragment, "Pkg", MergeOptions::default()).unwrap();
        }

        assert_eq!(merged.model.get("Pkg").unwrap().prefix_metadata.len(), 0);
        assert_eq!(merged.model.get("Pkg::Elem").unwrap().prefix_metadata.len(), 1);
    }

    #[test]
    fn external_references_are_preserved_verbatim() {
        let mut base = SemanticModel::new();
        base.insert_element(Element::new("Lib::External", ElementKind::PartDef));

        let mut fragment = SemanticModel::new();
        let mut usage = Element::new("Usage", ElementKind::PartUsage);
        usage.typed_by.push("Lib::External".into());
        fragment.insert_element(usage);

        let result = merge(&base, &fragment, "Pkg", MergeOptions::default()).unwrap();
        let remapped = result.model.get("Pkg::Usage").unwrap();
        assert_eq!(remapped.typed_by, vec!["Lib::External".to_string()]);
    }

    #[test]
    fn fragment_internal_references_are_remapped_together() {
        let base = SemanticModel::new();
        let mut fragment = SemanticModel::new();
        fragment.insert_element(Element::new("Base", ElementKind::PartDef));
        let mut sub = Element::new("Sub", ElementKind::PartDef);
        sub.specializes.push("Base".into());
        fragment.insert_element(sub);
        fragment.insert_relationship(Relationship::new(
            "spec",
            RelationshipKind::Specialization,
            "Sub",
            "Base",
        ));

        let result = merge(&base, &fragment, "Pkg", MergeOptions::default()).unwrap();
        let sub = result.model.get("Pkg::Sub").unwrap();
        assert_eq!(sub.specializes, vec!["Pkg::Base".to_string()]);
        let rel = result.model.relationships().next().unwrap();
        assert_eq!(rel.source, "Pkg::Sub");
        assert_eq!(rel.target, "Pkg::Base");
    }

    #[test]
    fn replace_scope_drops_prior_direct_children_not_reauthored_by_fragment() {
        let mut base = SemanticModel::new();
        base.insert_element(Element::new("Pkg", ElementKind::Package));
        base.insert_element(Element::new("Pkg::Stale", ElementKind::PartDef).with_parent("Pkg"));
        base.insert_element(Element::new("Pkg::Stale::Child", ElementKind::PartUsage).with_parent("Pkg::Stale"));

        let fragment = fragment_with_one_root();
        let options = MergeOptions {
            create_scope: true,
            replace_scope: true,
        };
        let result = merge(&base, &fragment, "Pkg", options).unwrap();

        assert!(!result.model.contains("Pkg::Stale"));
        assert!(!result.model.contains("Pkg::Stale::Child"));
        assert!(result.model.contains("Pkg::Widget"));
        assert!(result.model.contains("Pkg::Widget::Part"));
    }

    #[test]
    fn replace_scope_false_keeps_prior_children_alongside_fragment() {
        let mut base = SemanticModel::new();
        base.insert_element(Element::new("Pkg", ElementKind::Package));
        base.insert_element(Element::new("Pkg::Existing", ElementKind::PartDef).with_parent("Pkg"));

        let fragment = fragment_with_one_root();
        let result = merge(&base, &fragment, "Pkg", MergeOptions::default()).unwrap();

        assert!(result.model.contains("Pkg::Existing"));
        assert!(result.model.contains("Pkg::Widget"));
    }
}
