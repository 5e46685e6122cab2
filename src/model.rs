//! [`SemanticModel`] — the flat, ordered collection of elements and
//! relationships that every algorithm in this crate operates on.
//!
//! Shaped after `interchange::model::Model` (ordered element
//! storage + a separate relationship vector) and `semantic::workspace` for
//! the `source_file` provenance descriptor. `IndexMap` is used because
//! authoring order must survive every read and every modifier output — an
//! ordinary `HashMap` would silently reorder on iteration.

use indexmap::IndexMap;

use crate::element::Element;
use crate::intern::Interned;
use crate::relationship::Relationship;

/// Line-offset table and raw content for a parsed file, carried only to
/// give diagnostics provenance. Populated by the (external) parser; never
/// written by this crate's own algorithms.
#[derive(Clone, Debug, Default)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
    /// Byte offset of the start of each line; `line_offsets[0] == 0`.
    pub line_offsets: Vec<u32>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let mut line_offsets = vec![0u32];
        for (i, b) in content.bytes().enumerate() {
            if b == b'\n' {
                line_offsets.push((i + 1) as u32);
            }
        }
        Self {
            path: path.into(),
            content,
            line_offsets,
        }
    }
}

/// The in-memory semantic model: an ordered vector of elements, an ordered
/// vector of relationships, and optional source provenance.
///
/// Authoring order (insertion order) is preserved by every read and by
/// every [`crate::modifier`] output — the external text writer depends on
/// it for round-tripping.
#[derive(Clone, Debug, Default)]
pub struct SemanticModel {
    elements: IndexMap<Interned, Element>,
    relationships: Vec<Relationship>,
    pub source_file: Option<SourceFile>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an element by id, preserving first-insertion
    /// position (matches `IndexMap::insert` semantics: overwriting an
    /// existing key does not move it).
    pub fn insert_element(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn insert_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    /// Drop every relationship for which `keep` returns `false`, preserving
    /// the relative order of the rest. Used by the merge modifier to strip
    /// out a prior merge's relationships before re-adding the fragment's,
    /// so repeated merges of the same fragment don't duplicate them.
    pub fn retain_relationships(&mut self, keep: impl FnMut(&Relationship) -> bool) {
        self.relationships.retain(keep);
    }

    /// Remove an element by id, returning it if present. Shifts every
    /// element after it back by one position — unlike [`insert_element`]
    /// overwriting an existing key, this actually changes iteration order,
    /// which is what lets a caller re-insert the element later to move it
    /// (used by the merge modifier to give replaced elements the
    /// fragment's order instead of their old base position).
    ///
    /// [`insert_element`]: Self::insert_element
    pub fn remove_element(&mut self, id: &str) -> Option<Element> {
        self.elements.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Elements in authoring order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Relationships in authoring order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Direct children of `parent_id`, in authoring order.
    pub fn children_of<'a>(&'a self, parent_id: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements
            .values()
            .filter(move |e| e.parent_id.as_deref() == Some(parent_id))
    }

    /// Every element whose id is `base` itself or has `base` as a proper
    /// `::`-prefix, where "proper prefix" requires a `::` separator right
    /// after `base` (so `"Pkg::A"` never matches `"Pkg::AB"`).
    pub fn descendants_of<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a Element> {
        let prefix = format!("{base}::");
        self.elements
            .values()
            .filter(move |e| e.id.as_str() == base || e.id.starts_with(&prefix))
    }
}
