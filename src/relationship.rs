//! [`Relationship`] — first-class cross-reference records.
//!
//! Shaped after `interchange::integrate::RelationshipKind`
//! (`Specializes`/`TypedBy`/`Redefines`/`Subsets`/`Satisfies`/`Verifies`,
//! among others) and `hir::symbols::RelationshipKind`, reshaped as a
//! standalone record rather than nested inside an `Element`: relationships
//! and elements live in separate flat vectors and refer to each other only
//! by interned id string, so neither needs a back-pointer into the other.

use crate::intern::Interned;

/// The `Import` relationship's three textual-notation variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import Pkg::Elem;`
    Import,
    /// `import Pkg::*;`
    ImportAll,
    /// `import Pkg::**;`
    ImportRecursive,
}

/// The kind of a first-class relationship edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// `:>` between definitions.
    Specialization,
    /// `~` conjugation.
    Conjugation,
    /// `:>` between KerML classifiers.
    Subclassification,
    /// `:` typing of a usage by a definition.
    FeatureTyping,
    /// `subsets` / `::>` subsetting.
    Subsetting,
    /// `:>>` redefinition.
    Redefinition,
    Connection,
    Flow,
    Allocation,
    Satisfy,
    Verify,
    Transition,
    Succession,
    /// `=` binding connector.
    Bind,
    /// `import`, carrying which textual variant via [`Relationship::import_kind`].
    Import,
}

/// A separate owned record modelling a cross-reference that survives as a
/// first-class object rather than an inline field on [`crate::Element`].
#[derive(Clone, Debug)]
pub struct Relationship {
    pub id: Interned,
    pub kind: RelationshipKind,
    /// The relationship's owner (for most kinds) or subject.
    pub source: Interned,
    pub target: Interned,
    /// Populated only when `kind == RelationshipKind::Import`.
    pub import_kind: Option<ImportKind>,
}

impl Relationship {
    pub fn new(
        id: impl Into<Interned>,
        kind: RelationshipKind,
        source: impl Into<Interned>,
        target: impl Into<Interned>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source: source.into(),
            target: target.into(),
            import_kind: None,
        }
    }

    pub fn import(
        id: impl Into<Interned>,
        source: impl Into<Interned>,
        target: impl Into<Interned>,
        import_kind: ImportKind,
    ) -> Self {
        Self {
            id: id.into(),
            kind: RelationshipKind::Import,
            source: source.into(),
            target: target.into(),
            import_kind: Some(import_kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_carries_its_variant() {
        let rel = Relationship::import("imp1", "Pkg::Body", "Other::*", ImportKind::ImportAll);
        assert_eq!(rel.kind, RelationshipKind::Import);
        assert_eq!(rel.import_kind, Some(ImportKind::ImportAll));
    }

    #[test]
    fn non_import_has_no_import_kind() {
        let rel = Relationship::new("s1", RelationshipKind::Specialization, "Pkg::A", "Pkg::B");
        assert_eq!(rel.import_kind, None);
    }
}
