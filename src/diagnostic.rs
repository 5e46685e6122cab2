//! Diagnostics: severities, codes, and the append-only store the validator
//! writes into.
//!
//! Shaped after `hir::diagnostics` (`Severity`, `Diagnostic`, a `codes`
//! module of string constants). Codes are a closed enum here
//! rather than bare string constants, so a diagnostic's code can't drift
//! from the set the validator actually emits.

use crate::arena::Arena;
use crate::element::SourceRange;
use crate::intern::Interned;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// One diagnostic code per validator check, plus the one warning-level
/// check (unparameterized abstract instantiation).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Undefined type reference.
    E3001,
    /// Undefined feature reference.
    E3002,
    /// Undefined namespace reference (import target).
    E3003,
    /// Duplicate name in the same scope.
    E3004,
    /// Circular specialization/subtyping chain.
    E3005,
    /// Type mismatch between a usage and the definition it's typed by.
    E3006,
    /// Multiplicity bound law violation (lower > upper, negative bound).
    E3007,
    /// Incompatible redefinition (redefining feature not a specialization
    /// of the redefined one).
    E3008,
    /// Warning: an abstract definition instantiated directly.
    AbstractInstantiation,
}

impl DiagnosticCode {
    pub fn severity(self) -> Severity {
        match self {
            Self::AbstractInstantiation => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::E3001 => "E3001",
            Self::E3002 => "E3002",
            Self::E3003 => "E3003",
            Self::E3004 => "E3004",
            Self::E3005 => "E3005",
            Self::E3006 => "E3006",
            Self::E3007 => "E3007",
            Self::E3008 => "E3008",
            Self::AbstractInstantiation => "abstract-instantiation",
        }
    }
}

/// A supplementary note attached to a diagnostic (e.g. "did you mean
/// `Pkg::Widget`?" or "defined here").
#[derive(Clone, Debug)]
pub struct Note {
    pub message: String,
    pub range: Option<SourceRange>,
}

impl Note {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            range: None,
        }
    }

    pub fn at(message: impl Into<String>, range: SourceRange) -> Self {
        Self {
            message: message.into(),
            range: Some(range),
        }
    }
}

/// One finding from a validator pass.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    /// Id of the element the diagnostic is reported against.
    pub element_id: Interned,
    pub range: Option<SourceRange>,
    pub notes: Vec<Note>,
    /// Path of the originating model's source file, if any. Unset by a
    /// single-model [`crate::validator::validate`] call; stamped by
    /// [`crate::validator::validate_many`] so diagnostics from several
    /// models can be reported together without losing provenance.
    pub source_file: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, element_id: impl Into<Interned>) -> Self {
        Self {
            code,
            message: message.into(),
            element_id: element_id.into(),
            range: None,
            notes: Vec::new(),
            source_file: None,
        }
    }

    pub fn with_range(mut self, range: SourceRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

/// Append-only collection of diagnostics produced by a validation run,
/// backed by the same [`Arena`] primitive every other owning collection in
/// this crate uses — spec §4.7 describes the store as "an append-only
/// singly-linked list in arena memory," and `Arena<Diagnostic>` is the
/// direct realization of that: it only ever grows, matching how the
/// validator always revalidates a model from scratch into a fresh store
/// rather than patching prior diagnostics out of an existing one.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticStore {
    diagnostics: Arena<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.diagnostics.alloc(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Consume the store, yielding its diagnostics in push order. Used by
    /// [`crate::validator::validate_many`] to restamp and re-push
    /// diagnostics from a per-model store into a combined one.
    pub fn into_iter(self) -> impl Iterator<Item = Diagnostic> {
        self.diagnostics.into_values()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pushing_updates_counts_by_severity() {
        let mut store = DiagnosticStore::new();
        store.push(Diagnostic::new(DiagnosticCode::E3001, "undefined type", "Pkg::A"));
        store.push(Diagnostic::new(
            DiagnosticCode::AbstractInstantiation,
            "abstract instantiated",
            "Pkg::B",
        ));
        assert_eq!(store.error_count(), 1);
        assert_eq!(store.warning_count(), 1);
        assert_eq!(store.len(), 2);
        assert!(store.has_errors());
    }

    #[test]
    fn empty_store_has_no_errors() {
        let store = DiagnosticStore::new();
        assert!(!store.has_errors());
        assert!(store.is_empty());
    }

    #[test]
    fn code_severity_matches_table() {
        assert_eq!(DiagnosticCode::E3005.severity(), Severity::Error);
        assert_eq!(DiagnosticCode::AbstractInstantiation.severity(), Severity::Warning);
    }
}
