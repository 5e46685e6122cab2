//! # syster-semcore
//!
//! Core semantic-model engine for a SysML v2 / KerML toolchain.
//!
//! This crate owns the in-memory model representation and the two
//! non-trivial graph algorithms that operate on it: a semantic
//! [`validator`](validator) (scope/symbol resolution, type compatibility,
//! cycle detection, redefinition checks, multiplicity laws) and a
//! structural [`modifier`](modifier) (pattern-based delete with cascade,
//! and fragment merge with ID remapping).
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! validator, modifier  → algorithms over the model
//!   ↓
//! resolver             → name resolution built on the symbol table
//!   ↓
//! symbol_table          → nested scopes, symbols, fuzzy lookup
//!   ↓
//! model, query          → SemanticModel, Element, Relationship, QueryPattern
//!   ↓
//! arena, intern          → bump arena + string interner primitives
//! ```
//!
//! Lexing, parsing, the text writer, the CLI, and file I/O are external
//! collaborators: this crate exposes the data types and traits they need
//! (`SemanticModel`, `Element`, `Relationship`, `Diagnostic`) but does not
//! implement any of them.

pub mod arena;
pub mod diagnostic;
pub mod element;
pub mod intern;
pub mod model;
pub mod modifier;
pub mod query;
pub mod relationship;
pub mod resolver;
pub mod symbol_table;
pub mod validator;

pub use arena::{Arena, ArenaId, Checkpoint};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticStore, Note, Severity};
pub use element::{Direction, Element, ElementKind, MetadataUsage, SourceRange, Trivia};
pub use intern::{Interned, Interner};
pub use model::{SemanticModel, SourceFile};
pub use modifier::{delete, merge, try_merge, DeleteResult, MergeOptions, MergeOutcome, MergeResult};
pub use query::{PatternKind, QueryPattern};
pub use relationship::{ImportKind, Relationship, RelationshipKind};
pub use resolver::Resolver;
pub use symbol_table::{Scope, Symbol, SymbolId, SymbolTable};
pub use validator::{validate, validate_many, ValidationOptions, ValidationStatus};
