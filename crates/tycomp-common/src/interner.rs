//! String interner for identifier deduplication.
//!
//! Identifiers, member names and argument labels are interned once and passed
//! around as `Atom`s. Comparisons become integer comparisons and the AST, the
//! type environment and the completion layer can all refer to the same names
//! without sharing string storage.

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names every builtin member table refers to. Interning them up front keeps
/// their atoms small and stable across requests.
const COMMON_STRINGS: &[&str] = &[
    // Builtin type names
    "Int",
    "Double",
    "Bool",
    "String",
    "Void",
    // Builtin members
    "count",
    "isEmpty",
    "first",
    "append",
    "contains",
    "reversed",
    "description",
    "advanced",
    "by",
    "isMultiple",
    "of",
    "rounded",
    "uppercased",
    "hasPrefix",
    "toggle",
];

/// String interner with interior mutability.
///
/// Index 0 is reserved for the empty string so `Atom::NONE` always resolves.
/// Interning takes `&self`, which lets the arena, the type environment and the
/// completion handlers share one interner by reference.
pub struct Interner {
    strings: RwLock<IndexSet<Arc<str>, FxBuildHasher>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut strings = IndexSet::with_capacity_and_hasher(256, FxBuildHasher);
        strings.insert(Arc::from(""));
        let interner = Interner {
            strings: RwLock::new(strings),
        };
        interner.intern_common();
        interner
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    pub fn intern(&self, s: &str) -> Atom {
        if let Some(atom) = self.get(s) {
            return atom;
        }
        let mut strings = self.strings.write().expect("interner lock poisoned");
        let (index, _) = strings.insert_full(Arc::from(s));
        Atom(index as u32)
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Atom> {
        let strings = self.strings.read().expect("interner lock poisoned");
        strings.get_index_of(s).map(|index| Atom(index as u32))
    }

    /// Resolve an Atom back to its string value.
    /// Returns the empty string if the atom is out of bounds.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    /// Try to resolve an Atom, returning None if invalid.
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let strings = self.strings.read().expect("interner lock poisoned");
        strings.get_index(atom.0 as usize).cloned()
    }

    /// Get the number of interned strings, including the reserved empty string.
    pub fn len(&self) -> usize {
        self.strings.read().expect("interner lock poisoned").len()
    }

    /// Check if the interner holds nothing beyond the empty string.
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod interner_tests;
