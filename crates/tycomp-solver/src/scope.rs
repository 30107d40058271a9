//! Lexical bindings visible to an expression being solved.

use crate::types::TypeId;
use tycomp_common::Atom;

/// Names bound before the solved expression: parameters and earlier
/// `let`s. Later bindings shadow earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocalScope {
    bindings: Vec<(Atom, TypeId)>,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: Atom, type_id: TypeId) {
        self.bindings.push((name, type_id));
    }

    /// Innermost binding for `name`.
    pub fn lookup(&self, name: Atom) -> Option<TypeId> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| *bound == name)
            .map(|(_, type_id)| *type_id)
    }

    /// Current depth, for restoring with [`LocalScope::truncate`].
    pub fn mark(&self) -> usize {
        self.bindings.len()
    }

    pub fn truncate(&mut self, mark: usize) {
        self.bindings.truncate(mark);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Atom, TypeId)> + '_ {
        self.bindings.iter().copied()
    }
}
