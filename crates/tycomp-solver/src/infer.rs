//! Type variable unification using Union-Find.
//!
//! Bindings live in an `ena` unification table owned by the constraint
//! system. Snapshots of that table are how the search backtracks out of a
//! disjunction branch.

use crate::constraint::SolveFailure;
use crate::system::ConstraintSystem;
use crate::types::{ParamInfo, TypeData, TypeId, TypeVar};
use ena::unify::{NoError, UnifyKey, UnifyValue};
use smallvec::SmallVec;
use tycomp_common::limits::MAX_TYPE_DEPTH;

/// Wrapper for TypeId to implement UnifyValue (avoiding orphan rule)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InferenceValue(pub Option<TypeId>);

impl UnifyKey for TypeVar {
    type Value = InferenceValue;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TypeVar(u)
    }

    fn tag() -> &'static str {
        "TypeVar"
    }
}

impl UnifyValue for InferenceValue {
    type Error = NoError;

    fn unify_values(a: &Self, b: &Self) -> Result<Self, Self::Error> {
        match (a.0, b.0) {
            (None, None) => Ok(InferenceValue(None)),
            (Some(t), None) | (None, Some(t)) => Ok(InferenceValue(Some(t))),
            // Callers only union variables after checking their bindings agree.
            (Some(a), Some(_)) => Ok(InferenceValue(Some(a))),
        }
    }
}

impl<'a> ConstraintSystem<'a> {
    /// Create a fresh, unbound type variable.
    pub(crate) fn fresh_var(&mut self) -> TypeId {
        let var = self.table.new_key(InferenceValue(None));
        self.env.interner().type_var(var)
    }

    /// Follow variable bindings until reaching a non-variable type or an
    /// unbound root variable.
    pub(crate) fn shallow_resolve(&mut self, type_id: TypeId) -> TypeId {
        let interner = self.env.interner();
        let mut current = type_id;
        for _ in 0..=MAX_TYPE_DEPTH {
            let Some(var) = interner.as_type_var(current) else {
                return current;
            };
            let root = self.table.find(var);
            match self.table.probe_value(root).0 {
                Some(bound) => current = bound,
                None => return interner.type_var(root),
            }
        }
        TypeId::ERROR
    }

    /// The unbound root variable `type_id` resolves to, if any.
    pub(crate) fn unbound_var(&mut self, type_id: TypeId) -> Option<TypeVar> {
        let resolved = self.shallow_resolve(type_id);
        self.env.interner().as_type_var(resolved)
    }

    /// Substitute every bound variable inside `type_id`.
    pub(crate) fn resolve(&mut self, type_id: TypeId) -> TypeId {
        self.resolve_at(type_id, 0)
    }

    fn resolve_at(&mut self, type_id: TypeId, depth: u32) -> TypeId {
        if depth > MAX_TYPE_DEPTH {
            return TypeId::ERROR;
        }
        let type_id = self.shallow_resolve(type_id);
        let interner = self.env.interner();
        match interner.lookup(type_id) {
            Some(TypeData::Array(element)) => {
                let resolved = self.resolve_at(element, depth + 1);
                if resolved == element {
                    type_id
                } else {
                    interner.array(resolved)
                }
            }
            Some(TypeData::Function(shape)) => {
                let params: SmallVec<[ParamInfo; 4]> = shape
                    .params
                    .iter()
                    .map(|param| ParamInfo {
                        label: param.label,
                        type_id: self.resolve_at(param.type_id, depth + 1),
                    })
                    .collect();
                let result = self.resolve_at(shape.result, depth + 1);
                if params == shape.params && result == shape.result {
                    type_id
                } else {
                    interner.function(params, result, shape.is_async)
                }
            }
            _ => type_id,
        }
    }

    /// Make two types equal, binding variables as needed.
    ///
    /// Holes unify with anything. Function types unify parameter-wise and
    /// ignore labels and `async`; asyncness of closures is checked by the
    /// closure constraint.
    pub(crate) fn unify(&mut self, left: TypeId, right: TypeId) -> Result<(), SolveFailure> {
        self.unify_at(left, right, 0)
    }

    fn unify_at(&mut self, left: TypeId, right: TypeId, depth: u32) -> Result<(), SolveFailure> {
        let left = self.shallow_resolve(left);
        let right = self.shallow_resolve(right);
        if left == right {
            return Ok(());
        }
        let mismatch = SolveFailure::Mismatch {
            expected: left,
            found: right,
        };
        if depth > MAX_TYPE_DEPTH {
            return Err(mismatch);
        }

        let interner = self.env.interner();
        match (interner.lookup(left), interner.lookup(right)) {
            (Some(TypeData::Var(a)), Some(TypeData::Var(b))) => {
                self.table.union(a, b);
                Ok(())
            }
            (Some(TypeData::Var(var)), _) => self.bind(var, right),
            (_, Some(TypeData::Var(var))) => self.bind(var, left),
            _ if left.is_hole() || right.is_hole() => Ok(()),
            (Some(TypeData::Array(a)), Some(TypeData::Array(b))) => self.unify_at(a, b, depth + 1),
            (Some(TypeData::Function(f)), Some(TypeData::Function(g))) => {
                if f.params.len() != g.params.len() {
                    return Err(mismatch);
                }
                for (p, q) in f.params.iter().zip(g.params.iter()) {
                    self.unify_at(p.type_id, q.type_id, depth + 1)?;
                }
                self.unify_at(f.result, g.result, depth + 1)
            }
            _ => Err(mismatch),
        }
    }

    fn bind(&mut self, var: TypeVar, type_id: TypeId) -> Result<(), SolveFailure> {
        let root = self.table.find(var);
        let resolved = self.resolve(type_id);
        if self.env.interner().mentions(resolved, root) {
            return Err(SolveFailure::OccursCheck {
                var: root,
                type_id: resolved,
            });
        }
        self.table.union_value(root, InferenceValue(Some(resolved)));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/infer_tests.rs"]
mod infer_tests;
