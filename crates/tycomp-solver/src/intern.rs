//! Type interning.
//!
//! Every `TypeData` is stored once; ids are stable for the lifetime of the
//! interner. Type variables are interned like any other type so solver
//! bindings can be substituted structurally.

use crate::types::{FunctionShape, IntrinsicKind, NominalId, ParamInfo, TypeData, TypeId, TypeVar};
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::RwLock;
use tycomp_common::limits::MAX_TYPE_DEPTH;

pub struct TypeInterner {
    types: RwLock<IndexSet<TypeData, FxBuildHasher>>,
}

impl TypeInterner {
    /// Create an interner with every intrinsic registered at its fixed id.
    pub fn new() -> Self {
        let mut types = IndexSet::with_capacity_and_hasher(64, FxBuildHasher);
        for kind in IntrinsicKind::ALL {
            types.insert(TypeData::Intrinsic(kind));
        }
        debug_assert_eq!(types.len() as u32, TypeId::FIRST_USER.0);
        TypeInterner {
            types: RwLock::new(types),
        }
    }

    pub fn intern(&self, data: TypeData) -> TypeId {
        {
            let types = self.types.read().expect("type interner lock poisoned");
            if let Some(index) = types.get_index_of(&data) {
                return TypeId(index as u32);
            }
        }
        let mut types = self.types.write().expect("type interner lock poisoned");
        let (index, _) = types.insert_full(data);
        TypeId(index as u32)
    }

    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().expect("type interner lock poisoned");
        types.get_index(id.0 as usize).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.read().expect("type interner lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER.0 as usize
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn function(
        &self,
        params: impl IntoIterator<Item = ParamInfo>,
        result: TypeId,
        is_async: bool,
    ) -> TypeId {
        self.intern(TypeData::Function(FunctionShape {
            params: params.into_iter().collect(),
            result,
            is_async,
        }))
    }

    pub fn nominal(&self, id: NominalId) -> TypeId {
        self.intern(TypeData::Nominal(id))
    }

    pub fn type_var(&self, var: TypeVar) -> TypeId {
        self.intern(TypeData::Var(var))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn array_element(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::Array(element) => Some(element),
            _ => None,
        }
    }

    pub fn function_shape(&self, id: TypeId) -> Option<FunctionShape> {
        match self.lookup(id)? {
            TypeData::Function(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn nominal_id(&self, id: TypeId) -> Option<NominalId> {
        match self.lookup(id)? {
            TypeData::Nominal(nominal) => Some(nominal),
            _ => None,
        }
    }

    pub fn as_type_var(&self, id: TypeId) -> Option<TypeVar> {
        match self.lookup(id)? {
            TypeData::Var(var) => Some(var),
            _ => None,
        }
    }

    /// True if any type variable occurs inside `id`.
    pub fn contains_type_vars(&self, id: TypeId) -> bool {
        self.any_type_var(id, 0, &mut |_| true)
    }

    /// True if `var` occurs inside `id`.
    pub fn mentions(&self, id: TypeId, var: TypeVar) -> bool {
        self.any_type_var(id, 0, &mut |v| v == var)
    }

    fn any_type_var(&self, id: TypeId, depth: u32, pred: &mut impl FnMut(TypeVar) -> bool) -> bool {
        if depth > MAX_TYPE_DEPTH || id.is_intrinsic() {
            return false;
        }
        match self.lookup(id) {
            Some(TypeData::Var(var)) => pred(var),
            Some(TypeData::Array(element)) => self.any_type_var(element, depth + 1, pred),
            Some(TypeData::Function(shape)) => {
                shape
                    .params
                    .iter()
                    .any(|param| self.any_type_var(param.type_id, depth + 1, pred))
                    || self.any_type_var(shape.result, depth + 1, pred)
            }
            _ => false,
        }
    }

    /// Rebuild `id` with every type variable replaced by `map(var)`.
    pub fn map_type_vars(&self, id: TypeId, map: &mut impl FnMut(TypeVar) -> TypeId) -> TypeId {
        self.map_type_vars_at(id, 0, map)
    }

    /// Replace every type variable with `TypeId::UNKNOWN`.
    pub fn erase_type_vars(&self, id: TypeId) -> TypeId {
        self.map_type_vars(id, &mut |_| TypeId::UNKNOWN)
    }

    fn map_type_vars_at(
        &self,
        id: TypeId,
        depth: u32,
        map: &mut impl FnMut(TypeVar) -> TypeId,
    ) -> TypeId {
        if depth > MAX_TYPE_DEPTH {
            return TypeId::ERROR;
        }
        if id.is_intrinsic() {
            return id;
        }
        match self.lookup(id) {
            Some(TypeData::Var(var)) => map(var),
            Some(TypeData::Array(element)) => {
                let mapped = self.map_type_vars_at(element, depth + 1, map);
                if mapped == element { id } else { self.array(mapped) }
            }
            Some(TypeData::Function(shape)) => {
                let params: SmallVec<[ParamInfo; 4]> = shape
                    .params
                    .iter()
                    .map(|param| ParamInfo {
                        label: param.label,
                        type_id: self.map_type_vars_at(param.type_id, depth + 1, map),
                    })
                    .collect();
                let result = self.map_type_vars_at(shape.result, depth + 1, map);
                if params == shape.params && result == shape.result {
                    id
                } else {
                    self.function(params, result, shape.is_async)
                }
            }
            _ => id,
        }
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod intern_tests;
