//! Type environment.
//!
//! Everything the solver needs to know about declarations: nominal types and
//! their members, top-level function overloads, builtin member tables, and
//! lowering of written annotations to `TypeId`s.

use crate::format::TypeFormatter;
use crate::intern::TypeInterner;
use crate::types::{IntrinsicKind, NominalId, ParamInfo, TypeData, TypeId};
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use tycomp_ast::{Node, NodeArena, NodeIndex, Param, TypeRef};
use tycomp_common::{Atom, Interner};
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NominalKind {
    Enum,
    Struct,
}

#[derive(Clone, Debug)]
pub struct NominalInfo {
    pub name: Atom,
    pub kind: NominalKind,
    pub decl: NodeIndex,
    pub type_id: TypeId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Method,
    EnumCase,
}

/// A member visible on some type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: Atom,
    pub kind: MemberKind,
    /// Property type, method function type, or the enum type for a case.
    pub type_id: TypeId,
    /// Declaring node; NONE for builtin members.
    pub decl: NodeIndex,
    /// Enum cases are static; everything else is an instance member.
    pub is_static: bool,
}

/// A declaration picked to resolve a name or member reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverloadChoice {
    pub name: Atom,
    /// Declaring node; NONE for builtin members.
    pub decl: NodeIndex,
    pub type_id: TypeId,
}

impl From<&MemberInfo> for OverloadChoice {
    fn from(member: &MemberInfo) -> Self {
        OverloadChoice {
            name: member.name,
            decl: member.decl,
            type_id: member.type_id,
        }
    }
}

/// Result of looking up a member by name.
#[derive(Clone, Debug)]
pub enum MemberLookupResult {
    /// One or more candidates (more than one means overloads).
    Found(SmallVec<[MemberInfo; 2]>),
    /// The type is known and has no such member.
    NotFound { type_id: TypeId, name: Atom },
    /// The type is a hole; nothing can be said.
    IsUnknown,
}

/// Pre-interned names used by the builtin member tables.
#[derive(Clone, Copy, Debug)]
struct BuiltinNames {
    count: Atom,
    is_empty: Atom,
    first: Atom,
    append: Atom,
    contains: Atom,
    reversed: Atom,
    description: Atom,
    advanced: Atom,
    by: Atom,
    is_multiple: Atom,
    of: Atom,
    rounded: Atom,
    uppercased: Atom,
    has_prefix: Atom,
    toggle: Atom,
}

impl BuiltinNames {
    fn new(names: &Interner) -> Self {
        BuiltinNames {
            count: names.intern("count"),
            is_empty: names.intern("isEmpty"),
            first: names.intern("first"),
            append: names.intern("append"),
            contains: names.intern("contains"),
            reversed: names.intern("reversed"),
            description: names.intern("description"),
            advanced: names.intern("advanced"),
            by: names.intern("by"),
            is_multiple: names.intern("isMultiple"),
            of: names.intern("of"),
            rounded: names.intern("rounded"),
            uppercased: names.intern("uppercased"),
            has_prefix: names.intern("hasPrefix"),
            toggle: names.intern("toggle"),
        }
    }
}

pub struct TypeEnvironment<'a> {
    arena: &'a NodeArena,
    interner: &'a TypeInterner,
    nominals: Vec<NominalInfo>,
    nominals_by_name: FxHashMap<Atom, NominalId>,
    /// Declared members, indexed by `NominalId`.
    nominal_members: Vec<Vec<MemberInfo>>,
    functions: FxHashMap<Atom, SmallVec<[OverloadChoice; 2]>>,
    builtin: BuiltinNames,
}

impl<'a> TypeEnvironment<'a> {
    /// Collect declarations from the top level of `root` (a source file).
    /// Nested declarations are not visible as globals.
    pub fn new(arena: &'a NodeArena, interner: &'a TypeInterner, root: NodeIndex) -> Self {
        let mut env = TypeEnvironment {
            arena,
            interner,
            nominals: Vec::new(),
            nominals_by_name: FxHashMap::default(),
            nominal_members: Vec::new(),
            functions: FxHashMap::default(),
            builtin: BuiltinNames::new(arena.names()),
        };
        let statements = match arena.get(root) {
            Some(Node::SourceFile { statements }) => statements.as_slice(),
            _ => &[],
        };
        // Names first, so member and signature annotations can refer to any
        // nominal declared in the file.
        for &stmt in statements {
            env.register_nominal(stmt);
        }
        for (index, info) in env.nominals.clone().iter().enumerate() {
            let members = env.collect_members(info);
            env.nominal_members[index] = members;
        }
        for &stmt in statements {
            if let Some(Node::FuncDecl { name, .. }) = arena.get(stmt) {
                let choice = OverloadChoice {
                    name: *name,
                    decl: stmt,
                    type_id: env.function_decl_type(stmt),
                };
                env.functions.entry(*name).or_default().push(choice);
            }
        }
        debug!(
            nominals = env.nominals.len(),
            functions = env.functions.len(),
            "type environment built"
        );
        env
    }

    fn register_nominal(&mut self, stmt: NodeIndex) {
        let (name, kind) = match self.arena.get(stmt) {
            Some(Node::EnumDecl { name, .. }) => (*name, NominalKind::Enum),
            Some(Node::StructDecl { name, .. }) => (*name, NominalKind::Struct),
            _ => return,
        };
        if self.nominals_by_name.contains_key(&name) {
            trace!(name = %self.arena.name(name), "duplicate nominal declaration ignored");
            return;
        }
        let id = NominalId(self.nominals.len() as u32);
        let type_id = self.interner.nominal(id);
        self.nominals.push(NominalInfo {
            name,
            kind,
            decl: stmt,
            type_id,
        });
        self.nominal_members.push(Vec::new());
        self.nominals_by_name.insert(name, id);
    }

    fn collect_members(&self, info: &NominalInfo) -> Vec<MemberInfo> {
        match self.arena.get(info.decl) {
            Some(Node::EnumDecl { cases, .. }) => cases
                .iter()
                .map(|&case| MemberInfo {
                    name: case,
                    kind: MemberKind::EnumCase,
                    type_id: info.type_id,
                    decl: info.decl,
                    is_static: true,
                })
                .collect(),
            Some(Node::StructDecl { members, .. }) => members
                .iter()
                .filter_map(|&member| match self.arena.get(member)? {
                    Node::Let { name, ty, .. } => Some(MemberInfo {
                        name: *name,
                        kind: MemberKind::Property,
                        type_id: ty
                            .as_ref()
                            .map_or(TypeId::UNKNOWN, |ty| self.lower_type_ref(ty)),
                        decl: member,
                        is_static: false,
                    }),
                    Node::FuncDecl { name, .. } => Some(MemberInfo {
                        name: *name,
                        kind: MemberKind::Method,
                        type_id: self.function_decl_type(member),
                        decl: member,
                        is_static: false,
                    }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn arena(&self) -> &'a NodeArena {
        self.arena
    }

    pub fn interner(&self) -> &'a TypeInterner {
        self.interner
    }

    pub fn names(&self) -> &'a Interner {
        self.arena.names()
    }

    pub fn nominal(&self, id: NominalId) -> Option<&NominalInfo> {
        self.nominals.get(id.0 as usize)
    }

    pub fn nominal_by_name(&self, name: Atom) -> Option<&NominalInfo> {
        let id = self.nominals_by_name.get(&name)?;
        self.nominal(*id)
    }

    /// Top-level functions declared under `name`, in declaration order.
    pub fn global_functions(&self, name: Atom) -> &[OverloadChoice] {
        self.functions.get(&name).map_or(&[], |choices| choices.as_slice())
    }

    pub fn format_type(&self, type_id: TypeId) -> String {
        TypeFormatter::new(self).format(type_id)
    }

    // =========================================================================
    // Lowering
    // =========================================================================

    /// Lower a written annotation. Unknown names lower to `TypeId::ERROR`.
    pub fn lower_type_ref(&self, ty: &TypeRef) -> TypeId {
        match ty {
            TypeRef::Named(name) => {
                let text = self.arena.name(*name);
                if let Some(kind) = IntrinsicKind::from_name(&text) {
                    return self.interner.intern(TypeData::Intrinsic(kind));
                }
                match self.nominal_by_name(*name) {
                    Some(info) => info.type_id,
                    None => {
                        trace!(name = %text, "unknown type name");
                        TypeId::ERROR
                    }
                }
            }
            TypeRef::Array(element) => self.interner.array(self.lower_type_ref(element)),
            TypeRef::Function {
                params,
                result,
                is_async,
            } => {
                let params = params
                    .iter()
                    .map(|param| ParamInfo::unlabeled(self.lower_type_ref(param)));
                self.interner
                    .function(params, self.lower_type_ref(result), *is_async)
            }
        }
    }

    /// Lower a parameter annotation; missing annotations become UNKNOWN.
    pub fn lower_param(&self, param: &Param) -> ParamInfo {
        ParamInfo {
            label: param.label,
            type_id: param
                .ty
                .as_ref()
                .map_or(TypeId::UNKNOWN, |ty| self.lower_type_ref(ty)),
        }
    }

    /// Function type of a `FuncDecl`. A missing result annotation means Void.
    pub fn function_decl_type(&self, decl: NodeIndex) -> TypeId {
        match self.arena.get(decl) {
            Some(Node::FuncDecl {
                params,
                result,
                is_async,
                ..
            }) => {
                let params: SmallVec<[ParamInfo; 4]> =
                    params.iter().map(|param| self.lower_param(param)).collect();
                let result = result
                    .as_ref()
                    .map_or(TypeId::VOID, |ty| self.lower_type_ref(ty));
                self.interner.function(params, result, *is_async)
            }
            _ => TypeId::ERROR,
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// All members visible on `type_id`. Instance members for values,
    /// enum cases as static members.
    pub fn members_of(&self, type_id: TypeId) -> Vec<MemberInfo> {
        if let Some(id) = self.interner.nominal_id(type_id) {
            return self
                .nominal_members
                .get(id.0 as usize)
                .cloned()
                .unwrap_or_default();
        }
        self.builtin_members(type_id)
    }

    /// Instance members named `name` on `type_id`.
    pub fn lookup_instance_member(&self, type_id: TypeId, name: Atom) -> MemberLookupResult {
        self.lookup_member(type_id, name, false)
    }

    /// Static members (enum cases) named `name` on `type_id`.
    pub fn lookup_static_member(&self, type_id: TypeId, name: Atom) -> MemberLookupResult {
        self.lookup_member(type_id, name, true)
    }

    fn lookup_member(&self, type_id: TypeId, name: Atom, is_static: bool) -> MemberLookupResult {
        if type_id.is_hole() {
            return MemberLookupResult::IsUnknown;
        }
        let found: SmallVec<[MemberInfo; 2]> = self
            .members_of(type_id)
            .into_iter()
            .filter(|member| member.name == name && member.is_static == is_static)
            .collect();
        if found.is_empty() {
            MemberLookupResult::NotFound { type_id, name }
        } else {
            MemberLookupResult::Found(found)
        }
    }

    fn builtin_members(&self, type_id: TypeId) -> Vec<MemberInfo> {
        let n = self.builtin;
        let i = self.interner;
        let property = |name, type_id| MemberInfo {
            name,
            kind: MemberKind::Property,
            type_id,
            decl: NodeIndex::NONE,
            is_static: false,
        };
        let method = |name, params: SmallVec<[ParamInfo; 4]>, result| MemberInfo {
            name,
            kind: MemberKind::Method,
            type_id: i.function(params, result, false),
            decl: NodeIndex::NONE,
            is_static: false,
        };

        match i.lookup(type_id) {
            Some(TypeData::Array(element)) => vec![
                property(n.count, TypeId::INT),
                property(n.is_empty, TypeId::BOOL),
                property(n.first, element),
                method(n.append, smallvec![ParamInfo::unlabeled(element)], TypeId::VOID),
                method(n.contains, smallvec![ParamInfo::unlabeled(element)], TypeId::BOOL),
                method(n.reversed, SmallVec::new(), i.array(element)),
            ],
            Some(TypeData::Intrinsic(IntrinsicKind::Int)) => vec![
                property(n.description, TypeId::STRING),
                method(n.advanced, smallvec![ParamInfo::labeled(n.by, TypeId::INT)], TypeId::INT),
                method(
                    n.is_multiple,
                    smallvec![ParamInfo::labeled(n.of, TypeId::INT)],
                    TypeId::BOOL,
                ),
            ],
            Some(TypeData::Intrinsic(IntrinsicKind::Double)) => vec![
                property(n.description, TypeId::STRING),
                method(n.rounded, SmallVec::new(), TypeId::DOUBLE),
            ],
            Some(TypeData::Intrinsic(IntrinsicKind::String)) => vec![
                property(n.count, TypeId::INT),
                property(n.is_empty, TypeId::BOOL),
                method(n.uppercased, SmallVec::new(), TypeId::STRING),
                method(
                    n.has_prefix,
                    smallvec![ParamInfo::unlabeled(TypeId::STRING)],
                    TypeId::BOOL,
                ),
            ],
            Some(TypeData::Intrinsic(IntrinsicKind::Bool)) => vec![
                property(n.description, TypeId::STRING),
                method(n.toggle, SmallVec::new(), TypeId::VOID),
            ],
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Debug for TypeEnvironment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEnvironment")
            .field("nominals", &self.nominals.len())
            .field("functions", &self.functions.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/env_tests.rs"]
mod env_tests;
