//! Finding what to type check for a completion.
//!
//! The primary target is the statement containing the completion point,
//! climbing out of closures so that a closure body is solved together with
//! the call it is passed to. The fallback target is the outermost
//! expression around the completion point inside its innermost function or
//! closure, without the statement around it.
//!
//! Both targets carry the local bindings visible at their root. Preceding
//! `let`s are pre-solved on their own, before the target is solved, so the
//! solution listener is never re-entered.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::cell::RefCell;
use tracing::{debug, trace};
use tycomp_ast::{DeclContext, Node, NodeArena, NodeIndex, Param, TypeRef};
use tycomp_common::Atom;
use tycomp_common::limits::MAX_SCOPE_PRESOLVE_DEPTH;
use tycomp_solver::{
    ConstraintSystem, ListenerFn, LocalScope, Solution, SolveMode, SolveTarget, SolverLimits,
    TypeEnvironment, TypeId,
};

/// The syntactic shape of a completion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CompletionKind {
    /// `base.<cc>`
    MemberAccess { base: NodeIndex },
    /// `.<cc>`
    UnresolvedMember,
    /// `<cc>` as a call argument.
    Argument { call: NodeIndex, index: usize },
    /// `<cc>` anywhere else.
    Expression,
}

pub struct CompletionContextFinder<'a> {
    arena: &'a NodeArena,
    completion: NodeIndex,
    /// Pre-solved `let` types, keyed by statement.
    let_types: RefCell<FxHashMap<NodeIndex, TypeId>>,
}

impl<'a> CompletionContextFinder<'a> {
    pub fn new(arena: &'a NodeArena, completion: NodeIndex) -> Self {
        CompletionContextFinder {
            arena,
            completion,
            let_types: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn completion(&self) -> NodeIndex {
        self.completion
    }

    /// Classify the completion node. Non-completion nodes are `Expression`.
    pub fn completion_kind(&self) -> CompletionKind {
        if let Some(Node::CodeCompletion { base, leading_dot }) = self.arena.get(self.completion) {
            if base.is_some() {
                return CompletionKind::MemberAccess { base: *base };
            }
            if *leading_dot {
                return CompletionKind::UnresolvedMember;
            }
        }
        let call = self.arena.parent(self.completion);
        if let Some(Node::Call { args, .. }) = self.arena.get(call)
            && let Some(index) = args.iter().position(|arg| arg.value == self.completion)
        {
            return CompletionKind::Argument { call, index };
        }
        CompletionKind::Expression
    }

    /// Innermost function, closure or file around the completion point.
    pub fn innermost_context(&self) -> DeclContext {
        self.arena
            .enclosing_decl_context(self.completion)
            .unwrap_or(DeclContext(NodeIndex::NONE))
    }

    /// The statement that holds the completion point, looking through
    /// closure bodies.
    pub fn primary_statement(&self) -> NodeIndex {
        let mut current = self.completion;
        loop {
            let parent = self.arena.parent(current);
            match self.arena.get(parent) {
                Some(Node::Block { .. }) => {
                    let owner = self.arena.parent(parent);
                    if matches!(self.arena.get(owner), Some(Node::Closure { .. })) {
                        current = parent;
                    } else {
                        return current;
                    }
                }
                Some(Node::SourceFile { .. } | Node::StructDecl { .. }) | None => return current,
                Some(_) => current = parent,
            }
        }
    }

    /// The outermost expression around the completion point that stays
    /// inside its innermost function or closure.
    pub fn fallback_expression(&self) -> NodeIndex {
        let boundary = self.innermost_context().node();
        let mut current = self.completion;
        loop {
            let parent = self.arena.parent(current);
            if parent == boundary {
                return current;
            }
            match self.arena.get(parent) {
                Some(node) if node.is_expression() => current = parent,
                _ => return current,
            }
        }
    }

    pub fn primary_target(&self, env: &TypeEnvironment<'_>, limits: SolverLimits) -> SolveTarget {
        let root = self.primary_statement();
        let dc = self
            .arena
            .enclosing_decl_context(root)
            .unwrap_or(DeclContext(NodeIndex::NONE));
        trace!(root = root.0, dc = dc.node().0, "primary target");
        SolveTarget {
            root,
            dc,
            scope: self.scope_at(env, root, limits, 0),
        }
    }

    /// `None` when the completion node is not an expression.
    pub fn fallback_target(
        &self,
        env: &TypeEnvironment<'_>,
        limits: SolverLimits,
    ) -> Option<SolveTarget> {
        let root = self.fallback_expression();
        if !self.arena.get(root).is_some_and(Node::is_expression) {
            return None;
        }
        trace!(root = root.0, "fallback target");
        Some(SolveTarget {
            root,
            dc: self.innermost_context(),
            scope: self.scope_at(env, root, limits, 0),
        })
    }

    /// Names visible at `at`: preceding `let`s of every enclosing block or
    /// file, and the parameters of every enclosing function and closure.
    /// Inner bindings are bound last so they shadow outer ones.
    fn scope_at(
        &self,
        env: &TypeEnvironment<'_>,
        at: NodeIndex,
        limits: SolverLimits,
        depth: u32,
    ) -> LocalScope {
        let mut frames: Vec<Vec<(Atom, TypeId)>> = Vec::new();
        let mut child = at;
        for (idx, node) in self.arena.ancestors(at) {
            let mut frame = Vec::new();
            match node {
                Node::Block { statements } | Node::SourceFile { statements } => {
                    for &stmt in statements.iter().take_while(|&&stmt| stmt != child) {
                        if let Some(Node::Let { name, ty, .. }) = self.arena.get(stmt) {
                            let type_id = self.let_type(env, stmt, ty.as_ref(), limits, depth);
                            frame.push((*name, type_id));
                        }
                    }
                }
                Node::Closure { params, .. } | Node::FuncDecl { params, .. } => {
                    frame.extend(params.iter().map(|param| (param.name, param_type(env, param))));
                }
                _ => {}
            }
            frames.push(frame);
            child = idx;
        }

        let mut scope = LocalScope::new();
        for frame in frames.into_iter().rev() {
            for (name, type_id) in frame {
                scope.bind(name, type_id);
            }
        }
        scope
    }

    /// Type of a preceding `let`: its annotation, or else the first strict
    /// solution of the statement on its own.
    fn let_type(
        &self,
        env: &TypeEnvironment<'_>,
        stmt: NodeIndex,
        annotation: Option<&TypeRef>,
        limits: SolverLimits,
        depth: u32,
    ) -> TypeId {
        if let Some(annotation) = annotation {
            return env.lower_type_ref(annotation);
        }
        if let Some(&cached) = self.let_types.borrow().get(&stmt) {
            return cached;
        }
        if depth >= MAX_SCOPE_PRESOLVE_DEPTH {
            debug!(stmt = stmt.0, "pre-solve depth exceeded");
            return TypeId::UNKNOWN;
        }

        let target = SolveTarget {
            root: stmt,
            dc: self
                .arena
                .enclosing_decl_context(stmt)
                .unwrap_or(DeclContext(NodeIndex::NONE)),
            scope: self.scope_at(env, stmt, limits, depth + 1),
        };
        let mut found = None;
        let mut listener = ListenerFn(|solution: &Solution<'_>| {
            if found.is_none() {
                found = solution
                    .type_of(stmt)
                    .map(|type_id| solution.env().interner().erase_type_vars(type_id));
            }
        });
        let single = SolverLimits {
            max_solutions: 1,
            ..limits
        };
        ConstraintSystem::solve(env, &target, SolveMode::Strict, single, &mut listener);

        let type_id = found.unwrap_or(TypeId::UNKNOWN);
        trace!(stmt = stmt.0, type_id = type_id.0, "pre-solved let");
        self.let_types.borrow_mut().insert(stmt, type_id);
        type_id
    }
}

fn param_type(env: &TypeEnvironment<'_>, param: &Param) -> TypeId {
    match &param.ty {
        Some(ty) => env.lower_type_ref(ty),
        None => TypeId::UNKNOWN,
    }
}

#[cfg(test)]
#[path = "../tests/locator_tests.rs"]
mod locator_tests;
