//! Constraint generation.
//!
//! Walks the target once, gives every expression node a type (often a fresh
//! variable) and records the constraints relating them. Nothing is decided
//! here except name lookup against the local scope.

use crate::constraint::{CallArg, Constraint, LiteralKind, LiteralVar, SolveFailure};
use crate::infer::InferenceValue;
use crate::solution::SolveTarget;
use crate::system::ConstraintSystem;
use crate::types::TypeId;
use smallvec::SmallVec;
use tracing::trace;
use tycomp_ast::{Node, NodeIndex, Param, TypeRef};
use tycomp_common::Atom;
use tycomp_common::limits::MAX_EXPR_DEPTH;

impl<'a> ConstraintSystem<'a> {
    pub(crate) fn generate(&mut self, target: &SolveTarget) -> Result<(), SolveFailure> {
        let arena = self.env.arena();
        self.scope = target.scope.clone();
        match arena.get(target.dc.node()) {
            Some(Node::FuncDecl { result, .. }) => {
                let result = result
                    .as_ref()
                    .map_or(TypeId::VOID, |ty| self.env.lower_type_ref(ty));
                self.return_types.push(result);
            }
            Some(Node::Closure { .. }) => {
                let result = self.fresh_var();
                self.return_types.push(result);
                self.closure_depth += 1;
            }
            _ => {}
        }

        let Some(node) = arena.get(target.root) else {
            return Ok(());
        };
        if node.is_expression() {
            self.gen_expr(target.root)?;
        } else {
            self.gen_stmt(target.root)?;
        }
        Ok(())
    }

    fn enter(&mut self, idx: NodeIndex) -> Result<(), SolveFailure> {
        if self.gen_depth >= MAX_EXPR_DEPTH {
            return Err(SolveFailure::DepthLimit { node: idx });
        }
        self.gen_depth += 1;
        Ok(())
    }

    fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    fn lower_optional(&mut self, ty: Option<&TypeRef>) -> TypeId {
        match ty {
            Some(ty) => self.env.lower_type_ref(ty),
            None => self.fresh_var(),
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Generate a statement. Returns the type for expression statements.
    fn gen_stmt(&mut self, idx: NodeIndex) -> Result<Option<TypeId>, SolveFailure> {
        self.enter(idx)?;
        let generated = self.gen_stmt_inner(idx);
        self.gen_depth -= 1;
        generated
    }

    fn gen_stmt_inner(&mut self, idx: NodeIndex) -> Result<Option<TypeId>, SolveFailure> {
        let arena = self.env.arena();
        let Some(node) = arena.get(idx) else {
            return Ok(None);
        };
        match node {
            Node::Let { name, ty, init } => {
                let annotated = ty.as_ref().map(|ty| self.env.lower_type_ref(ty));
                let bound = if init.is_some() {
                    let init_type = self.gen_expr(*init)?;
                    if let Some(annotated) = annotated {
                        self.add(Constraint::Equal {
                            left: annotated,
                            right: init_type,
                        });
                    }
                    annotated.unwrap_or(init_type)
                } else {
                    match annotated {
                        Some(annotated) => annotated,
                        None => self.fresh_var(),
                    }
                };
                self.scope.bind(*name, bound);
                self.node_types.insert(idx, bound);
                Ok(None)
            }
            Node::Return { value } => {
                let found = if value.is_some() {
                    self.gen_expr(*value)?
                } else {
                    TypeId::VOID
                };
                if let Some(&expected) = self.return_types.last() {
                    self.add(Constraint::Equal {
                        left: expected,
                        right: found,
                    });
                }
                Ok(None)
            }
            Node::Switch { subject, cases } => {
                let subject_type = self.gen_expr(*subject)?;
                for &case in cases {
                    let Some(Node::Case { patterns, body }) = arena.get(case) else {
                        continue;
                    };
                    for &pattern in patterns {
                        let pattern_type = self.gen_expr(pattern)?;
                        self.add(Constraint::Equal {
                            left: subject_type,
                            right: pattern_type,
                        });
                    }
                    // Case bodies are separate statements at the top level;
                    // inside a closure they feed its result type.
                    if self.closure_depth > 0 {
                        self.gen_stmt(*body)?;
                    }
                }
                Ok(None)
            }
            Node::Block { statements } => {
                let mark = self.scope.mark();
                for &stmt in statements {
                    self.gen_stmt(stmt)?;
                }
                self.scope.truncate(mark);
                Ok(None)
            }
            Node::Case { .. }
            | Node::FuncDecl { .. }
            | Node::EnumDecl { .. }
            | Node::StructDecl { .. }
            | Node::SourceFile { .. } => {
                trace!(node = idx.0, "declaration skipped during generation");
                Ok(None)
            }
            _ => self.gen_expr(idx).map(Some),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn gen_expr(&mut self, idx: NodeIndex) -> Result<TypeId, SolveFailure> {
        self.enter(idx)?;
        let generated = self.gen_expr_inner(idx);
        self.gen_depth -= 1;
        generated
    }

    fn gen_expr_inner(&mut self, idx: NodeIndex) -> Result<TypeId, SolveFailure> {
        let arena = self.env.arena();
        let interner = self.env.interner();
        let Some(node) = arena.get(idx) else {
            return Ok(TypeId::UNKNOWN);
        };

        let type_id = match node {
            Node::IntLiteral(_) => self.literal_var(idx, LiteralKind::Int),
            Node::FloatLiteral(_) => self.literal_var(idx, LiteralKind::Float),
            Node::StringLiteral(_) => TypeId::STRING,
            Node::BoolLiteral(_) => TypeId::BOOL,
            Node::ArrayLiteral { elements } => {
                let element = self.fresh_var();
                for &value in elements {
                    let value_type = self.gen_expr(value)?;
                    self.add(Constraint::Equal {
                        left: element,
                        right: value_type,
                    });
                }
                interner.array(element)
            }
            Node::DeclRef { name } => self.gen_decl_ref(idx, *name)?,
            Node::MemberAccess { base, name } => {
                let base = self.gen_expr(*base)?;
                let result = self.fresh_var();
                self.add(Constraint::Member {
                    node: idx,
                    base,
                    name: *name,
                    result,
                });
                result
            }
            Node::UnresolvedMember { name } => {
                let base = self.fresh_var();
                self.add(Constraint::UnresolvedMember {
                    node: idx,
                    base,
                    name: *name,
                });
                base
            }
            Node::Call { callee, args } => {
                let callee_type = self.gen_expr(*callee)?;
                let mut call_args: SmallVec<[CallArg; 4]> = SmallVec::new();
                for arg in args {
                    let any_label = arg.label.is_none()
                        && matches!(
                            self.env.arena().get(arg.value),
                            Some(Node::CodeCompletion { .. })
                        );
                    call_args.push(CallArg {
                        label: arg.label,
                        type_id: self.gen_expr(arg.value)?,
                        any_label,
                    });
                }
                let result = self.fresh_var();
                self.add(Constraint::Call {
                    node: idx,
                    callee: callee_type,
                    args: call_args,
                    result,
                });
                result
            }
            Node::Closure {
                params,
                result,
                is_async,
                body,
            } => self.gen_closure(idx, params, result.as_ref(), *is_async, *body)?,
            Node::Await { operand } => self.gen_expr(*operand)?,
            Node::CodeCompletion { base, .. } => {
                if base.is_some() {
                    self.gen_expr(*base)?;
                }
                self.fresh_var()
            }
            _ => {
                trace!(node = idx.0, "statement in expression position");
                TypeId::UNKNOWN
            }
        };

        self.node_types.insert(idx, type_id);
        Ok(type_id)
    }

    fn literal_var(&mut self, node: NodeIndex, kind: LiteralKind) -> TypeId {
        let var = self.table.new_key(InferenceValue(None));
        self.literals.push(LiteralVar { var, kind, node });
        self.env.interner().type_var(var)
    }

    /// Locals first, then top-level functions. Several functions with the
    /// same name become a disjunction.
    fn gen_decl_ref(&mut self, idx: NodeIndex, name: Atom) -> Result<TypeId, SolveFailure> {
        if let Some(bound) = self.scope.lookup(name) {
            return Ok(bound);
        }
        let env = self.env;
        match env.global_functions(name) {
            [] => {
                trace!(name = %env.arena().name(name), "unresolved name");
                self.fail(SolveFailure::UnknownName { name })?;
                Ok(TypeId::UNKNOWN)
            }
            [choice] => {
                self.choices.insert(idx, choice.clone());
                Ok(choice.type_id)
            }
            choices => {
                let type_id = self.fresh_var();
                self.add(Constraint::Disjunction {
                    node: idx,
                    type_id,
                    choices: choices.iter().cloned().collect(),
                });
                Ok(type_id)
            }
        }
    }

    /// A closure body is generated in place, with its parameters in scope
    /// and its result type as the target of `return`. A body consisting of a
    /// single expression returns that expression; a body with no `return`
    /// at all returns Void.
    fn gen_closure(
        &mut self,
        idx: NodeIndex,
        params: &[Param],
        result: Option<&TypeRef>,
        is_async: bool,
        body: NodeIndex,
    ) -> Result<TypeId, SolveFailure> {
        let arena = self.env.arena();
        let mut param_types: SmallVec<[TypeId; 4]> = SmallVec::new();
        for param in params {
            let param_type = self.lower_optional(param.ty.as_ref());
            param_types.push(param_type);
        }
        let result_type = self.lower_optional(result);

        let statements = match arena.get(body) {
            Some(Node::Block { statements }) => statements.as_slice(),
            _ => &[],
        };

        let mark = self.scope.mark();
        for (param, &param_type) in params.iter().zip(param_types.iter()) {
            self.scope.bind(param.name, param_type);
        }
        self.return_types.push(result_type);
        self.closure_depth += 1;

        let mut generated = Ok(None);
        for &stmt in statements {
            generated = self.gen_stmt(stmt);
            if generated.is_err() {
                break;
            }
        }

        self.closure_depth -= 1;
        self.return_types.pop();
        self.scope.truncate(mark);
        let last_expr = generated?;

        match (statements, last_expr) {
            ([_], Some(expr_type)) => self.add(Constraint::Equal {
                left: result_type,
                right: expr_type,
            }),
            _ if !arena.contains_return(body) => self.add(Constraint::Equal {
                left: result_type,
                right: TypeId::VOID,
            }),
            _ => {}
        }

        let var = self.fresh_var();
        self.add(Constraint::Closure {
            node: idx,
            var,
            params: param_types,
            result: result_type,
            is_async: is_async || arena.contains_await(body),
        });
        Ok(var)
    }
}

#[cfg(test)]
#[path = "../tests/generate_tests.rs"]
mod generate_tests;
