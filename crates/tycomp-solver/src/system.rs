//! The constraint system and its search.
//!
//! Solving runs in three phases:
//! 1. Generate constraints for the target (see `generate.rs`).
//! 2. Simplify until nothing more can be decided without a guess.
//! 3. Pick the first pending disjunction and try each choice under a
//!    snapshot of the unification table, recursing into phase 2.
//!
//! A branch with no pending disjunction is complete: literal defaults are
//! applied and the branch becomes a `Solution`.

use crate::constraint::{Constraint, LiteralKind, LiteralVar, SolveFailure};
use crate::env::{MemberLookupResult, OverloadChoice, TypeEnvironment};
use crate::scope::LocalScope;
use crate::solution::{Solution, SolutionListener, SolveMode, SolveSummary, SolveTarget, SolverLimits};
use crate::types::{ParamInfo, TypeId, TypeVar};
use ena::unify::InPlaceUnificationTable;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tycomp_ast::NodeIndex;

/// State restored when backing out of a disjunction branch. Type variable
/// bindings are restored separately through the unification table.
struct BranchState {
    constraints: Vec<Constraint>,
    choices: FxHashMap<NodeIndex, OverloadChoice>,
    fixes: u32,
}

pub struct ConstraintSystem<'a> {
    pub(crate) env: &'a TypeEnvironment<'a>,
    pub(crate) mode: SolveMode,
    limits: SolverLimits,
    pub(crate) table: InPlaceUnificationTable<TypeVar>,
    /// Type of every node visited during generation.
    pub(crate) node_types: FxHashMap<NodeIndex, TypeId>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) literals: Vec<LiteralVar>,
    pub(crate) choices: FxHashMap<NodeIndex, OverloadChoice>,
    pub(crate) fixes: u32,
    steps: usize,
    found: usize,
    hit_limit: bool,
    /// Relaxed-mode solutions, held until the search is over.
    candidates: Vec<Solution<'a>>,

    // Generation state.
    pub(crate) scope: LocalScope,
    /// Result types of the enclosing closures/functions, innermost last.
    pub(crate) return_types: Vec<TypeId>,
    pub(crate) closure_depth: u32,
    /// Current nesting of the generation walk.
    pub(crate) gen_depth: u32,
}

impl<'a> ConstraintSystem<'a> {
    pub fn new(env: &'a TypeEnvironment<'a>, mode: SolveMode, limits: SolverLimits) -> Self {
        ConstraintSystem {
            env,
            mode,
            limits,
            table: InPlaceUnificationTable::new(),
            node_types: FxHashMap::default(),
            constraints: Vec::new(),
            literals: Vec::new(),
            choices: FxHashMap::default(),
            fixes: 0,
            steps: 0,
            found: 0,
            hit_limit: false,
            candidates: Vec::new(),
            scope: LocalScope::new(),
            return_types: Vec::new(),
            closure_depth: 0,
            gen_depth: 0,
        }
    }

    /// Solve `target` and hand every solution to `listener`.
    ///
    /// Strict mode delivers each solution as soon as it is found. Relaxed
    /// mode delivers, after the search, only the solutions with the fewest
    /// fixes.
    #[tracing::instrument(level = "debug", skip_all, fields(root = target.root.0, mode = ?mode))]
    pub fn solve(
        env: &'a TypeEnvironment<'a>,
        target: &SolveTarget,
        mode: SolveMode,
        limits: SolverLimits,
        listener: &mut dyn SolutionListener,
    ) -> SolveSummary {
        let mut cs = ConstraintSystem::new(env, mode, limits);
        if let Err(failure) = cs.generate(target) {
            debug!(%failure, "constraint generation failed");
            return cs.summary(0);
        }
        debug!(
            constraints = cs.constraints.len(),
            nodes = cs.node_types.len(),
            "constraints generated"
        );

        cs.explore(listener);

        let delivered = match mode {
            SolveMode::Strict => cs.found,
            SolveMode::Relaxed => cs.deliver_best(listener),
        };
        debug!(delivered, steps = cs.steps, hit_limit = cs.hit_limit, "solve finished");
        cs.summary(delivered)
    }

    fn summary(&self, delivered: usize) -> SolveSummary {
        SolveSummary {
            delivered,
            steps: self.steps,
            hit_limit: self.hit_limit,
        }
    }

    // =========================================================================
    // Failures
    // =========================================================================

    /// Report a failure. Strict mode propagates it and kills the branch;
    /// relaxed mode records a fix and carries on.
    pub(crate) fn fail(&mut self, failure: SolveFailure) -> Result<(), SolveFailure> {
        self.record_fix(failure, 1)
    }

    fn record_fix(&mut self, failure: SolveFailure, weight: u32) -> Result<(), SolveFailure> {
        match self.mode {
            SolveMode::Relaxed if failure != SolveFailure::StepLimit => {
                trace!(%failure, weight, "recorded fix");
                self.fixes += weight;
                Ok(())
            }
            _ => Err(failure),
        }
    }

    pub(crate) fn equate(&mut self, left: TypeId, right: TypeId) -> Result<(), SolveFailure> {
        match self.unify(left, right) {
            Ok(()) => Ok(()),
            Err(failure) => self.fail(failure),
        }
    }

    fn tick(&mut self) -> Result<(), SolveFailure> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            self.hit_limit = true;
            return Err(SolveFailure::StepLimit);
        }
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    fn explore(&mut self, listener: &mut dyn SolutionListener) {
        if self.hit_limit {
            return;
        }
        if let Err(failure) = self.simplify() {
            trace!(%failure, "branch failed");
            return;
        }

        let Some(position) = self.constraints.iter().position(Constraint::is_disjunction) else {
            self.finish_branch(listener);
            return;
        };
        let Constraint::Disjunction {
            node,
            type_id,
            choices,
        } = self.constraints.remove(position)
        else {
            return;
        };

        for (index, choice) in choices.into_iter().enumerate() {
            if self.hit_limit {
                break;
            }
            trace!(node = node.0, choice = index, "trying overload");
            let snapshot = self.table.snapshot();
            let saved = self.save_branch();

            let choice_type = choice.type_id;
            self.choices.insert(node, choice);
            match self.equate(type_id, choice_type) {
                Ok(()) => self.explore(listener),
                Err(failure) => trace!(%failure, "overload rejected"),
            }

            self.table.rollback_to(snapshot);
            self.restore_branch(saved);
        }
    }

    fn save_branch(&self) -> BranchState {
        BranchState {
            constraints: self.constraints.clone(),
            choices: self.choices.clone(),
            fixes: self.fixes,
        }
    }

    fn restore_branch(&mut self, saved: BranchState) {
        self.constraints = saved.constraints;
        self.choices = saved.choices;
        self.fixes = saved.fixes;
    }

    /// Simplify constraints until a fixed point.
    fn simplify(&mut self) -> Result<(), SolveFailure> {
        loop {
            let pending = std::mem::take(&mut self.constraints);
            let mut deferred = Vec::with_capacity(pending.len());
            let mut progress = false;
            for constraint in pending {
                self.tick()?;
                if self.simplify_constraint(&constraint)? {
                    progress = true;
                } else {
                    deferred.push(constraint);
                }
            }
            // Constraints introduced during this pass.
            deferred.append(&mut self.constraints);
            self.constraints = deferred;

            if progress {
                continue;
            }
            // Overload choices may still give a closure its contextual type.
            if self.constraints.iter().any(Constraint::is_disjunction) {
                return Ok(());
            }
            if self.bind_closure_shape()? {
                continue;
            }
            if self.default_one_literal()? {
                continue;
            }
            return Ok(());
        }
    }

    /// Bind the first still-unbound literal to its default type. Used when
    /// nothing else can make progress, e.g. a member access on `1`.
    fn default_one_literal(&mut self) -> Result<bool, SolveFailure> {
        for index in 0..self.literals.len() {
            let literal = self.literals[index].clone();
            let literal_type = self.env.interner().type_var(literal.var);
            if self.unbound_var(literal_type).is_some() {
                trace!(node = literal.node.0, kind = ?literal.kind, "defaulting literal");
                self.equate(literal_type, literal.kind.default_type())?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Try to discharge one constraint. `Ok(false)` means not yet decidable.
    fn simplify_constraint(&mut self, constraint: &Constraint) -> Result<bool, SolveFailure> {
        match constraint {
            Constraint::Equal { left, right } => {
                self.equate(*left, *right)?;
                Ok(true)
            }
            Constraint::Member {
                node,
                base,
                name,
                result,
            } => {
                if self.unbound_var(*base).is_some() {
                    return Ok(false);
                }
                let base = self.resolve(*base);
                match self.env.lookup_instance_member(base, *name) {
                    MemberLookupResult::IsUnknown => {}
                    MemberLookupResult::NotFound { type_id, name } => {
                        self.fail(SolveFailure::NoSuchMember {
                            base: type_id,
                            name,
                        })?;
                    }
                    MemberLookupResult::Found(members) => {
                        if let [member] = members.as_slice() {
                            let choice = OverloadChoice::from(member);
                            self.equate(*result, choice.type_id)?;
                            self.choices.insert(*node, choice);
                        } else {
                            self.constraints.push(Constraint::Disjunction {
                                node: *node,
                                type_id: *result,
                                choices: members.iter().map(OverloadChoice::from).collect(),
                            });
                        }
                    }
                }
                Ok(true)
            }
            Constraint::UnresolvedMember { node, base, name } => {
                if self.unbound_var(*base).is_some() {
                    return Ok(false);
                }
                let base_type = self.resolve(*base);
                match self.env.lookup_static_member(base_type, *name) {
                    MemberLookupResult::IsUnknown => {}
                    MemberLookupResult::NotFound { type_id, name } => {
                        self.fail(SolveFailure::NoSuchMember {
                            base: type_id,
                            name,
                        })?;
                    }
                    MemberLookupResult::Found(members) => {
                        if let Some(member) = members.first() {
                            let choice = OverloadChoice::from(member);
                            self.equate(*base, choice.type_id)?;
                            self.choices.insert(*node, choice);
                        }
                    }
                }
                Ok(true)
            }
            Constraint::Call {
                node,
                callee,
                args,
                result,
            } => {
                if self.unbound_var(*callee).is_some() {
                    return Ok(false);
                }
                let callee_type = self.resolve(*callee);
                if callee_type.is_hole() {
                    return Ok(true);
                }
                let Some(shape) = self.env.interner().function_shape(callee_type) else {
                    trace!(node = node.0, "callee is not a function");
                    self.fail(SolveFailure::NotCallable {
                        type_id: callee_type,
                    })?;
                    return Ok(true);
                };
                if args.len() != shape.params.len() {
                    self.fail(SolveFailure::ArityMismatch {
                        expected: shape.params.len(),
                        found: args.len(),
                    })?;
                }
                for (arg, param) in args.iter().zip(shape.params.iter()) {
                    if !arg.any_label && arg.label != param.label {
                        self.fail(SolveFailure::LabelMismatch {
                            expected: param.label,
                            found: arg.label,
                        })?;
                    }
                    self.equate(param.type_id, arg.type_id)?;
                }
                self.equate(*result, shape.result)?;
                Ok(true)
            }
            Constraint::Disjunction { .. } => Ok(false),
            Constraint::Closure {
                node,
                var,
                params,
                result,
                is_async,
            } => {
                if self.unbound_var(*var).is_some() {
                    return Ok(false);
                }
                let contextual = self.resolve(*var);
                if contextual.is_hole() {
                    return Ok(true);
                }
                let Some(shape) = self.env.interner().function_shape(contextual) else {
                    let own = self.closure_type(params, *result, *is_async);
                    self.fail(SolveFailure::Mismatch {
                        expected: contextual,
                        found: own,
                    })?;
                    return Ok(true);
                };
                if shape.params.len() != params.len() {
                    self.fail(SolveFailure::ArityMismatch {
                        expected: shape.params.len(),
                        found: params.len(),
                    })?;
                }
                for (param, contextual_param) in params.iter().zip(shape.params.iter()) {
                    self.equate(contextual_param.type_id, *param)?;
                }
                self.equate(shape.result, *result)?;
                if *is_async && !shape.is_async {
                    self.fail(SolveFailure::AsyncMismatch { node: *node })?;
                }
                Ok(true)
            }
        }
    }

    fn closure_type(&self, params: &[TypeId], result: TypeId, is_async: bool) -> TypeId {
        self.env.interner().function(
            params.iter().copied().map(ParamInfo::unlabeled),
            result,
            is_async,
        )
    }

    /// Give the first closure still waiting for context its own shape.
    /// Only called at a fixed point, so every remaining closure is unbound.
    fn bind_closure_shape(&mut self) -> Result<bool, SolveFailure> {
        let Some(position) = self
            .constraints
            .iter()
            .position(|c| matches!(c, Constraint::Closure { .. }))
        else {
            return Ok(false);
        };
        if let Constraint::Closure {
            node,
            var,
            params,
            result,
            is_async,
        } = self.constraints.remove(position)
        {
            trace!(node = node.0, "closure takes its own shape");
            let own = self.closure_type(&params, result, is_async);
            self.equate(var, own)?;
        }
        Ok(true)
    }

    // =========================================================================
    // Completing a branch
    // =========================================================================

    fn finish_branch(&mut self, listener: &mut dyn SolutionListener) {
        if self.found >= self.limits.max_solutions {
            self.hit_limit = true;
            return;
        }
        if let Err(failure) = self.apply_literal_defaults() {
            trace!(%failure, "branch failed on literal");
            return;
        }
        let remaining = self.constraints.len();
        if remaining > 0 {
            trace!(remaining, "constraints left unsolved");
            if let Err(failure) =
                self.record_fix(SolveFailure::Unsolved { remaining }, remaining as u32)
            {
                trace!(%failure, "branch failed");
                return;
            }
        }

        let typed: Vec<(NodeIndex, TypeId)> =
            self.node_types.iter().map(|(n, t)| (*n, *t)).collect();
        let node_types: FxHashMap<NodeIndex, TypeId> = typed
            .into_iter()
            .map(|(node, type_id)| (node, self.resolve(type_id)))
            .collect();
        let picked: Vec<(NodeIndex, OverloadChoice)> = self
            .choices
            .iter()
            .map(|(node, choice)| (*node, choice.clone()))
            .collect();
        let choices: FxHashMap<NodeIndex, OverloadChoice> = picked
            .into_iter()
            .map(|(node, mut choice)| {
                choice.type_id = self.resolve(choice.type_id);
                (node, choice)
            })
            .collect();

        let solution = Solution::new(self.env, node_types, choices, self.fixes, self.mode);
        self.found += 1;
        if self.found >= self.limits.max_solutions {
            self.hit_limit = true;
        }
        debug!(fixes = self.fixes, found = self.found, "solution found");

        match self.mode {
            SolveMode::Strict => listener.saw_solution(&solution),
            SolveMode::Relaxed => self.candidates.push(solution),
        }
    }

    /// Bind unconstrained literal variables to their default type and check
    /// constrained ones.
    fn apply_literal_defaults(&mut self) -> Result<(), SolveFailure> {
        for index in 0..self.literals.len() {
            let literal = self.literals[index].clone();
            let literal_type = self.env.interner().type_var(literal.var);
            if self.unbound_var(literal_type).is_some() {
                self.equate(literal_type, literal.kind.default_type())?;
                continue;
            }
            let resolved = self.resolve(literal_type);
            let accepted = resolved.is_hole()
                || resolved == TypeId::DOUBLE
                || (resolved == TypeId::INT
                    && literal.kind == LiteralKind::Int);
            if !accepted {
                self.fail(SolveFailure::LiteralMismatch {
                    node: literal.node,
                    type_id: resolved,
                })?;
            }
        }
        Ok(())
    }

    /// Deliver the relaxed-mode candidates with the fewest fixes.
    fn deliver_best(&mut self, listener: &mut dyn SolutionListener) -> usize {
        let candidates = std::mem::take(&mut self.candidates);
        let Some(best) = candidates.iter().map(Solution::fixes).min() else {
            return 0;
        };
        let mut delivered = 0;
        for solution in candidates.iter().filter(|s| s.fixes() == best) {
            listener.saw_solution(solution);
            delivered += 1;
        }
        delivered
    }
}

impl std::fmt::Debug for ConstraintSystem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSystem")
            .field("mode", &self.mode)
            .field("constraints", &self.constraints.len())
            .field("fixes", &self.fixes)
            .field("steps", &self.steps)
            .finish()
    }
}
