//! The block: one or more hard-coupled fields producing a single weak form,
//! solved together as one system.
//!
//! The block owns its member fields, the essential boundary-condition
//! containers for all solution components, the cache of exact-solution
//! functions, and at most one weak-form instance. Per-field solver and
//! adaptivity settings are reconciled into one block-wide policy through
//! the merge helpers in [`super::policy`].

use std::collections::HashMap;
use std::rc::Rc;

use crate::problem::bc::{
    EssentialBcCollection, EssentialBoundaryCondition, SharedSolutionFunction,
};
use crate::problem::coupling::CouplingInfo;
use crate::problem::enums::{
    AdaptivityStoppingCriterion, AdaptivityType, AnalysisType, DampingType, IterSolverType,
    LinearityType, MatrixSolverType, NormType, PreconditionerType,
};
use crate::problem::field::Field;
use crate::problem::field_info::{FieldInfo, FieldSetting};
use crate::problem::plugin::ProblemId;
use crate::problem::policy;
use crate::problem::solver::ProblemSolver;
use crate::problem::weak_form::WeakForm;
use crate::scene::{BoundaryRef, Scene};
use crate::uid::Uid;

/// Coarse lifecycle state of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Fields and couplings assigned, no boundary conditions yet.
    Configured,
    /// Essential boundary conditions built, ready for assembly.
    BoundaryReady,
    /// A solver has been produced and initialized against this block.
    SolverReady,
}

pub struct Block {
    fields: Vec<Field>,
    couplings: Vec<Rc<CouplingInfo>>,
    weak_form: Option<Box<dyn WeakForm>>,
    bcs: Vec<EssentialBcCollection>,
    /// Function -> marker association, kept so updated boundary data can be
    /// pushed into live function objects between solve/time steps.
    exact_solution_functions: HashMap<Uid, (SharedSolutionFunction, BoundaryRef)>,
    state: BlockState,
}

impl Block {
    /// Builds a block from a field grouping decision plus the coupling list.
    ///
    /// Each member field picks up the weak couplings for which it is the
    /// target; the coupling list itself (including the hard couplings that
    /// justified the grouping) is retained as handed in.
    pub fn new(field_infos: Vec<Rc<FieldInfo>>, couplings: Vec<Rc<CouplingInfo>>) -> Self {
        assert!(
            !field_infos.is_empty(),
            "a block must contain at least one field"
        );

        let fields = field_infos
            .into_iter()
            .map(|info| {
                let mut field = Field::new(info);
                for coupling in &couplings {
                    if coupling.is_weak()
                        && coupling.target_field().field_id() == field.field_info().field_id()
                    {
                        field.add_coupling_info(coupling.clone());
                    }
                }
                field
            })
            .collect();

        Self {
            fields,
            couplings,
            weak_form: None,
            bcs: vec![],
            exact_solution_functions: HashMap::new(),
            state: BlockState::Configured,
        }
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_infos(&self) -> Vec<Rc<FieldInfo>> {
        self.fields
            .iter()
            .map(|field| field.field_info_rc().clone())
            .collect()
    }

    pub fn couplings(&self) -> &[Rc<CouplingInfo>] {
        &self.couplings
    }

    pub fn contains(&self, field_info: &FieldInfo) -> bool {
        self.fields
            .iter()
            .any(|field| field.field_info().field_id() == field_info.field_id())
    }

    pub fn field(&self, field_info: &FieldInfo) -> Option<&Field> {
        self.fields
            .iter()
            .find(|field| field.field_info().field_id() == field_info.field_id())
    }

    /// Total number of solution components across all member fields.
    pub fn num_solutions(&self) -> usize {
        self.fields
            .iter()
            .map(|field| field.field_info().number_of_solutions())
            .sum()
    }

    /// Offset of `field` into the block's solution vector: the sum of the
    /// solution-component counts of all fields preceding it.
    ///
    /// Panics for a field that is not a member of this block; that is an
    /// upstream programming error, not a recoverable condition.
    pub fn offset(&self, field: &Field) -> usize {
        let mut offset = 0;
        for candidate in &self.fields {
            if candidate.field_info().field_id() == field.field_info().field_id() {
                return offset;
            }
            offset += candidate.field_info().number_of_solutions();
        }
        panic!(
            "field '{}' is not a member of this block",
            field.field_info().field_id()
        );
    }

    /// All distinct fields that act as sources of weak couplings into any
    /// member of this block, in first-seen order.
    pub fn source_field_infos_coupling(&self) -> Vec<Rc<FieldInfo>> {
        let mut result: Vec<Rc<FieldInfo>> = vec![];
        for field in &self.fields {
            for coupling in field.coupling_infos() {
                debug_assert!(coupling.is_weak());
                debug_assert_eq!(
                    coupling.target_field().field_id(),
                    field.field_info().field_id()
                );
                let source = coupling.source_field();
                if !result
                    .iter()
                    .any(|known| known.field_id() == source.field_id())
                {
                    result.push(source.clone());
                }
            }
        }
        result
    }

    pub fn is_transient(&self) -> bool {
        self.fields
            .iter()
            .any(|field| field.field_info().analysis_type() == AnalysisType::Transient)
    }

    /// Minimal configured time skip over the non-transient fields.
    ///
    /// A steady-state field run alongside a transient one may sit out some
    /// number of time steps. `0` means "no skip"; it is both the default and
    /// the seed of the scan, so a block with only transient fields (or with
    /// no configured skip) reports 0.
    pub fn time_skip(&self) -> f64 {
        let mut skip = 0.0;
        for field in &self.fields {
            if field.field_info().analysis_type() == AnalysisType::Transient {
                continue;
            }
            let actual = field
                .field_info()
                .value(FieldSetting::TransientTimeSkip)
                .as_f64();
            if skip == 0.0 || actual < skip {
                skip = actual;
            }
        }
        skip
    }

    // --- policy reconciliation -------------------------------------------
    //
    // Equality-required properties panic on disagreement: the upstream
    // grouping algorithm guarantees hard-coupled fields agree on them.

    pub fn linearity_type(&self) -> LinearityType {
        policy::require_equal(&self.fields, "linearity type", |info| info.linearity_type())
    }

    pub fn matrix_solver(&self) -> MatrixSolverType {
        policy::require_equal(&self.fields, "matrix solver", |info| info.matrix_solver())
    }

    pub fn adaptivity_type(&self) -> AdaptivityType {
        policy::require_equal(&self.fields, "adaptivity type", |info| {
            info.adaptivity_type()
        })
    }

    pub fn adaptivity_steps(&self) -> i32 {
        policy::require_equal(&self.fields, "adaptivity steps", |info| {
            info.value(FieldSetting::AdaptivitySteps).as_i32()
        })
    }

    pub fn adaptivity_back_steps(&self) -> i32 {
        policy::require_equal(&self.fields, "adaptivity back steps", |info| {
            info.value(FieldSetting::AdaptivityTransientBackSteps).as_i32()
        })
    }

    pub fn adaptivity_redone_each(&self) -> i32 {
        policy::require_equal(&self.fields, "adaptivity redone each", |info| {
            info.value(FieldSetting::AdaptivityTransientRedoneEach).as_i32()
        })
    }

    pub fn adaptivity_stopping_criterion(&self) -> AdaptivityStoppingCriterion {
        policy::require_equal(&self.fields, "adaptivity stopping criterion", |info| {
            info.value(FieldSetting::AdaptivityStoppingCriterion)
                .as_stopping_criterion()
        })
    }

    pub fn adaptivity_use_aniso(&self) -> bool {
        policy::require_equal(&self.fields, "adaptivity anisotropy flag", |info| {
            info.value(FieldSetting::AdaptivityUseAniso).as_bool()
        })
    }

    pub fn adaptivity_finer_reference(&self) -> bool {
        policy::require_equal(&self.fields, "adaptivity finer reference flag", |info| {
            info.value(FieldSetting::AdaptivityFinerReference).as_bool()
        })
    }

    /// Smallest enabled adaptivity tolerance; 0 when every field disables
    /// adaptive refinement by tolerance.
    pub fn adaptivity_tolerance(&self) -> f64 {
        policy::fold_min_enabled(&self.fields, |info| {
            info.value(FieldSetting::AdaptivityTolerance).as_f64()
        })
        .unwrap_or(0.0)
    }

    /// Smallest enabled refinement threshold; 0 when unconfigured everywhere.
    pub fn adaptivity_threshold(&self) -> f64 {
        policy::fold_min_enabled(&self.fields, |info| {
            info.value(FieldSetting::AdaptivityThreshold).as_f64()
        })
        .unwrap_or(0.0)
    }

    /// Smallest enabled residual-norm tolerance. When no field enables the
    /// criterion the solver still runs both stopping tests, so a very large
    /// finite value is substituted to keep the test from ever tripping.
    pub fn nonlinear_residual_norm(&self) -> f64 {
        policy::fold_min_enabled(&self.fields, |info| {
            info.value(FieldSetting::NonlinearResidualNorm).as_f64()
        })
        .unwrap_or(1e20)
    }

    /// Same convention as [`Self::nonlinear_residual_norm`].
    pub fn nonlinear_relative_change_of_solutions(&self) -> f64 {
        policy::fold_min_enabled(&self.fields, |info| {
            info.value(FieldSetting::NonlinearRelativeChangeOfSolutions)
                .as_f64()
        })
        .unwrap_or(1e20)
    }

    pub fn nonlinear_damping_type(&self) -> DampingType {
        policy::require_equal(&self.fields, "damping type", |info| {
            info.value(FieldSetting::NonlinearDampingType).as_damping_type()
        })
    }

    /// Smallest damping coefficient; 0 is a valid field optimum here and is
    /// compared literally. Capped at the physical maximum of 1.
    pub fn nonlinear_damping_coeff(&self) -> f64 {
        policy::fold_min(&self.fields, 1.0, |info| {
            info.value(FieldSetting::NonlinearDampingCoeff).as_f64()
        })
    }

    pub fn nonlinear_steps_to_increase_damping_factor(&self) -> i32 {
        policy::fold_max(&self.fields, 0, |info| {
            info.value(FieldSetting::NonlinearStepsToIncreaseDampingFactor)
                .as_i32()
        })
    }

    /// Ratio of current to previous residual norm under which a damped step
    /// is accepted; the strictest field wins.
    pub fn nonlinear_damping_factor_decrease_ratio(&self) -> f64 {
        policy::fold_min(&self.fields, 1e10, |info| {
            info.value(FieldSetting::NonlinearDampingFactorDecreaseRatio)
                .as_f64()
        })
    }

    pub fn newton_reuse_jacobian(&self) -> bool {
        policy::fold_and(&self.fields, |info| {
            info.value(FieldSetting::NewtonReuseJacobian).as_bool()
        })
    }

    /// Residual improvement ratio required to keep reusing a Jacobian; the
    /// strictest field wins.
    pub fn newton_sufficient_improvement_factor_for_jacobian_reuse(&self) -> f64 {
        policy::fold_min(&self.fields, 1e10, |info| {
            info.value(FieldSetting::NewtonJacobianReuseRatio).as_f64()
        })
    }

    pub fn newton_max_steps_with_reused_jacobian(&self) -> i32 {
        policy::fold_min(&self.fields, 10, |info| {
            info.value(FieldSetting::NewtonMaxStepsReuseJacobian).as_i32()
        })
    }

    pub fn picard_anderson_acceleration(&self) -> bool {
        policy::fold_and(&self.fields, |info| {
            info.value(FieldSetting::PicardAndersonAcceleration).as_bool()
        })
    }

    pub fn picard_anderson_beta(&self) -> f64 {
        policy::fold_max(&self.fields, 0.0, |info| {
            info.value(FieldSetting::PicardAndersonBeta).as_f64()
        })
    }

    pub fn picard_anderson_number_of_last_vectors(&self) -> i32 {
        policy::fold_max(&self.fields, 1, |info| {
            info.value(FieldSetting::PicardAndersonNumberOfLastVectors)
                .as_i32()
        })
    }

    pub fn iter_linear_solver_type(&self) -> IterSolverType {
        policy::require_equal(&self.fields, "iterative solver method", |info| {
            info.value(FieldSetting::LinearSolverIterMethod).as_iter_method()
        })
    }

    pub fn iter_preconditioner_type(&self) -> PreconditionerType {
        policy::require_equal(&self.fields, "iterative solver preconditioner", |info| {
            info.value(FieldSetting::LinearSolverIterPreconditioner)
                .as_preconditioner()
        })
    }

    pub fn iter_linear_solver_tolerance_absolute(&self) -> f64 {
        policy::fold_min(&self.fields, 1.0, |info| {
            info.value(FieldSetting::LinearSolverIterToleranceAbsolute)
                .as_f64()
        })
    }

    pub fn iter_linear_solver_iters(&self) -> i32 {
        policy::fold_max(&self.fields, 1, |info| {
            info.value(FieldSetting::LinearSolverIterIters).as_i32()
        })
    }

    /// Projection norm per solution component, in block component order.
    pub fn proj_norm_types(&self) -> Vec<NormType> {
        let mut norms = Vec::with_capacity(self.num_solutions());
        for field in &self.fields {
            for component in 0..field.field_info().number_of_solutions() {
                norms.push(field.field_info().space_types()[component].proj_norm());
            }
        }
        norms
    }

    // --- boundary conditions ---------------------------------------------

    /// Essential-BC containers, one per solution component. Empty until the
    /// first [`Self::create_boundary_conditions`] call.
    pub fn bcs(&self) -> &[EssentialBcCollection] {
        &self.bcs
    }

    pub fn exact_solution_functions(
        &self,
    ) -> &HashMap<Uid, (SharedSolutionFunction, BoundaryRef)> {
        &self.exact_solution_functions
    }

    /// Rebuilds the essential boundary conditions from the current scene
    /// topology.
    ///
    /// Previous containers and cached functions are discarded first, then
    /// exactly `num_solutions()` empty containers are created and populated:
    /// for every member field and every boundary edge carrying a present,
    /// non-"none" marker for that field, each essential form of the marker's
    /// boundary type contributes one named Dirichlet condition at component
    /// `form.component_index - 1 + offset(field)`. Edges without a marker
    /// contribute nothing (natural boundary).
    pub fn create_boundary_conditions(&mut self, scene: &Scene) {
        let mut bcs: Vec<EssentialBcCollection> = (0..self.num_solutions())
            .map(|_| EssentialBcCollection::new())
            .collect();
        let mut cache: HashMap<Uid, (SharedSolutionFunction, BoundaryRef)> = HashMap::new();

        let mut offset = 0;
        for field in &self.fields {
            let info = field.field_info();

            let problem_id = ProblemId {
                target_field_id: info.field_id().to_string(),
                analysis_type: info.analysis_type(),
                coordinate_type: scene.coordinate_type(),
                linearity_type: info.linearity_type(),
            };

            for (index, edge) in scene.edges().iter().enumerate() {
                let Some(marker) = edge.marker(info) else {
                    continue;
                };
                let boundary = marker.borrow();
                if boundary.is_none() {
                    continue;
                }

                let boundary_type = info
                    .boundary_type(boundary.boundary_type_id())
                    .unwrap_or_else(|| {
                        panic!(
                            "field '{}' has no boundary type '{}' (marker '{}')",
                            info.field_id(),
                            boundary.boundary_type_id(),
                            boundary.name()
                        )
                    });

                for form in boundary_type.essential() {
                    assert!(
                        (1..=info.number_of_solutions()).contains(&form.component_index),
                        "field '{}' form '{}' constrains component {} of {}",
                        info.field_id(),
                        form.id,
                        form.component_index,
                        info.number_of_solutions()
                    );
                    let mut function =
                        info.plugin()
                            .exact_solution(&problem_id, form, info.initial_mesh());
                    function.set_marker_target(&boundary);

                    let function: SharedSolutionFunction =
                        Rc::new(std::cell::RefCell::new(function));
                    let id = function.borrow().id().clone();
                    cache.insert(id, (function.clone(), marker.clone()));

                    // The per-edge index keeps multiple Dirichlet conditions
                    // on the same component apart.
                    let condition =
                        EssentialBoundaryCondition::new(index.to_string(), function.clone());
                    bcs[form.component_index - 1 + offset].add_boundary_condition(condition);
                }
            }

            offset += info.number_of_solutions();
        }

        self.bcs = bcs;
        self.exact_solution_functions = cache;
        self.state = BlockState::BoundaryReady;
    }

    /// Pushes the current marker data of every cached boundary into its
    /// exact-solution function, without reconstructing the functions.
    ///
    /// Called between time/adaptivity steps when only marker values change
    /// while the expression forms stay the same.
    pub fn update_exact_solution_functions(&mut self) {
        for (function, boundary) in self.exact_solution_functions.values() {
            function.borrow_mut().set_marker_target(&boundary.borrow());
        }
    }

    // --- weak form and solver handoff ------------------------------------

    pub fn weak_form(&self) -> Option<&dyn WeakForm> {
        self.weak_form.as_deref()
    }

    /// Installs a new weak form, releasing any prior instance first.
    pub fn set_weak_form(&mut self, weak_form: Box<dyn WeakForm>) {
        // Dropping the old instance before the assignment completes is
        // guaranteed by the Option replacement.
        self.weak_form = Some(weak_form);
    }

    /// Validates solve readiness and produces an initialized solver.
    ///
    /// Every field is asked to solve its initial variables first; if any
    /// field fails, `None` is returned ("not ready to solve") and the block
    /// state is left untouched.
    pub fn prepare_solver(&mut self) -> Option<ProblemSolver> {
        for field in &self.fields {
            if !field.solve_init_variables() {
                return None;
            }
        }

        let solver = ProblemSolver::init(self);
        self.state = BlockState::SolverReady;
        Some(solver)
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<&str> = self
            .fields
            .iter()
            .map(|field| field.field_info().field_id())
            .collect();
        write!(f, "Block [{}]", ids.join(", "))
    }
}
