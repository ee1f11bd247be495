//! Handoff to the external solving engine.
//!
//! The block's job ends at producing a fully configured solver: the actual
//! Newton/Picard iteration and linear algebra happen outside this crate.

use crate::problem::block::Block;
use crate::problem::enums::{
    AdaptivityStoppingCriterion, AdaptivityType, DampingType, IterSolverType, LinearityType,
    MatrixSolverType, NormType, PreconditionerType,
};
use crate::registry::EnumRegistry;

/// Snapshot of the block's reconciled solver and adaptivity policy.
///
/// Captured once at handoff so the solving engine works from a stable set
/// of parameters even if the problem definition is edited afterwards.
#[derive(Debug, Clone)]
pub struct SolverPolicy {
    pub linearity_type: LinearityType,
    pub matrix_solver: MatrixSolverType,
    pub is_transient: bool,
    pub time_skip: f64,
    pub adaptivity_type: AdaptivityType,
    pub adaptivity_steps: i32,
    pub adaptivity_tolerance: f64,
    pub adaptivity_threshold: f64,
    pub adaptivity_back_steps: i32,
    pub adaptivity_redone_each: i32,
    pub adaptivity_stopping_criterion: AdaptivityStoppingCriterion,
    pub adaptivity_use_aniso: bool,
    pub adaptivity_finer_reference: bool,
    pub nonlinear_residual_norm: f64,
    pub nonlinear_relative_change_of_solutions: f64,
    pub nonlinear_damping_type: DampingType,
    pub nonlinear_damping_coeff: f64,
    pub nonlinear_steps_to_increase_damping_factor: i32,
    pub nonlinear_damping_factor_decrease_ratio: f64,
    pub newton_reuse_jacobian: bool,
    pub newton_sufficient_improvement_factor_for_jacobian_reuse: f64,
    pub newton_max_steps_with_reused_jacobian: i32,
    pub picard_anderson_acceleration: bool,
    pub picard_anderson_beta: f64,
    pub picard_anderson_number_of_last_vectors: i32,
    pub iter_linear_solver_type: IterSolverType,
    pub iter_preconditioner_type: PreconditionerType,
    pub iter_linear_solver_tolerance_absolute: f64,
    pub iter_linear_solver_iters: i32,
}

impl SolverPolicy {
    fn from_block(block: &Block) -> Self {
        Self {
            linearity_type: block.linearity_type(),
            matrix_solver: block.matrix_solver(),
            is_transient: block.is_transient(),
            time_skip: block.time_skip(),
            adaptivity_type: block.adaptivity_type(),
            adaptivity_steps: block.adaptivity_steps(),
            adaptivity_tolerance: block.adaptivity_tolerance(),
            adaptivity_threshold: block.adaptivity_threshold(),
            adaptivity_back_steps: block.adaptivity_back_steps(),
            adaptivity_redone_each: block.adaptivity_redone_each(),
            adaptivity_stopping_criterion: block.adaptivity_stopping_criterion(),
            adaptivity_use_aniso: block.adaptivity_use_aniso(),
            adaptivity_finer_reference: block.adaptivity_finer_reference(),
            nonlinear_residual_norm: block.nonlinear_residual_norm(),
            nonlinear_relative_change_of_solutions: block
                .nonlinear_relative_change_of_solutions(),
            nonlinear_damping_type: block.nonlinear_damping_type(),
            nonlinear_damping_coeff: block.nonlinear_damping_coeff(),
            nonlinear_steps_to_increase_damping_factor: block
                .nonlinear_steps_to_increase_damping_factor(),
            nonlinear_damping_factor_decrease_ratio: block
                .nonlinear_damping_factor_decrease_ratio(),
            newton_reuse_jacobian: block.newton_reuse_jacobian(),
            newton_sufficient_improvement_factor_for_jacobian_reuse: block
                .newton_sufficient_improvement_factor_for_jacobian_reuse(),
            newton_max_steps_with_reused_jacobian: block
                .newton_max_steps_with_reused_jacobian(),
            picard_anderson_acceleration: block.picard_anderson_acceleration(),
            picard_anderson_beta: block.picard_anderson_beta(),
            picard_anderson_number_of_last_vectors: block
                .picard_anderson_number_of_last_vectors(),
            iter_linear_solver_type: block.iter_linear_solver_type(),
            iter_preconditioner_type: block.iter_preconditioner_type(),
            iter_linear_solver_tolerance_absolute: block
                .iter_linear_solver_tolerance_absolute(),
            iter_linear_solver_iters: block.iter_linear_solver_iters(),
        }
    }
}

/// Solver configuration produced by [`Block::prepare_solver`].
pub struct ProblemSolver {
    field_ids: Vec<String>,
    num_solutions: usize,
    essential_bc_counts: Vec<usize>,
    proj_norm_types: Vec<NormType>,
    weak_form_label: Option<String>,
    policy: SolverPolicy,
}

impl ProblemSolver {
    /// Initializes a solver against a block: field composition, component
    /// layout, boundary-condition shape and the full reconciled policy.
    pub fn init(block: &Block) -> Self {
        Self {
            field_ids: block
                .fields()
                .iter()
                .map(|field| field.field_info().field_id().to_string())
                .collect(),
            num_solutions: block.num_solutions(),
            essential_bc_counts: block.bcs().iter().map(|bc| bc.len()).collect(),
            proj_norm_types: block.proj_norm_types(),
            weak_form_label: block.weak_form().map(|wf| wf.label()),
            policy: SolverPolicy::from_block(block),
        }
    }

    pub fn field_ids(&self) -> &[String] {
        &self.field_ids
    }

    pub fn num_solutions(&self) -> usize {
        self.num_solutions
    }

    pub fn essential_bc_counts(&self) -> &[usize] {
        &self.essential_bc_counts
    }

    pub fn proj_norm_types(&self) -> &[NormType] {
        &self.proj_norm_types
    }

    pub fn weak_form_label(&self) -> Option<&str> {
        self.weak_form_label.as_deref()
    }

    pub fn policy(&self) -> &SolverPolicy {
        &self.policy
    }

    /// One-line human-readable summary for diagnostics.
    pub fn describe(&self, registry: &EnumRegistry) -> String {
        format!(
            "{} [{} solutions, {}, {}{}]",
            self.field_ids.join("+"),
            self.num_solutions,
            registry.linearity.key(self.policy.linearity_type),
            registry.matrix_solver.key(self.policy.matrix_solver),
            if self.policy.adaptivity_type == crate::problem::enums::AdaptivityType::Disabled {
                String::new()
            } else {
                format!(", {}", registry.adaptivity.key(self.policy.adaptivity_type))
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::field_info::{FieldInfo, FieldSetting, SettingValue};
    use std::rc::Rc;

    #[test]
    fn test_init_snapshots_policy() {
        let mut a = FieldInfo::new("heat", 1);
        a.set_linearity_type(LinearityType::Newton);
        a.set_value(FieldSetting::NonlinearResidualNorm, SettingValue::Double(1e-4));
        let mut b = FieldInfo::new("elasticity", 2);
        b.set_linearity_type(LinearityType::Newton);
        b.set_value(FieldSetting::NonlinearResidualNorm, SettingValue::Double(1e-6));

        let block = Block::new(vec![Rc::new(a), Rc::new(b)], vec![]);
        let solver = ProblemSolver::init(&block);

        assert_eq!(solver.field_ids(), ["heat", "elasticity"]);
        assert_eq!(solver.num_solutions(), 3);
        assert_eq!(solver.policy().linearity_type, LinearityType::Newton);
        assert!((solver.policy().nonlinear_residual_norm - 1e-6).abs() < 1e-18);
        // No BC assembly happened yet.
        assert!(solver.essential_bc_counts().is_empty());
    }

    #[test]
    fn test_describe_uses_registry_keys() {
        let mut info = FieldInfo::new("heat", 1);
        info.set_linearity_type(LinearityType::Picard);
        let block = Block::new(vec![Rc::new(info)], vec![]);
        let solver = ProblemSolver::init(&block);

        let registry = EnumRegistry::new();
        let text = solver.describe(&registry);
        assert!(text.contains("picard"), "got: {text}");
        assert!(text.contains("umfpack"), "got: {text}");
    }
}
