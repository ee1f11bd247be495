//! Seam to the field/module plugin system.
//!
//! Plugins own the weak-form integrands and the exact-solution factories of
//! their field. Only the factory side is consumed here; everything else
//! stays behind this trait.

use crate::problem::bc::ExactSolutionFunction;
use crate::problem::enums::{AnalysisType, CoordinateType, LinearityType};
use crate::problem::field_info::FormInfo;
use crate::scene::InitialMesh;

/// Identifies which concrete problem variant a plugin artifact is built
/// for. Assembled by the block per field before boundary-condition
/// assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemId {
    pub target_field_id: String,
    pub analysis_type: AnalysisType,
    pub coordinate_type: CoordinateType,
    pub linearity_type: LinearityType,
}

/// Factory interface implemented by every field plugin.
pub trait FieldPlugin {
    /// Plugin identifier, normally equal to the field id it serves.
    fn id(&self) -> &str;

    /// Materializes the Dirichlet-value function for one essential form,
    /// evaluated against the form's expression on the given mesh.
    fn exact_solution(
        &self,
        problem: &ProblemId,
        form: &FormInfo,
        mesh: &InitialMesh,
    ) -> ExactSolutionFunction;
}

/// Default scalar implementation used by fields without a generated plugin.
pub struct ScalarSolutionPlugin;

impl FieldPlugin for ScalarSolutionPlugin {
    fn id(&self) -> &str {
        "scalar"
    }

    fn exact_solution(
        &self,
        problem: &ProblemId,
        form: &FormInfo,
        _mesh: &InitialMesh,
    ) -> ExactSolutionFunction {
        ExactSolutionFunction::new(
            &problem.target_field_id,
            form.component_index,
            &form.expression,
        )
    }
}
