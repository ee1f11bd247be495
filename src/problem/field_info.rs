//! Per-field configuration store.
//!
//! `FieldInfo` is owned by the enclosing problem definition; blocks only
//! read from it through the accessors below. Scalar solver and adaptivity
//! settings live in a named-value store so that the block's policy
//! reconciliation can scan them generically.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::problem::enums::{
    AdaptivityStoppingCriterion, AdaptivityType, AnalysisType, DampingType, IterSolverType,
    LinearityType, MatrixSolverType, PreconditionerType, SpaceType,
};
use crate::problem::plugin::{FieldPlugin, ScalarSolutionPlugin};
use crate::scene::InitialMesh;

/// One essential (Dirichlet) sub-condition of a boundary type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInfo {
    /// Form identifier within the boundary type.
    pub id: String,
    /// 1-based index of the solution component this form constrains.
    pub component_index: usize,
    /// Expression evaluated on the boundary; parsing is out of scope, the
    /// string is carried opaquely to the exact-solution factory.
    pub expression: String,
}

/// Boundary type exposed by a field module: a named set of forms, of which
/// only the essential ones matter to this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryType {
    id: String,
    essential: Vec<FormInfo>,
}

impl BoundaryType {
    pub fn new(id: &str, essential: Vec<FormInfo>) -> Self {
        Self {
            id: id.to_string(),
            essential,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Essential forms; an empty list means the type contributes only
    /// natural (weak-form surface) conditions.
    pub fn essential(&self) -> &[FormInfo] {
        &self.essential
    }
}

/// Key into the named-value settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldSetting {
    AdaptivitySteps,
    AdaptivityTolerance,
    AdaptivityThreshold,
    AdaptivityStoppingCriterion,
    AdaptivityTransientBackSteps,
    AdaptivityTransientRedoneEach,
    AdaptivityUseAniso,
    AdaptivityFinerReference,
    TransientTimeSkip,
    NonlinearResidualNorm,
    NonlinearRelativeChangeOfSolutions,
    NonlinearDampingType,
    NonlinearDampingCoeff,
    NonlinearStepsToIncreaseDampingFactor,
    NonlinearDampingFactorDecreaseRatio,
    NewtonReuseJacobian,
    NewtonJacobianReuseRatio,
    NewtonMaxStepsReuseJacobian,
    PicardAndersonAcceleration,
    PicardAndersonBeta,
    PicardAndersonNumberOfLastVectors,
    LinearSolverIterMethod,
    LinearSolverIterPreconditioner,
    LinearSolverIterToleranceAbsolute,
    LinearSolverIterIters,
}

/// Typed scalar value stored under a [`FieldSetting`] key.
///
/// Every key has a fixed kind; reading a value with the wrong accessor is a
/// programming error and panics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    Double(f64),
    Int(i32),
    Bool(bool),
    Damping(DampingType),
    StoppingCriterion(AdaptivityStoppingCriterion),
    IterMethod(IterSolverType),
    Preconditioner(PreconditionerType),
}

impl SettingValue {
    pub fn as_f64(self) -> f64 {
        match self {
            SettingValue::Double(v) => v,
            other => panic!("setting holds {other:?}, expected a double"),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            SettingValue::Int(v) => v,
            other => panic!("setting holds {other:?}, expected an int"),
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            SettingValue::Bool(v) => v,
            other => panic!("setting holds {other:?}, expected a bool"),
        }
    }

    pub fn as_damping_type(self) -> DampingType {
        match self {
            SettingValue::Damping(v) => v,
            other => panic!("setting holds {other:?}, expected a damping type"),
        }
    }

    pub fn as_stopping_criterion(self) -> AdaptivityStoppingCriterion {
        match self {
            SettingValue::StoppingCriterion(v) => v,
            other => panic!("setting holds {other:?}, expected a stopping criterion"),
        }
    }

    pub fn as_iter_method(self) -> IterSolverType {
        match self {
            SettingValue::IterMethod(v) => v,
            other => panic!("setting holds {other:?}, expected an iterative method"),
        }
    }

    pub fn as_preconditioner(self) -> PreconditionerType {
        match self {
            SettingValue::Preconditioner(v) => v,
            other => panic!("setting holds {other:?}, expected a preconditioner"),
        }
    }
}

impl FieldSetting {
    /// Default value a field reports when nothing was configured.
    pub fn default_value(self) -> SettingValue {
        use FieldSetting::*;
        match self {
            AdaptivitySteps => SettingValue::Int(10),
            AdaptivityTolerance => SettingValue::Double(1.0),
            AdaptivityThreshold => SettingValue::Double(0.6),
            AdaptivityStoppingCriterion => {
                SettingValue::StoppingCriterion(Default::default())
            }
            AdaptivityTransientBackSteps => SettingValue::Int(0),
            AdaptivityTransientRedoneEach => SettingValue::Int(1),
            AdaptivityUseAniso => SettingValue::Bool(true),
            AdaptivityFinerReference => SettingValue::Bool(false),
            TransientTimeSkip => SettingValue::Double(0.0),
            NonlinearResidualNorm => SettingValue::Double(0.0),
            NonlinearRelativeChangeOfSolutions => SettingValue::Double(0.1),
            NonlinearDampingType => SettingValue::Damping(Default::default()),
            NonlinearDampingCoeff => SettingValue::Double(1.0),
            NonlinearStepsToIncreaseDampingFactor => SettingValue::Int(1),
            NonlinearDampingFactorDecreaseRatio => SettingValue::Double(1.2),
            NewtonReuseJacobian => SettingValue::Bool(true),
            NewtonJacobianReuseRatio => SettingValue::Double(0.8),
            NewtonMaxStepsReuseJacobian => SettingValue::Int(20),
            PicardAndersonAcceleration => SettingValue::Bool(false),
            PicardAndersonBeta => SettingValue::Double(0.2),
            PicardAndersonNumberOfLastVectors => SettingValue::Int(3),
            LinearSolverIterMethod => SettingValue::IterMethod(Default::default()),
            LinearSolverIterPreconditioner => SettingValue::Preconditioner(Default::default()),
            LinearSolverIterToleranceAbsolute => SettingValue::Double(1e-13),
            LinearSolverIterIters => SettingValue::Int(1000),
        }
    }
}

/// Configuration of one physical field.
pub struct FieldInfo {
    field_id: String,
    analysis_type: AnalysisType,
    linearity_type: LinearityType,
    adaptivity_type: AdaptivityType,
    matrix_solver: MatrixSolverType,
    number_of_solutions: usize,
    /// Function space per solution component (0-based).
    space_types: Vec<SpaceType>,
    settings: HashMap<FieldSetting, SettingValue>,
    boundary_types: HashMap<String, BoundaryType>,
    /// Initial/derived scalar variables; `None` marks a variable whose
    /// user expression could not be evaluated upstream.
    initial_variables: HashMap<String, Option<f64>>,
    initial_mesh: InitialMesh,
    plugin: Box<dyn FieldPlugin>,
}

impl FieldInfo {
    pub fn new(field_id: &str, number_of_solutions: usize) -> Self {
        assert!(
            number_of_solutions > 0,
            "field '{field_id}' must have at least one solution component"
        );
        Self {
            field_id: field_id.to_string(),
            analysis_type: AnalysisType::default(),
            linearity_type: LinearityType::default(),
            adaptivity_type: AdaptivityType::default(),
            matrix_solver: MatrixSolverType::default(),
            number_of_solutions,
            space_types: vec![SpaceType::H1; number_of_solutions],
            settings: HashMap::new(),
            boundary_types: HashMap::new(),
            initial_variables: HashMap::new(),
            initial_mesh: InitialMesh::new(&format!("{field_id}-initial"), 0),
            plugin: Box::new(ScalarSolutionPlugin),
        }
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn set_analysis_type(&mut self, analysis_type: AnalysisType) {
        self.analysis_type = analysis_type;
    }

    pub fn linearity_type(&self) -> LinearityType {
        self.linearity_type
    }

    pub fn set_linearity_type(&mut self, linearity_type: LinearityType) {
        self.linearity_type = linearity_type;
    }

    pub fn adaptivity_type(&self) -> AdaptivityType {
        self.adaptivity_type
    }

    pub fn set_adaptivity_type(&mut self, adaptivity_type: AdaptivityType) {
        self.adaptivity_type = adaptivity_type;
    }

    pub fn matrix_solver(&self) -> MatrixSolverType {
        self.matrix_solver
    }

    pub fn set_matrix_solver(&mut self, matrix_solver: MatrixSolverType) {
        self.matrix_solver = matrix_solver;
    }

    pub fn number_of_solutions(&self) -> usize {
        self.number_of_solutions
    }

    pub fn space_types(&self) -> &[SpaceType] {
        &self.space_types
    }

    pub fn set_space_type(&mut self, component: usize, space_type: SpaceType) {
        self.space_types[component] = space_type;
    }

    /// Reads a scalar setting, falling back to the per-key default.
    pub fn value(&self, key: FieldSetting) -> SettingValue {
        self.settings
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_value())
    }

    pub fn set_value(&mut self, key: FieldSetting, value: SettingValue) {
        self.settings.insert(key, value);
    }

    pub fn boundary_type(&self, id: &str) -> Option<&BoundaryType> {
        self.boundary_types.get(id)
    }

    pub fn add_boundary_type(&mut self, boundary_type: BoundaryType) {
        self.boundary_types
            .insert(boundary_type.id().to_string(), boundary_type);
    }

    /// Declares an initial variable; pass `None` for a variable whose
    /// expression is not (yet) resolvable.
    pub fn set_initial_variable(&mut self, name: &str, value: Option<f64>) {
        self.initial_variables.insert(name.to_string(), value);
    }

    /// True when every declared initial variable has a finite value.
    pub fn init_variables_resolved(&self) -> bool {
        self.initial_variables
            .values()
            .all(|v| matches!(v, Some(x) if x.is_finite()))
    }

    pub fn initial_mesh(&self) -> &InitialMesh {
        &self.initial_mesh
    }

    pub fn set_initial_mesh(&mut self, mesh: InitialMesh) {
        self.initial_mesh = mesh;
    }

    pub fn plugin(&self) -> &dyn FieldPlugin {
        self.plugin.as_ref()
    }

    pub fn set_plugin(&mut self, plugin: Box<dyn FieldPlugin>) {
        self.plugin = plugin;
    }
}
