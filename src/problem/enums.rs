use serde::{Deserialize, Serialize};

/// Kind of analysis carried out for a single physical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    SteadyState,
    Transient,
    Harmonic,
}

/// Nonlinear-solve strategy for a field (and, after reconciliation, for a
/// whole block). Hard-coupled fields must agree on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinearityType {
    #[default]
    Linear,
    Newton,
    Picard,
}

/// Mesh/polynomial-order refinement policy driven by estimated error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdaptivityType {
    #[default]
    Disabled,
    H,
    P,
    Hp,
}

/// Stopping criterion for the adaptive refinement loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdaptivityStoppingCriterion {
    #[default]
    Cumulative,
    SingleElement,
    Levels,
}

/// Damping strategy applied to nonlinear iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DampingType {
    Off,
    Fixed,
    #[default]
    Automatic,
}

/// Direct or iterative matrix solver backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatrixSolverType {
    #[default]
    Umfpack,
    ParalutionIterative,
    Mumps,
    SuperLu,
    TrilinosAmesos,
    TrilinosAztecOo,
}

/// Krylov method used when the matrix solver is iterative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IterSolverType {
    Cg,
    Gmres,
    #[default]
    BiCgStab,
}

/// Preconditioner used when the matrix solver is iterative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreconditionerType {
    #[default]
    Jacobi,
    Ilu,
    MultiColoredIlu,
}

/// Strength of a directed relation between two fields.
///
/// Weak: the source field's last solution feeds an extra source term into
/// the target, solved in a separate system. Hard: both fields are solved
/// simultaneously in one monolithic system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CouplingType {
    #[default]
    None,
    Weak,
    Hard,
}

/// Coordinate system of the problem geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateType {
    #[default]
    Planar,
    Axisymmetric,
}

/// Function space assigned to one solution component of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpaceType {
    #[default]
    H1,
    L2,
    /// Piecewise-constant per marker region; projected with the L2 norm.
    L2MarkerwiseConst,
}

/// Norm used to measure projection error for one solution component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormType {
    H1,
    L2,
}

impl SpaceType {
    /// Projection norm matching this function space.
    pub fn proj_norm(self) -> NormType {
        match self {
            SpaceType::H1 => NormType::H1,
            SpaceType::L2 | SpaceType::L2MarkerwiseConst => NormType::L2,
        }
    }
}
