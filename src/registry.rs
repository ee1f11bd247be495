//! Bidirectional enum <-> string-key translation.
//!
//! The registry is built once during process setup and treated as read-only
//! afterwards. Components that need string/enum translation receive a
//! reference to it instead of consulting ambient global state.

use anyhow::{Result, anyhow};

use crate::problem::enums::{
    AdaptivityStoppingCriterion, AdaptivityType, AnalysisType, CoordinateType, CouplingType,
    DampingType, IterSolverType, LinearityType, MatrixSolverType, PreconditionerType,
};

/// Immutable two-way mapping between one enum and its stable string keys.
///
/// The variant count is small for every enum handled here, so lookups are
/// linear scans over a fixed slice.
pub struct EnumNames<T: Copy + PartialEq + std::fmt::Debug + 'static> {
    pairs: &'static [(T, &'static str)],
}

impl<T: Copy + PartialEq + std::fmt::Debug + 'static> EnumNames<T> {
    fn new(pairs: &'static [(T, &'static str)]) -> Self {
        Self { pairs }
    }

    /// Stable string key for `value`.
    ///
    /// Panics if the table does not cover the variant; the tables below are
    /// exhaustive, so a miss is a construction bug.
    pub fn key(&self, value: T) -> &'static str {
        self.pairs
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, k)| *k)
            .unwrap_or_else(|| panic!("no string key registered for {value:?}"))
    }

    /// Parses a stable string key back into the enum value.
    pub fn parse(&self, key: &str) -> Result<T> {
        self.pairs
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(v, _)| *v)
            .ok_or_else(|| anyhow!("unknown key '{key}'"))
    }

    /// All registered `(value, key)` pairs.
    pub fn pairs(&self) -> &[(T, &'static str)] {
        self.pairs
    }
}

/// One registry entry per enum that crosses the library boundary as text
/// (problem files, solver descriptions, diagnostics).
pub struct EnumRegistry {
    pub analysis: EnumNames<AnalysisType>,
    pub linearity: EnumNames<LinearityType>,
    pub adaptivity: EnumNames<AdaptivityType>,
    pub stopping_criterion: EnumNames<AdaptivityStoppingCriterion>,
    pub damping: EnumNames<DampingType>,
    pub matrix_solver: EnumNames<MatrixSolverType>,
    pub iter_solver: EnumNames<IterSolverType>,
    pub preconditioner: EnumNames<PreconditionerType>,
    pub coupling: EnumNames<CouplingType>,
    pub coordinate: EnumNames<CoordinateType>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self {
            analysis: EnumNames::new(&[
                (AnalysisType::SteadyState, "steadystate"),
                (AnalysisType::Transient, "transient"),
                (AnalysisType::Harmonic, "harmonic"),
            ]),
            linearity: EnumNames::new(&[
                (LinearityType::Linear, "linear"),
                (LinearityType::Newton, "newton"),
                (LinearityType::Picard, "picard"),
            ]),
            adaptivity: EnumNames::new(&[
                (AdaptivityType::Disabled, "disabled"),
                (AdaptivityType::H, "h-adaptivity"),
                (AdaptivityType::P, "p-adaptivity"),
                (AdaptivityType::Hp, "hp-adaptivity"),
            ]),
            stopping_criterion: EnumNames::new(&[
                (AdaptivityStoppingCriterion::Cumulative, "cumulative"),
                (AdaptivityStoppingCriterion::SingleElement, "singleelement"),
                (AdaptivityStoppingCriterion::Levels, "levels"),
            ]),
            damping: EnumNames::new(&[
                (DampingType::Off, "off"),
                (DampingType::Fixed, "fixed"),
                (DampingType::Automatic, "automatic"),
            ]),
            matrix_solver: EnumNames::new(&[
                (MatrixSolverType::Umfpack, "umfpack"),
                (MatrixSolverType::ParalutionIterative, "paralution_iterative"),
                (MatrixSolverType::Mumps, "mumps"),
                (MatrixSolverType::SuperLu, "superlu"),
                (MatrixSolverType::TrilinosAmesos, "trilinos_amesos"),
                (MatrixSolverType::TrilinosAztecOo, "trilinos_aztecoo"),
            ]),
            iter_solver: EnumNames::new(&[
                (IterSolverType::Cg, "cg"),
                (IterSolverType::Gmres, "gmres"),
                (IterSolverType::BiCgStab, "bicgstab"),
            ]),
            preconditioner: EnumNames::new(&[
                (PreconditionerType::Jacobi, "jacobi"),
                (PreconditionerType::Ilu, "ilu"),
                (PreconditionerType::MultiColoredIlu, "multicoloredilu"),
            ]),
            coupling: EnumNames::new(&[
                (CouplingType::None, "none"),
                (CouplingType::Weak, "weak"),
                (CouplingType::Hard, "hard"),
            ]),
            coordinate: EnumNames::new(&[
                (CoordinateType::Planar, "planar"),
                (CoordinateType::Axisymmetric, "axisymmetric"),
            ]),
        }
    }
}

impl Default for EnumRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_linearity_keys() {
        let registry = EnumRegistry::new();
        for &(value, key) in registry.linearity.pairs() {
            assert_eq!(registry.linearity.key(value), key);
            assert_eq!(registry.linearity.parse(key).unwrap(), value);
        }
    }

    #[test]
    fn test_round_trip_all_registries() {
        let registry = EnumRegistry::new();
        for &(value, key) in registry.analysis.pairs() {
            assert_eq!(registry.analysis.parse(key).unwrap(), value);
        }
        for &(value, key) in registry.adaptivity.pairs() {
            assert_eq!(registry.adaptivity.parse(key).unwrap(), value);
        }
        for &(value, key) in registry.matrix_solver.pairs() {
            assert_eq!(registry.matrix_solver.parse(key).unwrap(), value);
        }
        for &(value, key) in registry.coupling.pairs() {
            assert_eq!(registry.coupling.parse(key).unwrap(), value);
        }
    }

    #[test]
    fn test_unknown_key_is_recoverable() {
        let registry = EnumRegistry::new();
        assert!(registry.analysis.parse("frequency-domain").is_err());
    }
}
