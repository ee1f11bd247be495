//! Weak-form ownership handle.
//!
//! Integrand evaluation and matrix/vector assembly belong to the plugin
//! system; the block only owns the form object and hands it to the solver.

/// A fully composed weak form for one block (all member fields plus their
/// coupling terms).
pub trait WeakForm {
    /// Number of equations, equal to the block's solution-component count.
    fn num_equations(&self) -> usize;

    /// Short label for diagnostics.
    fn label(&self) -> String;
}

/// Records the composition of a coupled weak form without evaluating it.
///
/// Sufficient for handing off to an external assembler; also handy as a
/// stand-in in tests.
pub struct CoupledWeakForm {
    field_ids: Vec<String>,
    coupling_pairs: Vec<(String, String)>,
    num_equations: usize,
}

impl CoupledWeakForm {
    pub fn new(
        field_ids: Vec<String>,
        coupling_pairs: Vec<(String, String)>,
        num_equations: usize,
    ) -> Self {
        Self {
            field_ids,
            coupling_pairs,
            num_equations,
        }
    }

    pub fn field_ids(&self) -> &[String] {
        &self.field_ids
    }

    pub fn coupling_pairs(&self) -> &[(String, String)] {
        &self.coupling_pairs
    }
}

impl WeakForm for CoupledWeakForm {
    fn num_equations(&self) -> usize {
        self.num_equations
    }

    fn label(&self) -> String {
        format!("weakform[{}]", self.field_ids.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_names_member_fields() {
        let wf = CoupledWeakForm::new(
            vec!["heat".to_string(), "elasticity".to_string()],
            vec![("heat".to_string(), "elasticity".to_string())],
            3,
        );
        assert_eq!(wf.label(), "weakform[heat+elasticity]");
        assert_eq!(wf.num_equations(), 3);
    }
}
