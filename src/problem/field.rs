//! Field membership wrapper owned by a block.

use std::rc::Rc;

use crate::problem::coupling::CouplingInfo;
use crate::problem::field_info::FieldInfo;

/// One physical field's membership inside a block: the field configuration
/// plus the weak couplings for which this field is the target.
pub struct Field {
    field_info: Rc<FieldInfo>,
    coupling_infos: Vec<Rc<CouplingInfo>>,
}

impl Field {
    pub fn new(field_info: Rc<FieldInfo>) -> Self {
        Self {
            field_info,
            coupling_infos: vec![],
        }
    }

    pub fn field_info(&self) -> &FieldInfo {
        &self.field_info
    }

    pub fn field_info_rc(&self) -> &Rc<FieldInfo> {
        &self.field_info
    }

    /// Registers a weak coupling feeding this field.
    ///
    /// The caller (block construction) guarantees the coupling is weak and
    /// targets this field.
    pub fn add_coupling_info(&mut self, coupling_info: Rc<CouplingInfo>) {
        debug_assert!(coupling_info.is_weak());
        debug_assert_eq!(
            coupling_info.target_field().field_id(),
            self.field_info.field_id()
        );
        self.coupling_infos.push(coupling_info);
    }

    pub fn coupling_infos(&self) -> &[Rc<CouplingInfo>] {
        &self.coupling_infos
    }

    /// Evaluates the field's initial/derived scalar variables.
    ///
    /// Returns `false` when any variable is unresolved; the block treats
    /// that as "not ready to solve" rather than an error.
    pub fn solve_init_variables(&self) -> bool {
        self.field_info.init_variables_resolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::enums::CouplingType;

    #[test]
    fn test_solve_init_variables_tracks_field_info() {
        let mut info = FieldInfo::new("heat", 1);
        info.set_initial_variable("lambda", Some(385.0));
        let field = Field::new(Rc::new(info));
        assert!(field.solve_init_variables());

        let mut info = FieldInfo::new("heat", 1);
        info.set_initial_variable("lambda", None);
        let field = Field::new(Rc::new(info));
        assert!(!field.solve_init_variables());
    }

    #[test]
    fn test_weak_coupling_registration() {
        let heat = Rc::new(FieldInfo::new("heat", 1));
        let current = Rc::new(FieldInfo::new("current", 1));
        let coupling = Rc::new(CouplingInfo::new(
            current,
            heat.clone(),
            CouplingType::Weak,
        ));

        let mut field = Field::new(heat);
        field.add_coupling_info(coupling);
        assert_eq!(field.coupling_infos().len(), 1);
        assert_eq!(
            field.coupling_infos()[0].source_field().field_id(),
            "current"
        );
    }
}
