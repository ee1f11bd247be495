//! Directed coupling relations between fields.

use std::rc::Rc;

use crate::problem::enums::CouplingType;
use crate::problem::field_info::FieldInfo;

/// A directed relation {source field -> target field} with a resolved
/// coupling strength. Classification happens upstream (when the user edits
/// the problem); blocks only read it.
pub struct CouplingInfo {
    source_field: Rc<FieldInfo>,
    target_field: Rc<FieldInfo>,
    coupling_type: CouplingType,
}

impl CouplingInfo {
    pub fn new(
        source_field: Rc<FieldInfo>,
        target_field: Rc<FieldInfo>,
        coupling_type: CouplingType,
    ) -> Self {
        Self {
            source_field,
            target_field,
            coupling_type,
        }
    }

    pub fn source_field(&self) -> &Rc<FieldInfo> {
        &self.source_field
    }

    pub fn target_field(&self) -> &Rc<FieldInfo> {
        &self.target_field
    }

    pub fn coupling_type(&self) -> CouplingType {
        self.coupling_type
    }

    /// Weak: solved via an extra source term evaluated from the source
    /// field's last solution.
    pub fn is_weak(&self) -> bool {
        self.coupling_type == CouplingType::Weak
    }

    /// Hard: both fields solved in the same monolithic system.
    pub fn is_hard(&self) -> bool {
        self.coupling_type == CouplingType::Hard
    }

    pub fn is_related(&self, field_info: &FieldInfo) -> bool {
        self.source_field.field_id() == field_info.field_id()
            || self.target_field.field_id() == field_info.field_id()
    }
}
