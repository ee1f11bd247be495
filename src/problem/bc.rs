//! Essential boundary conditions and the exact-solution functions backing
//! them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::scene::SceneBoundary;
use crate::uid::Uid;

/// Dirichlet-value function materialized for one essential form on one
/// boundary.
///
/// The function is shared between the boundary-condition container that
/// installs it and the block's function cache, so updated marker data can be
/// pushed into a live instance (`set_marker_target`) without reallocating
/// it. The marker-target capability lives directly on this type; no
/// downcasting from a generic function handle is required.
pub struct ExactSolutionFunction {
    id: Uid,
    field_id: String,
    component_index: usize,
    expression: String,
    marker_name: String,
    marker_values: HashMap<String, f64>,
}

/// Shared handle, mirroring the single-threaded ownership model: the block
/// and its containers are the only holders.
pub type SharedSolutionFunction = Rc<RefCell<ExactSolutionFunction>>;

impl ExactSolutionFunction {
    pub fn new(field_id: &str, component_index: usize, expression: &str) -> Self {
        Self {
            id: Uid::new(),
            field_id: field_id.to_string(),
            component_index,
            expression: expression.to_string(),
            marker_name: String::new(),
            marker_values: HashMap::new(),
        }
    }

    pub fn id(&self) -> &Uid {
        &self.id
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    /// 1-based component index of the essential form this function serves.
    pub fn component_index(&self) -> usize {
        self.component_index
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Copies the marker's current name and values into this function.
    ///
    /// Called at construction and again on every refresh; the expression
    /// form itself never changes over the function's lifetime.
    pub fn set_marker_target(&mut self, boundary: &SceneBoundary) {
        self.marker_name = boundary.name().to_string();
        self.marker_values = boundary.values().clone();
    }

    pub fn marker_name(&self) -> &str {
        &self.marker_name
    }

    pub fn marker_value(&self, key: &str) -> Option<f64> {
        self.marker_values.get(key).copied()
    }
}

/// One named Dirichlet condition installed on a solution component.
///
/// The name carries the per-edge running index so that multiple independent
/// conditions on the same component of the same field coexist without
/// collisions.
pub struct EssentialBoundaryCondition {
    name: String,
    function: SharedSolutionFunction,
}

impl EssentialBoundaryCondition {
    pub fn new(name: String, function: SharedSolutionFunction) -> Self {
        Self { name, function }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self) -> &SharedSolutionFunction {
        &self.function
    }
}

/// Container of essential conditions for one solution component of a block.
#[derive(Default)]
pub struct EssentialBcCollection {
    conditions: Vec<EssentialBoundaryCondition>,
}

impl EssentialBcCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_boundary_condition(&mut self, condition: EssentialBoundaryCondition) {
        self.conditions.push(condition);
    }

    pub fn conditions(&self) -> &[EssentialBoundaryCondition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_marker_target_copies_current_data() {
        let mut boundary = SceneBoundary::new("left", "fixed_value");
        boundary.set_value("value", 100.0);

        let mut function = ExactSolutionFunction::new("heat", 1, "value");
        function.set_marker_target(&boundary);
        assert_eq!(function.marker_name(), "left");
        assert_eq!(function.marker_value("value"), Some(100.0));

        // Marker data changes; a refresh picks it up, the id does not move.
        let id = function.id().clone();
        boundary.set_value("value", 200.0);
        function.set_marker_target(&boundary);
        assert_eq!(function.marker_value("value"), Some(200.0));
        assert_eq!(function.id(), &id);
    }
}
