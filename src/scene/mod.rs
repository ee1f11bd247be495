//! Scene topology consumed by boundary-condition assembly.
//!
//! The block subsystem only reads boundary edges and their per-field marker
//! assignments; geometry editing, meshing and everything visual live in the
//! enclosing application.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::problem::enums::CoordinateType;
use crate::problem::field_info::FieldInfo;

/// Marker type id reserved for "no boundary condition assigned here".
pub const BOUNDARY_TYPE_NONE: &str = "none";

/// Shared handle to a boundary marker.
///
/// Markers are mutated in place between solve/time steps (e.g. a prescribed
/// boundary value changes with time), while cached exact-solution functions
/// keep pointing at them. `Rc<RefCell<_>>` makes that update visible to every
/// holder without reallocation.
pub type BoundaryRef = Rc<RefCell<SceneBoundary>>;

/// Boundary marker: a named assignment of one field boundary type, together
/// with the numeric values its expressions are evaluated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneBoundary {
    name: String,
    boundary_type_id: String,
    values: HashMap<String, f64>,
}

impl SceneBoundary {
    pub fn new(name: &str, boundary_type_id: &str) -> Self {
        Self {
            name: name.to_string(),
            boundary_type_id: boundary_type_id.to_string(),
            values: HashMap::new(),
        }
    }

    /// Marker carrying no boundary condition (natural boundary).
    pub fn none(name: &str) -> Self {
        Self::new(name, BOUNDARY_TYPE_NONE)
    }

    pub fn shared(self) -> BoundaryRef {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boundary_type_id(&self) -> &str {
        &self.boundary_type_id
    }

    pub fn is_none(&self) -> bool {
        self.boundary_type_id == BOUNDARY_TYPE_NONE
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn set_value(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_string(), value);
    }

    pub fn values(&self) -> &HashMap<String, f64> {
        &self.values
    }
}

/// One boundary edge of the scene with its per-field marker assignments.
#[derive(Default)]
pub struct SceneEdge {
    name: String,
    markers: HashMap<String, BoundaryRef>,
}

impl SceneEdge {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            markers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active marker assigned to this edge for the given field, if any.
    pub fn marker(&self, field_info: &FieldInfo) -> Option<BoundaryRef> {
        self.markers.get(field_info.field_id()).cloned()
    }

    pub fn set_marker(&mut self, field_id: &str, marker: BoundaryRef) {
        self.markers.insert(field_id.to_string(), marker);
    }

    pub fn remove_marker(&mut self, field_id: &str) {
        self.markers.remove(field_id);
    }
}

/// Opaque handle to a field's initial mesh.
///
/// Mesh generation is out of scope here; exact-solution factories only need
/// a stable reference to the mesh an essential condition is evaluated on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialMesh {
    name: String,
    element_count: usize,
}

impl InitialMesh {
    pub fn new(name: &str, element_count: usize) -> Self {
        Self {
            name: name.to_string(),
            element_count,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }
}

/// Read-only topology view handed to the block when it (re)builds boundary
/// conditions.
pub struct Scene {
    coordinate_type: CoordinateType,
    edges: Vec<SceneEdge>,
}

impl Scene {
    pub fn new(coordinate_type: CoordinateType) -> Self {
        Self {
            coordinate_type,
            edges: vec![],
        }
    }

    pub fn coordinate_type(&self) -> CoordinateType {
        self.coordinate_type
    }

    pub fn edges(&self) -> &[SceneEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut Vec<SceneEdge> {
        &mut self.edges
    }

    pub fn add_edge(&mut self, edge: SceneEdge) {
        self.edges.push(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_marker() {
        let marker = SceneBoundary::none("outer");
        assert!(marker.is_none());
        assert_eq!(marker.boundary_type_id(), BOUNDARY_TYPE_NONE);
    }

    #[test]
    fn test_marker_json_round_trip() {
        let mut marker = SceneBoundary::new("hot_end", "fixed_temperature");
        marker.set_value("T_ext", 363.15);

        let json = serde_json::to_string(&marker).unwrap();
        let restored: SceneBoundary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.name(), "hot_end");
        assert_eq!(restored.boundary_type_id(), "fixed_temperature");
        assert_eq!(restored.value("T_ext"), Some(363.15));
    }

    #[test]
    fn test_marker_values_update_in_place() {
        let marker = SceneBoundary::new("left", "fixed_value").shared();
        marker.borrow_mut().set_value("value", 310.0);

        // A second holder of the same Rc observes the update.
        let alias = marker.clone();
        assert_eq!(alias.borrow().value("value"), Some(310.0));
    }
}
