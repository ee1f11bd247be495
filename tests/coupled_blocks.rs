use std::rc::Rc;

use multifem::problem::enums::{
    AnalysisType, CoordinateType, CouplingType, LinearityType, MatrixSolverType,
};
use multifem::problem::field_info::{BoundaryType, FormInfo};
use multifem::{
    Block, BlockState, CouplingInfo, EnumRegistry, FieldInfo, FieldSetting, Scene, SceneBoundary,
    SceneEdge, SettingValue, decompose_into_blocks,
};

/// Heat conduction field: one solution component, a fixed-temperature
/// boundary type and resolved material variables.
fn heat_field() -> FieldInfo {
    let mut info = FieldInfo::new("heat", 1);
    info.set_linearity_type(LinearityType::Newton);
    info.add_boundary_type(BoundaryType::new(
        "fixed_temperature",
        vec![FormInfo {
            id: "essential_1".to_string(),
            component_index: 1,
            expression: "T_ext".to_string(),
        }],
    ));
    info.set_initial_variable("lambda", Some(385.0));
    info.set_value(FieldSetting::NonlinearResidualNorm, SettingValue::Double(1e-5));
    info
}

/// Plane-strain elasticity field: two displacement components, both fixed
/// on clamped boundaries.
fn elasticity_field() -> FieldInfo {
    let mut info = FieldInfo::new("elasticity", 2);
    info.set_linearity_type(LinearityType::Newton);
    info.add_boundary_type(BoundaryType::new(
        "clamped",
        vec![
            FormInfo {
                id: "essential_1".to_string(),
                component_index: 1,
                expression: "u_x".to_string(),
            },
            FormInfo {
                id: "essential_2".to_string(),
                component_index: 2,
                expression: "u_y".to_string(),
            },
        ],
    ));
    info.set_initial_variable("youngs_modulus", Some(2.1e11));
    info.set_value(FieldSetting::NonlinearResidualNorm, SettingValue::Double(1e-3));
    info
}

fn two_field_problem() -> (Vec<Rc<FieldInfo>>, Vec<Rc<CouplingInfo>>) {
    let heat = Rc::new(heat_field());
    let elasticity = Rc::new(elasticity_field());
    let current = Rc::new(FieldInfo::new("current", 1));

    let couplings = vec![
        Rc::new(CouplingInfo::new(
            heat.clone(),
            elasticity.clone(),
            CouplingType::Hard,
        )),
        Rc::new(CouplingInfo::new(
            current.clone(),
            heat.clone(),
            CouplingType::Weak,
        )),
        Rc::new(CouplingInfo::new(
            current.clone(),
            elasticity.clone(),
            CouplingType::Weak,
        )),
    ];

    (vec![heat, elasticity], couplings)
}

#[test]
fn decomposition_groups_hard_coupled_fields() {
    let (fields, couplings) = two_field_problem();
    let blocks = decompose_into_blocks(&fields, &couplings);

    assert_eq!(blocks.len(), 1);
    let block = &blocks[0];
    assert_eq!(block.num_solutions(), 3);
    assert_eq!(block.linearity_type(), LinearityType::Newton);
    assert_eq!(block.matrix_solver(), MatrixSolverType::Umfpack);

    // Shared weak source appears exactly once.
    let sources = block.source_field_infos_coupling();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].field_id(), "current");

    // Reconciled residual norm is the strictest enabled one.
    assert!((block.nonlinear_residual_norm() - 1e-5).abs() < 1e-18);
}

#[test]
fn boundary_condition_round_trip() {
    let (fields, couplings) = two_field_problem();
    let mut block = Block::new(fields, couplings);
    assert_eq!(block.state(), BlockState::Configured);

    let hot = SceneBoundary::new("hot_end", "fixed_temperature").shared();
    hot.borrow_mut().set_value("T_ext", 363.15);
    let clamp = SceneBoundary::new("clamp", "clamped").shared();

    let mut scene = Scene::new(CoordinateType::Planar);
    let mut edge0 = SceneEdge::new("edge0");
    edge0.set_marker("heat", hot.clone());
    scene.add_edge(edge0);
    let mut edge1 = SceneEdge::new("edge1");
    edge1.set_marker("heat", SceneBoundary::none("insulated").shared());
    edge1.set_marker("elasticity", clamp.clone());
    scene.add_edge(edge1);
    scene.add_edge(SceneEdge::new("edge2"));

    block.create_boundary_conditions(&scene);
    assert_eq!(block.state(), BlockState::BoundaryReady);

    // One container per solution component.
    assert_eq!(block.bcs().len(), 3);
    // heat component 1 -> container 0 (offset 0): hot_end only, the "none"
    // marker contributes nothing.
    assert_eq!(block.bcs()[0].len(), 1);
    // elasticity components 1 and 2 -> containers 1 and 2 (offset 1).
    assert_eq!(block.bcs()[1].len(), 1);
    assert_eq!(block.bcs()[2].len(), 1);

    let condition = &block.bcs()[0].conditions()[0];
    assert_eq!(condition.name(), "0"); // per-edge running index
    let function = condition.function().borrow();
    assert_eq!(function.marker_name(), "hot_end");
    assert_eq!(function.expression(), "T_ext");
    assert_eq!(function.marker_value("T_ext"), Some(363.15));
    drop(function);

    assert_eq!(block.bcs()[1].conditions()[0].name(), "1");

    // Removing the heat marker and rebuilding drops the condition.
    scene.edges_mut()[0].remove_marker("heat");
    block.create_boundary_conditions(&scene);
    assert_eq!(block.bcs().len(), 3);
    assert_eq!(block.bcs()[0].len(), 0);
    assert_eq!(block.bcs()[1].len(), 1);
}

#[test]
fn exact_solution_functions_refresh_in_place() {
    let (fields, couplings) = two_field_problem();
    let mut block = Block::new(fields, couplings);

    let hot = SceneBoundary::new("hot_end", "fixed_temperature").shared();
    hot.borrow_mut().set_value("T_ext", 300.0);

    let mut scene = Scene::new(CoordinateType::Planar);
    let mut edge = SceneEdge::new("edge0");
    edge.set_marker("heat", hot.clone());
    scene.add_edge(edge);

    block.create_boundary_conditions(&scene);
    let mut keys: Vec<_> = block.exact_solution_functions().keys().cloned().collect();
    keys.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(keys.len(), 1);

    // Marker data changes between time steps; the cached function picks it
    // up on refresh without being reconstructed.
    hot.borrow_mut().set_value("T_ext", 320.0);
    block.update_exact_solution_functions();

    let mut keys_after: Vec<_> = block.exact_solution_functions().keys().cloned().collect();
    keys_after.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(keys, keys_after);

    let (function, _) = block.exact_solution_functions().values().next().unwrap();
    assert_eq!(function.borrow().marker_value("T_ext"), Some(320.0));

    // The condition container holds the same shared instance.
    let held = block.bcs()[0].conditions()[0].function();
    assert_eq!(held.borrow().marker_value("T_ext"), Some(320.0));
}

#[test]
fn solver_handoff_requires_resolved_variables() {
    let (fields, couplings) = two_field_problem();
    let mut block = Block::new(fields, couplings);
    let scene = Scene::new(CoordinateType::Planar);
    block.create_boundary_conditions(&scene);

    let solver = block.prepare_solver().expect("all variables resolved");
    assert_eq!(block.state(), BlockState::SolverReady);
    assert_eq!(solver.field_ids(), ["heat", "elasticity"]);
    assert_eq!(solver.num_solutions(), 3);
    assert_eq!(solver.essential_bc_counts(), [0usize, 0, 0]);
    assert_eq!(solver.policy().linearity_type, LinearityType::Newton);

    let registry = EnumRegistry::new();
    let description = solver.describe(&registry);
    assert!(description.contains("heat+elasticity"), "got: {description}");
    assert!(description.contains("newton"), "got: {description}");
}

#[test]
fn solver_handoff_reports_not_ready() {
    let mut broken = heat_field();
    broken.set_initial_variable("lambda", None);
    let mut block = Block::new(vec![Rc::new(broken)], vec![]);

    let scene = Scene::new(CoordinateType::Planar);
    block.create_boundary_conditions(&scene);
    assert!(block.prepare_solver().is_none());
    // A failed handoff does not corrupt the block; boundary data survives.
    assert_eq!(block.state(), BlockState::BoundaryReady);
    assert_eq!(block.bcs().len(), 1);
}

#[test]
fn transient_mix_skips_steady_fields() {
    let mut steady = heat_field();
    steady.set_value(FieldSetting::TransientTimeSkip, SettingValue::Double(2.5));
    let mut transient = elasticity_field();
    transient.set_analysis_type(AnalysisType::Transient);

    let block = Block::new(vec![Rc::new(steady), Rc::new(transient)], vec![]);
    assert!(block.is_transient());
    assert!((block.time_skip() - 2.5).abs() < 1e-15);
}
