pub mod problem;
pub mod registry;
pub mod scene;
pub mod uid;

// Prelude
pub use problem::block::{Block, BlockState};
pub use problem::coupling::CouplingInfo;
pub use problem::decompose_into_blocks;
pub use problem::field::Field;
pub use problem::field_info::{FieldInfo, FieldSetting, SettingValue};
pub use problem::solver::{ProblemSolver, SolverPolicy};
pub use registry::EnumRegistry;
pub use scene::{Scene, SceneBoundary, SceneEdge};
pub use uid::Uid;
