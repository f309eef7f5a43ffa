pub mod scene;
pub mod script;

pub use scene::{ObstaclePoint, SceneActor, SceneFile};
pub use script::{
    ActionCommand, ActionEntry, AnimateKind, Facing, PositionRef, Script, ScriptError, SpeedTier,
};
