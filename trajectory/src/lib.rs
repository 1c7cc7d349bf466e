pub mod classifier;
pub mod error;
pub mod ghost;
pub mod mirror;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod shadow_world;
pub mod shape;
pub mod stepper;
pub mod types;
pub mod visual;

// Re-export Rapier so downstream crates can name handles without depending on `rapier3d`
// directly.
pub use rapier3d;

pub use classifier::{CollisionOutcome, Contact, OutcomeLatch, classify};
pub use error::{Result, TrajectoryError};
pub use ghost::{GhostManager, PredictedProjectile};
pub use mirror::{Mirror, ShadowLink};
pub use renderer::{PathBuffer, PathRenderer};
pub use scene::{Obstacle, ObstacleSource, Projectile, Scene};
pub use settings::{
    DEFAULT_FIXED_DT, DEFAULT_MAX_STEPS, GRAVITY_MPS2, HIT_COLOUR, LineColour, MISS_COLOUR,
    TrajectorySettings,
};
pub use shadow_world::{ShadowDuplicate, ShadowWorld, Touch};
pub use shape::{BodyDef, ColliderShapeDef};
pub use stepper::{Prediction, Trajectory};
pub use types::{ObstacleId, ObstacleTag, Point, Pose, ProjectileId, Quat, Team, Vec3};
pub use visual::{RenderState, VisualNode, set_render_state};
