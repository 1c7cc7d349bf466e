//! The live scene as seen by the prediction engine.
//!
//! The engine never owns live objects. It enumerates obstacles once at startup through
//! [`ObstacleSource`], reads their poses once per frame, and reads the state of the projectile
//! being aimed on every `simulate` call.

use std::collections::BTreeMap;

use crate::error::{Result, TrajectoryError};
use crate::shape::{BodyDef, ColliderShapeDef};
use crate::types::{ObstacleId, ObstacleTag, Pose, ProjectileId, Vec3, is_finite_vector};
use crate::visual::VisualNode;

/// A live obstacle the predicted ball may hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub pose: Pose,
    /// `None` for decoration that never collides.
    pub shape: Option<ColliderShapeDef>,
    /// Static obstacles never move once the scene is built.
    pub is_static: bool,
    pub tag: ObstacleTag,
    pub visual: VisualNode,
}

/// Container of live obstacles.
///
/// The shadow world must not assume a fixed count; whatever `obstacles` yields at startup is
/// duplicated.
pub trait ObstacleSource {
    /// Every obstacle currently in the container.
    fn obstacles(&self) -> Vec<Obstacle>;

    /// Current live pose of one obstacle, `None` if it no longer exists.
    fn pose(&self, id: ObstacleId) -> Option<Pose>;
}

/// In-memory obstacle container.
///
/// Iteration order is by id so that shadow worlds built from equal scenes are identical.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    obstacles: BTreeMap<ObstacleId, Obstacle>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an obstacle.
    pub fn insert(&mut self, obstacle: Obstacle) {
        self.obstacles.insert(obstacle.id, obstacle);
    }

    /// Move a live obstacle. Returns false if `id` is unknown.
    pub fn set_pose(&mut self, id: ObstacleId, pose: Pose) -> bool {
        match self.obstacles.get_mut(&id) {
            Some(obstacle) => {
                obstacle.pose = pose;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.obstacles.remove(&id)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}

impl ObstacleSource for Scene {
    fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.values().cloned().collect()
    }

    fn pose(&self, id: ObstacleId) -> Option<Pose> {
        self.obstacles.get(&id).map(|o| o.pose)
    }
}

/// The real projectile the player is aiming, as it is right now.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pose: Pose,
    pub linvel: Vec3,
    pub angvel: Vec3,
    pub angular_damping: f32,
    /// `None` when the object carries no rigid body. Such an object cannot be predicted.
    pub body: Option<BodyDef>,
}

impl Projectile {
    /// A projectile at rest at `pose`.
    pub fn at_rest(id: ProjectileId, pose: Pose, body: BodyDef) -> Self {
        Self {
            id,
            pose,
            linvel: Vec3::zeros(),
            angvel: Vec3::zeros(),
            angular_damping: 0.05,
            body: Some(body),
        }
    }

    /// Reject live state that would poison the shadow world with NaN or infinity.
    pub fn check_finite(&self) -> Result<()> {
        if !self.pose.is_finite() {
            return Err(TrajectoryError::NonFiniteInput("projectile pose"));
        }
        if !is_finite_vector(&self.linvel) {
            return Err(TrajectoryError::NonFiniteInput("projectile linear velocity"));
        }
        if !is_finite_vector(&self.angvel) {
            return Err(TrajectoryError::NonFiniteInput("projectile angular velocity"));
        }
        if !self.angular_damping.is_finite() {
            return Err(TrajectoryError::NonFiniteInput("projectile angular damping"));
        }
        Ok(())
    }
}
