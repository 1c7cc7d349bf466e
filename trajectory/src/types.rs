/*!
Core data types and math aliases shared by the prediction modules.

This module intentionally contains no algorithms. It defines the data exchanged
between:
- the live scene (obstacles and the candidate projectile the player is holding)
- the shadow world (private duplicates of that scene)
- the stepper and classifier (path samples and contacts)
*/

use nalgebra as na;
use num_traits::Float;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Point = na::Point3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A rigid pose (position + rotation) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// Convert to nalgebra `Isometry3` for rapier body placement.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(na::Translation3::from(self.translation), self.rotation)
    }

    /// True when neither the translation nor the rotation holds NaN or infinity.
    #[inline]
    pub fn is_finite(&self) -> bool {
        is_finite_vector(&self.translation) && self.rotation.coords.iter().all(|c| c.is_finite())
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_translation(Vec3::zeros())
    }
}

/// Identifier of a live obstacle. Unique within one [`crate::ObstacleSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u32);

/// Opaque identity token of a real projectile the player can aim.
///
/// Compared by value only. Two candidates with the same token are the same ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProjectileId(pub u64);

/// Which side a goal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    Home,
    Away,
}

/// Gameplay tag carried by an obstacle and its shadow duplicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObstacleTag {
    /// Walls, floor, props. Anything that is not a scoring target.
    #[default]
    Plain,
    /// Scoring volume of a goal.
    Goal(Team),
}

impl ObstacleTag {
    #[inline]
    pub fn is_target(&self) -> bool {
        matches!(self, ObstacleTag::Goal(_))
    }
}

/// True when every component of `v` is finite.
#[inline]
pub fn is_finite_vector<T: Float + na::Scalar>(v: &na::Vector3<T>) -> bool {
    v.iter().all(|c| c.is_finite())
}
