//! Collider definitions shared by live obstacles, projectiles and their shadow duplicates.
//!
//! Conventions
//! - Units are meters.
//! - Shapes are expressed in the local frame of their owning body. The body pose places them
//!   in the world, so every collider is built with an identity local transform.

use rapier3d::prelude::*;

use crate::types::{ObstacleTag, Vec3};

/// Supported collider shapes.
///
/// Keep this intentionally small and deterministic. Extend as needed.
#[derive(Clone, Debug, PartialEq)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space) whose outward normal is the body's local +Y.
    ///
    /// In rapier a half-space is infinite; any finite "court size" is a rendering concern.
    Plane,

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters). Hoop rims and posts.
    CylinderY { radius: f32, half_height: f32 },
}

/// Physical body of a throwable projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDef {
    pub shape: ColliderShapeDef,
    /// Total mass (kg). An impulse `j` changes velocity by `j / mass`.
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl BodyDef {
    /// A regulation-ish basketball: 0.12 m radius, 0.6 kg.
    pub fn basketball() -> Self {
        Self {
            shape: ColliderShapeDef::Sphere { radius: 0.12 },
            mass: 0.6,
            restitution: 0.8,
            friction: 0.6,
        }
    }
}

/// Start a collider builder for `shape` with identity local transform.
pub fn collider_builder(shape: &ColliderShapeDef) -> ColliderBuilder {
    match shape {
        ColliderShapeDef::Plane => ColliderBuilder::halfspace(Vector::y_axis()),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => ColliderBuilder::cylinder(*half_height, *radius),
    }
}

/// Build the shadow collider of an obstacle.
///
/// Goals are scoring volumes the ball passes through, so they become sensors.
pub fn obstacle_collider(shape: &ColliderShapeDef, tag: ObstacleTag) -> Collider {
    collider_builder(shape).sensor(tag.is_target()).build()
}

/// Build the collider of a predicted projectile.
///
/// Collision events are enabled on the projectile only, so the narrow phase reports every
/// contact that involves it and nothing else.
pub fn projectile_collider(body: &BodyDef) -> Collider {
    collider_builder(&body.shape)
        .mass(body.mass)
        .restitution(body.restitution)
        .friction(body.friction)
        .active_events(ActiveEvents::COLLISION_EVENTS)
        .build()
}
