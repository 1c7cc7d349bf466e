//! A half-size basketball court: floor, two hoops with backboards, and a defender that slides
//! across the lane between the shooter and the away hoop.

use trajectory::{
    ColliderShapeDef, Obstacle, ObstacleId, ObstacleTag, Pose, Scene, Team, Vec3, VisualNode,
};

/// Height of the hoop rim (meters).
pub const RIM_HEIGHT: f32 = 3.05;

/// Distance from center court to each hoop (meters).
pub const HOOP_DISTANCE: f32 = 12.0;

pub const DEFENDER: ObstacleId = ObstacleId(10);

pub fn build() -> Scene {
    let mut scene = Scene::new();

    scene.insert(Obstacle {
        id: ObstacleId(0),
        pose: Pose::default(),
        shape: Some(ColliderShapeDef::Plane),
        is_static: true,
        tag: ObstacleTag::Plain,
        visual: VisualNode::mesh("floor"),
    });

    for (index, (team, z)) in [(Team::Home, HOOP_DISTANCE), (Team::Away, -HOOP_DISTANCE)]
        .into_iter()
        .enumerate()
    {
        let base = 1 + index as u32 * 2;
        let side = z.signum();

        scene.insert(Obstacle {
            id: ObstacleId(base),
            pose: Pose::from_translation(Vec3::new(0.0, RIM_HEIGHT + 0.9, z + side * 0.4)),
            shape: Some(ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(0.9, 0.55, 0.03),
            }),
            is_static: true,
            tag: ObstacleTag::Plain,
            visual: VisualNode::mesh("backboard"),
        });

        // The scoring volume sits just below the rim so only balls dropping through count.
        scene.insert(Obstacle {
            id: ObstacleId(base + 1),
            pose: Pose::from_translation(Vec3::new(0.0, RIM_HEIGHT - 0.1, z)),
            shape: Some(ColliderShapeDef::CylinderY {
                radius: 0.2,
                half_height: 0.05,
            }),
            is_static: true,
            tag: ObstacleTag::Goal(team),
            visual: VisualNode::group("hoop")
                .with_child(VisualNode::mesh("rim"))
                .with_child(VisualNode::mesh("net")),
        });
    }

    scene.insert(Obstacle {
        id: DEFENDER,
        pose: defender_pose(0.0),
        shape: Some(ColliderShapeDef::CapsuleY {
            radius: 0.35,
            half_height: 0.6,
        }),
        is_static: false,
        tag: ObstacleTag::Plain,
        visual: VisualNode::group("defender")
            .with_child(VisualNode::mesh("body"))
            .with_child(VisualNode::mesh("arms")),
    });

    scene
}

/// Where the defender stands at time `t` (seconds). Always well clear of the shooter at
/// [`SHOOTER_Z`].
pub fn defender_pose(t: f32) -> Pose {
    Pose::from_translation(Vec3::new(2.5 * (t * 0.8).sin(), 0.95, DEFENDER_Z))
}

/// Depth of the line the shooter stands on.
pub const SHOOTER_Z: f32 = 6.0;

const DEFENDER_Z: f32 = -4.0;
