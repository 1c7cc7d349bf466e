//! Isolated rapier world holding hidden duplicates of the live scene.
//!
//! The shadow world is where predictions happen. It is built once from an [`ObstacleSource`]
//! and owns its own body/collider sets, broad and narrow phases and pipeline, so stepping it
//! never touches the live scene.
//!
//! Design goals
//! - Deterministic: obstacles are inserted in source order (by id for [`crate::Scene`]).
//! - Hidden: every duplicate carries a copy of the obstacle's visual hierarchy with all
//!   rendering switched off.
//! - Cheap per frame: only dynamic obstacles are mirrored. Static ones are fixed bodies that
//!   are never touched again.

use std::collections::{BTreeMap, HashMap};

use std::sync::mpsc::{Receiver, channel as unbounded};
use rapier3d::prelude::*;

use crate::mirror::Mirror;
use crate::scene::{Obstacle, ObstacleSource};
use crate::settings::TrajectorySettings;
use crate::shape::obstacle_collider;
use crate::types::{ObstacleId, ObstacleTag, Pose, Vec3};
use crate::visual::{VisualNode, set_render_state};

/// The private copy of one live obstacle.
#[derive(Clone, Debug)]
pub struct ShadowDuplicate {
    pub body: RigidBodyHandle,
    /// `None` when the live obstacle has no shape.
    pub collider: Option<ColliderHandle>,
    pub tag: ObstacleTag,
    pub is_static: bool,
    /// Visual hierarchy of the duplicate. Always fully disabled.
    pub visual: VisualNode,
}

/// An obstacle that started touching the watched collider during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Touch {
    pub obstacle: ObstacleId,
    pub tag: ObstacleTag,
}

pub struct ShadowWorld {
    gravity: Vec3,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    events: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    duplicates: BTreeMap<ObstacleId, ShadowDuplicate>,
    owners: HashMap<ColliderHandle, ObstacleId>,
    mirror: Mirror,
}

impl ShadowWorld {
    /// Duplicate every obstacle of `source` into a fresh, isolated world.
    pub fn new<S>(source: &S, settings: &TrajectorySettings) -> Self
    where
        S: ObstacleSource + ?Sized,
    {
        let (collision_send, collision_events) = unbounded();
        // Contact force events are never enabled on shadow colliders.
        let (contact_force_send, _) = unbounded();

        let mut world = Self {
            gravity: settings.gravity,
            integration_parameters: IntegrationParameters {
                dt: settings.fixed_dt,
                ..IntegrationParameters::default()
            },
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_events,
            duplicates: BTreeMap::new(),
            owners: HashMap::new(),
            mirror: Mirror::default(),
        };

        for obstacle in source.obstacles() {
            world.duplicate(obstacle);
        }

        log::info!(
            "shadow world built: {} duplicates, {} mirrored",
            world.duplicates.len(),
            world.mirror.links().len()
        );
        world
    }

    fn duplicate(&mut self, obstacle: Obstacle) {
        let Obstacle {
            id,
            pose,
            shape,
            is_static,
            tag,
            mut visual,
        } = obstacle;

        if self.duplicates.contains_key(&id) {
            log::warn!("obstacle {id:?} listed twice, keeping the first duplicate");
            return;
        }

        // Dynamic duplicates are teleported by the mirror, never pushed by the solver.
        let builder = if is_static {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::kinematic_position_based()
        };
        let body = self.bodies.insert(builder.pose(pose.iso()).build());

        let collider = shape.map(|shape| {
            let handle = self.colliders.insert_with_parent(
                obstacle_collider(&shape, tag),
                body,
                &mut self.bodies,
            );
            self.owners.insert(handle, id);
            handle
        });

        set_render_state(&mut visual, false);

        if !is_static {
            self.mirror.link(id, body);
        }

        self.duplicates.insert(
            id,
            ShadowDuplicate {
                body,
                collider,
                tag,
                is_static,
                visual,
            },
        );
    }

    /// Refresh every dynamic duplicate from the live scene. Once per frame.
    pub fn sync<S>(&mut self, source: &S) -> usize
    where
        S: ObstacleSource + ?Sized,
    {
        self.mirror.sync(source, &mut self.bodies)
    }

    /// Advance the world by one fixed increment.
    ///
    /// Returns the obstacles that started touching `watched` during this step, in the order
    /// the narrow phase reported them. A pair that was already touching before the step is not
    /// reported again. Contacts between two obstacles, or with colliders that
    /// are not obstacle duplicates, are not reported.
    pub fn step(&mut self, watched: ColliderHandle) -> Vec<Touch> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &self.events,
        );

        self.collision_events
            .try_iter()
            .filter_map(|event| {
                let CollisionEvent::Started(a, b, _) = event else {
                    return None;
                };
                let other = if a == watched {
                    b
                } else if b == watched {
                    a
                } else {
                    return None;
                };
                let obstacle = *self.owners.get(&other)?;
                let tag = self.duplicates.get(&obstacle)?.tag;
                Some(Touch { obstacle, tag })
            })
            .collect()
    }

    pub fn gravity(&self) -> Vec3 {
        self.gravity
    }

    /// Redirect gravity, e.g. when the player enters a gravity volume.
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    pub fn fixed_dt(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Insert a body with one attached collider.
    pub fn spawn(
        &mut self,
        body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = self.bodies.insert(body);
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        (body, collider)
    }

    /// Remove a body and its colliders. Returns false if `handle` was already gone.
    pub fn despawn(&mut self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Swap `old` for `collider`, attached to the same parent body.
    ///
    /// The narrow phase drops every pair `old` took part in, so anything already touching the
    /// body at the next step is reported as a new contact.
    pub fn replace_collider(
        &mut self,
        old: ColliderHandle,
        collider: Collider,
    ) -> Option<ColliderHandle> {
        let parent = self.colliders.get(old)?.parent()?;
        self.colliders
            .remove(old, &mut self.islands, &mut self.bodies, true)?;
        Some(
            self.colliders
                .insert_with_parent(collider, parent, &mut self.bodies),
        )
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Total bodies in the world, duplicates and predicted projectile included.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Bodies simulated by the solver. Duplicates are fixed or kinematic, so this counts
    /// predicted projectiles only.
    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_dynamic()).count()
    }

    pub fn duplicate_of(&self, id: ObstacleId) -> Option<&ShadowDuplicate> {
        self.duplicates.get(&id)
    }

    pub fn duplicates(&self) -> impl Iterator<Item = (&ObstacleId, &ShadowDuplicate)> {
        self.duplicates.iter()
    }

    /// Current pose of an obstacle's duplicate.
    pub fn shadow_pose(&self, id: ObstacleId) -> Option<Pose> {
        let body = self.bodies.get(self.duplicates.get(&id)?.body)?;
        Some(Pose::new(*body.translation(), *body.rotation()))
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }
}
