//! Forward simulation of a candidate throw.
//!
//! [`Trajectory`] owns the shadow world and the ghost, and reports every prediction to a
//! [`PathRenderer`]. Typical frame while the player aims:
//!
//! ```ignore
//! trajectory.sync_obstacles(&scene);            // once per frame, before simulating
//! let prediction = trajectory.simulate(&ball, hand, launch, hand_rotation)?;
//! ```
//!
//! and `trajectory.cancel()` on the frame aiming stops.

use crate::classifier::{CollisionOutcome, Contact, OutcomeLatch};
use crate::error::{Result, TrajectoryError};
use crate::ghost::{GhostManager, PredictedProjectile};
use crate::renderer::PathRenderer;
use crate::scene::{ObstacleSource, Projectile};
use crate::settings::TrajectorySettings;
use crate::shadow_world::ShadowWorld;
use crate::types::{Point, Pose, Quat, Vec3, is_finite_vector};

/// Result of one `simulate` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Ghost position after each step, up to (not including) the step of first contact.
    pub path: Vec<Point>,
    /// Never `Undetermined`: a flight that touched nothing is a `Miss`.
    pub outcome: CollisionOutcome,
    pub contact: Option<Contact>,
}

pub struct Trajectory<R> {
    settings: TrajectorySettings,
    world: ShadowWorld,
    ghosts: GhostManager,
    latch: OutcomeLatch,
    renderer: R,
}

impl<R: PathRenderer> Trajectory<R> {
    /// Build the shadow world from `source` and take ownership of the line renderer.
    pub fn new<S>(source: &S, renderer: R, settings: TrajectorySettings) -> Result<Self>
    where
        S: ObstacleSource + ?Sized,
    {
        settings.validate()?;
        Ok(Self {
            world: ShadowWorld::new(source, &settings),
            settings,
            ghosts: GhostManager::default(),
            latch: OutcomeLatch::default(),
            renderer,
        })
    }

    /// Mirror live dynamic obstacles into the shadow world. Call once per frame, before
    /// [`Trajectory::simulate`].
    pub fn sync_obstacles<S>(&mut self, source: &S) -> usize
    where
        S: ObstacleSource + ?Sized,
    {
        self.world.sync(source)
    }

    /// Predict where `candidate` goes if thrown now with `launch_velocity`.
    ///
    /// `spawn_position`/`spawn_rotation` place a freshly created ghost. Every call then
    /// overwrites the ghost with the candidate's live state, so they only matter for the
    /// first frame after the aimed object changes.
    ///
    /// `launch_velocity` is applied as an impulse: the ghost's velocity changes by
    /// `launch_velocity / mass`.
    pub fn simulate(
        &mut self,
        candidate: &Projectile,
        spawn_position: Vec3,
        launch_velocity: Vec3,
        spawn_rotation: Quat,
    ) -> Result<Prediction> {
        if !is_finite_vector(&launch_velocity) {
            return Err(TrajectoryError::NonFiniteInput("launch velocity"));
        }
        let spawn = Pose::new(spawn_position, spawn_rotation);
        if !spawn.is_finite() {
            return Err(TrajectoryError::NonFiniteInput("spawn pose"));
        }
        candidate.check_finite()?;

        self.ghosts.ensure(&mut self.world, candidate, spawn)?;
        let ghost = self.ghosts.reseed(&mut self.world, candidate)?;
        self.launch(&ghost, candidate, launch_velocity)?;

        self.latch.reset();
        let mut path = Vec::with_capacity(self.settings.max_steps);

        // All steps always run; only the reported path stops at the first contact.
        for step in 0..self.settings.max_steps {
            let touches = self.world.step(ghost.collider);
            if self.latch.is_set() {
                continue;
            }

            let body = self
                .world
                .body(ghost.body)
                .ok_or(TrajectoryError::ShadowBodyMissing("predicted projectile"))?;

            if let Some(touch) = touches.first() {
                self.latch.record(Contact {
                    step,
                    obstacle: touch.obstacle,
                    tag: touch.tag,
                    velocity: *body.linvel(),
                });
                continue;
            }
            path.push(Point::from(*body.translation()));
        }

        let outcome = self.latch.resolve();
        let colour = match outcome {
            CollisionOutcome::Hit => self.settings.hit_colour,
            _ => self.settings.miss_colour,
        };
        self.renderer.set_colour(colour);
        self.renderer.set_path(&path);

        log::trace!(
            "predicted {:?}: {:?}, {} of {} samples",
            candidate.id,
            outcome,
            path.len(),
            self.settings.max_steps
        );

        Ok(Prediction {
            path,
            outcome,
            contact: self.latch.contact(),
        })
    }

    fn launch(
        &mut self,
        ghost: &PredictedProjectile,
        candidate: &Projectile,
        impulse: Vec3,
    ) -> Result<()> {
        let mass = candidate
            .body
            .as_ref()
            .map(|b| b.mass)
            .ok_or(TrajectoryError::MissingBody(candidate.id))?;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(TrajectoryError::NonFiniteInput("projectile mass"));
        }

        let body = self
            .world
            .body_mut(ghost.body)
            .ok_or(TrajectoryError::ShadowBodyMissing("predicted projectile"))?;
        // Rapier refreshes mass properties lazily on the next step, so a freshly spawned ghost
        // may not know its mass yet. Apply the impulse as a velocity change instead.
        let linvel = *body.linvel() + impulse / mass;
        body.set_linvel(linvel, true);
        Ok(())
    }

    /// Clear the displayed path. Called on the frame aiming stops.
    pub fn cancel(&mut self) {
        self.renderer.clear();
    }

    /// Point shadow-world gravity along `direction`, keeping the configured magnitude.
    pub fn set_gravity_direction(&mut self, direction: Vec3) -> Result<()> {
        if !is_finite_vector(&direction) {
            return Err(TrajectoryError::NonFiniteInput("gravity direction"));
        }
        let Some(unit) = direction.try_normalize(f32::EPSILON) else {
            return Err(TrajectoryError::NonFiniteInput("gravity direction"));
        };
        self.world.set_gravity(unit * self.settings.gravity.norm());
        Ok(())
    }

    /// Restore the gravity the trajectory was configured with.
    pub fn reset_gravity(&mut self) {
        self.world.set_gravity(self.settings.gravity);
    }

    pub fn settings(&self) -> &TrajectorySettings {
        &self.settings
    }

    pub fn world(&self) -> &ShadowWorld {
        &self.world
    }

    pub fn ghost(&self) -> Option<&PredictedProjectile> {
        self.ghosts.current()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::PathBuffer;
    use crate::scene::{Obstacle, Scene};
    use crate::settings::{GRAVITY_MPS2, HIT_COLOUR, MISS_COLOUR};
    use crate::shape::{BodyDef, ColliderShapeDef};
    use crate::types::{ObstacleId, ObstacleTag, ProjectileId, Team};
    use crate::visual::VisualNode;

    const DT: f32 = 1.0 / 60.0;

    fn unit_ball(id: u64) -> Projectile {
        Projectile::at_rest(
            ProjectileId(id),
            Pose::default(),
            BodyDef {
                shape: ColliderShapeDef::Sphere { radius: 0.12 },
                mass: 1.0,
                restitution: 0.5,
                friction: 0.5,
            },
        )
    }

    fn settings(max_steps: usize) -> TrajectorySettings {
        TrajectorySettings::default()
            .with_max_steps(max_steps)
            .with_fixed_dt(DT)
            .with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Thin scoring slab whose top face sits just above `center.y`.
    fn goal_slab(id: u32, center: Vec3, half_x: f32) -> Obstacle {
        Obstacle {
            id: ObstacleId(id),
            pose: Pose::from_translation(center),
            shape: Some(ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(half_x, 0.05, 0.5),
            }),
            is_static: true,
            tag: ObstacleTag::Goal(Team::Home),
            visual: VisualNode::mesh("net"),
        }
    }

    fn wall(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id: ObstacleId(id),
            pose: Pose::from_translation(Vec3::new(x, 0.0, 0.0)),
            shape: Some(ColliderShapeDef::Cuboid {
                half_extents: Vec3::new(0.1, 10.0, 10.0),
            }),
            is_static: false,
            tag: ObstacleTag::Plain,
            visual: VisualNode::mesh("wall"),
        }
    }

    fn simulate(
        trajectory: &mut Trajectory<PathBuffer>,
        ball: &Projectile,
        launch: Vec3,
    ) -> Prediction {
        match trajectory.simulate(ball, Vec3::zeros(), launch, Quat::identity()) {
            Ok(prediction) => prediction,
            Err(e) => panic!("simulate failed: {e}"),
        }
    }

    fn trajectory(scene: &Scene, max_steps: usize) -> Trajectory<PathBuffer> {
        match Trajectory::new(scene, PathBuffer::default(), settings(max_steps)) {
            Ok(t) => t,
            Err(e) => panic!("settings rejected: {e}"),
        }
    }

    #[test]
    fn vertical_throw_without_obstacles_is_full_length_miss() {
        let mut trajectory = trajectory(&Scene::new(), 50);
        let v = 5.0;
        let prediction = simulate(&mut trajectory, &unit_ball(1), Vec3::new(0.0, v, 0.0));

        assert_eq!(prediction.outcome, CollisionOutcome::Miss);
        assert_eq!(prediction.contact, None);
        assert_eq!(prediction.path.len(), 50);
        assert_eq!(trajectory.renderer().len(), 50);
        assert_eq!(trajectory.renderer().colour, Some(MISS_COLOUR));

        let heights: Vec<f32> = prediction.path.iter().map(|p| p.y).collect();
        let peak = heights
            .iter()
            .enumerate()
            .fold(0, |best, (i, h)| if *h > heights[best] { i } else { best });
        let expected_peak = (v / 9.81) / DT;
        assert!(
            (peak as f32 - expected_peak).abs() <= 2.0,
            "peak at step {peak}, expected about {expected_peak}"
        );
        assert!(heights[..=peak].windows(2).all(|w| w[1] > w[0]));
        assert!(heights[peak..].windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn descending_into_goal_is_a_hit_and_truncates_path() {
        // Rises to ~2.5 m, crosses y = 2 going up at x ~ 0.8 and coming down at x ~ 2.
        let mut scene = Scene::new();
        scene.insert(goal_slab(1, Vec3::new(2.1, 2.0, 0.0), 0.3));
        let mut trajectory = trajectory(&scene, 100);

        let prediction = simulate(&mut trajectory, &unit_ball(1), Vec3::new(2.0, 7.0, 0.0));

        assert_eq!(prediction.outcome, CollisionOutcome::Hit);
        let contact = prediction.contact.map(|c| (c.step, c.obstacle, c.velocity.y));
        let Some((step, obstacle, vy)) = contact else {
            panic!("expected a contact");
        };
        assert_eq!(obstacle, ObstacleId(1));
        assert!(vy < 0.0);
        assert!((45..75).contains(&step), "contact at step {step}");
        assert_eq!(prediction.path.len(), step);
        assert_eq!(trajectory.renderer().len(), step);
        assert_eq!(trajectory.renderer().colour, Some(HIT_COLOUR));
        assert!(prediction.path.iter().all(|p| p.y > 2.0 || p.x < 1.7));
    }

    #[test]
    fn rising_through_goal_is_a_miss() {
        let mut scene = Scene::new();
        scene.insert(goal_slab(1, Vec3::new(0.0, 2.0, 0.0), 1.0));
        let mut trajectory = trajectory(&scene, 50);

        let prediction = simulate(&mut trajectory, &unit_ball(1), Vec3::new(0.0, 8.0, 0.0));

        assert_eq!(prediction.outcome, CollisionOutcome::Miss);
        let contact = prediction.contact.map(|c| (c.step, c.velocity.y));
        let Some((step, vy)) = contact else {
            panic!("expected a contact");
        };
        assert!(vy > 0.0);
        assert_eq!(prediction.path.len(), step);
        assert!(step < 50);
    }

    #[test]
    fn every_step_runs_even_after_truncation() {
        let mut scene = Scene::new();
        scene.insert(goal_slab(1, Vec3::new(0.0, 2.0, 0.0), 1.0));
        let mut with_goal = trajectory(&scene, 50);
        let mut open_air = trajectory(&Scene::new(), 50);

        let launch = Vec3::new(0.0, 8.0, 0.0);
        let truncated = simulate(&mut with_goal, &unit_ball(1), launch);
        let full = simulate(&mut open_air, &unit_ball(1), launch);
        assert!(truncated.path.len() < full.path.len());

        // The sensor does not push the ball, so both ghosts end where 50 steps take them.
        let end = |t: &Trajectory<PathBuffer>| {
            t.ghost().and_then(|g| g.position(t.world()))
        };
        let (Some(a), Some(b)) = (end(&with_goal), end(&open_air)) else {
            panic!("both ghosts should exist");
        };
        assert!((a - b).norm() < 1.0e-4, "{a} vs {b}");
        assert_eq!(Some(b), full.path.last().copied());
    }

    #[test]
    fn repeated_predictions_are_identical() {
        let mut scene = Scene::new();
        scene.insert(goal_slab(1, Vec3::new(2.1, 2.0, 0.0), 0.3));
        scene.insert(wall(2, 6.0));
        let mut trajectory = trajectory(&scene, 120);

        let ball = unit_ball(1);
        let launch = Vec3::new(2.0, 7.0, 0.0);
        let first = simulate(&mut trajectory, &ball, launch);
        let second = simulate(&mut trajectory, &ball, launch);
        assert_eq!(first, second);
    }

    #[test]
    fn only_one_ghost_exists_across_identity_swaps() {
        let mut trajectory = trajectory(&Scene::new(), 10);
        assert_eq!(trajectory.world().dynamic_body_count(), 0);

        for id in [1, 2, 2, 1, 3, 3, 4] {
            simulate(&mut trajectory, &unit_ball(id), Vec3::new(0.0, 3.0, 0.0));
            assert_eq!(trajectory.world().dynamic_body_count(), 1);
            assert_eq!(trajectory.ghost().map(|g| g.id), Some(ProjectileId(id)));
        }
    }

    #[test]
    fn ghost_starts_from_live_state_each_call() {
        let mut trajectory = trajectory(&Scene::new(), 20);
        let mut ball = unit_ball(1);
        let launch = Vec3::new(1.0, 4.0, 0.0);

        let at_rest = simulate(&mut trajectory, &ball, launch);
        // Leftover ghost momentum must not leak into the next prediction.
        let again = simulate(&mut trajectory, &ball, launch);
        assert_eq!(at_rest.path, again.path);

        ball.linvel = Vec3::new(0.0, 2.0, 0.0);
        let moving = simulate(&mut trajectory, &ball, launch);
        assert!(moving.path[0].y > at_rest.path[0].y);
    }

    #[test]
    fn missing_body_fails_without_touching_the_line() {
        let mut trajectory = trajectory(&Scene::new(), 10);
        simulate(&mut trajectory, &unit_ball(1), Vec3::new(0.0, 3.0, 0.0));
        let drawn = trajectory.renderer().clone();

        let mut prop = unit_ball(2);
        prop.body = None;
        let result = trajectory.simulate(&prop, Vec3::zeros(), Vec3::y(), Quat::identity());

        assert_eq!(result, Err(TrajectoryError::MissingBody(ProjectileId(2))));
        assert_eq!(trajectory.renderer(), &drawn);
        assert_eq!(trajectory.ghost().map(|g| g.id), Some(ProjectileId(1)));
    }

    #[test]
    fn non_finite_launch_is_rejected() {
        let mut trajectory = trajectory(&Scene::new(), 10);
        let result = trajectory.simulate(
            &unit_ball(1),
            Vec3::zeros(),
            Vec3::new(f32::NAN, 1.0, 0.0),
            Quat::identity(),
        );
        assert_eq!(result, Err(TrajectoryError::NonFiniteInput("launch velocity")));
        assert!(trajectory.ghost().is_none());
    }

    #[test]
    fn cancel_clears_the_line() {
        let mut trajectory = trajectory(&Scene::new(), 10);
        simulate(&mut trajectory, &unit_ball(1), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(trajectory.renderer().len(), 10);

        trajectory.cancel();
        assert!(trajectory.renderer().is_empty());
    }

    #[test]
    fn synced_obstacle_blocks_the_path() {
        let mut scene = Scene::new();
        scene.insert(wall(1, 20.0));
        let mut trajectory = trajectory(&scene, 60);
        let launch = Vec3::new(6.0, 3.0, 0.0);

        let clear = simulate(&mut trajectory, &unit_ball(1), launch);
        assert_eq!(clear.path.len(), 60);

        scene.set_pose(ObstacleId(1), Pose::from_translation(Vec3::new(2.0, 0.0, 0.0)));
        // Not synced yet: the shadow wall is still far away.
        let stale = simulate(&mut trajectory, &unit_ball(1), launch);
        assert_eq!(stale, clear);

        assert_eq!(trajectory.sync_obstacles(&scene), 1);
        let blocked = simulate(&mut trajectory, &unit_ball(1), launch);
        assert_eq!(blocked.outcome, CollisionOutcome::Miss);
        assert_eq!(blocked.contact.map(|c| c.obstacle), Some(ObstacleId(1)));
        assert!(blocked.path.len() < 60);
        assert!(blocked.path.iter().all(|p| p.x < 2.0));
    }

    #[test]
    fn redirected_gravity_bends_the_path() {
        let mut trajectory = trajectory(&Scene::new(), 30);
        assert!(trajectory.set_gravity_direction(Vec3::new(2.0, 0.0, 0.0)).is_ok());
        let sideways_gravity = trajectory.world().gravity() - Vec3::new(GRAVITY_MPS2, 0.0, 0.0);
        assert!(sideways_gravity.norm() < 1.0e-5);

        let sideways = simulate(&mut trajectory, &unit_ball(1), Vec3::zeros());
        assert!(sideways.path.windows(2).all(|w| w[1].x > w[0].x));
        assert!(sideways.path.iter().all(|p| p.y.abs() < 1.0e-4));

        trajectory.reset_gravity();
        assert_eq!(trajectory.world().gravity(), Vec3::new(0.0, -9.81, 0.0));
        assert!(trajectory.set_gravity_direction(Vec3::zeros()).is_err());
    }

    #[test]
    fn redirected_gravity_keeps_configured_magnitude() {
        let moon = settings(10).with_gravity(Vec3::new(0.0, -1.62, 0.0));
        let Ok(mut trajectory) = Trajectory::new(&Scene::new(), PathBuffer::default(), moon)
        else {
            panic!("settings rejected");
        };

        assert!(trajectory.set_gravity_direction(Vec3::new(0.0, 0.0, -3.0)).is_ok());
        let gravity = trajectory.world().gravity();
        assert!((gravity - Vec3::new(0.0, 0.0, -1.62)).norm() < 1.0e-5, "{gravity}");

        trajectory.reset_gravity();
        assert_eq!(trajectory.world().gravity(), Vec3::new(0.0, -1.62, 0.0));
    }

    fn floor() -> Obstacle {
        Obstacle {
            id: ObstacleId(0),
            pose: Pose::default(),
            shape: Some(ColliderShapeDef::Plane),
            is_static: true,
            tag: ObstacleTag::Plain,
            visual: VisualNode::mesh("floor"),
        }
    }

    /// Unit ball resting on the floor.
    fn grounded_ball(id: u64) -> Projectile {
        let mut ball = unit_ball(id);
        ball.pose = Pose::from_translation(Vec3::new(0.0, 0.12, 0.0));
        ball
    }

    #[test]
    fn contact_on_first_step_leaves_an_empty_path() {
        let mut scene = Scene::new();
        scene.insert(floor());
        let mut trajectory = trajectory(&scene, 50);

        let prediction = simulate(&mut trajectory, &grounded_ball(1), Vec3::new(1.0, 0.0, 0.0));

        assert_eq!(prediction.contact.map(|c| (c.step, c.obstacle)), Some((0, ObstacleId(0))));
        assert_eq!(prediction.outcome, CollisionOutcome::Miss);
        assert!(prediction.path.is_empty());
        assert!(trajectory.renderer().is_empty());
        assert_eq!(trajectory.renderer().colour, Some(MISS_COLOUR));
    }

    #[test]
    fn resting_contact_is_reported_on_every_call() {
        let mut scene = Scene::new();
        scene.insert(floor());
        let mut trajectory = trajectory(&scene, 50);
        let ball = grounded_ball(1);
        let launch = Vec3::new(1.0, 0.0, 0.0);

        // The ghost ends each call still touching the floor it starts the next call on.
        let first = simulate(&mut trajectory, &ball, launch);
        let second = simulate(&mut trajectory, &ball, launch);
        assert_eq!(first, second);
        assert_eq!(second.contact.map(|c| c.step), Some(0));

        // Same after a call that landed the ghost somewhere else on the floor.
        let mut dropped = unit_ball(1);
        dropped.pose = Pose::from_translation(Vec3::new(3.0, 1.0, 0.0));
        let landed = simulate(&mut trajectory, &dropped, Vec3::zeros());
        assert!(landed.contact.is_some());
        let third = simulate(&mut trajectory, &ball, launch);
        assert_eq!(third, first);
    }

    #[test]
    fn non_finite_live_state_is_rejected() {
        let mut trajectory = trajectory(&Scene::new(), 10);
        simulate(&mut trajectory, &unit_ball(1), Vec3::new(0.0, 3.0, 0.0));
        let drawn = trajectory.renderer().clone();

        let mut ball = unit_ball(1);
        ball.linvel = Vec3::new(f32::NAN, 0.0, 0.0);
        let result = trajectory.simulate(&ball, Vec3::zeros(), Vec3::y(), Quat::identity());
        assert_eq!(
            result,
            Err(TrajectoryError::NonFiniteInput("projectile linear velocity"))
        );

        let nan_rotation = Quat::new_unchecked(nalgebra::Quaternion::new(f32::NAN, 0.0, 0.0, 0.0));
        let result = trajectory.simulate(&unit_ball(2), Vec3::zeros(), Vec3::y(), nan_rotation);
        assert_eq!(result, Err(TrajectoryError::NonFiniteInput("spawn pose")));

        assert_eq!(trajectory.renderer(), &drawn);
        assert_eq!(trajectory.ghost().map(|g| g.id), Some(ProjectileId(1)));
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let result = Trajectory::new(
            &Scene::new(),
            PathBuffer::default(),
            TrajectorySettings::default().with_max_steps(0),
        );
        assert!(matches!(result, Err(TrajectoryError::InvalidSettings(_))));
    }
}
