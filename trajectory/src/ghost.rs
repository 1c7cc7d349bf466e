//! The single predicted projectile ("ghost") living in the shadow world.
//!
//! At most one ghost exists. It is keyed by the identity of the real projectile being aimed
//! and rebuilt when the player switches to a different one, so swapping aim targets never
//! leaves a stale hidden body behind.

use rapier3d::prelude::{ColliderHandle, RigidBodyBuilder, RigidBodyHandle};

use crate::error::{Result, TrajectoryError};
use crate::scene::Projectile;
use crate::shadow_world::ShadowWorld;
use crate::shape::projectile_collider;
use crate::types::{Point, Pose, ProjectileId};

/// Handles of the current ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PredictedProjectile {
    pub id: ProjectileId,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

#[derive(Debug, Default)]
pub struct GhostManager {
    current: Option<PredictedProjectile>,
}

impl GhostManager {
    pub fn current(&self) -> Option<&PredictedProjectile> {
        self.current.as_ref()
    }

    /// Return the ghost for `candidate`, spawning or replacing it as needed.
    ///
    /// - no ghost yet: spawn at `spawn`.
    /// - ghost of another projectile: remove it, then spawn a new one at `spawn`.
    /// - ghost of this projectile: returned unchanged.
    ///
    /// Fails with [`TrajectoryError::MissingBody`] if `candidate` has no physical body. The
    /// current ghost is left as it was in that case.
    pub fn ensure(
        &mut self,
        world: &mut ShadowWorld,
        candidate: &Projectile,
        spawn: Pose,
    ) -> Result<PredictedProjectile> {
        let Some(body_def) = candidate.body.as_ref() else {
            log::warn!("cannot predict {:?}: it has no physical body", candidate.id);
            return Err(TrajectoryError::MissingBody(candidate.id));
        };

        if let Some(ghost) = self.current {
            if ghost.id == candidate.id {
                return Ok(ghost);
            }
            if !world.despawn(ghost.body) {
                log::debug!("ghost of {:?} was already gone", ghost.id);
            }
            log::debug!("aim switched from {:?} to {:?}, respawning ghost", ghost.id, candidate.id);
        }

        let (body, collider) = world.spawn(
            RigidBodyBuilder::dynamic()
                .pose(spawn.iso())
                .angular_damping(candidate.angular_damping)
                .ccd_enabled(true)
                .build(),
            projectile_collider(body_def),
        );
        let ghost = PredictedProjectile {
            id: candidate.id,
            body,
            collider,
        };
        self.current = Some(ghost);
        Ok(ghost)
    }

    /// Reseed the current ghost from `candidate`. Returns the ghost's handles afterwards; the
    /// collider handle changes on every call.
    pub fn reseed(
        &mut self,
        world: &mut ShadowWorld,
        candidate: &Projectile,
    ) -> Result<PredictedProjectile> {
        let ghost = self
            .current
            .as_mut()
            .ok_or(TrajectoryError::ShadowBodyMissing("predicted projectile"))?;
        ghost.reseed(world, candidate)?;
        Ok(*ghost)
    }
}

impl PredictedProjectile {
    /// Overwrite the ghost's pose and motion with the live state of `candidate`.
    ///
    /// Every prediction starts from what the real projectile is doing now, never from
    /// momentum or contacts left over from the previous prediction. The collider is replaced
    /// so a ghost that starts out touching an obstacle reports that contact again.
    pub fn reseed(&mut self, world: &mut ShadowWorld, candidate: &Projectile) -> Result<()> {
        candidate.check_finite()?;
        let body_def = candidate
            .body
            .as_ref()
            .ok_or(TrajectoryError::MissingBody(candidate.id))?;

        let body = world
            .body_mut(self.body)
            .ok_or(TrajectoryError::ShadowBodyMissing("predicted projectile"))?;
        body.set_translation(candidate.pose.translation, true);
        body.set_rotation(candidate.pose.rotation, true);
        body.set_linvel(candidate.linvel, true);
        body.set_angvel(candidate.angvel, true);
        body.set_angular_damping(candidate.angular_damping);
        body.reset_forces(true);
        body.reset_torques(true);

        self.collider = world
            .replace_collider(self.collider, projectile_collider(body_def))
            .ok_or(TrajectoryError::ShadowBodyMissing("predicted projectile collider"))?;
        Ok(())
    }

    pub fn position(&self, world: &ShadowWorld) -> Option<Point> {
        world.body(self.body).map(|b| Point::from(*b.translation()))
    }
}
