//! Per-frame pose sync from live dynamic obstacles into their shadow duplicates.

use rapier3d::prelude::{RigidBodyHandle, RigidBodySet};

use crate::scene::ObstacleSource;
use crate::types::ObstacleId;

/// A live obstacle and the shadow body that must follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowLink {
    pub live: ObstacleId,
    pub shadow: RigidBodyHandle,
}

/// The set of links refreshed every frame.
///
/// Links are created while the shadow world is built and are never removed individually.
#[derive(Clone, Debug, Default)]
pub struct Mirror {
    links: Vec<ShadowLink>,
}

impl Mirror {
    pub fn link(&mut self, live: ObstacleId, shadow: RigidBodyHandle) {
        self.links.push(ShadowLink { live, shadow });
    }

    pub fn links(&self) -> &[ShadowLink] {
        &self.links
    }

    /// Copy the live pose of every linked obstacle onto its shadow body.
    ///
    /// Call once per outer frame, before any prediction that frame. Links whose live obstacle
    /// has gone away keep their last pose. Returns the number of shadow bodies updated.
    pub fn sync<S>(&self, source: &S, bodies: &mut RigidBodySet) -> usize
    where
        S: ObstacleSource + ?Sized,
    {
        let mut synced = 0;
        for link in &self.links {
            let Some(pose) = source.pose(link.live) else {
                log::debug!("mirror: live obstacle {:?} is gone, keeping last pose", link.live);
                continue;
            };
            let Some(body) = bodies.get_mut(link.shadow) else {
                log::debug!("mirror: shadow body for {:?} is gone", link.live);
                continue;
            };
            // Teleport: sets both the current and next kinematic pose, so the duplicate does
            // not sweep during the following steps.
            body.set_translation(pose.translation, true);
            body.set_rotation(pose.rotation, true);
            synced += 1;
        }
        synced
    }
}
