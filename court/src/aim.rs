//! The player's aim: where the held ball is and how hard it would leave the hand.

use trajectory::{Pose, Quat, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct Aim {
    pub player_position: Vec3,
    /// Player movement velocity, inherited by the ball on release.
    pub player_velocity: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Launch impulse magnitude along the camera forward axis.
    pub shoot_force: f32,
}

impl Aim {
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_euler_angles(self.pitch, self.yaw, 0.0)
    }

    /// Camera forward: -Z rotated by pitch then yaw.
    pub fn forward(&self) -> Vec3 {
        self.camera_rotation() * Vec3::new(0.0, 0.0, -1.0)
    }

    /// Pose of the held ball, slightly in front of and above the player.
    pub fn hand(&self) -> Pose {
        let rotation = self.camera_rotation();
        let offset = rotation * Vec3::new(0.25, -0.2, -0.6);
        Pose::new(self.player_position + Vec3::new(0.0, 1.6, 0.0) + offset, rotation)
    }

    pub fn launch_velocity(&self) -> Vec3 {
        self.forward() * self.shoot_force + self.player_velocity
    }
}
