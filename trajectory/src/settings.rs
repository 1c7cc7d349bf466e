/*!
Trajectory prediction settings and defaults.

These constants centralize the parameters used by the shadow world and the
simulation stepper. Keeping them together makes tuning easier and keeps the
prediction deterministic for a given configuration.

Notes
- Distances are in meters, time in seconds.
- `TrajectorySettings::default()` is built from these constants; override per
  game with the `with_*` helpers.
*/

use crate::error::{Result, TrajectoryError};
use crate::types::Vec3;

/// Number of physics steps run per prediction.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Fixed physics increment (seconds). Matches a 50 Hz fixed update.
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 50.0;

/// Gravity magnitude in meters per second squared (positive value).
pub const GRAVITY_MPS2: f32 = 9.81;

/// RGBA colour of the aiming line.
pub type LineColour = [f32; 4];

/// Line colour when the throw is predicted to score.
pub const HIT_COLOUR: LineColour = [0.2, 0.9, 0.3, 1.0];

/// Line colour for everything else.
pub const MISS_COLOUR: LineColour = [0.9, 0.25, 0.2, 1.0];

#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySettings {
    /// Physics steps executed by every `simulate` call.
    pub max_steps: usize,
    /// Seconds advanced per step.
    pub fixed_dt: f32,
    /// Gravity applied inside the shadow world.
    pub gravity: Vec3,
    pub hit_colour: LineColour,
    pub miss_colour: LineColour,
}

impl Default for TrajectorySettings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            fixed_dt: DEFAULT_FIXED_DT,
            gravity: Vec3::new(0.0, -GRAVITY_MPS2, 0.0),
            hit_colour: HIT_COLOUR,
            miss_colour: MISS_COLOUR,
        }
    }
}

impl TrajectorySettings {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_fixed_dt(mut self, fixed_dt: f32) -> Self {
        self.fixed_dt = fixed_dt;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    /// Reject configurations the stepper cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(TrajectoryError::InvalidSettings("max_steps must be at least 1"));
        }
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(TrajectoryError::InvalidSettings(
                "fixed_dt must be positive and finite",
            ));
        }
        if !crate::types::is_finite_vector(&self.gravity) {
            return Err(TrajectoryError::InvalidSettings("gravity must be finite"));
        }
        Ok(())
    }
}
