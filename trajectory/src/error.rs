use thiserror::Error;

use crate::types::ProjectileId;

/// Errors raised by the prediction engine.
#[derive(Debug, Error, PartialEq)]
pub enum TrajectoryError {
    /// The candidate projectile has no physical body, so a ghost of it could never simulate.
    #[error("projectile {0:?} has no physical body")]
    MissingBody(ProjectileId),

    /// A launch/spawn vector or gravity direction contained NaN/inf or was degenerate.
    #[error("non-finite or degenerate input: {0}")]
    NonFiniteInput(&'static str),

    #[error("invalid trajectory settings: {0}")]
    InvalidSettings(&'static str),

    /// A handle stored by the shadow world no longer resolves to a body.
    #[error("shadow body for {0} is missing")]
    ShadowBodyMissing(&'static str),
}

pub type Result<T> = std::result::Result<T, TrajectoryError>;
