//! Hit/miss classification of the first contact made by a predicted projectile.

use crate::types::{ObstacleId, ObstacleTag, Vec3};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Nothing touched yet in the current prediction.
    #[default]
    Undetermined,
    /// First contact was a scoring target entered while falling.
    Hit,
    Miss,
}

/// The contact that decided a prediction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Zero-based step during which the contact started.
    pub step: usize,
    pub obstacle: ObstacleId,
    pub tag: ObstacleTag,
    /// Ghost velocity right after the step that made contact.
    pub velocity: Vec3,
}

/// Hit iff the contacted body is a target and the projectile is descending.
#[inline]
pub fn classify(is_target: bool, vertical_velocity: f32) -> CollisionOutcome {
    if is_target && vertical_velocity < 0.0 {
        CollisionOutcome::Hit
    } else {
        CollisionOutcome::Miss
    }
}

/// Per-prediction outcome where the first contact wins.
#[derive(Clone, Copy, Debug, Default)]
pub struct OutcomeLatch {
    outcome: CollisionOutcome,
    contact: Option<Contact>,
}

impl OutcomeLatch {
    /// Back to `Undetermined`. Called at the start of every prediction.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record `contact` unless an earlier one already decided the outcome.
    ///
    /// Returns true when this contact was the deciding one.
    pub fn record(&mut self, contact: Contact) -> bool {
        if self.is_set() {
            return false;
        }
        self.outcome = classify(contact.tag.is_target(), contact.velocity.y);
        self.contact = Some(contact);
        true
    }

    pub fn is_set(&self) -> bool {
        self.outcome != CollisionOutcome::Undetermined
    }

    pub fn outcome(&self) -> CollisionOutcome {
        self.outcome
    }

    pub fn contact(&self) -> Option<Contact> {
        self.contact
    }

    /// Final outcome of a prediction. A flight that touched nothing is a miss.
    pub fn resolve(&self) -> CollisionOutcome {
        match self.outcome {
            CollisionOutcome::Undetermined => CollisionOutcome::Miss,
            decided => decided,
        }
    }
}
