//! Core domain: shared tuning and run configuration resources.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Global combat tuning, loaded from `combat_tuning.ron` when present.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Minimum upward component of the enemy-to-player normal that counts as a stomp
    pub stomp_normal_tolerance: f32,
    /// Upward impulse given to the player after a successful stomp
    pub stomp_bounce_impulse: f32,
    /// Seconds a corpse stays before removal (death animation)
    pub corpse_duration: f32,
    /// Seconds spent in `Hurt` before resuming pursuit
    pub hurt_duration: f32,
    /// Distance at which a patrol waypoint counts as reached
    pub arrival_epsilon: f32,
    /// Fraction of knockback velocity shed per second while hurt
    pub knockback_damping: f32,
    /// Cap on any velocity produced by knockback
    pub max_knockback_velocity: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            stomp_normal_tolerance: 0.7,
            stomp_bounce_impulse: 520.0,
            corpse_duration: 0.6,
            hurt_duration: 0.25,
            arrival_epsilon: 2.0,
            knockback_damping: 6.0,
            max_knockback_velocity: 800.0,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct RunConfig {
    /// Seeds every boss's pattern selection RNG
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
        }
    }
}

impl RunConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { seed }
    }
}
