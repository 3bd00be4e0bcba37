//! Enemies domain: shield-raising melee archetype.

use bevy::prelude::*;

use crate::combat::{EntityState, HitInfo};
use crate::enemies::behavior::{Archetype, DamageVerdict, EnemyBehavior};
use crate::enemies::config::EnemyConfig;
use crate::enemies::runtime::{AttackPayload, AttackProfile, EnemyRuntime};

/// Chase speed multiplier while the shield is raised
const SHIELDED_CHASE_FACTOR: f32 = 0.5;

/// Blocks frontal hits while its shield is raised. The shield drops for the
/// duration of its own attack.
#[derive(Debug, Clone)]
pub struct Shieldbearer {
    block_cos: f32,
    windup: f32,
    shield_up: bool,
}

impl Shieldbearer {
    pub fn new(block_half_angle_deg: f32, windup: f32) -> Self {
        Self {
            block_cos: block_half_angle_deg.clamp(0.0, 180.0).to_radians().cos(),
            windup: windup.max(0.0),
            shield_up: true,
        }
    }

    pub fn shield_up(&self) -> bool {
        self.shield_up
    }

    fn frontal(&self, me: &EnemyRuntime, hit: &HitInfo) -> bool {
        match hit.origin {
            Some(origin) => {
                let to_origin = (origin - me.position).normalize_or_zero();
                to_origin != Vec2::ZERO && me.facing.as_vec2().dot(to_origin) >= self.block_cos
            }
            // Without an origin, a hit pushing us backwards came from the front.
            None => {
                let push = hit.knockback_direction.sign();
                push != 0.0 && push == -me.facing.sign()
            }
        }
    }
}

impl EnemyBehavior for Shieldbearer {
    fn archetype(&self) -> Archetype {
        Archetype::Shieldbearer
    }

    fn chase_speed_factor(&self, _me: &EnemyRuntime) -> f32 {
        if self.shield_up {
            SHIELDED_CHASE_FACTOR
        } else {
            1.0
        }
    }

    fn on_state_enter(&mut self, state: EntityState, _me: &mut EnemyRuntime, _config: &EnemyConfig) {
        self.shield_up = match state {
            EntityState::Attack | EntityState::Dead => false,
            EntityState::Hurt => self.shield_up,
            _ => true,
        };
    }

    fn attack_profile(&self, config: &EnemyConfig) -> AttackProfile {
        AttackProfile {
            windup: self.windup,
            recover: config.post_attack_hold,
            payload: AttackPayload::Contact,
        }
    }

    fn screen_damage(&self, me: &EnemyRuntime, _config: &EnemyConfig, hit: &HitInfo) -> DamageVerdict {
        if self.shield_up && self.frontal(me, hit) {
            DamageVerdict::Blocked
        } else {
            DamageVerdict::Accept
        }
    }
}
