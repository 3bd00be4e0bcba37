//! Enemies domain: periodic ranged attacker.

use bevy::prelude::*;

use crate::enemies::behavior::{Archetype, EnemyBehavior};
use crate::enemies::config::{EnemyConfig, ProjectileProfile};
use crate::enemies::runtime::{AttackPayload, AttackProfile, AttackStage, EnemyRuntime};

/// Ranged enemy: winds up, spits one projectile at the target, then slides
/// backwards during recovery.
#[derive(Debug, Clone)]
pub struct Spitter {
    windup: f32,
    recoil_time: f32,
    recoil_speed: f32,
    projectile: ProjectileProfile,
}

impl Spitter {
    pub fn new(windup: f32, recoil_time: f32, recoil_speed: f32, projectile: ProjectileProfile) -> Self {
        Self {
            windup: windup.max(0.0),
            recoil_time: recoil_time.max(0.0),
            recoil_speed: recoil_speed.max(0.0),
            projectile,
        }
    }
}

impl EnemyBehavior for Spitter {
    fn archetype(&self) -> Archetype {
        Archetype::Spitter
    }

    fn attack_profile(&self, config: &EnemyConfig) -> AttackProfile {
        AttackProfile {
            windup: self.windup,
            recover: self.recoil_time.max(config.post_attack_hold),
            payload: AttackPayload::Projectile(self.projectile.clone()),
        }
    }

    fn attack_velocity(&self, stage: AttackStage, me: &EnemyRuntime, _config: &EnemyConfig) -> Vec2 {
        match stage {
            AttackStage::Recover if me.attack.as_ref().is_none_or(|a| {
                a.profile.recover - a.timer.remaining() < self.recoil_time
            }) =>
            {
                Vec2::new(-me.facing.sign() * self.recoil_speed, 0.0)
            }
            _ => Vec2::ZERO,
        }
    }
}
