//! Patterns domain: a fan of projectiles aimed at the target.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::Team;
use crate::core::CombatEventBus;
use crate::enemies::ProjectileProfile;
use crate::projectiles::ProjectileSpec;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VolleyParams {
    pub windup: f32,
    pub count: u32,
    /// Total fan width in degrees
    pub spread_angle: f32,
    pub projectile: ProjectileProfile,
    pub wait: f32,
}

impl Default for VolleyParams {
    fn default() -> Self {
        Self {
            windup: 0.5,
            count: 3,
            spread_angle: 30.0,
            projectile: ProjectileProfile::default(),
            wait: 0.6,
        }
    }
}

impl VolleyParams {
    pub fn duration(&self) -> f32 {
        self.windup + self.wait
    }

    /// `count` unit directions spread evenly across `spread_angle` around `aim`.
    pub fn fan_directions(&self, aim: Vec2) -> Vec<Vec2> {
        let aim = aim.normalize_or_zero();
        let aim = if aim == Vec2::ZERO { Vec2::X } else { aim };
        match self.count {
            0 => Vec::new(),
            1 => vec![aim],
            count => {
                let spread = self.spread_angle.to_radians();
                let step = spread / (count - 1) as f32;
                (0..count)
                    .map(|i| Vec2::from_angle(-spread * 0.5 + step * i as f32).rotate(aim))
                    .collect()
            }
        }
    }

    pub fn fire(
        &self,
        actor: Entity,
        origin: Vec2,
        aim: Vec2,
        target: Option<Entity>,
        bus: &mut dyn CombatEventBus,
    ) -> usize {
        let directions = self.fan_directions(aim);
        for direction in &directions {
            bus.spawn_projectile(ProjectileSpec::from_profile(
                &self.projectile,
                origin,
                *direction,
                Some(actor),
                Team::Enemy,
                target,
            ));
        }
        directions.len()
    }
}
