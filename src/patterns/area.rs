//! Patterns domain: telegraphed strike on a point frozen at invocation.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{HitInfo, TargetView};
use crate::core::{CombatEventBus, Telegraph};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AreaParams {
    pub warning_duration: f32,
    pub radius: f32,
    pub damage: u32,
    pub knockback: f32,
    pub linger: f32,
}

impl Default for AreaParams {
    fn default() -> Self {
        Self {
            warning_duration: 1.0,
            radius: 64.0,
            damage: 2,
            knockback: 300.0,
            linger: 0.3,
        }
    }
}

impl AreaParams {
    pub fn duration(&self) -> f32 {
        self.warning_duration + self.linger
    }

    pub fn telegraph(&self, actor: Entity, point: Vec2, bus: &mut dyn CombatEventBus) {
        bus.show_telegraph(Telegraph {
            owner: actor,
            position: point,
            radius: self.radius,
            duration: self.warning_duration,
        });
    }

    /// Hit every target within `radius` of `point`. Returns how many were hit.
    pub fn detonate(
        &self,
        actor: Entity,
        point: Vec2,
        targets: &[TargetView],
        bus: &mut dyn CombatEventBus,
    ) -> usize {
        let mut hits = 0;
        for target in targets {
            if target.position.distance(point) <= self.radius {
                bus.hit_target(
                    target.entity,
                    HitInfo::between(self.damage, self.knockback, point, target.position, Some(actor)),
                );
                hits += 1;
            }
        }
        hits
    }
}
