//! Patterns domain: windup, dash, strike, recover.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{HitInfo, TargetView};
use crate::core::CombatEventBus;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MeleeParams {
    pub windup: f32,
    pub dash_speed: f32,
    pub dash_time: f32,
    /// Strike hit-test radius measured from the actor after the dash
    pub range: f32,
    pub damage: u32,
    pub knockback: f32,
    pub recover: f32,
}

impl Default for MeleeParams {
    fn default() -> Self {
        Self {
            windup: 0.4,
            dash_speed: 420.0,
            dash_time: 0.25,
            range: 56.0,
            damage: 1,
            knockback: 360.0,
            recover: 0.5,
        }
    }
}

impl MeleeParams {
    pub fn duration(&self) -> f32 {
        self.windup + self.dash_time + self.recover
    }

    /// Horizontal dash toward the target; keeps `fallback` with no target.
    pub fn dash_direction(actor: Vec2, target: Option<&TargetView>, fallback: f32) -> f32 {
        match target {
            Some(target) if target.position.x != actor.x => (target.position.x - actor.x).signum(),
            _ => fallback,
        }
    }

    /// Returns true if the target was within range.
    pub fn strike(
        &self,
        actor: Entity,
        actor_position: Vec2,
        target: Option<&TargetView>,
        bus: &mut dyn CombatEventBus,
    ) -> bool {
        let Some(target) = target else {
            return false;
        };
        if actor_position.distance(target.position) > self.range {
            return false;
        }
        bus.hit_target(
            target.entity,
            HitInfo::between(
                self.damage,
                self.knockback,
                actor_position,
                target.position,
                Some(actor),
            ),
        );
        true
    }
}
