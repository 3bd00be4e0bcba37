//! Patterns domain: minion summoning cast that exposes the caster.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{CombatEventBus, SpawnRequest};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SummonParams {
    pub cast_time: f32,
    /// Enemy content id of the minions
    pub kind: String,
    pub count: u32,
    pub spacing: f32,
    pub wait: f32,
    /// Damage during the cast that breaks it; zero means uninterruptible
    pub interrupt_damage: u32,
    /// Vulnerable window opened by an interruption
    pub stun_time: f32,
}

impl Default for SummonParams {
    fn default() -> Self {
        Self {
            cast_time: 1.2,
            kind: String::new(),
            count: 2,
            spacing: 48.0,
            wait: 0.5,
            interrupt_damage: 0,
            stun_time: 2.0,
        }
    }
}

impl SummonParams {
    pub fn duration(&self) -> f32 {
        self.cast_time + self.wait
    }

    pub fn interrupted_by(&self, damage_during_cast: u32) -> bool {
        self.interrupt_damage > 0 && damage_during_cast >= self.interrupt_damage
    }

    pub fn request(&self, actor: Entity, position: Vec2, bus: &mut dyn CombatEventBus) {
        bus.request_spawn(SpawnRequest {
            requester: Some(actor),
            kind: self.kind.clone(),
            count: self.count,
            position,
            spacing: self.spacing,
        });
    }
}
