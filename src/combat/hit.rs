//! Combat domain: the value describing a single damage application.

use bevy::prelude::*;

/// Horizontal knockback direction. Always derived from relative position at
/// the moment a hit is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnockbackDirection {
    Left,
    #[default]
    None,
    Right,
}

impl KnockbackDirection {
    pub fn from_sign(value: f32) -> Self {
        if value > 0.0 {
            KnockbackDirection::Right
        } else if value < 0.0 {
            KnockbackDirection::Left
        } else {
            KnockbackDirection::None
        }
    }

    /// Direction that pushes a target at `target_x` away from `source_x`.
    pub fn away_from(source_x: f32, target_x: f32) -> Self {
        Self::from_sign(target_x - source_x)
    }

    pub fn sign(self) -> f32 {
        match self {
            KnockbackDirection::Left => -1.0,
            KnockbackDirection::None => 0.0,
            KnockbackDirection::Right => 1.0,
        }
    }
}

/// Immutable description of one hit. Built per contact, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct HitInfo {
    pub damage: u32,
    pub knockback_force: f32,
    pub knockback_direction: KnockbackDirection,
    /// Weak reference to whoever dealt the hit
    pub source: Option<Entity>,
    /// Where the hit came from, when known. Used for frontal blocking.
    pub origin: Option<Vec2>,
}

impl HitInfo {
    pub fn new(damage: u32, knockback_force: f32, direction: f32, source: Option<Entity>) -> Self {
        Self {
            damage,
            knockback_force: knockback_force.max(0.0),
            knockback_direction: KnockbackDirection::from_sign(direction),
            source,
            origin: None,
        }
    }

    /// Hit from `source_pos` against a target standing at `target_pos`;
    /// knockback sign is `sign(target.x - source.x)`.
    pub fn between(
        damage: u32,
        knockback_force: f32,
        source_pos: Vec2,
        target_pos: Vec2,
        source: Option<Entity>,
    ) -> Self {
        Self {
            damage,
            knockback_force: knockback_force.max(0.0),
            knockback_direction: KnockbackDirection::away_from(source_pos.x, target_pos.x),
            source,
            origin: Some(source_pos),
        }
    }

    /// A hit that kills anything regardless of remaining health.
    pub fn lethal(source: Option<Entity>) -> Self {
        Self {
            damage: u32::MAX,
            knockback_force: 0.0,
            knockback_direction: KnockbackDirection::None,
            source,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Knockback velocity after applying a resistance coefficient in `[0,1]`.
    pub fn knockback_velocity(&self, resistance: f32) -> f32 {
        let resistance = resistance.clamp(0.0, 1.0);
        self.knockback_direction.sign() * self.knockback_force * (1.0 - resistance)
    }
}
