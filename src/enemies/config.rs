//! Enemies domain: per-archetype tuning loaded from content.

use serde::{Deserialize, Serialize};

use crate::enemies::archetypes::{
    Blinker, Flyer, Grappler, Shieldbearer, Spitter, Walker, Wraith,
};
use crate::enemies::behavior::EnemyBehavior;

/// Immutable per-archetype tuning. Created at spawn, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub health: u32,
    pub contact_damage: u32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub score_value: u32,
    pub can_be_stomped: bool,
    /// Fraction of incoming knockback ignored, in `[0,1]`
    pub knockback_resistance: f32,
    pub attack_knockback: f32,
    /// Recovery hold after a strike before resuming pursuit
    pub post_attack_hold: f32,
    /// Half-width of the oscillation when no patrol path is given
    pub patrol_range: f32,
    /// Ground enemies ignore targets higher than this above them
    pub vertical_reach: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            health: 3,
            contact_damage: 1,
            move_speed: 80.0,
            detection_range: 200.0,
            attack_range: 40.0,
            attack_cooldown: 1.0,
            score_value: 100,
            can_be_stomped: true,
            knockback_resistance: 0.0,
            attack_knockback: 300.0,
            post_attack_hold: 0.4,
            patrol_range: 100.0,
            vertical_reach: 96.0,
        }
    }
}

impl EnemyConfig {
    /// Clamp values into their valid ranges.
    pub fn sanitized(mut self) -> Self {
        self.health = self.health.max(1);
        self.move_speed = self.move_speed.max(0.0);
        self.detection_range = self.detection_range.max(0.0);
        self.attack_range = self.attack_range.max(0.0);
        self.attack_cooldown = self.attack_cooldown.max(0.0);
        self.knockback_resistance = self.knockback_resistance.clamp(0.0, 1.0);
        self.attack_knockback = self.attack_knockback.max(0.0);
        self.post_attack_hold = self.post_attack_hold.max(0.0);
        self.patrol_range = self.patrol_range.max(0.0);
        self.vertical_reach = self.vertical_reach.max(0.0);
        self
    }

    /// Range beyond which a chased target is dropped.
    pub fn lose_range(&self) -> f32 {
        self.detection_range * 1.5
    }
}

/// Projectile fired by ranged archetypes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectileProfile {
    pub speed: f32,
    pub damage: u32,
    pub knockback: f32,
    pub lifetime: f32,
    /// Radians per second; `None` flies straight
    pub guided_turn_rate: Option<f32>,
}

impl Default for ProjectileProfile {
    fn default() -> Self {
        Self {
            speed: 260.0,
            damage: 1,
            knockback: 200.0,
            lifetime: 3.0,
            guided_turn_rate: None,
        }
    }
}

/// Archetype selection plus archetype-specific parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub enum ArchetypeDef {
    #[default]
    Walker,
    Flyer,
    Spitter {
        windup: f32,
        recoil_time: f32,
        recoil_speed: f32,
        projectile: ProjectileProfile,
    },
    Blinker {
        trigger_distance: f32,
        blink_distance: f32,
        blink_cooldown: f32,
        bolt: Option<ProjectileProfile>,
    },
    Shieldbearer {
        block_half_angle_deg: f32,
        windup: f32,
    },
    Wraith {
        tangible_time: f32,
        intangible_time: f32,
    },
    Grappler {
        escape_attempts: u32,
        carry_time: f32,
        squeeze_interval: f32,
        squeeze_damage: u32,
        throw_force: f32,
    },
}

impl ArchetypeDef {
    pub fn label(&self) -> &'static str {
        match self {
            ArchetypeDef::Walker => "walker",
            ArchetypeDef::Flyer => "flyer",
            ArchetypeDef::Spitter { .. } => "spitter",
            ArchetypeDef::Blinker { .. } => "blinker",
            ArchetypeDef::Shieldbearer { .. } => "shieldbearer",
            ArchetypeDef::Wraith { .. } => "wraith",
            ArchetypeDef::Grappler { .. } => "grappler",
        }
    }

    /// Build the behavior object for one enemy instance.
    pub fn build(&self) -> Box<dyn EnemyBehavior> {
        match self {
            ArchetypeDef::Walker => Box::new(Walker),
            ArchetypeDef::Flyer => Box::new(Flyer),
            ArchetypeDef::Spitter {
                windup,
                recoil_time,
                recoil_speed,
                projectile,
            } => Box::new(Spitter::new(
                *windup,
                *recoil_time,
                *recoil_speed,
                projectile.clone(),
            )),
            ArchetypeDef::Blinker {
                trigger_distance,
                blink_distance,
                blink_cooldown,
                bolt,
            } => Box::new(Blinker::new(
                *trigger_distance,
                *blink_distance,
                *blink_cooldown,
                bolt.clone(),
            )),
            ArchetypeDef::Shieldbearer {
                block_half_angle_deg,
                windup,
            } => Box::new(Shieldbearer::new(*block_half_angle_deg, *windup)),
            ArchetypeDef::Wraith {
                tangible_time,
                intangible_time,
            } => Box::new(Wraith::new(*tangible_time, *intangible_time)),
            ArchetypeDef::Grappler {
                escape_attempts,
                carry_time,
                squeeze_interval,
                squeeze_damage,
                throw_force,
            } => Box::new(Grappler::new(
                *escape_attempts,
                *carry_time,
                *squeeze_interval,
                *squeeze_damage,
                *throw_force,
            )),
        }
    }
}
