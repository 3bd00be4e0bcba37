//! Enemies domain: mutable per-instance state.

use bevy::prelude::*;

use crate::combat::{EntityState, Facing};
use crate::core::Countdown;
use crate::enemies::config::ProjectileProfile;
use crate::enemies::patrol::PatrolRoute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStage {
    Windup,
    Strike,
    Recover,
}

/// What a strike delivers.
#[derive(Debug, Clone, PartialEq)]
pub enum AttackPayload {
    /// Melee hit-test against the target
    Contact,
    /// Fire one projectile at the target
    Projectile(ProjectileProfile),
    /// Seize the target
    Grab,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackProfile {
    pub windup: f32,
    pub recover: f32,
    pub payload: AttackPayload,
}

impl AttackProfile {
    pub fn contact(recover: f32) -> Self {
        Self {
            windup: 0.0,
            recover,
            payload: AttackPayload::Contact,
        }
    }
}

/// One in-flight enemy attack: windup, strike, recover.
#[derive(Debug, Clone)]
pub struct AttackCycle {
    pub profile: AttackProfile,
    pub stage: AttackStage,
    pub timer: Countdown,
    pub target: Entity,
}

impl AttackCycle {
    pub fn new(profile: AttackProfile, target: Entity) -> Self {
        let timer = Countdown::new(profile.windup);
        Self {
            profile,
            stage: AttackStage::Windup,
            timer,
            target,
        }
    }
}

/// Mutable state of one enemy. Created on spawn, dropped on removal.
#[derive(Debug, Clone)]
pub struct EnemyRuntime {
    pub id: Entity,
    /// Content id of the enemy definition
    pub kind: String,
    pub health: u32,
    pub position: Vec2,
    /// Desired velocity for this tick, handed to the motion integrator
    pub velocity: Vec2,
    pub facing: Facing,
    /// Weak reference; re-resolved every tick
    pub target: Option<Entity>,
    pub patrol: PatrolRoute,
    pub attack_cooldown: Countdown,
    pub hurt_timer: Countdown,
    pub attack: Option<AttackCycle>,
    /// Residual horizontal knockback velocity
    pub knockback: f32,
    pub collision_enabled: bool,
    /// State to return to once `Hurt` elapses
    pub resume_state: EntityState,
    teleport: Option<Vec2>,
}

impl EnemyRuntime {
    pub fn new(id: Entity, kind: impl Into<String>, health: u32, position: Vec2, patrol: PatrolRoute) -> Self {
        Self {
            id,
            kind: kind.into(),
            health,
            position,
            velocity: Vec2::ZERO,
            facing: Facing::default(),
            target: None,
            patrol,
            attack_cooldown: Countdown::default(),
            hurt_timer: Countdown::default(),
            attack: None,
            knockback: 0.0,
            collision_enabled: true,
            resume_state: EntityState::Patrol,
            teleport: None,
        }
    }

    /// Relocate instantly. The motion owner picks it up via `take_teleport`.
    pub fn teleport_to(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.teleport = Some(position);
    }

    pub fn take_teleport(&mut self) -> Option<Vec2> {
        self.teleport.take()
    }

    pub fn face_toward(&mut self, point: Vec2) {
        self.facing = Facing::toward(self.facing, point.x - self.position.x);
    }

    pub fn stop_timers(&mut self) {
        self.attack_cooldown.clear();
        self.hurt_timer.clear();
        self.attack = None;
    }
}
