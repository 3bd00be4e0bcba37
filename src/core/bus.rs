//! Core domain: the combat event bus handed to every engine.
//!
//! Engines never reach for global state. They receive a `&mut dyn CombatEventBus`
//! and report what happened through it; the dispatcher turns the buffered
//! notifications into Bevy messages and entity spawns at the end of the tick.

use bevy::prelude::*;

use crate::combat::HitInfo;
use crate::projectiles::ProjectileSpec;

/// A combatant died. Carries the score for the scoring collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathNotice {
    pub entity: Entity,
    pub score: u32,
    pub archetype: String,
    pub position: Vec2,
}

/// Ask the entity factory to create `count` instances of `kind` around `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub requester: Option<Entity>,
    pub kind: String,
    pub count: u32,
    pub position: Vec2,
    pub spacing: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorSignal {
    Lock(String),
    Unlock(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BossNotice {
    EncounterStarted { boss: Entity, name: String },
    TransitionStarted { boss: Entity, from: usize, to: usize },
    PhaseChanged { boss: Entity, from: usize, to: usize },
    VulnerabilityOpened { boss: Entity, duration: f32 },
    DefeatStarted { boss: Entity },
    DefeatStage { boss: Entity, stage: String },
    Defeated { boss: Entity, score: u32, unlocks: Vec<String> },
}

/// Warning indicator for a frozen area-denial strike.
#[derive(Debug, Clone, PartialEq)]
pub struct Telegraph {
    pub owner: Entity,
    pub position: Vec2,
    pub radius: f32,
    pub duration: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GrabNotice {
    Grabbed { grabber: Entity, target: Entity },
    Carried { grabber: Entity, target: Entity, position: Vec2 },
    Released { grabber: Entity, target: Entity, escaped: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CombatOutbound {
    Death(DeathNotice),
    TargetHit { target: Entity, hit: HitInfo },
    TargetBounced { target: Entity, impulse: f32 },
    Spawn(SpawnRequest),
    Projectile(ProjectileSpec),
    Door(DoorSignal),
    Boss(BossNotice),
    Telegraph(Telegraph),
    Grab(GrabNotice),
    Parried { projectile: Entity, by: Entity },
}

/// Narrow outbound interface for engines.
pub trait CombatEventBus {
    fn emit(&mut self, event: CombatOutbound);

    fn report_death(&mut self, notice: DeathNotice) {
        self.emit(CombatOutbound::Death(notice));
    }

    fn hit_target(&mut self, target: Entity, hit: HitInfo) {
        self.emit(CombatOutbound::TargetHit { target, hit });
    }

    fn bounce_target(&mut self, target: Entity, impulse: f32) {
        self.emit(CombatOutbound::TargetBounced { target, impulse });
    }

    fn request_spawn(&mut self, request: SpawnRequest) {
        self.emit(CombatOutbound::Spawn(request));
    }

    fn spawn_projectile(&mut self, spec: ProjectileSpec) {
        self.emit(CombatOutbound::Projectile(spec));
    }

    fn notify_door(&mut self, signal: DoorSignal) {
        self.emit(CombatOutbound::Door(signal));
    }

    fn notify_boss(&mut self, notice: BossNotice) {
        self.emit(CombatOutbound::Boss(notice));
    }

    fn show_telegraph(&mut self, telegraph: Telegraph) {
        self.emit(CombatOutbound::Telegraph(telegraph));
    }

    fn notify_grab(&mut self, notice: GrabNotice) {
        self.emit(CombatOutbound::Grab(notice));
    }
}

/// Buffered bus drained once per tick by the dispatcher.
#[derive(Resource, Debug, Default)]
pub struct CombatOutbox {
    pending: Vec<CombatOutbound>,
}

impl CombatOutbox {
    pub fn pending(&self) -> &[CombatOutbound] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<CombatOutbound> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn deaths(&self) -> impl Iterator<Item = &DeathNotice> {
        self.pending.iter().filter_map(|event| match event {
            CombatOutbound::Death(notice) => Some(notice),
            _ => None,
        })
    }

    pub fn hits(&self) -> impl Iterator<Item = (Entity, &HitInfo)> {
        self.pending.iter().filter_map(|event| match event {
            CombatOutbound::TargetHit { target, hit } => Some((*target, hit)),
            _ => None,
        })
    }

    pub fn boss_notices(&self) -> impl Iterator<Item = &BossNotice> {
        self.pending.iter().filter_map(|event| match event {
            CombatOutbound::Boss(notice) => Some(notice),
            _ => None,
        })
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &ProjectileSpec> {
        self.pending.iter().filter_map(|event| match event {
            CombatOutbound::Projectile(spec) => Some(spec),
            _ => None,
        })
    }
}

impl CombatEventBus for CombatOutbox {
    fn emit(&mut self, event: CombatOutbound) {
        self.pending.push(event);
    }
}
