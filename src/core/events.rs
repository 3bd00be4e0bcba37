//! Core domain: messages exchanged with the collaborators around the combat core.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::combat::HitInfo;
use crate::core::bus::{DoorSignal, SpawnRequest};

// ============================================================================
// Inbound
// ============================================================================

/// A player weapon (or any external source) struck a combatant.
#[derive(Debug, Clone)]
pub struct DamageEvent {
    pub target: Entity,
    pub hit: HitInfo,
}

impl Message for DamageEvent {}

/// Collision outcome from the physics layer. `normal` points from `subject`
/// toward `other`.
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    pub subject: Entity,
    pub other: Entity,
    pub normal: Vec2,
}

impl Message for ContactEvent {}

/// The player mashed the escape input while grabbed.
#[derive(Debug, Clone, Copy)]
pub struct EscapeAttemptEvent {
    pub player: Entity,
}

impl Message for EscapeAttemptEvent {}

/// Arena trigger: start the encounter with `boss` regardless of range.
#[derive(Debug, Clone, Copy)]
pub struct EngageBossEvent {
    pub boss: Entity,
}

impl Message for EngageBossEvent {}

// ============================================================================
// Outbound
// ============================================================================

#[derive(Debug, Clone)]
pub struct EnemyDiedEvent {
    pub entity: Entity,
    pub score: u32,
    pub archetype: String,
    pub position: Vec2,
    /// Boss that summoned this enemy, if any
    pub summoner: Option<Entity>,
}

impl Message for EnemyDiedEvent {}

#[derive(Debug, Clone)]
pub struct PlayerHitEvent {
    pub target: Entity,
    pub hit: HitInfo,
}

impl Message for PlayerHitEvent {}

#[derive(Debug, Clone, Copy)]
pub struct PlayerBounceEvent {
    pub target: Entity,
    pub impulse: f32,
}

impl Message for PlayerBounceEvent {}

#[derive(Debug, Clone)]
pub struct SpawnRequestEvent {
    pub request: SpawnRequest,
}

impl Message for SpawnRequestEvent {}

#[derive(Debug, Clone)]
pub struct DoorSignalEvent {
    pub signal: DoorSignal,
}

impl Message for DoorSignalEvent {}

#[derive(Debug, Clone)]
pub struct BossEncounterEvent {
    pub boss: Entity,
    pub name: String,
}

impl Message for BossEncounterEvent {}

#[derive(Debug, Clone, Copy)]
pub struct BossPhaseChangeEvent {
    pub boss: Entity,
    pub from: usize,
    pub to: usize,
}

impl Message for BossPhaseChangeEvent {}

#[derive(Debug, Clone)]
pub struct BossDefeatedEvent {
    pub boss: Entity,
    pub score: u32,
    pub unlocks: Vec<String>,
}

impl Message for BossDefeatedEvent {}

#[derive(Debug, Clone, Copy)]
pub struct TelegraphEvent {
    pub owner: Entity,
    pub position: Vec2,
    pub radius: f32,
    pub duration: f32,
}

impl Message for TelegraphEvent {}

#[derive(Debug, Clone, Copy)]
pub struct ProjectileParriedEvent {
    pub projectile: Entity,
    pub by: Entity,
    pub position: Vec2,
}

impl Message for ProjectileParriedEvent {}

#[derive(Debug, Clone, Copy)]
pub enum GrabEvent {
    Grabbed { grabber: Entity, target: Entity },
    Carried { grabber: Entity, target: Entity, position: Vec2 },
    Released { grabber: Entity, target: Entity, escaped: bool },
}

impl Message for GrabEvent {}

/// Scripted beats of a boss fight for cutscene and effects collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum BossCue {
    TransitionStarted { from: usize, to: usize },
    VulnerabilityOpened { duration: f32 },
    DefeatStarted,
    DefeatStage { stage: String },
}

#[derive(Debug, Clone)]
pub struct BossCueEvent {
    pub boss: Entity,
    pub cue: BossCue,
}

impl Message for BossCueEvent {}
