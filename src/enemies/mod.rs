//! Enemies domain: patrol/chase/attack engine and the seven archetypes.

pub mod archetypes;
mod behavior;
mod config;
mod engine;
mod patrol;
mod runtime;
mod spawn;
mod systems;


pub use behavior::{
    Archetype, BehaviorControl, CHASE_DEADZONE, DamageVerdict, EnemyBehavior, EnemyContext,
    STRIKE_REACH, default_strike, direction_or, ground_perception, pursuit_velocity,
};
pub use config::{ArchetypeDef, EnemyConfig, ProjectileProfile};
pub use engine::{DamageOutcome, EnemyEngine};
pub use patrol::{PatrolCursor, PatrolMode, PatrolPath, PatrolRoute};
pub use runtime::{AttackCycle, AttackPayload, AttackProfile, AttackStage, EnemyRuntime};
pub use spawn::{Enemy, EnemyBundle, minion_positions, spawn_enemy, spawn_minion};

use bevy::prelude::*;

use crate::core::CombatSet;
use systems::{
    apply_enemy_damage, forward_escape_attempts, mark_enemy_corpses, remove_corpses,
    resolve_enemy_body_contacts, spawn_requested_enemies, update_enemies,
};

pub struct EnemiesPlugin;

impl Plugin for EnemiesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                apply_enemy_damage,
                resolve_enemy_body_contacts,
                forward_escape_attempts,
            )
                .chain()
                .in_set(CombatSet::Input),
        )
        .add_systems(Update, update_enemies.in_set(CombatSet::Simulate))
        .add_systems(
            Update,
            (mark_enemy_corpses, spawn_requested_enemies).in_set(CombatSet::React),
        )
        .add_systems(Update, remove_corpses.in_set(CombatSet::Cleanup));
    }
}
