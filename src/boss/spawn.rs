//! Boss domain: spawn bundle.

use bevy::prelude::*;

use crate::boss::engine::BossEngine;
use crate::combat::{BodySize, Combatant, Team};
use crate::content::BossDef;

/// Marks an entity driven by a `BossEngine`
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Boss;

#[derive(Bundle)]
pub struct BossBundle {
    pub boss: Boss,
    pub combatant: Combatant,
    pub team: Team,
    pub engine: BossEngine,
    pub body: BodySize,
    pub transform: Transform,
}

impl BossBundle {
    pub fn new(entity: Entity, def: &BossDef, position: Vec2, run_seed: u64) -> Self {
        let seed = run_seed ^ entity.to_bits();
        Self {
            boss: Boss,
            combatant: Combatant,
            team: Team::Enemy,
            engine: BossEngine::new(
                entity,
                def.config.clone(),
                def.phase_table(),
                def.script.build(),
                seed,
                position,
            ),
            body: BodySize(def.body_size()),
            transform: Transform::from_xyz(position.x, position.y, 0.0),
        }
    }
}

pub fn spawn_boss(commands: &mut Commands, def: &BossDef, position: Vec2, run_seed: u64) -> Entity {
    let entity = commands.spawn_empty().id();
    commands
        .entity(entity)
        .insert(BossBundle::new(entity, def, position, run_seed));
    info!(
        "Spawned boss '{}' ({} phases, {} script) at {:?}",
        def.id,
        def.phases.len(),
        def.script_label(),
        position
    );
    entity
}
