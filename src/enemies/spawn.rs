//! Enemies domain: spawn bundle and factory helpers.

use bevy::prelude::*;

use crate::combat::{
    ArenaBounds, BodySize, Combatant, LedgeProbe, LevelGeometry, SummonedBy, Team,
};
use crate::content::EnemyDef;
use crate::enemies::engine::EnemyEngine;
use crate::enemies::patrol::{PatrolPath, PatrolRoute};
use crate::enemies::runtime::EnemyRuntime;

/// Marks an entity driven by an `EnemyEngine`
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

#[derive(Bundle)]
pub struct EnemyBundle {
    pub enemy: Enemy,
    pub combatant: Combatant,
    pub team: Team,
    pub engine: EnemyEngine,
    pub body: BodySize,
    pub probe: LedgeProbe,
    pub transform: Transform,
}

impl EnemyBundle {
    pub fn new(entity: Entity, def: &EnemyDef, position: Vec2, patrol: PatrolPath) -> Self {
        let config = def.config.clone().sanitized();
        let route = PatrolRoute::from_path(patrol, position, config.patrol_range);
        let runtime = EnemyRuntime::new(entity, def.id.clone(), config.health, position, route);
        Self {
            enemy: Enemy,
            combatant: Combatant,
            team: Team::Enemy,
            engine: EnemyEngine::new(config, def.archetype.build(), runtime),
            body: BodySize(def.body_size()),
            probe: LedgeProbe::default(),
            transform: Transform::from_xyz(position.x, position.y, 0.0),
        }
    }
}

/// Spawn one enemy from its content definition.
pub fn spawn_enemy(commands: &mut Commands, def: &EnemyDef, position: Vec2, patrol: PatrolPath) -> Entity {
    let entity = commands.spawn_empty().id();
    commands
        .entity(entity)
        .insert(EnemyBundle::new(entity, def, position, patrol));
    debug!(
        "Spawned enemy '{}' ({}) at {:?} as {:?}",
        def.id,
        def.archetype.label(),
        position,
        entity
    );
    entity
}

/// Positions for `count` minions centered on `origin`, `spacing` apart, kept
/// inside the arena.
pub fn minion_positions(origin: Vec2, count: u32, spacing: f32, bounds: &ArenaBounds) -> Vec<Vec2> {
    let half = (count.saturating_sub(1)) as f32 * 0.5;
    (0..count)
        .map(|i| {
            let offset = (i as f32 - half) * spacing;
            bounds.clamp(origin + Vec2::new(offset, 0.0))
        })
        .collect()
}

/// Spawn a summoned minion linked to its summoner.
pub fn spawn_minion(
    commands: &mut Commands,
    def: &EnemyDef,
    position: Vec2,
    summoner: Option<Entity>,
) -> Entity {
    let entity = spawn_enemy(commands, def, position, PatrolPath::default());
    if let Some(summoner) = summoner {
        commands.entity(entity).insert(SummonedBy(summoner));
    }
    entity
}
