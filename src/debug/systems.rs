//! Debug domain: state tracing and debug command handling.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::boss::{BossEngine, spawn_boss};
use crate::combat::HitInfo;
use crate::content::ContentRegistry;
use crate::core::{CombatOutbox, DamageEvent, RunConfig};
use crate::debug::state::{DebugCommand, DebugState};
use crate::enemies::{EnemyEngine, PatrolPath, spawn_enemy};

pub(crate) fn trace_state_changes(
    mut debug_state: ResMut<DebugState>,
    enemies: Query<(Entity, &EnemyEngine)>,
    bosses: Query<(Entity, &BossEngine)>,
) {
    if !debug_state.trace_states {
        return;
    }
    let state = &mut *debug_state;

    for (entity, engine) in &enemies {
        if let Some((from, to)) = state.enemy_states.observe(entity, engine.state()) {
            match from {
                Some(from) => debug!(
                    "[DEBUG] Enemy {:?} '{}': {:?} -> {:?} (hp {})",
                    entity,
                    engine.runtime.kind,
                    from,
                    to,
                    engine.health()
                ),
                None => debug!("[DEBUG] Enemy {:?} '{}' starts {:?}", entity, engine.runtime.kind, to),
            }
        }
    }
    for (entity, boss) in &bosses {
        if let Some((from, to)) = state.boss_states.observe(entity, boss.state()) {
            debug!(
                "[DEBUG] Boss {:?} '{}': {:?} -> {:?} (phase {}, hp {})",
                entity,
                boss.config().name,
                from,
                to,
                boss.phase_index(),
                boss.health()
            );
        }
    }

    state.enemy_states.retain(|e| enemies.contains(e));
    state.boss_states.retain(|e| bosses.contains(e));
}

pub(crate) fn handle_debug_commands(
    mut commands: Commands,
    mut requests: MessageReader<DebugCommand>,
    mut damage: MessageWriter<DamageEvent>,
    mut outbox: ResMut<CombatOutbox>,
    registry: Option<Res<ContentRegistry>>,
    run: Res<RunConfig>,
    enemies: Query<(Entity, &EnemyEngine)>,
    mut bosses: Query<&mut BossEngine>,
) {
    for request in requests.read() {
        match request {
            DebugCommand::SpawnEnemy { kind, position } => {
                match registry.as_ref().and_then(|r| r.enemies.get(kind)) {
                    Some(def) => {
                        let entity = spawn_enemy(&mut commands, def, *position, PatrolPath::default());
                        info!("[DEBUG] Spawned enemy '{}' as {:?}", kind, entity);
                    }
                    None => warn!("[DEBUG] Unknown enemy kind '{}'", kind),
                }
            }
            DebugCommand::SpawnBoss { kind, position } => {
                match registry.as_ref().and_then(|r| r.bosses.get(kind)) {
                    Some(def) => {
                        let entity = spawn_boss(&mut commands, def, *position, run.seed);
                        info!("[DEBUG] Spawned boss '{}' as {:?}", kind, entity);
                    }
                    None => warn!("[DEBUG] Unknown boss kind '{}'", kind),
                }
            }
            DebugCommand::ForcePhase { boss, index } => {
                let Ok(mut engine) = bosses.get_mut(*boss) else {
                    warn!("[DEBUG] {:?} is not a boss", boss);
                    continue;
                };
                let result = engine.force_phase(*index, &mut *outbox);
                info!("[DEBUG] Force phase {} on {:?}: {:?}", index, boss, result);
            }
            DebugCommand::KillEnemies => {
                let mut count = 0;
                for (entity, engine) in &enemies {
                    if engine.is_dead() {
                        continue;
                    }
                    damage.write(DamageEvent {
                        target: entity,
                        hit: HitInfo::lethal(None),
                    });
                    count += 1;
                }
                info!("[DEBUG] Killing {} enemies", count);
            }
        }
    }
}
