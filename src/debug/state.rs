//! Debug domain: state and command definitions for debug tooling.

use bevy::ecs::message::Message;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::boss::BossState;
use crate::combat::EntityState;

/// Last observed state per entity; reports only changes.
#[derive(Debug)]
pub struct StateLog<S> {
    seen: HashMap<Entity, S>,
}

impl<S> Default for StateLog<S> {
    fn default() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }
}

impl<S: Copy + PartialEq> StateLog<S> {
    /// Record `state`. Returns `(previous, current)` when it differs from the
    /// last observation; the first sighting has no previous state.
    pub fn observe(&mut self, entity: Entity, state: S) -> Option<(Option<S>, S)> {
        let previous = self.seen.insert(entity, state);
        if previous == Some(state) {
            None
        } else {
            Some((previous, state))
        }
    }

    /// Drop entities that no longer exist.
    pub fn retain(&mut self, mut alive: impl FnMut(Entity) -> bool) {
        self.seen.retain(|entity, _| alive(*entity));
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Resource tracking debug mode state
#[derive(Resource, Debug)]
pub struct DebugState {
    /// Log every enemy and boss state change
    pub trace_states: bool,
    pub enemy_states: StateLog<EntityState>,
    pub boss_states: StateLog<BossState>,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            trace_states: true,
            enemy_states: StateLog::default(),
            boss_states: StateLog::default(),
        }
    }
}

/// Actions a developer console or test harness can trigger
#[derive(Debug, Clone, PartialEq)]
pub enum DebugCommand {
    SpawnEnemy { kind: String, position: Vec2 },
    SpawnBoss { kind: String, position: Vec2 },
    /// Jump a boss straight into a phase, running the normal transition
    ForcePhase { boss: Entity, index: usize },
    /// Deal lethal damage to every live enemy
    KillEnemies,
}

impl Message for DebugCommand {}
