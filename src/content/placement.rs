//! Level placement files (JSON): where enemies and bosses start, and the
//! playable bounds of the level.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::loader::ContentLoadError;
use super::registry::ContentRegistry;
use crate::boss::spawn_boss;
use crate::combat::ArenaBounds;
use crate::enemies::{PatrolMode, PatrolPath, spawn_enemy};

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct PatrolPlacement {
    #[serde(default)]
    pub mode: PatrolMode,
    #[serde(default)]
    pub points: Vec<[f32; 2]>,
}

impl PatrolPlacement {
    pub fn to_path(&self) -> PatrolPath {
        PatrolPath::new(
            self.points.iter().copied().map(Vec2::from_array).collect(),
            self.mode,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnemyPlacement {
    pub kind: String,
    pub position: [f32; 2],
    #[serde(default)]
    pub patrol: PatrolPlacement,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BossPlacement {
    pub kind: String,
    pub position: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BoundsPlacement {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LevelPlacement {
    #[serde(default)]
    pub bounds: Option<BoundsPlacement>,
    #[serde(default)]
    pub enemies: Vec<EnemyPlacement>,
    #[serde(default)]
    pub bosses: Vec<BossPlacement>,
}

impl LevelPlacement {
    pub fn arena_bounds(&self) -> Option<ArenaBounds> {
        self.bounds
            .map(|b| ArenaBounds::new(Vec2::from_array(b.min), Vec2::from_array(b.max)))
    }
}

pub fn parse_level_placement(file_name: &str, contents: &str) -> Result<LevelPlacement, ContentLoadError> {
    serde_json::from_str(contents).map_err(|e| ContentLoadError {
        file: file_name.to_string(),
        message: format!("Parse error: {}", e),
    })
}

pub fn load_level_placement(path: &Path) -> Result<LevelPlacement, ContentLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })?;
    parse_level_placement(&path.display().to_string(), &contents)
}

/// Entities created for one level.
#[derive(Debug, Clone, Default)]
pub struct SpawnedLevel {
    pub enemies: Vec<Entity>,
    pub bosses: Vec<Entity>,
}

/// Spawn everything a placement names. Unknown kinds are skipped with a warning.
pub fn spawn_level(
    commands: &mut Commands,
    registry: &ContentRegistry,
    placement: &LevelPlacement,
    run_seed: u64,
) -> SpawnedLevel {
    let mut spawned = SpawnedLevel::default();

    if let Some(bounds) = placement.arena_bounds() {
        commands.insert_resource(bounds);
    }

    for enemy in &placement.enemies {
        let Some(def) = registry.enemies.get(&enemy.kind) else {
            warn!("Level places unknown enemy kind '{}'", enemy.kind);
            continue;
        };
        spawned.enemies.push(spawn_enemy(
            commands,
            def,
            Vec2::from_array(enemy.position),
            enemy.patrol.to_path(),
        ));
    }

    for boss in &placement.bosses {
        let Some(def) = registry.bosses.get(&boss.kind) else {
            warn!("Level places unknown boss kind '{}'", boss.kind);
            continue;
        };
        spawned.bosses.push(spawn_boss(
            commands,
            def,
            Vec2::from_array(boss.position),
            run_seed,
        ));
    }

    info!(
        "Level spawned: {} enemies, {} bosses",
        spawned.enemies.len(),
        spawned.bosses.len()
    );
    spawned
}
