//! Content domain: RON definitions for enemies and bosses, tuning, and JSON
//! level placement, loaded once at startup.

mod data;
mod loader;
mod placement;
mod registry;
mod validation;

#[cfg(test)]
mod tests;

pub use data::{BossDef, DataFile, EnemyDef, PatternDef, PhaseDef};
pub use loader::{ContentLoadError, load_all_content, parse_data_file};
pub use placement::{
    BossPlacement, BoundsPlacement, EnemyPlacement, LevelPlacement, PatrolPlacement,
    SpawnedLevel, load_level_placement, parse_level_placement, spawn_level,
};
pub use registry::ContentRegistry;
pub use validation::{ValidationError, ValidationProblem, validate_content};

use bevy::prelude::*;
use std::path::PathBuf;

use crate::core::RunConfig;

/// Where the startup loader looks for content.
#[derive(Resource, Debug, Clone)]
pub struct ContentPaths {
    /// Directory holding enemies.ron, bosses.ron and combat_tuning.ron
    pub data_dir: PathBuf,
    /// Optional level placement to spawn after loading
    pub level: Option<PathBuf>,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            level: None,
        }
    }
}

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentPaths>()
            .init_resource::<ContentRegistry>()
            .add_systems(Startup, (load_content, spawn_level_from_paths).chain());
    }
}

fn load_content(mut commands: Commands, paths: Res<ContentPaths>) {
    match load_all_content(&paths.data_dir) {
        Ok((registry, tuning)) => {
            info!("{}", registry.summary());
            for error in validate_content(&registry) {
                error!("Content validation: {}", error);
            }
            commands.insert_resource(registry);
            commands.insert_resource(tuning);
        }
        Err(errors) => {
            for e in &errors {
                error!("{}", e);
            }
            warn!(
                "Content failed to load from {}; combat runs with no definitions",
                paths.data_dir.display()
            );
        }
    }
}

fn spawn_level_from_paths(
    mut commands: Commands,
    paths: Res<ContentPaths>,
    registry: Res<ContentRegistry>,
    run: Res<RunConfig>,
) {
    let Some(level) = &paths.level else {
        return;
    };
    match load_level_placement(level) {
        Ok(placement) => {
            spawn_level(&mut commands, &registry, &placement, run.seed);
        }
        Err(e) => error!("{}", e),
    }
}
