//! ContentRegistry resource providing HashMap lookups for loaded content.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::*;

/// Central registry for all loaded combat content, keyed by id.
#[derive(Resource, Debug, Default)]
pub struct ContentRegistry {
    pub enemies: HashMap<String, EnemyDef>,
    pub bosses: HashMap<String, BossDef>,
}

impl ContentRegistry {
    pub fn insert_enemy(&mut self, def: EnemyDef) {
        self.enemies.insert(def.id.clone(), def);
    }

    pub fn insert_boss(&mut self, def: BossDef) {
        self.bosses.insert(def.id.clone(), def);
    }

    /// Returns a summary of loaded content counts for logging.
    pub fn summary(&self) -> String {
        let patterns: usize = self
            .bosses
            .values()
            .flat_map(|boss| boss.phases.iter())
            .map(|phase| phase.patterns.len())
            .sum();
        format!(
            "ContentRegistry loaded:\n\
             - Enemies: {}\n\
             - Bosses: {}\n\
             - Boss patterns: {}",
            self.enemies.len(),
            self.bosses.len(),
            patterns,
        )
    }
}
