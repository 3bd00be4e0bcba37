//! Data definitions for the RON content files.
//!
//! These structs mirror assets/data/*.ron and are used for deserialization.
//! The ContentRegistry provides lookup by id.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boss::{BossConfig, BossPhase, PhaseTable, ScriptDef, SelectionPolicy};
use crate::enemies::{ArchetypeDef, EnemyConfig};
use crate::patterns::{AttackPattern, PatternKind};

// ============================================================================
// Common wrapper for RON files with schema_version and items
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

fn default_body_size() -> [f32; 2] {
    [28.0, 28.0]
}

fn default_boss_body_size() -> [f32; 2] {
    [64.0, 80.0]
}

fn default_speed_scale() -> f32 {
    1.0
}

// ============================================================================
// Enemies (enemies.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub archetype: ArchetypeDef,
    #[serde(default)]
    pub config: EnemyConfig,
    #[serde(default = "default_body_size")]
    pub body_size: [f32; 2],
}

impl EnemyDef {
    pub fn new(id: impl Into<String>, archetype: ArchetypeDef, config: EnemyConfig) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            archetype,
            config,
            body_size: default_body_size(),
        }
    }

    pub fn body_size(&self) -> Vec2 {
        Vec2::from_array(self.body_size)
    }
}

// ============================================================================
// Bosses (bosses.ron)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PatternDef {
    pub name: String,
    pub cooldown: f32,
    pub kind: PatternKind,
}

impl PatternDef {
    pub fn build(&self) -> AttackPattern {
        AttackPattern::new(self.name.clone(), self.cooldown, self.kind.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PhaseDef {
    pub name: String,
    pub health_threshold: f32,
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f32,
    pub patterns: Vec<PatternDef>,
}

impl PhaseDef {
    pub fn build(&self) -> BossPhase {
        BossPhase::new(
            self.name.clone(),
            self.health_threshold,
            self.patterns.iter().map(PatternDef::build).collect(),
        )
        .with_selection(self.selection)
        .with_speed_scale(self.speed_scale)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BossDef {
    pub id: String,
    #[serde(default)]
    pub config: BossConfig,
    pub phases: Vec<PhaseDef>,
    #[serde(default)]
    pub script: ScriptDef,
    #[serde(default = "default_boss_body_size")]
    pub body_size: [f32; 2],
}

impl BossDef {
    pub fn phase_table(&self) -> PhaseTable {
        PhaseTable::new(self.phases.iter().map(PhaseDef::build).collect())
    }

    pub fn body_size(&self) -> Vec2 {
        Vec2::from_array(self.body_size)
    }

    pub fn script_label(&self) -> &'static str {
        match self.script {
            ScriptDef::Standard => "standard",
            ScriptDef::Summoner { .. } => "summoner",
            ScriptDef::Berserk { .. } => "berserk",
        }
    }
}
