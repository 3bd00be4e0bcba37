//! Boss domain: multi-phase encounters built on attack patterns.

mod config;
mod engine;
mod phase;
mod script;
mod sequence;
mod spawn;
mod systems;

#[cfg(test)]
mod tests;

pub use config::{BossConfig, DamageGate};
pub use engine::{
    BossContext, BossDamageOutcome, BossEngine, BossState, EncounterStage, TransitionRequest,
};
pub use phase::{BossPhase, PhaseTable, SelectionPolicy};
pub use script::{BerserkScript, BossScript, ScriptDef, StandardScript, SummonerScript};
pub use sequence::{ScriptedStage, StageSequence};
pub use spawn::{Boss, BossBundle, spawn_boss};

use bevy::prelude::*;

use crate::core::CombatSet;
use systems::{
    apply_boss_damage, engage_requested_bosses, mark_boss_corpses, resolve_boss_body_contacts,
    tally_boss_minions, update_bosses,
};

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                engage_requested_bosses,
                apply_boss_damage,
                resolve_boss_body_contacts,
            )
                .chain()
                .in_set(CombatSet::Input),
        )
        .add_systems(Update, update_bosses.in_set(CombatSet::Simulate))
        .add_systems(Update, mark_boss_corpses.in_set(CombatSet::React))
        .add_systems(Update, tally_boss_minions.in_set(CombatSet::Cleanup));
    }
}
