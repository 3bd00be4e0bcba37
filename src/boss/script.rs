//! Boss domain: per-boss scripting hooks layered over the shared engine.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boss::phase::PhaseTable;
use crate::patterns::AttackPattern;

pub trait BossScript: Send + Sync + std::fmt::Debug + 'static {
    fn name(&self) -> &'static str;

    /// Gate a ready pattern before selection.
    fn allow_pattern(&self, _pattern: &AttackPattern, _live_minions: u32) -> bool {
        true
    }

    fn on_phase_enter(&mut self, _index: usize, _phases: &mut PhaseTable) {}

    fn on_phase_exit(&mut self, _index: usize) {}
}

#[derive(Debug, Clone, Default)]
pub struct StandardScript;

impl BossScript for StandardScript {
    fn name(&self) -> &'static str {
        "standard"
    }
}

/// Stops summoning while `max_minions` of its minions are alive.
#[derive(Debug, Clone)]
pub struct SummonerScript {
    pub max_minions: u32,
}

impl BossScript for SummonerScript {
    fn name(&self) -> &'static str {
        "summoner"
    }

    fn allow_pattern(&self, pattern: &AttackPattern, live_minions: u32) -> bool {
        !pattern.is_summon() || live_minions < self.max_minions
    }
}

/// Shortens every cooldown once the final phase begins.
#[derive(Debug, Clone)]
pub struct BerserkScript {
    pub cooldown_scale: f32,
    enraged: bool,
}

impl BerserkScript {
    pub fn new(cooldown_scale: f32) -> Self {
        Self {
            cooldown_scale: cooldown_scale.max(0.0),
            enraged: false,
        }
    }
}

impl BossScript for BerserkScript {
    fn name(&self) -> &'static str {
        "berserk"
    }

    fn on_phase_enter(&mut self, index: usize, phases: &mut PhaseTable) {
        if self.enraged || index + 1 != phases.len() {
            return;
        }
        self.enraged = true;
        if let Some(phase) = phases.get_mut(index) {
            for pattern in &mut phase.patterns {
                pattern.scale_cooldown(self.cooldown_scale);
            }
            debug!(
                "Berserk: '{}' cooldowns scaled by {}",
                phase.name, self.cooldown_scale
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub enum ScriptDef {
    #[default]
    Standard,
    Summoner {
        max_minions: u32,
    },
    Berserk {
        cooldown_scale: f32,
    },
}

impl ScriptDef {
    pub fn build(&self) -> Box<dyn BossScript> {
        match self {
            ScriptDef::Standard => Box::new(StandardScript),
            ScriptDef::Summoner { max_minions } => Box::new(SummonerScript {
                max_minions: *max_minions,
            }),
            ScriptDef::Berserk { cooldown_scale } => Box::new(BerserkScript::new(*cooldown_scale)),
        }
    }
}
