//! Boss domain: immutable per-boss tuning.

use serde::{Deserialize, Serialize};

use crate::boss::sequence::ScriptedStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum DamageGate {
    #[default]
    Always,
    /// Hits land only while Vulnerable or while an exposing pattern is in flight
    VulnerableOnly,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BossConfig {
    pub name: String,
    pub max_health: u32,
    pub score_value: u32,
    pub contact_damage: u32,
    pub contact_knockback: f32,
    pub move_speed: f32,
    /// A target this close wakes the encounter
    pub engage_range: f32,
    /// Pause in `Idle` between patterns
    pub decision_delay: f32,
    pub damage_gate: DamageGate,
    /// Locked when the encounter starts, unlocked on defeat
    pub arena_doors: Vec<String>,
    /// Unlock ids carried by the defeat notification
    pub unlocks: Vec<String>,
    pub transition_stages: Vec<ScriptedStage>,
    pub defeat_stages: Vec<ScriptedStage>,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            name: String::from("Boss"),
            max_health: 100,
            score_value: 1000,
            contact_damage: 1,
            contact_knockback: 400.0,
            move_speed: 90.0,
            engage_range: 320.0,
            decision_delay: 0.8,
            damage_gate: DamageGate::Always,
            arena_doors: Vec::new(),
            unlocks: Vec::new(),
            transition_stages: vec![
                ScriptedStage::new("roar", 1.0),
                ScriptedStage::new("reform", 0.5),
            ],
            defeat_stages: vec![
                ScriptedStage::new("collapse", 1.0),
                ScriptedStage::new("shatter", 0.8),
                ScriptedStage::new("fade", 0.6),
            ],
        }
    }
}

impl BossConfig {
    pub fn sanitized(mut self) -> Self {
        self.max_health = self.max_health.max(1);
        self.move_speed = self.move_speed.max(0.0);
        self.engage_range = self.engage_range.max(0.0);
        self.decision_delay = self.decision_delay.max(0.0);
        self.contact_knockback = self.contact_knockback.max(0.0);
        self
    }
}
