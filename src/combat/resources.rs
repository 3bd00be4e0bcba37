//! Combat domain: run-wide combat bookkeeping.

use bevy::prelude::*;

/// Tallies kills and score from death and defeat notifications.
#[derive(Resource, Debug, Default)]
pub struct CombatLedger {
    pub enemies_defeated: u32,
    pub bosses_defeated: u32,
    pub score: u64,
    pub player_hits_taken: u32,
    pub projectiles_parried: u32,
}

impl CombatLedger {
    pub fn record_kill(&mut self, score: u32) {
        self.enemies_defeated += 1;
        self.score += u64::from(score);
    }

    pub fn record_boss(&mut self, score: u32) {
        self.bosses_defeated += 1;
        self.score += u64::from(score);
    }

    pub fn summary(&self) -> String {
        format!(
            "CombatLedger:\n\
             - Enemies defeated: {}\n\
             - Bosses defeated: {}\n\
             - Score: {}\n\
             - Player hits taken: {}\n\
             - Projectiles parried: {}",
            self.enemies_defeated,
            self.bosses_defeated,
            self.score,
            self.player_hits_taken,
            self.projectiles_parried,
        )
    }
}
