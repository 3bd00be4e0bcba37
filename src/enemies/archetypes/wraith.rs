//! Enemies domain: intangibility cycle.

use crate::combat::{HitInfo, TargetView};
use crate::core::Countdown;
use crate::enemies::behavior::{Archetype, BehaviorControl, DamageVerdict, EnemyBehavior, EnemyContext};
use crate::enemies::config::EnemyConfig;
use crate::enemies::runtime::EnemyRuntime;

/// Floating enemy that phases in and out of tangibility. While intangible it
/// cannot be hit, touched or attack.
#[derive(Debug, Clone)]
pub struct Wraith {
    tangible_time: f32,
    intangible_time: f32,
    phase: Countdown,
    intangible: bool,
}

impl Wraith {
    pub fn new(tangible_time: f32, intangible_time: f32) -> Self {
        let tangible_time = tangible_time.max(0.05);
        Self {
            tangible_time,
            intangible_time: intangible_time.max(0.05),
            phase: Countdown::new(tangible_time),
            intangible: false,
        }
    }

    pub fn intangible(&self) -> bool {
        self.intangible
    }
}

impl EnemyBehavior for Wraith {
    fn archetype(&self) -> Archetype {
        Archetype::Wraith
    }

    fn planar(&self) -> bool {
        true
    }

    fn can_perceive(&self, _me: &EnemyRuntime, _config: &EnemyConfig, _target: &TargetView) -> bool {
        true
    }

    fn pre_tick(
        &mut self,
        dt: f32,
        _me: &mut EnemyRuntime,
        _config: &EnemyConfig,
        _ctx: &mut EnemyContext,
    ) -> BehaviorControl {
        if self.phase.tick(dt) {
            self.intangible = !self.intangible;
            let next = if self.intangible {
                self.intangible_time
            } else {
                self.tangible_time
            };
            self.phase.start(next);
        }
        BehaviorControl::Continue
    }

    fn can_attack(&self, _me: &EnemyRuntime) -> bool {
        !self.intangible
    }

    fn screen_damage(&self, _me: &EnemyRuntime, _config: &EnemyConfig, _hit: &HitInfo) -> DamageVerdict {
        if self.intangible {
            DamageVerdict::Ignored
        } else {
            DamageVerdict::Accept
        }
    }

    fn is_tangible(&self, _me: &EnemyRuntime) -> bool {
        !self.intangible
    }
}
