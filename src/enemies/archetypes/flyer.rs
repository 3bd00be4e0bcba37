//! Enemies domain: airborne pursuer.

use crate::combat::TargetView;
use crate::enemies::behavior::{Archetype, EnemyBehavior};
use crate::enemies::config::EnemyConfig;
use crate::enemies::runtime::EnemyRuntime;

/// Airborne melee enemy. Moves freely in both axes and sees in every direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flyer;

impl EnemyBehavior for Flyer {
    fn archetype(&self) -> Archetype {
        Archetype::Flyer
    }

    fn planar(&self) -> bool {
        true
    }

    fn can_perceive(&self, _me: &EnemyRuntime, _config: &EnemyConfig, _target: &TargetView) -> bool {
        true
    }
}
