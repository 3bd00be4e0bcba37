//! Enemies domain: the baseline ground enemy.

use crate::enemies::behavior::{Archetype, EnemyBehavior};

/// Ground melee enemy. Runs the shared contract unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Walker;

impl EnemyBehavior for Walker {
    fn archetype(&self) -> Archetype {
        Archetype::Walker
    }
}
