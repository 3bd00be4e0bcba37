//! Enemy and boss combat simulation for a 2D action platformer.
//!
//! The crate owns enemy behavior, boss encounters, attack patterns and
//! projectiles. Player locomotion, rendering and input stay with the host;
//! the two sides meet through the messages in [`core`].

pub mod boss;
pub mod combat;
pub mod content;
pub mod core;
#[cfg(feature = "dev-tools")]
pub mod debug;
pub mod enemies;
pub mod patterns;
pub mod physics;
pub mod projectiles;

use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

/// Every combat plugin except the physics bridge.
///
/// Hosts running avian2d add `physics::PhysicsBridgePlugin` next to
/// `PhysicsPlugins`; without it, movement is applied to `Transform` directly.
pub struct CombatCorePlugins;

impl PluginGroup for CombatCorePlugins {
    fn build(self) -> PluginGroupBuilder {
        let group = PluginGroupBuilder::start::<Self>()
            .add(core::CorePlugin)
            .add(content::ContentPlugin)
            .add(combat::CombatPlugin)
            .add(enemies::EnemiesPlugin)
            .add(boss::BossPlugin)
            .add(projectiles::ProjectilesPlugin);
        #[cfg(feature = "dev-tools")]
        let group = group.add(debug::DebugPlugin);
        group
    }
}
