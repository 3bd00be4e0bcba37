//! Physics domain: bridge between avian2d and the combat core.
//!
//! The core runs without physics (kinematic movement through `Transform`).
//! Hosts that add `PhysicsPlugins` also add `PhysicsBridgePlugin` to get
//! colliders, contact forwarding, ledge probes and velocity-driven movement.

mod systems;

#[cfg(test)]
mod tests;

pub use systems::{PROJECTILE_RADIUS, contact_normal, enemy_body_kind, ledge_probe_origin};

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::core::CombatSet;
use crate::physics::systems::{
    attach_boss_bodies, attach_enemy_bodies, attach_projectile_bodies, disable_dead_colliders,
    forward_collisions, probe_ledges,
};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Enemy and boss bodies
    Enemy,
    /// Player hitboxes (damage enemies)
    PlayerHitbox,
    /// Enemy and boss projectiles
    Projectile,
}

pub struct PhysicsBridgePlugin;

impl Plugin for PhysicsBridgePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                (attach_enemy_bodies, attach_boss_bodies, attach_projectile_bodies)
                    .before(CombatSet::Collisions),
                (forward_collisions, probe_ledges).in_set(CombatSet::Collisions),
                disable_dead_colliders.in_set(CombatSet::Cleanup),
            ),
        );
    }
}
