//! Projectiles domain: straight and guided shots fired by enemies and bosses.

mod projectile;
mod systems;


pub use projectile::{
    Projectile, ProjectileContact, ProjectileMotion, ProjectileOutcome, ProjectileSpec,
};
pub use systems::{ProjectileBundle, ProjectileDespawned, spawn_projectile};

use bevy::prelude::*;

use crate::core::CombatSet;
use systems::{
    cleanup_projectiles, destroy_orphaned_projectiles, fly_projectiles, log_parries,
    resolve_projectile_contacts,
};

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ProjectileDespawned>()
            .add_systems(Update, resolve_projectile_contacts.in_set(CombatSet::Input))
            .add_systems(Update, fly_projectiles.in_set(CombatSet::Simulate))
            .add_systems(
                Update,
                (destroy_orphaned_projectiles, log_parries).in_set(CombatSet::React),
            )
            .add_systems(Update, cleanup_projectiles.in_set(CombatSet::Cleanup));
    }
}
