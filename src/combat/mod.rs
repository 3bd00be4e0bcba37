//! Combat domain: hits, the entity state machine, contacts and shared components.

mod components;
mod contact;
mod hit;
mod periodic;
mod resources;
mod state;
mod systems;
mod world;


pub use components::{
    BodySize, Combatant, CombatTarget, Corpse, Facing, Player, PlayerAttackHitbox, SummonedBy,
    Team, Wall,
};
pub use contact::{BodyContact, ContactOutcome, classify_body_contact};
pub use hit::{HitInfo, KnockbackDirection};
pub use periodic::PeriodicDamage;
pub use resources::CombatLedger;
pub use state::{EntityState, NoHooks, StateHooks, StateMachine};
pub use world::{
    ArenaBounds, LedgeProbe, LevelGeometry, OpenGeometry, ProbedGeometry, TargetQuery,
    TargetView, nearest_target, resolve_target, target_snapshot,
};

use bevy::prelude::*;

use crate::core::CombatSet;
use systems::{flush_outbox, record_ledger, translate_hitbox_contacts};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatLedger>()
            .init_resource::<ArenaBounds>()
            .add_systems(Update, translate_hitbox_contacts.in_set(CombatSet::Contacts))
            .add_systems(Update, flush_outbox.in_set(CombatSet::Dispatch))
            .add_systems(Update, record_ledger.in_set(CombatSet::React));
    }
}
