//! Core domain: clock, timers, tuning, the combat event bus and its messages.

pub mod bus;
pub mod events;
mod resources;
mod timer;

#[cfg(test)]
mod tests;

pub use bus::{
    BossNotice, CombatEventBus, CombatOutbound, CombatOutbox, DeathNotice, DoorSignal, GrabNotice,
    SpawnRequest, Telegraph,
};
pub use events::{
    BossCue, BossCueEvent, BossDefeatedEvent, BossEncounterEvent, BossPhaseChangeEvent,
    ContactEvent, DamageEvent, DoorSignalEvent, EnemyDiedEvent, EngageBossEvent,
    EscapeAttemptEvent, GrabEvent, PlayerBounceEvent, PlayerHitEvent, ProjectileParriedEvent,
    SpawnRequestEvent, TelegraphEvent,
};
pub use resources::{CombatTuning, RunConfig};
pub use timer::{Countdown, SimClock, TIMER_EPSILON};

use bevy::prelude::*;

use crate::core::timer::advance_sim_clock;

/// Ordering of the combat tick. Everything runs sequentially inside one frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Simulation clock advance
    Clock,
    /// Physics collisions and ledge probes forwarded as contact data
    Collisions,
    /// Raw collision outcomes turned into damage requests
    Contacts,
    /// Inbound damage, contact and escape handling
    Input,
    /// Enemy, boss and projectile engines
    Simulate,
    /// Outbox drain and message fan-out
    Dispatch,
    /// Same-tick consumers of outbound messages
    React,
    /// Corpse and projectile removal
    Cleanup,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimClock>()
            .init_resource::<CombatOutbox>()
            .init_resource::<RunConfig>()
            .init_resource::<CombatTuning>()
            .add_message::<DamageEvent>()
            .add_message::<ContactEvent>()
            .add_message::<EscapeAttemptEvent>()
            .add_message::<EngageBossEvent>()
            .add_message::<EnemyDiedEvent>()
            .add_message::<PlayerHitEvent>()
            .add_message::<PlayerBounceEvent>()
            .add_message::<SpawnRequestEvent>()
            .add_message::<DoorSignalEvent>()
            .add_message::<BossEncounterEvent>()
            .add_message::<BossPhaseChangeEvent>()
            .add_message::<BossDefeatedEvent>()
            .add_message::<BossCueEvent>()
            .add_message::<TelegraphEvent>()
            .add_message::<ProjectileParriedEvent>()
            .add_message::<GrabEvent>()
            .configure_sets(
                Update,
                (
                    CombatSet::Clock,
                    CombatSet::Collisions,
                    CombatSet::Contacts,
                    CombatSet::Input,
                    CombatSet::Simulate,
                    CombatSet::Dispatch,
                    CombatSet::React,
                    CombatSet::Cleanup,
                )
                    .chain(),
            )
            .add_systems(Update, advance_sim_clock.in_set(CombatSet::Clock));
    }
}
