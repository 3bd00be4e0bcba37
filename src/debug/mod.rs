//! Debug domain: developer tooling for fast iteration and testing.
//!
//! Features:
//! - Trace enemy and boss state changes
//! - Spawn enemies and bosses by content id
//! - Force boss phases
//! - Kill every enemy on screen

mod state;
mod systems;


pub use state::{DebugCommand, DebugState, StateLog};

use bevy::prelude::*;

use crate::core::CombatSet;
use crate::debug::systems::{handle_debug_commands, trace_state_changes};

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>()
            .add_message::<DebugCommand>()
            .add_systems(Update, handle_debug_commands.in_set(CombatSet::Contacts))
            .add_systems(Update, trace_state_changes.after(CombatSet::Cleanup));
    }
}
