//! Enemies domain: concrete archetypes.
//!
//! Each archetype overrides only the `EnemyBehavior` steps it changes.

mod blinker;
mod flyer;
mod grappler;
mod shieldbearer;
mod spitter;
mod walker;
mod wraith;

pub use blinker::Blinker;
pub use flyer::Flyer;
pub use grappler::Grappler;
pub use shieldbearer::Shieldbearer;
pub use spitter::Spitter;
pub use walker::Walker;
pub use wraith::Wraith;
