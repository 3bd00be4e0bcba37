//! Patterns domain: reusable, data-described boss attacks.

mod area;
mod melee;
mod pattern;
mod summon;
mod volley;

#[cfg(test)]
mod tests;

pub use area::AreaParams;
pub use melee::MeleeParams;
pub use pattern::{
    AttackPattern, PatternActor, PatternCompletion, PatternContext, PatternKind, PatternRun,
    PatternStage, PatternStep,
};
pub use summon::SummonParams;
pub use volley::VolleyParams;
