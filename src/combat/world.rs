//! Combat domain: read-only views of targets and level geometry.

use avian2d::prelude::LinearVelocity;
use bevy::prelude::*;

use crate::combat::CombatTarget;

/// Snapshot of a pursuable target for one tick. Engines hold only the
/// `Entity` handle between ticks and re-resolve it against the current
/// snapshot list; a handle with no snapshot is a lost target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl TargetView {
    pub fn new(entity: Entity, position: Vec2) -> Self {
        Self {
            entity,
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Resolve a weak target handle. `None` means the target despawned or left
/// the candidate set.
pub fn resolve_target(handle: Option<Entity>, targets: &[TargetView]) -> Option<TargetView> {
    let handle = handle?;
    targets.iter().find(|t| t.entity == handle).copied()
}

/// Nearest target within `range` of `from` that passes `accept`.
pub fn nearest_target(
    from: Vec2,
    range: f32,
    targets: &[TargetView],
    mut accept: impl FnMut(&TargetView) -> bool,
) -> Option<TargetView> {
    targets
        .iter()
        .filter(|t| t.position.distance(from) <= range)
        .filter(|t| accept(t))
        .min_by(|a, b| {
            a.position
                .distance_squared(from)
                .total_cmp(&b.position.distance_squared(from))
        })
        .copied()
}

/// Level geometry queries used for patrol edges and teleports.
pub trait LevelGeometry {
    /// Is there floor in front of `position` when walking toward `direction` (±1)?
    fn ground_ahead(&self, position: Vec2, direction: f32) -> bool;
    /// Is the way toward `direction` blocked by a wall or arena boundary?
    fn blocked(&self, position: Vec2, direction: f32) -> bool;
    /// Clamp a point into the playable area.
    fn clamp(&self, position: Vec2) -> Vec2;
}

/// Geometry with no edges at all.
pub struct OpenGeometry;

impl LevelGeometry for OpenGeometry {
    fn ground_ahead(&self, _position: Vec2, _direction: f32) -> bool {
        true
    }

    fn blocked(&self, _position: Vec2, _direction: f32) -> bool {
        false
    }

    fn clamp(&self, position: Vec2) -> Vec2 {
        position
    }
}

/// Rectangular playable area of the current level.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub min: Vec2,
    pub max: Vec2,
    /// How close to a boundary counts as blocked
    pub margin: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            min: Vec2::splat(-10_000.0),
            max: Vec2::splat(10_000.0),
            margin: 4.0,
        }
    }
}

impl ArenaBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            ..default()
        }
    }
}

impl LevelGeometry for ArenaBounds {
    fn ground_ahead(&self, _position: Vec2, _direction: f32) -> bool {
        true
    }

    fn blocked(&self, position: Vec2, direction: f32) -> bool {
        (direction > 0.0 && position.x + self.margin >= self.max.x)
            || (direction < 0.0 && position.x - self.margin <= self.min.x)
    }

    fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(self.min, self.max)
    }
}

/// Per-entity ledge and wall probe results written by the physics bridge.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgeProbe {
    pub ground_ahead: bool,
    pub wall_ahead: bool,
}

impl Default for LedgeProbe {
    fn default() -> Self {
        Self {
            ground_ahead: true,
            wall_ahead: false,
        }
    }
}

/// Arena bounds combined with an entity's most recent probe.
pub struct ProbedGeometry<'a> {
    pub bounds: &'a ArenaBounds,
    pub probe: Option<LedgeProbe>,
}

impl LevelGeometry for ProbedGeometry<'_> {
    fn ground_ahead(&self, position: Vec2, direction: f32) -> bool {
        self.probe.is_none_or(|p| p.ground_ahead) && self.bounds.ground_ahead(position, direction)
    }

    fn blocked(&self, position: Vec2, direction: f32) -> bool {
        self.probe.is_some_and(|p| p.wall_ahead) || self.bounds.blocked(position, direction)
    }

    fn clamp(&self, position: Vec2) -> Vec2 {
        self.bounds.clamp(position)
    }
}

/// Everything an engine may pursue.
pub type TargetQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, Option<&'static LinearVelocity>),
    With<CombatTarget>,
>;

/// Snapshot of every live target for this tick.
pub fn target_snapshot(query: &TargetQuery) -> Vec<TargetView> {
    query
        .iter()
        .map(|(entity, transform, velocity)| {
            TargetView::new(entity, transform.translation.truncate())
                .with_velocity(velocity.map_or(Vec2::ZERO, |v| v.0))
        })
        .collect()
}
