//! Enemies domain: patrol paths and per-tick patrol stepping.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::LevelGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolMode {
    /// Last waypoint wraps back to the first
    #[default]
    Loop,
    /// Walk to the end, then back along the same points
    PingPong,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatrolPath {
    pub points: Vec<Vec2>,
    pub mode: PatrolMode,
}

impl PatrolPath {
    pub fn new(points: Vec<Vec2>, mode: PatrolMode) -> Self {
        Self { points, mode }
    }
}

/// Position along a patrol path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatrolCursor {
    pub index: usize,
    /// +1 walking forward through the points, -1 walking back (ping-pong only)
    pub step: i32,
}

impl Default for PatrolCursor {
    fn default() -> Self {
        Self { index: 0, step: 1 }
    }
}

impl PatrolCursor {
    /// Move to the next waypoint. Returns true when the walk direction reversed.
    pub fn advance(&mut self, path: &PatrolPath) -> bool {
        let len = path.points.len();
        if len < 2 {
            return false;
        }
        match path.mode {
            PatrolMode::Loop => {
                self.index = (self.index + 1) % len;
                false
            }
            PatrolMode::PingPong => {
                let next = self.index as i32 + self.step;
                if next < 0 || next >= len as i32 {
                    self.step = -self.step;
                    self.index = (self.index as i32 + self.step) as usize;
                    true
                } else {
                    self.index = next as usize;
                    false
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatrolRoute {
    /// Follow explicit waypoints
    Path { path: PatrolPath, cursor: PatrolCursor },
    /// No path: walk back and forth around `origin`, reversing at `range`
    /// or whenever the level geometry says the way ahead is unsafe
    Oscillate { origin: Vec2, range: f32, direction: f32 },
}

impl PatrolRoute {
    pub fn from_path(path: PatrolPath, origin: Vec2, range: f32) -> Self {
        if path.points.is_empty() {
            Self::oscillate(origin, range)
        } else {
            PatrolRoute::Path {
                path,
                cursor: PatrolCursor::default(),
            }
        }
    }

    pub fn oscillate(origin: Vec2, range: f32) -> Self {
        PatrolRoute::Oscillate {
            origin,
            range,
            direction: 1.0,
        }
    }

    /// Velocity for one patrol tick.
    ///
    /// The step is clamped so a waypoint is landed on exactly, never passed.
    /// `planar` movers follow waypoints in 2D; ground movers only in x.
    pub fn step(
        &mut self,
        position: Vec2,
        speed: f32,
        dt: f32,
        arrival_epsilon: f32,
        planar: bool,
        geometry: &dyn LevelGeometry,
    ) -> Vec2 {
        if dt <= 0.0 {
            return Vec2::ZERO;
        }
        match self {
            PatrolRoute::Path { path, cursor } => {
                let Some(waypoint) = path.points.get(cursor.index).copied() else {
                    return Vec2::ZERO;
                };
                let mut delta = waypoint - position;
                if !planar {
                    delta.y = 0.0;
                }
                let distance = delta.length();
                let max_step = speed * dt;
                if distance <= max_step.max(arrival_epsilon) {
                    cursor.advance(path);
                    delta / dt
                } else {
                    delta / distance * speed
                }
            }
            PatrolRoute::Oscillate {
                origin,
                range,
                direction,
            } => {
                let offset = (position.x - origin.x) * *direction;
                if offset >= *range
                    || geometry.blocked(position, *direction)
                    || !geometry.ground_ahead(position, *direction)
                {
                    *direction = -*direction;
                }
                Vec2::new(*direction * speed, 0.0)
            }
        }
    }
}
