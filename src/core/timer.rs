//! Core domain: countdown timers and the simulation clock.

use bevy::prelude::*;

/// Remainders at or below this are treated as elapsed, absorbing float drift
/// from accumulating many small frame deltas.
pub const TIMER_EPSILON: f32 = 1e-4;

/// A countdown decremented by frame delta and clamped at zero.
///
/// Every cooldown, window and lifetime in the combat core is one of these.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
}

impl Countdown {
    pub fn new(seconds: f32) -> Self {
        let mut countdown = Self::default();
        countdown.start(seconds);
        countdown
    }

    /// Restart the countdown. Negative durations start an already finished timer.
    pub fn start(&mut self, seconds: f32) {
        self.remaining = seconds.max(0.0);
    }

    /// Stop the countdown without waiting for it to elapse.
    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `dt`. Returns true only on the tick that reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        if self.remaining <= TIMER_EPSILON {
            self.remaining = 0.0;
            return true;
        }
        false
    }

    /// Advance by `dt` and hand back the part of it left over once the
    /// countdown reaches zero, or `None` while it is still running. Lets
    /// back-to-back stages share one frame delta.
    pub fn tick_carry(&mut self, dt: f32) -> Option<f32> {
        let dt = dt.max(0.0);
        if self.remaining <= 0.0 {
            return Some(dt);
        }
        if dt + TIMER_EPSILON >= self.remaining {
            let leftover = (dt - self.remaining).max(0.0);
            self.remaining = 0.0;
            return Some(leftover);
        }
        self.remaining -= dt;
        None
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }
}

/// Accumulated simulation time in seconds, advanced once per frame before any
/// combat system runs. This is the `now` used for cooldown checks.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimClock {
    pub now: f64,
    pub delta: f32,
}

impl SimClock {
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0);
        self.now += f64::from(self.delta);
    }
}

pub(crate) fn advance_sim_clock(time: Res<Time>, mut clock: ResMut<SimClock>) {
    clock.advance(time.delta_secs());
}
