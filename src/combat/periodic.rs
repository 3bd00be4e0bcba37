//! Combat domain: repeating damage applied on a fixed interval.

use crate::combat::HitInfo;
use crate::core::Countdown;

#[derive(Debug, Clone)]
pub struct PeriodicDamage {
    interval: f32,
    hit: HitInfo,
    timer: Countdown,
    active: bool,
}

impl PeriodicDamage {
    pub fn new(interval: f32, hit: HitInfo) -> Self {
        Self {
            interval: interval.max(0.01),
            hit,
            timer: Countdown::default(),
            active: false,
        }
    }

    /// Begin ticking. The first hit lands after one full interval.
    pub fn start(&mut self) {
        self.active = true;
        self.timer.start(self.interval);
    }

    /// Stop ticking. Stopping an already stopped timer does nothing.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.timer.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hit(&self) -> &HitInfo {
        &self.hit
    }

    pub fn set_hit(&mut self, hit: HitInfo) {
        self.hit = hit;
    }

    /// Returns a hit each time an interval elapses while active.
    pub fn tick(&mut self, dt: f32) -> Option<HitInfo> {
        if !self.active {
            return None;
        }
        if self.timer.tick(dt) {
            self.timer.start(self.interval);
            return Some(self.hit.clone());
        }
        None
    }
}
