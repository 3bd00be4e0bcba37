//! Boss domain: health-banded phases and their pattern pools.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::patterns::AttackPattern;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum SelectionPolicy {
    /// Uniformly random among ready patterns
    #[default]
    Random,
    /// First ready pattern in listed order
    Priority,
    /// Cycle through the list, skipping patterns still cooling down
    RoundRobin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossPhase {
    pub name: String,
    /// Entered once `health_fraction <= health_threshold`
    pub health_threshold: f32,
    pub patterns: Vec<AttackPattern>,
    pub selection: SelectionPolicy,
    /// Multiplier on pursuit speed while in this phase
    pub speed_scale: f32,
    cursor: usize,
}

impl BossPhase {
    pub fn new(name: impl Into<String>, health_threshold: f32, patterns: Vec<AttackPattern>) -> Self {
        Self {
            name: name.into(),
            health_threshold: health_threshold.clamp(0.0, 1.0),
            patterns,
            selection: SelectionPolicy::default(),
            speed_scale: 1.0,
            cursor: 0,
        }
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_speed_scale(mut self, scale: f32) -> Self {
        self.speed_scale = scale.max(0.0);
        self
    }

    /// Index of the next pattern to run, or `None` when every allowed pattern
    /// is cooling down.
    pub fn select(
        &mut self,
        now: f64,
        rng: &mut ChaCha8Rng,
        mut allow: impl FnMut(&AttackPattern) -> bool,
    ) -> Option<usize> {
        let ready: Vec<usize> = self
            .patterns
            .iter()
            .enumerate()
            .filter(|(_, p)| p.can_execute(now) && allow(p))
            .map(|(i, _)| i)
            .collect();
        if ready.is_empty() {
            return None;
        }
        match self.selection {
            SelectionPolicy::Random => Some(ready[rng.random_range(0..ready.len())]),
            SelectionPolicy::Priority => ready.first().copied(),
            SelectionPolicy::RoundRobin => {
                let len = self.patterns.len();
                let pick = (0..len)
                    .map(|offset| (self.cursor + offset) % len)
                    .find(|i| ready.contains(i))?;
                self.cursor = (pick + 1) % len;
                Some(pick)
            }
        }
    }
}

/// Phases ordered by descending threshold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseTable {
    phases: Vec<BossPhase>,
}

impl PhaseTable {
    /// Sorts by threshold, highest first. Equal thresholds keep their order.
    pub fn new(mut phases: Vec<BossPhase>) -> Self {
        phases.sort_by(|a, b| b.health_threshold.total_cmp(&a.health_threshold));
        Self { phases }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BossPhase> {
        self.phases.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BossPhase> {
        self.phases.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BossPhase> {
        self.phases.iter()
    }

    /// First phase after `current` whose threshold is at or above `fraction`.
    pub fn next_crossed(&self, current: usize, fraction: f32) -> Option<usize> {
        self.phases
            .iter()
            .enumerate()
            .skip(current + 1)
            .find(|(_, phase)| phase.health_threshold >= fraction)
            .map(|(i, _)| i)
    }
}
