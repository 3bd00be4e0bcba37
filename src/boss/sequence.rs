//! Boss domain: scripted stage sequences (phase transitions, destruction).

use serde::{Deserialize, Serialize};

use crate::core::Countdown;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScriptedStage {
    pub name: String,
    pub duration: f32,
}

impl ScriptedStage {
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: duration.max(0.0),
        }
    }
}

/// Timed stages played one after another by the frame tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageSequence {
    stages: Vec<ScriptedStage>,
    index: usize,
    entered: bool,
    timer: Countdown,
}

impl StageSequence {
    pub fn new(stages: Vec<ScriptedStage>) -> Self {
        Self {
            stages,
            index: 0,
            entered: false,
            timer: Countdown::default(),
        }
    }

    pub fn total_duration(&self) -> f32 {
        self.stages.iter().map(|s| s.duration).sum()
    }

    pub fn current(&self) -> Option<&ScriptedStage> {
        self.stages.get(self.index)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.stages.len()
    }

    /// Advance by `dt`, calling `on_stage` as each stage begins.
    /// Returns true once every stage has elapsed.
    pub fn advance(&mut self, dt: f32, mut on_stage: impl FnMut(&ScriptedStage)) -> bool {
        let mut remaining = dt;
        while let Some(stage) = self.stages.get(self.index) {
            if !self.entered {
                self.entered = true;
                on_stage(stage);
                self.timer.start(stage.duration);
            }
            match self.timer.tick_carry(remaining) {
                Some(leftover) => remaining = leftover,
                None => return false,
            }
            self.index += 1;
            self.entered = false;
        }
        true
    }
}
