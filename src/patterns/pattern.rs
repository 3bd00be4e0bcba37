//! Patterns domain: the pattern descriptor and its in-flight run.
//!
//! A run is a short list of timed stages advanced by the frame tick. Instant
//! stages perform their action on entry and pass straight through.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{TargetView, resolve_target};
use crate::core::{CombatEventBus, Countdown};
use crate::patterns::area::AreaParams;
use crate::patterns::melee::MeleeParams;
use crate::patterns::summon::SummonParams;
use crate::patterns::volley::VolleyParams;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum PatternKind {
    Melee(MeleeParams),
    ProjectileVolley(VolleyParams),
    AreaDenial(AreaParams),
    Summon(SummonParams),
}

impl PatternKind {
    pub fn label(&self) -> &'static str {
        match self {
            PatternKind::Melee(_) => "melee",
            PatternKind::ProjectileVolley(_) => "volley",
            PatternKind::AreaDenial(_) => "area",
            PatternKind::Summon(_) => "summon",
        }
    }

    pub fn duration(&self) -> f32 {
        match self {
            PatternKind::Melee(p) => p.duration(),
            PatternKind::ProjectileVolley(p) => p.duration(),
            PatternKind::AreaDenial(p) => p.duration(),
            PatternKind::Summon(p) => p.duration(),
        }
    }

    fn stages(&self) -> Vec<(PatternStage, f32)> {
        match self {
            PatternKind::Melee(p) => vec![
                (PatternStage::Windup, p.windup),
                (PatternStage::Dash, p.dash_time),
                (PatternStage::Strike, 0.0),
                (PatternStage::Recover, p.recover),
            ],
            PatternKind::ProjectileVolley(p) => vec![
                (PatternStage::Windup, p.windup),
                (PatternStage::Fire, 0.0),
                (PatternStage::Wait, p.wait),
            ],
            PatternKind::AreaDenial(p) => vec![
                (PatternStage::Warning, p.warning_duration),
                (PatternStage::Detonate, 0.0),
                (PatternStage::Linger, p.linger),
            ],
            PatternKind::Summon(p) => vec![
                (PatternStage::Cast, p.cast_time),
                (PatternStage::Spawn, 0.0),
                (PatternStage::Wait, p.wait),
            ],
        }
    }
}

/// A reusable attack with cooldown bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPattern {
    pub name: String,
    pub cooldown: f32,
    pub kind: PatternKind,
    last_execution: Option<f64>,
}

impl AttackPattern {
    pub fn new(name: impl Into<String>, cooldown: f32, kind: PatternKind) -> Self {
        Self {
            name: name.into(),
            cooldown: cooldown.max(0.0),
            kind,
            last_execution: None,
        }
    }

    /// `(now - last_execution) >= cooldown`; a never-run pattern is ready.
    pub fn can_execute(&self, now: f64) -> bool {
        match self.last_execution {
            Some(last) => now - last >= f64::from(self.cooldown),
            None => true,
        }
    }

    pub fn last_execution(&self) -> Option<f64> {
        self.last_execution
    }

    /// Sum of the kind's stage times.
    pub fn duration(&self) -> f32 {
        self.kind.duration()
    }

    pub fn scale_cooldown(&mut self, factor: f32) {
        self.cooldown = (self.cooldown * factor).max(0.0);
    }

    pub fn is_summon(&self) -> bool {
        matches!(self.kind, PatternKind::Summon(_))
    }

    /// Begin a run. The cooldown clock starts now, not at completion.
    /// Callers check `can_execute` first.
    pub fn start(&mut self, now: f64, actor: &PatternActor, target: Option<&TargetView>) -> PatternRun {
        self.last_execution = Some(now);
        debug!("Pattern '{}' ({}) started at {:.3}", self.name, self.kind.label(), now);
        PatternRun::new(self, actor, target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStage {
    Windup,
    Dash,
    Strike,
    Recover,
    Fire,
    Wait,
    Warning,
    Detonate,
    Linger,
    Cast,
    Spawn,
}

/// The entity performing a pattern, as of this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternActor {
    pub entity: Entity,
    pub position: Vec2,
    /// +1 facing right, -1 facing left
    pub facing: f32,
}

/// Delivered exactly once per run, on completion or cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternCompletion {
    pub name: String,
    pub interrupted: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternStep {
    /// Actor velocity requested for this tick
    pub velocity: Vec2,
    pub completion: Option<PatternCompletion>,
}

pub struct PatternContext<'a> {
    pub actor: PatternActor,
    pub targets: &'a [TargetView],
    pub bus: &'a mut dyn CombatEventBus,
}

/// One in-flight execution of an `AttackPattern`.
#[derive(Debug, Clone)]
pub struct PatternRun {
    name: String,
    kind: PatternKind,
    stages: Vec<(PatternStage, f32)>,
    index: usize,
    entered: bool,
    timer: Countdown,
    target: Option<Entity>,
    /// Area denial point, frozen at invocation
    frozen_point: Option<Vec2>,
    dash_direction: f32,
    cast_damage: u32,
    completed: bool,
}

impl PatternRun {
    fn new(pattern: &AttackPattern, actor: &PatternActor, target: Option<&TargetView>) -> Self {
        let frozen_point = match pattern.kind {
            PatternKind::AreaDenial(_) => Some(target.map_or(actor.position, |t| t.position)),
            _ => None,
        };
        Self {
            name: pattern.name.clone(),
            kind: pattern.kind.clone(),
            stages: pattern.kind.stages(),
            index: 0,
            entered: false,
            timer: Countdown::default(),
            target: target.map(|t| t.entity),
            frozen_point,
            dash_direction: actor.facing,
            cast_damage: 0,
            completed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PatternKind {
        &self.kind
    }

    pub fn stage(&self) -> Option<PatternStage> {
        if self.completed {
            return None;
        }
        self.stages.get(self.index).map(|(stage, _)| *stage)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn frozen_point(&self) -> Option<Vec2> {
        self.frozen_point
    }

    /// The actor is open to damage while casting a summon.
    pub fn is_exposing(&self) -> bool {
        self.stage() == Some(PatternStage::Cast)
    }

    /// Count damage taken during the run. Returns true when it breaks a summon cast.
    pub fn register_damage(&mut self, damage: u32) -> bool {
        if !self.is_exposing() {
            return false;
        }
        self.cast_damage = self.cast_damage.saturating_add(damage);
        match &self.kind {
            PatternKind::Summon(params) => params.interrupted_by(self.cast_damage),
            _ => false,
        }
    }

    /// Abort the run. Returns the completion if it has not been delivered yet;
    /// cancelling again does nothing.
    pub fn cancel(&mut self) -> Option<PatternCompletion> {
        if self.completed {
            return None;
        }
        self.completed = true;
        debug!("Pattern '{}' cancelled", self.name);
        Some(PatternCompletion {
            name: self.name.clone(),
            interrupted: true,
        })
    }

    /// Advance by `dt`, running every stage boundary reached this tick. Time
    /// left over when a stage ends flows into the next one.
    pub fn advance(&mut self, dt: f32, ctx: &mut PatternContext) -> PatternStep {
        if self.completed {
            return PatternStep::default();
        }
        let mut remaining = dt;
        loop {
            let Some(&(stage, duration)) = self.stages.get(self.index) else {
                self.completed = true;
                debug!("Pattern '{}' complete", self.name);
                return PatternStep {
                    velocity: Vec2::ZERO,
                    completion: Some(PatternCompletion {
                        name: self.name.clone(),
                        interrupted: false,
                    }),
                };
            };
            if !self.entered {
                self.entered = true;
                self.enter_stage(stage, ctx);
                self.timer.start(duration);
            }
            match self.timer.tick_carry(remaining) {
                Some(leftover) => remaining = leftover,
                None => {
                    return PatternStep {
                        velocity: self.stage_velocity(stage),
                        completion: None,
                    };
                }
            }
            self.index += 1;
            self.entered = false;
        }
    }

    fn stage_velocity(&self, stage: PatternStage) -> Vec2 {
        match (&self.kind, stage) {
            (PatternKind::Melee(params), PatternStage::Dash) => {
                Vec2::new(self.dash_direction * params.dash_speed, 0.0)
            }
            _ => Vec2::ZERO,
        }
    }

    fn enter_stage(&mut self, stage: PatternStage, ctx: &mut PatternContext) {
        let actor = ctx.actor;
        let target = resolve_target(self.target, ctx.targets);
        match (&self.kind, stage) {
            (PatternKind::Melee(_), PatternStage::Dash) => {
                self.dash_direction =
                    MeleeParams::dash_direction(actor.position, target.as_ref(), actor.facing);
            }
            (PatternKind::Melee(params), PatternStage::Strike) => {
                params.strike(actor.entity, actor.position, target.as_ref(), ctx.bus);
            }
            (PatternKind::ProjectileVolley(params), PatternStage::Fire) => {
                let aim = target.map_or(Vec2::new(actor.facing, 0.0), |t| t.position - actor.position);
                params.fire(actor.entity, actor.position, aim, self.target, ctx.bus);
            }
            (PatternKind::AreaDenial(params), PatternStage::Warning) => {
                if let Some(point) = self.frozen_point {
                    params.telegraph(actor.entity, point, ctx.bus);
                }
            }
            (PatternKind::AreaDenial(params), PatternStage::Detonate) => {
                if let Some(point) = self.frozen_point {
                    params.detonate(actor.entity, point, ctx.targets, ctx.bus);
                }
            }
            (PatternKind::Summon(params), PatternStage::Spawn) => {
                params.request(actor.entity, actor.position, ctx.bus);
            }
            _ => {}
        }
    }
}
