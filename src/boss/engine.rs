//! Boss domain: phase, pattern and vulnerability engine.
//!
//! The boss loops `Idle -> Attacking -> Idle`, with `Transitioning` and
//! `Vulnerable` excursions, until `Defeated`. Transitions and the destruction
//! sequence are timed stage lists advanced by the frame tick.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::boss::config::{BossConfig, DamageGate};
use crate::boss::phase::{BossPhase, PhaseTable};
use crate::boss::script::BossScript;
use crate::boss::sequence::StageSequence;
use crate::combat::{ContactOutcome, HitInfo, TargetView, nearest_target, resolve_target};
use crate::core::{BossNotice, CombatEventBus, Countdown, DoorSignal};
use crate::patterns::{PatternActor, PatternCompletion, PatternContext, PatternKind, PatternRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BossState {
    #[default]
    Idle,
    Attacking,
    Transitioning,
    Vulnerable,
    Defeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncounterStage {
    /// Waiting for a target to come within engage range
    #[default]
    Dormant,
    Engaged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossDamageOutcome {
    /// Boss is defeated
    Rejected,
    /// Arrived during a phase transition; discarded entirely
    Discarded,
    /// Refused by the damage gate
    Gated,
    Applied,
    /// Applied and broke a summon cast
    Interrupted,
    /// Health reached zero
    Defeated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    Started,
    AlreadyInPhase,
    OutOfRange,
    /// Defeated or already mid-transition
    Busy,
}

/// Everything a boss may read or notify during one tick.
pub struct BossContext<'a> {
    pub now: f64,
    pub targets: &'a [TargetView],
    pub bus: &'a mut dyn CombatEventBus,
}

#[derive(Debug)]
struct Transition {
    from: usize,
    to: usize,
    /// Forced transitions skip the threshold re-check when they finish
    forced: bool,
    sequence: StageSequence,
}

#[derive(Component, Debug)]
pub struct BossEngine {
    id: Entity,
    config: BossConfig,
    phases: PhaseTable,
    phase_index: usize,
    health: u32,
    state: BossState,
    encounter: EncounterStage,
    decision: Countdown,
    vulnerable: Countdown,
    run: Option<PatternRun>,
    transition: Option<Transition>,
    defeat: Option<StageSequence>,
    defeat_reported: bool,
    collision_enabled: bool,
    minions: u32,
    target: Option<Entity>,
    facing: f32,
    rng: ChaCha8Rng,
    script: Box<dyn BossScript>,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl BossEngine {
    pub fn new(
        id: Entity,
        config: BossConfig,
        phases: PhaseTable,
        script: Box<dyn BossScript>,
        seed: u64,
        position: Vec2,
    ) -> Self {
        let config = config.sanitized();
        Self {
            id,
            health: config.max_health,
            config,
            phases,
            phase_index: 0,
            state: BossState::Idle,
            encounter: EncounterStage::Dormant,
            decision: Countdown::default(),
            vulnerable: Countdown::default(),
            run: None,
            transition: None,
            defeat: None,
            defeat_reported: false,
            collision_enabled: true,
            minions: 0,
            target: None,
            facing: -1.0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            script,
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn id(&self) -> Entity {
        self.id
    }

    pub fn config(&self) -> &BossConfig {
        &self.config
    }

    pub fn state(&self) -> BossState {
        self.state
    }

    pub fn encounter(&self) -> EncounterStage {
        self.encounter
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn health_fraction(&self) -> f32 {
        self.health as f32 / self.config.max_health as f32
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    /// `None` when the index is out of range; the boss then only pursues.
    pub fn current_phase(&self) -> Option<&BossPhase> {
        self.phases.get(self.phase_index)
    }

    pub fn phases(&self) -> &PhaseTable {
        &self.phases
    }

    pub fn active_run(&self) -> Option<&PatternRun> {
        self.run.as_ref()
    }

    pub fn live_minions(&self) -> u32 {
        self.minions
    }

    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    pub fn script_name(&self) -> &'static str {
        self.script.name()
    }

    pub fn is_defeated(&self) -> bool {
        self.state == BossState::Defeated
    }

    pub fn defeat_reported(&self) -> bool {
        self.defeat_reported
    }

    /// Start the encounter: announce it, lock the arena and enter the first phase.
    pub fn engage(&mut self, bus: &mut dyn CombatEventBus) -> bool {
        if self.encounter == EncounterStage::Engaged || self.is_defeated() {
            return false;
        }
        self.encounter = EncounterStage::Engaged;
        info!("Boss encounter started: {} ({:?})", self.config.name, self.id);
        bus.notify_boss(BossNotice::EncounterStarted {
            boss: self.id,
            name: self.config.name.clone(),
        });
        for door in &self.config.arena_doors {
            bus.notify_door(DoorSignal::Lock(door.clone()));
        }
        self.script.on_phase_enter(self.phase_index, &mut self.phases);
        self.enter_idle();
        true
    }

    /// Apply a hit. Damage during a transition is discarded entirely.
    pub fn take_damage(&mut self, hit: &HitInfo, ctx: &mut BossContext) -> BossDamageOutcome {
        match self.state {
            BossState::Defeated => return BossDamageOutcome::Rejected,
            BossState::Transitioning => {
                debug!("Boss {:?} ignored {} damage mid-transition", self.id, hit.damage);
                return BossDamageOutcome::Discarded;
            }
            _ => {}
        }
        if self.encounter == EncounterStage::Dormant {
            self.engage(ctx.bus);
        }
        let exposed = self.run.as_ref().is_some_and(PatternRun::is_exposing);
        if self.config.damage_gate == DamageGate::VulnerableOnly
            && self.state != BossState::Vulnerable
            && !exposed
        {
            return BossDamageOutcome::Gated;
        }

        self.health = self.health.saturating_sub(hit.damage);
        debug!(
            "Boss {:?} took {} damage ({}/{})",
            self.id, hit.damage, self.health, self.config.max_health
        );
        if self.health == 0 {
            self.begin_defeat(ctx.bus);
            return BossDamageOutcome::Defeated;
        }

        let interrupted = self
            .run
            .as_mut()
            .is_some_and(|run| run.register_damage(hit.damage));
        if interrupted {
            let stun = self.run.as_ref().and_then(|run| match run.kind() {
                PatternKind::Summon(params) => Some(params.stun_time),
                _ => None,
            });
            self.cancel_run();
            self.open_vulnerability(stun.unwrap_or(0.0), ctx.bus);
        }

        self.check_phase_transition(ctx.bus);
        if interrupted {
            BossDamageOutcome::Interrupted
        } else {
            BossDamageOutcome::Applied
        }
    }

    /// Start a transition if health has crossed a later phase's threshold.
    pub fn check_phase_transition(&mut self, bus: &mut dyn CombatEventBus) -> bool {
        if matches!(self.state, BossState::Transitioning | BossState::Defeated) {
            return false;
        }
        match self.phases.next_crossed(self.phase_index, self.health_fraction()) {
            Some(index) => self.transition_to_phase(index, bus) == TransitionRequest::Started,
            None => false,
        }
    }

    /// Cancel the in-flight pattern, exit the old phase and start the scripted,
    /// invulnerable transition into `index`.
    pub fn transition_to_phase(&mut self, index: usize, bus: &mut dyn CombatEventBus) -> TransitionRequest {
        self.begin_transition(index, false, bus)
    }

    /// Explicit override; may re-enter an earlier phase. The forced phase holds
    /// until the next hit runs the usual threshold check.
    pub fn force_phase(&mut self, index: usize, bus: &mut dyn CombatEventBus) -> TransitionRequest {
        self.begin_transition(index, true, bus)
    }

    fn begin_transition(&mut self, index: usize, forced: bool, bus: &mut dyn CombatEventBus) -> TransitionRequest {
        if matches!(self.state, BossState::Transitioning | BossState::Defeated) {
            return TransitionRequest::Busy;
        }
        if index >= self.phases.len() {
            return TransitionRequest::OutOfRange;
        }
        if index == self.phase_index {
            return TransitionRequest::AlreadyInPhase;
        }
        self.cancel_run();
        self.vulnerable.clear();
        self.script.on_phase_exit(self.phase_index);
        self.state = BossState::Transitioning;
        self.velocity = Vec2::ZERO;
        self.transition = Some(Transition {
            from: self.phase_index,
            to: index,
            forced,
            sequence: StageSequence::new(self.config.transition_stages.clone()),
        });
        debug!("Boss {:?} transitioning {} -> {}", self.id, self.phase_index, index);
        bus.notify_boss(BossNotice::TransitionStarted {
            boss: self.id,
            from: self.phase_index,
            to: index,
        });
        TransitionRequest::Started
    }

    fn finish_transition(&mut self, bus: &mut dyn CombatEventBus) {
        let Some(transition) = self.transition.take() else {
            return;
        };
        self.phase_index = transition.to;
        self.script.on_phase_enter(transition.to, &mut self.phases);
        let name = self
            .current_phase()
            .map_or_else(String::new, |phase| phase.name.clone());
        info!(
            "Boss {} entered phase {} '{}'",
            self.config.name, transition.to, name
        );
        bus.notify_boss(BossNotice::PhaseChanged {
            boss: self.id,
            from: transition.from,
            to: transition.to,
        });
        self.enter_idle();
        if !transition.forced {
            self.check_phase_transition(bus);
        }
    }

    /// Pick the next pattern from the current phase, or `None` if all are cooling down.
    pub fn select_next_pattern(&mut self, now: f64) -> Option<usize> {
        let minions = self.minions;
        let script = self.script.as_ref();
        let phase = self.phases.get_mut(self.phase_index)?;
        phase.select(now, &mut self.rng, |pattern| script.allow_pattern(pattern, minions))
    }

    /// Timed window during which damage is accepted regardless of the gate.
    pub fn open_vulnerability(&mut self, duration: f32, bus: &mut dyn CombatEventBus) {
        if matches!(self.state, BossState::Transitioning | BossState::Defeated) {
            return;
        }
        self.cancel_run();
        self.state = BossState::Vulnerable;
        self.velocity = Vec2::ZERO;
        self.vulnerable.start(duration);
        debug!("Boss {:?} vulnerable for {:.2}s", self.id, duration);
        bus.notify_boss(BossNotice::VulnerabilityOpened {
            boss: self.id,
            duration,
        });
    }

    /// Live minions this boss summoned, as counted in the world.
    pub fn set_live_minions(&mut self, count: u32) {
        self.minions = count;
    }

    pub fn resolve_body_contact(&self, player: &TargetView, bus: &mut dyn CombatEventBus) -> ContactOutcome {
        if !self.collision_enabled
            || self.encounter == EncounterStage::Dormant
            || self.config.contact_damage == 0
        {
            return ContactOutcome::Ignored;
        }
        bus.hit_target(
            player.entity,
            HitInfo::between(
                self.config.contact_damage,
                self.config.contact_knockback,
                self.position,
                player.position,
                Some(self.id),
            ),
        );
        ContactOutcome::PlayerHurt
    }

    /// Advance one simulation tick.
    pub fn update(&mut self, dt: f32, ctx: &mut BossContext) {
        if self.state == BossState::Defeated {
            self.velocity = Vec2::ZERO;
            self.advance_defeat(dt, ctx.bus);
            return;
        }
        if self.encounter == EncounterStage::Dormant {
            self.velocity = Vec2::ZERO;
            let engage_range = self.config.engage_range;
            if nearest_target(self.position, engage_range, ctx.targets, |_| true).is_none() {
                return;
            }
            self.engage(ctx.bus);
        }

        let target = self.refresh_target(ctx.targets);
        if let Some(target) = target
            && target.position.x != self.position.x
        {
            self.facing = (target.position.x - self.position.x).signum();
        }

        match self.state {
            BossState::Transitioning => {
                let boss = self.id;
                let finished = match self.transition.as_mut() {
                    Some(transition) => transition.sequence.advance(dt, |_| {}),
                    None => true,
                };
                if finished {
                    debug!("Boss {:?} transition sequence complete", boss);
                    self.finish_transition(ctx.bus);
                }
            }
            BossState::Vulnerable => {
                self.velocity = Vec2::ZERO;
                if self.vulnerable.tick(dt) || self.vulnerable.is_finished() {
                    self.enter_idle();
                }
            }
            BossState::Attacking => self.advance_run(dt, ctx),
            BossState::Idle => {
                self.decision.tick(dt);
                if self.decision.is_running() {
                    self.velocity = Vec2::ZERO;
                    return;
                }
                match self.select_next_pattern(ctx.now) {
                    Some(index) => {
                        self.start_pattern(index, ctx.now, target);
                        self.advance_run(0.0, ctx);
                    }
                    None => self.pursue(target),
                }
            }
            BossState::Defeated => {}
        }
    }

    fn refresh_target(&mut self, targets: &[TargetView]) -> Option<TargetView> {
        if let Some(target) = resolve_target(self.target, targets) {
            return Some(target);
        }
        let nearest = nearest_target(self.position, f32::INFINITY, targets, |_| true);
        self.target = nearest.map(|t| t.entity);
        nearest
    }

    fn pursue(&mut self, target: Option<TargetView>) {
        let speed_scale = self.current_phase().map_or(1.0, |phase| phase.speed_scale);
        self.velocity = match target {
            Some(target) if (target.position.x - self.position.x).abs() > 4.0 => Vec2::new(
                (target.position.x - self.position.x).signum() * self.config.move_speed * speed_scale,
                0.0,
            ),
            _ => Vec2::ZERO,
        };
    }

    fn start_pattern(&mut self, index: usize, now: f64, target: Option<TargetView>) {
        let actor = self.actor();
        let Some(pattern) = self
            .phases
            .get_mut(self.phase_index)
            .and_then(|phase| phase.patterns.get_mut(index))
        else {
            return;
        };
        self.run = Some(pattern.start(now, &actor, target.as_ref()));
        self.state = BossState::Attacking;
    }

    fn advance_run(&mut self, dt: f32, ctx: &mut BossContext) {
        let actor = self.actor();
        let Some(run) = self.run.as_mut() else {
            self.enter_idle();
            return;
        };
        let mut pattern_ctx = PatternContext {
            actor,
            targets: ctx.targets,
            bus: &mut *ctx.bus,
        };
        let step = run.advance(dt, &mut pattern_ctx);
        self.velocity = step.velocity;
        if let Some(completion) = step.completion {
            self.on_pattern_complete(completion);
        }
    }

    fn on_pattern_complete(&mut self, completion: PatternCompletion) {
        debug!(
            "Boss {:?} finished pattern '{}' (interrupted: {})",
            self.id, completion.name, completion.interrupted
        );
        self.run = None;
        if self.state == BossState::Attacking {
            self.enter_idle();
        }
    }

    fn cancel_run(&mut self) {
        if let Some(completion) = self.run.as_mut().and_then(PatternRun::cancel) {
            self.on_pattern_complete(completion);
        }
        self.run = None;
    }

    fn enter_idle(&mut self) {
        self.state = BossState::Idle;
        self.velocity = Vec2::ZERO;
        self.decision.start(self.config.decision_delay);
    }

    fn actor(&self) -> PatternActor {
        PatternActor {
            entity: self.id,
            position: self.position,
            facing: self.facing,
        }
    }

    /// Stop everything, disable collision and start the destruction sequence.
    fn begin_defeat(&mut self, bus: &mut dyn CombatEventBus) {
        self.cancel_run();
        self.transition = None;
        self.decision.clear();
        self.vulnerable.clear();
        self.state = BossState::Defeated;
        self.collision_enabled = false;
        self.velocity = Vec2::ZERO;
        self.target = None;
        self.defeat = Some(StageSequence::new(self.config.defeat_stages.clone()));
        info!("Boss {} defeat sequence started", self.config.name);
        bus.notify_boss(BossNotice::DefeatStarted { boss: self.id });
    }

    fn advance_defeat(&mut self, dt: f32, bus: &mut dyn CombatEventBus) {
        if self.defeat_reported {
            return;
        }
        let boss = self.id;
        let finished = match self.defeat.as_mut() {
            Some(sequence) => sequence.advance(dt, |stage| {
                bus.notify_boss(BossNotice::DefeatStage {
                    boss,
                    stage: stage.name.clone(),
                });
            }),
            None => true,
        };
        if !finished {
            return;
        }
        self.defeat_reported = true;
        info!(
            "Boss {} defeated, +{} score",
            self.config.name, self.config.score_value
        );
        bus.notify_boss(BossNotice::Defeated {
            boss,
            score: self.config.score_value,
            unlocks: self.config.unlocks.clone(),
        });
        for door in &self.config.arena_doors {
            bus.notify_door(DoorSignal::Unlock(door.clone()));
        }
    }
}
