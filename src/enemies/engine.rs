//! Enemies domain: the per-tick behavior engine shared by every archetype.

use bevy::prelude::*;

use crate::combat::{
    BodyContact, ContactOutcome, EntityState, Facing, HitInfo, StateHooks, StateMachine, TargetView,
    classify_body_contact, nearest_target, resolve_target,
};
use crate::core::{CombatEventBus, DeathNotice};
use crate::enemies::behavior::{BehaviorControl, DamageVerdict, EnemyBehavior, EnemyContext};
use crate::enemies::config::EnemyConfig;
use crate::enemies::runtime::{AttackCycle, AttackStage, EnemyRuntime};

/// What `take_damage` did with a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead; nothing changed
    Rejected,
    /// Shield stopped it
    Blocked,
    /// Passed through an intangible body
    Ignored,
    /// Health dropped, entity is hurt
    Damaged,
    /// Health reached zero
    Killed,
}

impl DamageOutcome {
    pub fn landed(self) -> bool {
        matches!(self, DamageOutcome::Damaged | DamageOutcome::Killed)
    }
}

/// Routes state machine hooks to the archetype.
struct BehaviorHooks<'a> {
    behavior: &'a mut dyn EnemyBehavior,
    runtime: &'a mut EnemyRuntime,
    config: &'a EnemyConfig,
}

impl StateHooks for BehaviorHooks<'_> {
    fn on_state_exit(&mut self, state: EntityState) {
        self.behavior.on_state_exit(state, self.runtime, self.config);
    }

    fn on_state_enter(&mut self, state: EntityState) {
        self.behavior.on_state_enter(state, self.runtime, self.config);
    }
}

#[derive(Component, Debug)]
pub struct EnemyEngine {
    config: EnemyConfig,
    machine: StateMachine,
    behavior: Box<dyn EnemyBehavior>,
    pub runtime: EnemyRuntime,
}

impl EnemyEngine {
    pub fn new(config: EnemyConfig, behavior: Box<dyn EnemyBehavior>, runtime: EnemyRuntime) -> Self {
        let config = config.sanitized();
        let mut runtime = runtime;
        runtime.health = config.health;
        Self {
            config,
            machine: StateMachine::new(EntityState::Idle),
            behavior,
            runtime,
        }
    }

    pub fn config(&self) -> &EnemyConfig {
        &self.config
    }

    pub fn behavior(&self) -> &dyn EnemyBehavior {
        self.behavior.as_ref()
    }

    pub fn state(&self) -> EntityState {
        self.machine.current()
    }

    pub fn health(&self) -> u32 {
        self.runtime.health
    }

    pub fn is_dead(&self) -> bool {
        self.machine.is_dead()
    }

    pub fn is_tangible(&self) -> bool {
        !self.is_dead() && self.runtime.collision_enabled && self.behavior.is_tangible(&self.runtime)
    }

    /// Transition with archetype hooks. No-op for repeats or once dead.
    pub fn change_state(&mut self, next: EntityState) -> bool {
        let mut hooks = BehaviorHooks {
            behavior: self.behavior.as_mut(),
            runtime: &mut self.runtime,
            config: &self.config,
        };
        let changed = self.machine.change_state(next, &mut hooks);
        if changed {
            debug!(
                "Enemy {:?} ({}) {:?} -> {:?}",
                self.runtime.id,
                self.runtime.kind,
                self.machine.previous(),
                next
            );
        }
        changed
    }

    /// Advance one simulation tick.
    pub fn update(&mut self, dt: f32, ctx: &mut EnemyContext) {
        if self.machine.is_dead() {
            self.runtime.velocity = Vec2::ZERO;
            return;
        }
        self.machine.tick(dt);
        self.runtime.attack_cooldown.tick(dt);

        match self
            .behavior
            .pre_tick(dt, &mut self.runtime, &self.config, ctx)
        {
            BehaviorControl::Handled => return,
            BehaviorControl::Stun(duration) => {
                self.enter_hurt(duration);
                return;
            }
            BehaviorControl::Continue => {}
        }

        let target = resolve_target(self.runtime.target, ctx.targets);
        if self.runtime.target.is_some() && target.is_none() {
            self.lose_target();
        }

        match self.machine.current() {
            EntityState::Idle => self.tick_idle(ctx),
            EntityState::Patrol => self.tick_patrol(dt, ctx),
            EntityState::Chase => self.tick_chase(target, ctx),
            EntityState::Attack => self.tick_attack(dt, target, ctx),
            EntityState::Hurt => self.tick_hurt(dt, ctx),
            EntityState::Dead => {}
        }

        if self.runtime.velocity.x != 0.0 && self.machine.current() != EntityState::Hurt {
            self.runtime.facing = Facing::toward(self.runtime.facing, self.runtime.velocity.x);
        }
    }

    /// Kinematic motion for bodies without a physics integrator.
    pub fn integrate(&mut self, dt: f32) {
        self.runtime.position += self.runtime.velocity * dt;
    }

    /// Nearest perceivable target within detection range.
    pub fn detect_player(&self, targets: &[TargetView]) -> Option<TargetView> {
        nearest_target(
            self.runtime.position,
            self.config.detection_range,
            targets,
            |t| self.behavior.can_perceive(&self.runtime, &self.config, t),
        )
    }

    fn tick_idle(&mut self, ctx: &mut EnemyContext) {
        self.runtime.velocity = Vec2::ZERO;
        if let Some(found) = self.detect_player(ctx.targets) {
            self.acquire(found);
        } else {
            self.change_state(EntityState::Patrol);
        }
    }

    fn tick_patrol(&mut self, dt: f32, ctx: &mut EnemyContext) {
        if let Some(found) = self.detect_player(ctx.targets) {
            self.acquire(found);
            self.tick_chase(Some(found), ctx);
            return;
        }
        let planar = self.behavior.planar();
        self.runtime.velocity = self.runtime.patrol.step(
            self.runtime.position,
            self.config.move_speed,
            dt,
            ctx.tuning.arrival_epsilon,
            planar,
            ctx.geometry,
        );
    }

    fn tick_chase(&mut self, target: Option<TargetView>, ctx: &mut EnemyContext) {
        let Some(target) = target else {
            self.lose_target();
            return;
        };
        let distance = self.runtime.position.distance(target.position);
        if distance > self.config.lose_range() {
            self.lose_target();
            return;
        }
        self.runtime.face_toward(target.position);

        if distance <= self.config.attack_range
            && self.runtime.attack_cooldown.is_finished()
            && self.behavior.can_attack(&self.runtime)
        {
            self.begin_attack(target);
            self.tick_attack(0.0, Some(target), ctx);
            return;
        }

        self.runtime.velocity = self
            .behavior
            .chase_velocity(&self.runtime, &self.config, &target);
    }

    fn begin_attack(&mut self, target: TargetView) {
        let profile = self.behavior.attack_profile(&self.config);
        self.runtime.attack = Some(AttackCycle::new(profile, target.entity));
        self.runtime.attack_cooldown.start(self.config.attack_cooldown);
        self.runtime.velocity = Vec2::ZERO;
        self.change_state(EntityState::Attack);
    }

    fn tick_attack(&mut self, dt: f32, target: Option<TargetView>, ctx: &mut EnemyContext) {
        let Some(mut cycle) = self.runtime.attack.take() else {
            self.resume_pursuit();
            return;
        };
        let mut remaining_dt = dt;
        loop {
            match cycle.stage {
                AttackStage::Windup => {
                    if cycle.timer.is_running() && !cycle.timer.tick(remaining_dt) {
                        break;
                    }
                    remaining_dt = 0.0;
                    cycle.stage = AttackStage::Strike;
                }
                AttackStage::Strike => {
                    let payload = cycle.profile.payload.clone();
                    if let Some(target) = target {
                        self.runtime.face_toward(target.position);
                    }
                    self.behavior
                        .strike(&mut self.runtime, &self.config, target, &payload, ctx);
                    cycle.stage = AttackStage::Recover;
                    cycle.timer.start(cycle.profile.recover);
                }
                AttackStage::Recover => {
                    if cycle.timer.is_running() && !cycle.timer.tick(remaining_dt) {
                        break;
                    }
                    self.runtime.attack = None;
                    self.resume_pursuit();
                    return;
                }
            }
        }
        let stage = cycle.stage;
        self.runtime.attack = Some(cycle);
        self.runtime.velocity = self
            .behavior
            .attack_velocity(stage, &self.runtime, &self.config);
    }

    fn tick_hurt(&mut self, dt: f32, ctx: &mut EnemyContext) {
        let damping = (1.0 - ctx.tuning.knockback_damping * dt).clamp(0.0, 1.0);
        self.runtime.velocity = Vec2::new(self.runtime.knockback, 0.0);
        self.runtime.knockback *= damping;
        if self.runtime.hurt_timer.is_finished() || self.runtime.hurt_timer.tick(dt) {
            self.runtime.knockback = 0.0;
            let resume = if self.runtime.target.is_some() {
                self.runtime.resume_state
            } else {
                EntityState::Patrol
            };
            self.change_state(resume);
        }
    }

    fn acquire(&mut self, target: TargetView) {
        self.runtime.target = Some(target.entity);
        self.runtime.face_toward(target.position);
        self.change_state(EntityState::Chase);
    }

    /// Drop the target and fall back to patrol.
    fn lose_target(&mut self) {
        self.runtime.target = None;
        self.runtime.resume_state = EntityState::Patrol;
        if self.machine.current().is_pursuit() {
            self.runtime.attack = None;
            self.runtime.velocity = Vec2::ZERO;
            self.change_state(EntityState::Patrol);
        }
    }

    fn resume_pursuit(&mut self) {
        if self.runtime.target.is_some() {
            self.change_state(EntityState::Chase);
        } else {
            self.change_state(EntityState::Patrol);
        }
    }

    fn enter_hurt(&mut self, duration: f32) {
        self.runtime.attack = None;
        self.runtime.resume_state = if self.runtime.target.is_some() {
            EntityState::Chase
        } else {
            EntityState::Patrol
        };
        self.runtime.hurt_timer.start(duration);
        self.change_state(EntityState::Hurt);
    }

    /// Apply a hit. Rejected once dead; otherwise health drops, knockback is
    /// scaled by `1 - knockback_resistance`, and the enemy enters `Hurt` or `Dead`.
    pub fn take_damage(&mut self, hit: &HitInfo, ctx: &mut EnemyContext) -> DamageOutcome {
        if self.machine.is_dead() {
            return DamageOutcome::Rejected;
        }
        match self.behavior.screen_damage(&self.runtime, &self.config, hit) {
            DamageVerdict::Accept => {}
            DamageVerdict::Blocked => {
                debug!("Enemy {:?} blocked a hit", self.runtime.id);
                return DamageOutcome::Blocked;
            }
            DamageVerdict::Ignored => return DamageOutcome::Ignored,
        }

        self.runtime.health = self.runtime.health.saturating_sub(hit.damage);
        let cap = ctx.tuning.max_knockback_velocity;
        self.runtime.knockback = hit
            .knockback_velocity(self.config.knockback_resistance)
            .clamp(-cap, cap);

        if self.runtime.health == 0 {
            self.die(ctx.bus);
            return DamageOutcome::Killed;
        }

        if let Some(source) = hit.source
            && ctx.targets.iter().any(|t| t.entity == source)
        {
            self.runtime.target = Some(source);
        }

        self.behavior.on_damaged(&mut self.runtime, hit, ctx.bus);
        self.enter_hurt(ctx.tuning.hurt_duration);
        debug!(
            "Enemy {:?} took {} damage, {} left, knockback {:.1}",
            self.runtime.id, hit.damage, self.runtime.health, self.runtime.knockback
        );
        DamageOutcome::Damaged
    }

    /// Stop every timer, disable collision and announce the death.
    fn die(&mut self, bus: &mut dyn CombatEventBus) {
        self.change_state(EntityState::Dead);
        self.runtime.stop_timers();
        self.runtime.collision_enabled = false;
        self.runtime.target = None;
        self.runtime.velocity = Vec2::ZERO;
        self.runtime.knockback = 0.0;
        self.behavior.on_death(&mut self.runtime, bus);
        bus.report_death(DeathNotice {
            entity: self.runtime.id,
            score: self.config.score_value,
            archetype: self.runtime.kind.clone(),
            position: self.runtime.position,
        });
    }

    /// Resolve the player's body touching this enemy.
    pub fn resolve_body_contact(
        &mut self,
        player: &TargetView,
        normal: Vec2,
        ctx: &mut EnemyContext,
    ) -> ContactOutcome {
        if !self.is_tangible() {
            return ContactOutcome::Ignored;
        }
        let contact = classify_body_contact(normal, player.velocity, ctx.tuning.stomp_normal_tolerance);
        match contact {
            BodyContact::Stomp if self.behavior.stompable(&self.config) => {
                self.take_damage(&HitInfo::lethal(Some(player.entity)), ctx);
                ctx.bus
                    .bounce_target(player.entity, ctx.tuning.stomp_bounce_impulse);
                debug!("Enemy {:?} stomped by {:?}", self.runtime.id, player.entity);
                ContactOutcome::Stomped
            }
            BodyContact::Stomp => {
                self.deal_contact_damage(player, ctx.bus);
                ContactOutcome::StompPunished
            }
            BodyContact::Touch => {
                if self.deal_contact_damage(player, ctx.bus) {
                    ContactOutcome::PlayerHurt
                } else {
                    ContactOutcome::Ignored
                }
            }
        }
    }

    fn deal_contact_damage(&self, player: &TargetView, bus: &mut dyn CombatEventBus) -> bool {
        if self.config.contact_damage == 0 {
            return false;
        }
        bus.hit_target(
            player.entity,
            HitInfo::between(
                self.config.contact_damage,
                self.config.attack_knockback,
                self.runtime.position,
                player.position,
                Some(self.runtime.id),
            ),
        );
        true
    }

    /// Forward a grab escape input to the archetype.
    pub fn register_escape_attempt(&mut self, player: Entity, bus: &mut dyn CombatEventBus) -> bool {
        if self.machine.is_dead() {
            return false;
        }
        self.behavior
            .on_escape_attempt(&mut self.runtime, player, bus)
    }
}
