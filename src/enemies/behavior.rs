//! Enemies domain: the archetype override seam.
//!
//! `EnemyEngine` runs the shared per-tick contract; each archetype is an
//! `EnemyBehavior` that overrides only the steps it changes.

use bevy::prelude::*;

use crate::combat::{EntityState, HitInfo, LevelGeometry, Team, TargetView};
use crate::core::{CombatEventBus, CombatTuning};
use crate::enemies::config::EnemyConfig;
use crate::enemies::runtime::{AttackPayload, AttackProfile, AttackStage, EnemyRuntime};
use crate::projectiles::ProjectileSpec;

/// A contact strike lands if the target is within this multiple of attack range.
pub const STRIKE_REACH: f32 = 1.25;

/// Horizontal distance under which a ground chaser stops closing in.
pub const CHASE_DEADZONE: f32 = 4.0;

/// Everything an enemy may read or notify during one tick.
pub struct EnemyContext<'a> {
    pub now: f64,
    pub targets: &'a [TargetView],
    pub geometry: &'a dyn LevelGeometry,
    pub tuning: &'a CombatTuning,
    pub bus: &'a mut dyn CombatEventBus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BehaviorControl {
    /// Run the shared per-tick contract
    Continue,
    /// The archetype handled this tick itself
    Handled,
    /// Enter `Hurt` for this many seconds
    Stun(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageVerdict {
    Accept,
    /// Stopped by a shield; the hit had a valid target
    Blocked,
    /// Passed straight through (intangible)
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Walker,
    Flyer,
    Spitter,
    Blinker,
    Shieldbearer,
    Wraith,
    Grappler,
}

pub trait EnemyBehavior: Send + Sync + std::fmt::Debug + 'static {
    fn archetype(&self) -> Archetype;

    /// Detection predicate layered over the range check. Ground enemies do not
    /// notice targets standing well above them.
    fn can_perceive(&self, me: &EnemyRuntime, config: &EnemyConfig, target: &TargetView) -> bool {
        ground_perception(me, config, target)
    }

    /// Moves in both axes (ignores gravity-bound ground movement)
    fn planar(&self) -> bool {
        false
    }

    fn chase_speed_factor(&self, _me: &EnemyRuntime) -> f32 {
        1.0
    }

    fn chase_velocity(&self, me: &EnemyRuntime, config: &EnemyConfig, target: &TargetView) -> Vec2 {
        pursuit_velocity(
            me.position,
            target.position,
            config.move_speed * self.chase_speed_factor(me),
            self.planar(),
        )
    }

    fn on_state_enter(&mut self, _state: EntityState, _me: &mut EnemyRuntime, _config: &EnemyConfig) {}

    fn on_state_exit(&mut self, _state: EntityState, _me: &mut EnemyRuntime, _config: &EnemyConfig) {}

    /// Runs before the shared contract each live tick.
    fn pre_tick(
        &mut self,
        _dt: f32,
        _me: &mut EnemyRuntime,
        _config: &EnemyConfig,
        _ctx: &mut EnemyContext,
    ) -> BehaviorControl {
        BehaviorControl::Continue
    }

    fn can_attack(&self, _me: &EnemyRuntime) -> bool {
        true
    }

    fn attack_profile(&self, config: &EnemyConfig) -> AttackProfile {
        AttackProfile::contact(config.post_attack_hold)
    }

    /// Deliver the strike stage of an attack.
    fn strike(
        &mut self,
        me: &mut EnemyRuntime,
        config: &EnemyConfig,
        target: Option<TargetView>,
        payload: &AttackPayload,
        ctx: &mut EnemyContext,
    ) {
        default_strike(me, config, target, payload, ctx);
    }

    /// Velocity while an attack is in flight.
    fn attack_velocity(&self, _stage: AttackStage, _me: &EnemyRuntime, _config: &EnemyConfig) -> Vec2 {
        Vec2::ZERO
    }

    fn screen_damage(&self, _me: &EnemyRuntime, _config: &EnemyConfig, _hit: &HitInfo) -> DamageVerdict {
        DamageVerdict::Accept
    }

    /// Intangible enemies neither deal nor receive contact.
    fn is_tangible(&self, _me: &EnemyRuntime) -> bool {
        true
    }

    fn stompable(&self, config: &EnemyConfig) -> bool {
        config.can_be_stomped
    }

    /// A grabbed player tried to break free. Returns true if it counted.
    fn on_escape_attempt(
        &mut self,
        _me: &mut EnemyRuntime,
        _player: Entity,
        _bus: &mut dyn CombatEventBus,
    ) -> bool {
        false
    }

    fn on_damaged(&mut self, _me: &mut EnemyRuntime, _hit: &HitInfo, _bus: &mut dyn CombatEventBus) {}

    fn on_death(&mut self, _me: &mut EnemyRuntime, _bus: &mut dyn CombatEventBus) {}
}

/// Ground line-of-sight rule: reject targets more than `vertical_reach` above.
pub fn ground_perception(me: &EnemyRuntime, config: &EnemyConfig, target: &TargetView) -> bool {
    target.position.y - me.position.y <= config.vertical_reach
}

/// Unit vector of `delta`, or `fallback` when `delta` has no length.
pub fn direction_or(delta: Vec2, fallback: Vec2) -> Vec2 {
    let direction = delta.normalize_or_zero();
    if direction == Vec2::ZERO {
        fallback
    } else {
        direction
    }
}

/// Move toward `to` at `speed`. Ground movers only close the x gap.
pub fn pursuit_velocity(from: Vec2, to: Vec2, speed: f32, planar: bool) -> Vec2 {
    if planar {
        return (to - from).normalize_or_zero() * speed;
    }
    let dx = to.x - from.x;
    if dx.abs() <= CHASE_DEADZONE {
        Vec2::ZERO
    } else {
        Vec2::new(dx.signum() * speed, 0.0)
    }
}

/// Shared strike: melee hit-test or a single aimed projectile.
/// Returns whether anything was delivered.
pub fn default_strike(
    me: &EnemyRuntime,
    config: &EnemyConfig,
    target: Option<TargetView>,
    payload: &AttackPayload,
    ctx: &mut EnemyContext,
) -> bool {
    let Some(target) = target else {
        return false;
    };
    match payload {
        AttackPayload::Contact | AttackPayload::Grab => {
            if me.position.distance(target.position) > config.attack_range * STRIKE_REACH {
                return false;
            }
            let hit = HitInfo::between(
                config.contact_damage,
                config.attack_knockback,
                me.position,
                target.position,
                Some(me.id),
            );
            ctx.bus.hit_target(target.entity, hit);
            true
        }
        AttackPayload::Projectile(profile) => {
            let direction = direction_or(target.position - me.position, me.facing.as_vec2());
            ctx.bus.spawn_projectile(ProjectileSpec::from_profile(
                profile,
                me.position,
                direction,
                Some(me.id),
                Team::Enemy,
                Some(target.entity),
            ));
            true
        }
    }
}
