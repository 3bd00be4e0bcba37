//! Enemies domain: grab, carry and throw.

use bevy::prelude::*;

use crate::combat::{HitInfo, PeriodicDamage, TargetView, resolve_target};
use crate::core::{CombatEventBus, Countdown, GrabNotice};
use crate::enemies::behavior::{
    Archetype, BehaviorControl, EnemyBehavior, EnemyContext, STRIKE_REACH,
};
use crate::enemies::config::EnemyConfig;
use crate::enemies::runtime::{AttackPayload, AttackProfile, EnemyRuntime};

/// Seconds a grappler stays stunned after the player breaks free.
pub const ESCAPE_STUN: f32 = 1.0;

#[derive(Debug, Clone)]
struct Hold {
    target: Entity,
    escapes: u32,
    carry: Countdown,
}

/// Grabs the player, squeezes them while carrying, then throws them. Enough
/// escape inputs break the hold and stun the grappler.
#[derive(Debug, Clone)]
pub struct Grappler {
    escape_attempts: u32,
    carry_time: f32,
    throw_force: f32,
    squeeze: PeriodicDamage,
    hold: Option<Hold>,
    pending_stun: bool,
}

impl Grappler {
    pub fn new(
        escape_attempts: u32,
        carry_time: f32,
        squeeze_interval: f32,
        squeeze_damage: u32,
        throw_force: f32,
    ) -> Self {
        Self {
            escape_attempts: escape_attempts.max(1),
            carry_time: carry_time.max(0.0),
            throw_force: throw_force.max(0.0),
            squeeze: PeriodicDamage::new(squeeze_interval, HitInfo::new(squeeze_damage, 0.0, 0.0, None)),
            hold: None,
            pending_stun: false,
        }
    }

    pub fn holding(&self) -> Option<Entity> {
        self.hold.as_ref().map(|h| h.target)
    }

    fn release(&mut self, me: &EnemyRuntime, escaped: bool, bus: &mut dyn CombatEventBus) {
        self.squeeze.stop();
        if let Some(hold) = self.hold.take() {
            debug!("Grappler {:?} released {:?} (escaped: {})", me.id, hold.target, escaped);
            bus.notify_grab(GrabNotice::Released {
                grabber: me.id,
                target: hold.target,
                escaped,
            });
        }
    }

    fn carry_point(me: &EnemyRuntime, config: &EnemyConfig) -> Vec2 {
        me.position + Vec2::new(me.facing.sign() * config.attack_range * 0.5, 0.0)
    }
}

impl EnemyBehavior for Grappler {
    fn archetype(&self) -> Archetype {
        Archetype::Grappler
    }

    fn pre_tick(
        &mut self,
        dt: f32,
        me: &mut EnemyRuntime,
        config: &EnemyConfig,
        ctx: &mut EnemyContext,
    ) -> BehaviorControl {
        if self.pending_stun {
            self.pending_stun = false;
            return BehaviorControl::Stun(ESCAPE_STUN);
        }
        let Some(held) = self.holding() else {
            return BehaviorControl::Continue;
        };
        let Some(target) = resolve_target(Some(held), ctx.targets) else {
            self.squeeze.stop();
            self.hold = None;
            return BehaviorControl::Continue;
        };

        me.velocity = Vec2::ZERO;
        ctx.bus.notify_grab(GrabNotice::Carried {
            grabber: me.id,
            target: held,
            position: Self::carry_point(me, config),
        });
        if let Some(hit) = self.squeeze.tick(dt) {
            ctx.bus.hit_target(held, hit);
        }

        let thrown = self.hold.as_mut().is_some_and(|h| {
            h.carry.tick(dt);
            h.carry.is_finished()
        });
        if thrown {
            let hit = HitInfo::new(
                self.squeeze.hit().damage,
                self.throw_force,
                me.facing.sign(),
                Some(me.id),
            )
            .with_origin(me.position);
            ctx.bus.hit_target(target.entity, hit);
            self.release(me, false, ctx.bus);
        }
        BehaviorControl::Handled
    }

    fn can_attack(&self, _me: &EnemyRuntime) -> bool {
        self.hold.is_none()
    }

    fn attack_profile(&self, config: &EnemyConfig) -> AttackProfile {
        AttackProfile {
            windup: 0.0,
            recover: config.post_attack_hold,
            payload: AttackPayload::Grab,
        }
    }

    fn strike(
        &mut self,
        me: &mut EnemyRuntime,
        config: &EnemyConfig,
        target: Option<TargetView>,
        _payload: &AttackPayload,
        ctx: &mut EnemyContext,
    ) {
        let Some(target) = target else {
            return;
        };
        if me.position.distance(target.position) > config.attack_range * STRIKE_REACH {
            return;
        }
        self.hold = Some(Hold {
            target: target.entity,
            escapes: 0,
            carry: Countdown::new(self.carry_time),
        });
        let hit = HitInfo {
            source: Some(me.id),
            ..self.squeeze.hit().clone()
        };
        self.squeeze.set_hit(hit);
        self.squeeze.start();
        debug!("Grappler {:?} grabbed {:?}", me.id, target.entity);
        ctx.bus.notify_grab(GrabNotice::Grabbed {
            grabber: me.id,
            target: target.entity,
        });
    }

    fn on_escape_attempt(
        &mut self,
        me: &mut EnemyRuntime,
        player: Entity,
        bus: &mut dyn CombatEventBus,
    ) -> bool {
        let limit = self.escape_attempts;
        let Some(hold) = self.hold.as_mut().filter(|h| h.target == player) else {
            return false;
        };
        hold.escapes += 1;
        if hold.escapes >= limit {
            self.release(me, true, bus);
            self.pending_stun = true;
        }
        true
    }

    fn on_damaged(&mut self, me: &mut EnemyRuntime, _hit: &HitInfo, bus: &mut dyn CombatEventBus) {
        self.release(me, false, bus);
    }

    fn on_death(&mut self, me: &mut EnemyRuntime, bus: &mut dyn CombatEventBus) {
        self.pending_stun = false;
        self.release(me, false, bus);
    }
}
