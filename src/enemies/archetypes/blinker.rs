//! Enemies domain: teleport-on-proximity evasion.

use bevy::prelude::*;

use crate::combat::{Team, resolve_target};
use crate::core::Countdown;
use crate::enemies::behavior::{Archetype, BehaviorControl, EnemyBehavior, EnemyContext, direction_or};
use crate::enemies::config::{EnemyConfig, ProjectileProfile};
use crate::enemies::runtime::EnemyRuntime;
use crate::projectiles::ProjectileSpec;

/// Teleports past a pursued target once it gets close, optionally firing a bolt
/// back at it on arrival.
#[derive(Debug, Clone)]
pub struct Blinker {
    trigger_distance: f32,
    blink_distance: f32,
    blink_cooldown: f32,
    cooldown: Countdown,
    bolt: Option<ProjectileProfile>,
}

impl Blinker {
    pub fn new(
        trigger_distance: f32,
        blink_distance: f32,
        blink_cooldown: f32,
        bolt: Option<ProjectileProfile>,
    ) -> Self {
        Self {
            trigger_distance: trigger_distance.max(0.0),
            blink_distance: blink_distance.max(0.0),
            blink_cooldown: blink_cooldown.max(0.0),
            cooldown: Countdown::default(),
            bolt,
        }
    }

    pub fn ready(&self) -> bool {
        self.cooldown.is_finished()
    }
}

impl EnemyBehavior for Blinker {
    fn archetype(&self) -> Archetype {
        Archetype::Blinker
    }

    fn pre_tick(
        &mut self,
        dt: f32,
        me: &mut EnemyRuntime,
        _config: &EnemyConfig,
        ctx: &mut EnemyContext,
    ) -> BehaviorControl {
        self.cooldown.tick(dt);
        if !self.ready() || me.attack.is_some() || me.hurt_timer.is_running() {
            return BehaviorControl::Continue;
        }
        let Some(target) = resolve_target(me.target, ctx.targets) else {
            return BehaviorControl::Continue;
        };
        if me.position.distance(target.position) > self.trigger_distance {
            return BehaviorControl::Continue;
        }

        let side = if target.position.x >= me.position.x { 1.0 } else { -1.0 };
        let destination = ctx.geometry.clamp(Vec2::new(
            target.position.x + side * self.blink_distance,
            me.position.y,
        ));
        me.teleport_to(destination);
        me.face_toward(target.position);
        self.cooldown.start(self.blink_cooldown);
        debug!("Blinker {:?} blinked to {:?}", me.id, destination);

        if let Some(bolt) = &self.bolt {
            let direction = direction_or(target.position - me.position, me.facing.as_vec2());
            ctx.bus.spawn_projectile(ProjectileSpec::from_profile(
                bolt,
                me.position,
                direction,
                Some(me.id),
                Team::Enemy,
                Some(target.entity),
            ));
        }
        BehaviorControl::Handled
    }
}
