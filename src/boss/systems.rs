//! Boss domain: systems driving `BossEngine` components.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use std::collections::HashMap;

use crate::boss::engine::{BossContext, BossDamageOutcome, BossEngine};
use crate::combat::{
    CombatTarget, ContactOutcome, Corpse, Player, SummonedBy, TargetQuery, target_snapshot,
};
use crate::core::{
    BossDefeatedEvent, CombatOutbox, CombatTuning, ContactEvent, Countdown, DamageEvent,
    EngageBossEvent, SimClock,
};
use crate::enemies::EnemyEngine;

pub(crate) fn apply_boss_damage(
    clock: Res<SimClock>,
    targets: TargetQuery,
    mut outbox: ResMut<CombatOutbox>,
    mut damage: MessageReader<DamageEvent>,
    mut bosses: Query<&mut BossEngine>,
) {
    let views = target_snapshot(&targets);
    for event in damage.read() {
        let Ok(mut boss) = bosses.get_mut(event.target) else {
            continue;
        };
        let mut ctx = BossContext {
            now: clock.now,
            targets: &views,
            bus: &mut *outbox,
        };
        match boss.take_damage(&event.hit, &mut ctx) {
            BossDamageOutcome::Interrupted => {
                debug!("Boss {:?} cast interrupted", event.target)
            }
            BossDamageOutcome::Gated => debug!("Boss {:?} shrugged off a hit", event.target),
            _ => {}
        }
    }
}

pub(crate) fn resolve_boss_body_contacts(
    targets: TargetQuery,
    players: Query<(), With<Player>>,
    mut outbox: ResMut<CombatOutbox>,
    mut contacts: MessageReader<ContactEvent>,
    bosses: Query<&BossEngine>,
) {
    let views = target_snapshot(&targets);
    for contact in contacts.read() {
        if !players.contains(contact.subject) {
            continue;
        }
        let Ok(boss) = bosses.get(contact.other) else {
            continue;
        };
        let Some(player) = views.iter().find(|v| v.entity == contact.subject) else {
            continue;
        };
        if boss.resolve_body_contact(player, &mut *outbox) == ContactOutcome::PlayerHurt {
            debug!("Player {:?} touched boss {:?}", contact.subject, contact.other);
        }
    }
}

pub(crate) fn engage_requested_bosses(
    mut requests: MessageReader<EngageBossEvent>,
    mut outbox: ResMut<CombatOutbox>,
    mut bosses: Query<&mut BossEngine>,
) {
    for request in requests.read() {
        if let Ok(mut boss) = bosses.get_mut(request.boss) {
            boss.engage(&mut *outbox);
        }
    }
}

pub(crate) fn update_bosses(
    time: Res<Time>,
    clock: Res<SimClock>,
    targets: TargetQuery,
    mut outbox: ResMut<CombatOutbox>,
    mut bosses: Query<
        (&mut BossEngine, &mut Transform, Option<&mut LinearVelocity>),
        Without<CombatTarget>,
    >,
) {
    let dt = time.delta_secs();
    let views = target_snapshot(&targets);

    for (mut boss, mut transform, velocity) in &mut bosses {
        boss.position = transform.translation.truncate();
        let mut ctx = BossContext {
            now: clock.now,
            targets: &views,
            bus: &mut *outbox,
        };
        boss.update(dt, &mut ctx);

        let desired = boss.velocity;
        match velocity {
            Some(mut velocity) => velocity.0.x = desired.x,
            None => transform.translation += (desired * dt).extend(0.0),
        }
    }
}

/// Recount each boss's live minions from the summoned entities that exist.
///
/// Runs after spawn requests are applied, so minions that were never spawned
/// or were despawned without dying are not counted.
pub(crate) fn tally_boss_minions(
    minions: Query<(&SummonedBy, &EnemyEngine)>,
    mut bosses: Query<(Entity, &mut BossEngine)>,
) {
    let mut live: HashMap<Entity, u32> = HashMap::new();
    for (summoned_by, engine) in &minions {
        if !engine.is_dead() {
            *live.entry(summoned_by.0).or_default() += 1;
        }
    }
    for (entity, mut boss) in &mut bosses {
        let count = live.get(&entity).copied().unwrap_or(0);
        if boss.live_minions() != count {
            debug!(
                "Boss {:?} minions {} -> {}",
                entity,
                boss.live_minions(),
                count
            );
            boss.set_live_minions(count);
        }
    }
}

pub(crate) fn mark_boss_corpses(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    mut defeats: MessageReader<BossDefeatedEvent>,
) {
    for defeat in defeats.read() {
        if let Ok(mut entity) = commands.get_entity(defeat.boss) {
            entity.insert(Corpse {
                timer: Countdown::new(tuning.corpse_duration),
            });
        }
    }
}
