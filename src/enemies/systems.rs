//! Enemies domain: systems driving `EnemyEngine` components.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::combat::{
    ArenaBounds, CombatTarget, ContactOutcome, Corpse, LedgeProbe, Player, ProbedGeometry,
    TargetQuery, target_snapshot,
};
use crate::content::ContentRegistry;
use crate::core::{
    CombatOutbox, CombatTuning, ContactEvent, Countdown, DamageEvent, EnemyDiedEvent,
    EscapeAttemptEvent, SimClock, SpawnRequestEvent,
};
use crate::enemies::behavior::EnemyContext;
use crate::enemies::engine::{DamageOutcome, EnemyEngine};
use crate::enemies::spawn::{Enemy, minion_positions, spawn_minion};

/// Apply weapon damage addressed to enemies.
pub(crate) fn apply_enemy_damage(
    clock: Res<SimClock>,
    tuning: Res<CombatTuning>,
    bounds: Res<ArenaBounds>,
    targets: TargetQuery,
    mut outbox: ResMut<CombatOutbox>,
    mut damage: MessageReader<DamageEvent>,
    mut enemies: Query<(&mut EnemyEngine, Option<&LedgeProbe>)>,
) {
    let views = target_snapshot(&targets);
    for event in damage.read() {
        let Ok((mut engine, probe)) = enemies.get_mut(event.target) else {
            continue;
        };
        let geometry = ProbedGeometry {
            bounds: &bounds,
            probe: probe.copied(),
        };
        let mut ctx = EnemyContext {
            now: clock.now,
            targets: &views,
            geometry: &geometry,
            tuning: &tuning,
            bus: &mut *outbox,
        };
        match engine.take_damage(&event.hit, &mut ctx) {
            DamageOutcome::Killed => {
                debug!("Enemy {:?} killed by {:?}", event.target, event.hit.source)
            }
            DamageOutcome::Blocked => debug!("Enemy {:?} blocked {:?}", event.target, event.hit),
            _ => {}
        }
    }
}

/// Player body touching an enemy body: stomp or contact damage.
pub(crate) fn resolve_enemy_body_contacts(
    clock: Res<SimClock>,
    tuning: Res<CombatTuning>,
    bounds: Res<ArenaBounds>,
    targets: TargetQuery,
    players: Query<(), With<Player>>,
    mut outbox: ResMut<CombatOutbox>,
    mut contacts: MessageReader<ContactEvent>,
    mut enemies: Query<(&mut EnemyEngine, Option<&LedgeProbe>)>,
) {
    let views = target_snapshot(&targets);
    for contact in contacts.read() {
        if !players.contains(contact.subject) {
            continue;
        }
        let Ok((mut engine, probe)) = enemies.get_mut(contact.other) else {
            continue;
        };
        let Some(player) = views.iter().find(|v| v.entity == contact.subject).copied() else {
            continue;
        };
        let geometry = ProbedGeometry {
            bounds: &bounds,
            probe: probe.copied(),
        };
        let mut ctx = EnemyContext {
            now: clock.now,
            targets: &views,
            geometry: &geometry,
            tuning: &tuning,
            bus: &mut *outbox,
        };
        // Contact normals point subject to other; stomp checks want enemy to player.
        let outcome = engine.resolve_body_contact(&player, -contact.normal, &mut ctx);
        if outcome != ContactOutcome::Ignored {
            debug!(
                "Player {:?} contact with enemy {:?}: {:?}",
                contact.subject, contact.other, outcome
            );
        }
    }
}

pub(crate) fn forward_escape_attempts(
    mut attempts: MessageReader<EscapeAttemptEvent>,
    mut outbox: ResMut<CombatOutbox>,
    mut enemies: Query<&mut EnemyEngine>,
) {
    for attempt in attempts.read() {
        for mut engine in &mut enemies {
            if engine.register_escape_attempt(attempt.player, &mut *outbox) {
                break;
            }
        }
    }
}

/// Run one tick of every enemy and hand the result to the motion owner.
pub(crate) fn update_enemies(
    time: Res<Time>,
    clock: Res<SimClock>,
    tuning: Res<CombatTuning>,
    bounds: Res<ArenaBounds>,
    targets: TargetQuery,
    mut outbox: ResMut<CombatOutbox>,
    mut enemies: Query<
        (
            &mut EnemyEngine,
            &mut Transform,
            Option<&mut LinearVelocity>,
            Option<&LedgeProbe>,
        ),
        Without<CombatTarget>,
    >,
) {
    let dt = time.delta_secs();
    let views = target_snapshot(&targets);

    for (mut engine, mut transform, velocity, probe) in &mut enemies {
        engine.runtime.position = transform.translation.truncate();
        let geometry = ProbedGeometry {
            bounds: &bounds,
            probe: probe.copied(),
        };
        let mut ctx = EnemyContext {
            now: clock.now,
            targets: &views,
            geometry: &geometry,
            tuning: &tuning,
            bus: &mut *outbox,
        };
        engine.update(dt, &mut ctx);

        if let Some(destination) = engine.runtime.take_teleport() {
            transform.translation.x = destination.x;
            transform.translation.y = destination.y;
            if let Some(mut velocity) = velocity {
                velocity.0 = Vec2::ZERO;
            }
            continue;
        }

        let desired = engine.runtime.velocity;
        match velocity {
            // Ground movers leave vertical motion to gravity.
            Some(mut velocity) if engine.behavior().planar() || engine.is_dead() => {
                velocity.0 = desired;
            }
            Some(mut velocity) => velocity.0.x = desired.x,
            None => {
                engine.integrate(dt);
                let z = transform.translation.z;
                transform.translation = engine.runtime.position.extend(z);
            }
        }
    }
}

pub(crate) fn mark_enemy_corpses(
    mut commands: Commands,
    tuning: Res<CombatTuning>,
    mut deaths: MessageReader<EnemyDiedEvent>,
    enemies: Query<(), (With<Enemy>, Without<Corpse>)>,
) {
    for death in deaths.read() {
        if !enemies.contains(death.entity) {
            continue;
        }
        info!(
            "Enemy {:?} ({}) defeated, +{} score",
            death.entity, death.archetype, death.score
        );
        if let Ok(mut entity) = commands.get_entity(death.entity) {
            entity.insert(Corpse {
                timer: Countdown::new(tuning.corpse_duration),
            });
        }
    }
}

/// Default entity factory for spawn requests naming enemy content ids.
pub(crate) fn spawn_requested_enemies(
    mut commands: Commands,
    registry: Option<Res<ContentRegistry>>,
    bounds: Res<ArenaBounds>,
    mut requests: MessageReader<SpawnRequestEvent>,
) {
    for event in requests.read() {
        let request = &event.request;
        let Some(def) = registry.as_ref().and_then(|r| r.enemies.get(&request.kind)) else {
            warn!("Spawn request for unknown enemy '{}'", request.kind);
            continue;
        };
        for position in minion_positions(request.position, request.count, request.spacing, &bounds) {
            spawn_minion(&mut commands, def, position, request.requester);
        }
    }
}

pub(crate) fn remove_corpses(
    mut commands: Commands,
    time: Res<Time>,
    mut corpses: Query<(Entity, &mut Corpse)>,
) {
    let dt = time.delta_secs();
    for (entity, mut corpse) in &mut corpses {
        corpse.timer.tick(dt);
        if corpse.timer.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}
