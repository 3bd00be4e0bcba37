//! Combat domain: contact translation, outbox dispatch and bookkeeping.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::components::{Combatant, PlayerAttackHitbox, SummonedBy, Team};
use crate::combat::hit::HitInfo;
use crate::combat::resources::CombatLedger;
use crate::core::{
    BossCue, BossCueEvent, BossDefeatedEvent, BossEncounterEvent, BossNotice, BossPhaseChangeEvent,
    CombatOutbound, CombatOutbox, ContactEvent, DamageEvent, DoorSignalEvent, EnemyDiedEvent,
    GrabEvent, GrabNotice, PlayerBounceEvent, PlayerHitEvent, ProjectileParriedEvent,
    SpawnRequestEvent, TelegraphEvent,
};
use crate::projectiles::spawn_projectile;

/// A player attack hitbox overlapping an enemy-side combatant becomes a
/// `DamageEvent`. Each hitbox damages a given target once.
pub(crate) fn translate_hitbox_contacts(
    mut contacts: MessageReader<ContactEvent>,
    mut damage: MessageWriter<DamageEvent>,
    mut hitboxes: Query<(&mut PlayerAttackHitbox, &Transform)>,
    victims: Query<(&Team, &Transform), (With<Combatant>, Without<PlayerAttackHitbox>)>,
) {
    for contact in contacts.read() {
        let Ok((mut hitbox, hitbox_transform)) = hitboxes.get_mut(contact.subject) else {
            continue;
        };
        let Ok((team, victim)) = victims.get(contact.other) else {
            continue;
        };
        if !team.opposes(Team::Player) || hitbox.hit_entities.contains(&contact.other) {
            continue;
        }
        hitbox.hit_entities.push(contact.other);
        let hit = HitInfo::between(
            hitbox.damage,
            hitbox.knockback,
            hitbox_transform.translation.truncate(),
            victim.translation.truncate(),
            Some(hitbox.owner),
        );
        damage.write(DamageEvent {
            target: contact.other,
            hit,
        });
    }
}

#[derive(SystemParam)]
pub(crate) struct CombatWriters<'w> {
    died: MessageWriter<'w, EnemyDiedEvent>,
    player_hit: MessageWriter<'w, PlayerHitEvent>,
    bounce: MessageWriter<'w, PlayerBounceEvent>,
    spawn: MessageWriter<'w, SpawnRequestEvent>,
    door: MessageWriter<'w, DoorSignalEvent>,
    encounter: MessageWriter<'w, BossEncounterEvent>,
    phase: MessageWriter<'w, BossPhaseChangeEvent>,
    defeated: MessageWriter<'w, BossDefeatedEvent>,
    cue: MessageWriter<'w, BossCueEvent>,
    telegraph: MessageWriter<'w, TelegraphEvent>,
    parried: MessageWriter<'w, ProjectileParriedEvent>,
    grab: MessageWriter<'w, GrabEvent>,
}

/// Drain everything engines reported this tick into messages and spawns.
pub(crate) fn flush_outbox(
    mut commands: Commands,
    mut outbox: ResMut<CombatOutbox>,
    mut writers: CombatWriters,
    summoned: Query<&SummonedBy>,
    transforms: Query<&Transform>,
) {
    for event in outbox.drain() {
        match event {
            CombatOutbound::Death(notice) => {
                writers.died.write(EnemyDiedEvent {
                    entity: notice.entity,
                    score: notice.score,
                    archetype: notice.archetype,
                    position: notice.position,
                    summoner: summoned.get(notice.entity).ok().map(|s| s.0),
                });
            }
            CombatOutbound::TargetHit { target, hit } => {
                writers.player_hit.write(PlayerHitEvent { target, hit });
            }
            CombatOutbound::TargetBounced { target, impulse } => {
                writers.bounce.write(PlayerBounceEvent { target, impulse });
            }
            CombatOutbound::Spawn(request) => {
                writers.spawn.write(SpawnRequestEvent { request });
            }
            CombatOutbound::Projectile(spec) => {
                spawn_projectile(&mut commands, &spec);
            }
            CombatOutbound::Door(signal) => {
                debug!("Door signal: {:?}", signal);
                writers.door.write(DoorSignalEvent { signal });
            }
            CombatOutbound::Boss(notice) => dispatch_boss_notice(notice, &mut writers),
            CombatOutbound::Telegraph(telegraph) => {
                writers.telegraph.write(TelegraphEvent {
                    owner: telegraph.owner,
                    position: telegraph.position,
                    radius: telegraph.radius,
                    duration: telegraph.duration,
                });
            }
            CombatOutbound::Grab(notice) => {
                writers.grab.write(match notice {
                    GrabNotice::Grabbed { grabber, target } => GrabEvent::Grabbed { grabber, target },
                    GrabNotice::Carried {
                        grabber,
                        target,
                        position,
                    } => GrabEvent::Carried {
                        grabber,
                        target,
                        position,
                    },
                    GrabNotice::Released {
                        grabber,
                        target,
                        escaped,
                    } => GrabEvent::Released {
                        grabber,
                        target,
                        escaped,
                    },
                });
            }
            CombatOutbound::Parried { projectile, by } => {
                let position = transforms
                    .get(projectile)
                    .map_or(Vec2::ZERO, |t| t.translation.truncate());
                writers.parried.write(ProjectileParriedEvent {
                    projectile,
                    by,
                    position,
                });
            }
        }
    }
}

fn dispatch_boss_notice(notice: BossNotice, writers: &mut CombatWriters) {
    match notice {
        BossNotice::EncounterStarted { boss, name } => {
            writers.encounter.write(BossEncounterEvent { boss, name });
        }
        BossNotice::PhaseChanged { boss, from, to } => {
            writers.phase.write(BossPhaseChangeEvent { boss, from, to });
        }
        BossNotice::Defeated {
            boss,
            score,
            unlocks,
        } => {
            writers.defeated.write(BossDefeatedEvent {
                boss,
                score,
                unlocks,
            });
        }
        BossNotice::TransitionStarted { boss, from, to } => {
            writers.cue.write(BossCueEvent {
                boss,
                cue: BossCue::TransitionStarted { from, to },
            });
        }
        BossNotice::VulnerabilityOpened { boss, duration } => {
            writers.cue.write(BossCueEvent {
                boss,
                cue: BossCue::VulnerabilityOpened { duration },
            });
        }
        BossNotice::DefeatStarted { boss } => {
            writers.cue.write(BossCueEvent {
                boss,
                cue: BossCue::DefeatStarted,
            });
        }
        BossNotice::DefeatStage { boss, stage } => {
            writers.cue.write(BossCueEvent {
                boss,
                cue: BossCue::DefeatStage { stage },
            });
        }
    }
}

pub(crate) fn record_ledger(
    mut ledger: ResMut<CombatLedger>,
    mut deaths: MessageReader<EnemyDiedEvent>,
    mut defeats: MessageReader<BossDefeatedEvent>,
    mut hits: MessageReader<PlayerHitEvent>,
    mut parries: MessageReader<ProjectileParriedEvent>,
) {
    for death in deaths.read() {
        ledger.record_kill(death.score);
    }
    for defeat in defeats.read() {
        ledger.record_boss(defeat.score);
    }
    ledger.player_hits_taken += hits.read().filter(|hit| hit.hit.damage > 0).count() as u32;
    ledger.projectiles_parried += parries.read().count() as u32;
}
