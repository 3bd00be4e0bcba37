//! Projectiles domain: spawning, flight, contacts and cleanup.

use avian2d::prelude::*;
use bevy::ecs::message::{Message, MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::boss::BossEngine;
use crate::combat::{
    CombatTarget, PlayerAttackHitbox, TargetQuery, TargetView, Team, Wall, target_snapshot,
};
use crate::core::{
    BossCue, BossCueEvent, CombatOutbox, ContactEvent, EnemyDiedEvent, ProjectileParriedEvent,
};
use crate::enemies::EnemyEngine;
use crate::projectiles::projectile::{Projectile, ProjectileContact, ProjectileOutcome, ProjectileSpec};

#[derive(Bundle)]
pub struct ProjectileBundle {
    pub projectile: Projectile,
    pub team: Team,
    pub transform: Transform,
}

impl ProjectileBundle {
    pub fn new(spec: &ProjectileSpec) -> Self {
        Self {
            projectile: Projectile::new(spec),
            team: spec.team,
            transform: Transform::from_xyz(spec.origin.x, spec.origin.y, 0.0),
        }
    }
}

pub fn spawn_projectile(commands: &mut Commands, spec: &ProjectileSpec) -> Entity {
    let entity = commands.spawn(ProjectileBundle::new(spec)).id();
    debug!(
        "Spawned projectile {:?} from {:?} ({:?})",
        entity, spec.owner, spec.motion
    );
    entity
}

/// Velocity is written every tick, not once at spawn.
pub(crate) fn fly_projectiles(
    time: Res<Time>,
    targets: TargetQuery,
    mut projectiles: Query<
        (&mut Projectile, &mut Transform, Option<&mut LinearVelocity>),
        Without<CombatTarget>,
    >,
) {
    let dt = time.delta_secs();
    let views = target_snapshot(&targets);

    for (mut projectile, mut transform, velocity) in &mut projectiles {
        let position = transform.translation.truncate();
        let tracked: Option<&TargetView> = projectile
            .target()
            .and_then(|target| views.iter().find(|view| view.entity == target));
        let desired = projectile.tick(dt, position, tracked);
        match velocity {
            Some(mut velocity) => velocity.0 = desired,
            None => transform.translation += (desired * dt).extend(0.0),
        }
    }
}

pub(crate) fn resolve_projectile_contacts(
    mut contacts: MessageReader<ContactEvent>,
    mut outbox: ResMut<CombatOutbox>,
    mut projectiles: Query<(&mut Projectile, &Transform)>,
    walls: Query<(), With<Wall>>,
    hitboxes: Query<&PlayerAttackHitbox>,
    bodies: Query<(&Team, &Transform, Option<&EnemyEngine>, Option<&BossEngine>)>,
) {
    for contact in contacts.read() {
        let Ok((mut projectile, transform)) = projectiles.get_mut(contact.subject) else {
            continue;
        };
        let classified = if walls.contains(contact.other) {
            ProjectileContact::Wall
        } else if let Ok(hitbox) = hitboxes.get(contact.other) {
            ProjectileContact::AttackHitbox {
                owner: hitbox.owner,
            }
        } else if let Ok((team, body, enemy, boss)) = bodies.get(contact.other) {
            let tangible = enemy.is_none_or(|e| e.is_tangible())
                && boss.is_none_or(|b| b.collision_enabled());
            ProjectileContact::Body {
                entity: contact.other,
                team: *team,
                position: body.translation.truncate(),
                tangible,
            }
        } else {
            continue;
        };

        let outcome = projectile.resolve_contact(
            contact.subject,
            transform.translation.truncate(),
            classified,
            &mut *outbox,
        );
        if outcome == ProjectileOutcome::Hit {
            debug!("Projectile {:?} hit {:?}", contact.subject, contact.other);
        }
    }
}

/// Shots die with whoever fired them.
pub(crate) fn destroy_orphaned_projectiles(
    mut deaths: MessageReader<EnemyDiedEvent>,
    mut cues: MessageReader<BossCueEvent>,
    mut projectiles: Query<&mut Projectile>,
) {
    let mut owners: Vec<Entity> = deaths.read().map(|event| event.entity).collect();
    owners.extend(
        cues.read()
            .filter(|event| event.cue == BossCue::DefeatStarted)
            .map(|event| event.boss),
    );
    if owners.is_empty() {
        return;
    }
    for mut projectile in &mut projectiles {
        if projectile.owner().is_some_and(|owner| owners.contains(&owner)) {
            projectile.destroy();
        }
    }
}

pub(crate) fn log_parries(mut parries: MessageReader<ProjectileParriedEvent>) {
    for parry in parries.read() {
        debug!(
            "Projectile {:?} parried by {:?} at {:?}",
            parry.projectile, parry.by, parry.position
        );
    }
}

pub(crate) fn cleanup_projectiles(
    mut commands: Commands,
    projectiles: Query<(Entity, &Projectile)>,
    mut writer: MessageWriter<ProjectileDespawned>,
) {
    for (entity, projectile) in &projectiles {
        if !projectile.is_alive() {
            commands.entity(entity).despawn();
            writer.write(ProjectileDespawned { entity });
        }
    }
}

/// A spent projectile was removed this tick.
#[derive(Debug, Clone, Copy)]
pub struct ProjectileDespawned {
    pub entity: Entity,
}

impl Message for ProjectileDespawned {}
