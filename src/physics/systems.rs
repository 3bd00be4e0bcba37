//! Physics domain: collider attachment, contact forwarding and probes.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::boss::{Boss, BossEngine};
use crate::combat::{BodySize, LedgeProbe};
use crate::core::ContactEvent;
use crate::enemies::{Enemy, EnemyEngine};
use crate::physics::GameLayer;
use crate::projectiles::Projectile;

/// Collider radius of every projectile
pub const PROJECTILE_RADIUS: f32 = 6.0;

/// How far below the front foot the ledge ray reaches
const LEDGE_RAY_DEPTH: f32 = 8.0;
/// How far past the body edge the wall ray reaches
const WALL_RAY_REACH: f32 = 4.0;

/// Unit normal from `from` toward `to`; coincident points fall back to up.
pub fn contact_normal(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).try_normalize().unwrap_or(Vec2::Y)
}

/// Ground movers fall under gravity; planar movers float.
pub fn enemy_body_kind(planar: bool) -> (RigidBody, GravityScale) {
    if planar {
        (RigidBody::Kinematic, GravityScale(0.0))
    } else {
        (RigidBody::Dynamic, GravityScale(1.0))
    }
}

/// Front-foot corner of a body facing `direction`.
pub fn ledge_probe_origin(position: Vec2, size: Vec2, direction: f32) -> Vec2 {
    let half = size * 0.5;
    position + Vec2::new(direction.signum() * half.x, -half.y)
}

pub(crate) fn attach_enemy_bodies(
    mut commands: Commands,
    enemies: Query<(Entity, &EnemyEngine, &BodySize), Added<Enemy>>,
) {
    for (entity, engine, size) in &enemies {
        let (body, gravity) = enemy_body_kind(engine.behavior().planar());
        commands.entity(entity).insert((
            body,
            Collider::rectangle(size.0.x, size.0.y),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Enemy,
                [
                    GameLayer::Ground,
                    GameLayer::Wall,
                    GameLayer::Player,
                    GameLayer::PlayerHitbox,
                ],
            ),
            LinearVelocity::default(),
            LockedAxes::ROTATION_LOCKED,
            gravity,
        ));
    }
}

pub(crate) fn attach_boss_bodies(
    mut commands: Commands,
    bosses: Query<(Entity, &BodySize), Added<Boss>>,
) {
    for (entity, size) in &bosses {
        commands.entity(entity).insert((
            RigidBody::Kinematic,
            Collider::rectangle(size.0.x, size.0.y),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Enemy,
                [GameLayer::Player, GameLayer::PlayerHitbox, GameLayer::Wall],
            ),
            LinearVelocity::default(),
            LockedAxes::ROTATION_LOCKED,
        ));
    }
}

pub(crate) fn attach_projectile_bodies(
    mut commands: Commands,
    projectiles: Query<Entity, Added<Projectile>>,
) {
    for entity in &projectiles {
        commands.entity(entity).insert((
            RigidBody::Kinematic,
            Collider::circle(PROJECTILE_RADIUS),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Projectile,
                [
                    GameLayer::Wall,
                    GameLayer::Ground,
                    GameLayer::Player,
                    GameLayer::Enemy,
                    GameLayer::PlayerHitbox,
                ],
            ),
            LinearVelocity::default(),
        ));
    }
}

/// Every collision start becomes a contact in both directions.
pub(crate) fn forward_collisions(
    mut collisions: MessageReader<CollisionStart>,
    mut contacts: MessageWriter<ContactEvent>,
    transforms: Query<&Transform>,
) {
    for event in collisions.read() {
        let (a, b) = (event.collider1, event.collider2);
        let normal = match (transforms.get(a), transforms.get(b)) {
            (Ok(ta), Ok(tb)) => {
                contact_normal(ta.translation.truncate(), tb.translation.truncate())
            }
            _ => Vec2::Y,
        };
        contacts.write(ContactEvent {
            subject: a,
            other: b,
            normal,
        });
        contacts.write(ContactEvent {
            subject: b,
            other: a,
            normal: -normal,
        });
    }
}

pub(crate) fn probe_ledges(
    spatial_query: SpatialQuery,
    mut enemies: Query<(&Transform, &BodySize, &EnemyEngine, &mut LedgeProbe)>,
) {
    let ground_filter = SpatialQueryFilter::from_mask(GameLayer::Ground);
    let wall_filter = SpatialQueryFilter::from_mask(GameLayer::Wall);

    for (transform, size, engine, mut probe) in &mut enemies {
        if engine.behavior().planar() {
            continue;
        }
        let position = transform.translation.truncate();
        let direction = engine.runtime.facing.sign();

        let ground_ahead = spatial_query
            .cast_ray(
                ledge_probe_origin(position, size.0, direction),
                Dir2::NEG_Y,
                LEDGE_RAY_DEPTH,
                true,
                &ground_filter,
            )
            .is_some();
        let wall_dir = if direction < 0.0 { Dir2::NEG_X } else { Dir2::X };
        let wall_ahead = spatial_query
            .cast_ray(
                position,
                wall_dir,
                size.0.x * 0.5 + WALL_RAY_REACH,
                true,
                &wall_filter,
            )
            .is_some();

        let next = LedgeProbe {
            ground_ahead,
            wall_ahead,
        };
        if *probe != next {
            *probe = next;
        }
    }
}

pub(crate) fn disable_dead_colliders(
    mut commands: Commands,
    enemies: Query<(Entity, &EnemyEngine), (With<Collider>, Without<ColliderDisabled>)>,
    bosses: Query<(Entity, &BossEngine), (With<Collider>, Without<ColliderDisabled>)>,
) {
    for (entity, engine) in &enemies {
        if !engine.runtime.collision_enabled {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
    for (entity, boss) in &bosses {
        if !boss.collision_enabled() {
            commands.entity(entity).insert(ColliderDisabled);
        }
    }
}
