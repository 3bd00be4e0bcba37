//! Headless combat demo.
//!
//! Loads content from `assets/data`, spawns the demo level and drives a
//! scripted player through it at a fixed 60 Hz step, then prints the ledger.
//!
//! Usage: `combat-demo [--frames N] [--seed S] [--level PATH]`

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use platformer_combat::CombatCorePlugins;
use platformer_combat::combat::{
    ArenaBounds, BodySize, CombatLedger, CombatTarget, Combatant, Player, PlayerAttackHitbox, Team,
};
use platformer_combat::content::ContentPaths;
use platformer_combat::core::{
    BossDefeatedEvent, CombatSet, ContactEvent, Countdown, EscapeAttemptEvent, GrabEvent,
    PlayerBounceEvent, PlayerHitEvent, RunConfig,
};

const STEP: f64 = 1.0 / 60.0;
const WALK_SPEED: f32 = 110.0;
const SWING_INTERVAL: f32 = 0.4;
const SWING_REACH: f32 = 36.0;
const HITBOX_LIFETIME: f32 = 0.1;
const MASH_INTERVAL: f32 = 0.15;
const PLAYER_SIZE: Vec2 = Vec2::new(24.0, 40.0);

struct DemoArgs {
    frames: u32,
    seed: Option<u64>,
    level: PathBuf,
}

impl DemoArgs {
    fn parse() -> Self {
        let mut args = Self {
            frames: 3600,
            seed: None,
            level: PathBuf::from("assets/levels/demo.json"),
        };
        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let value = iter.next();
            match (flag.as_str(), value) {
                ("--frames", Some(v)) => args.frames = v.parse().unwrap_or(args.frames),
                ("--seed", Some(v)) => args.seed = v.parse().ok(),
                ("--level", Some(v)) => args.level = PathBuf::from(v),
                (other, _) => eprintln!("ignoring argument '{}'", other),
            }
        }
        args
    }
}

/// Scripted stand-in for the host's player controller.
#[derive(Component, Debug)]
struct DemoPlayer {
    health: i32,
    swing: Countdown,
    mash: Countdown,
    grabbed_by: Option<Entity>,
}

impl Default for DemoPlayer {
    fn default() -> Self {
        Self {
            health: 20,
            swing: Countdown::new(SWING_INTERVAL),
            mash: Countdown::new(MASH_INTERVAL),
            grabbed_by: None,
        }
    }
}

#[derive(Component, Debug)]
struct DemoHitbox {
    life: Countdown,
}

fn main() {
    let args = DemoArgs::parse();
    let mut app = App::new();

    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin {
            level: Level::INFO,
            filter: "platformer_combat=debug".to_string(),
            ..default()
        })
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(STEP)))
        .insert_resource(ContentPaths {
            level: Some(args.level.clone()),
            ..default()
        })
        .add_plugins(CombatCorePlugins)
        .add_systems(PostStartup, spawn_player)
        .add_systems(
            Update,
            (drive_player, swing_weapon, touch_bodies)
                .chain()
                .in_set(CombatSet::Collisions),
        )
        .add_systems(Update, react_to_combat.after(CombatSet::Dispatch));

    if let Some(seed) = args.seed {
        app.insert_resource(RunConfig::seeded(seed));
    }

    app.finish();
    app.cleanup();
    for _ in 0..args.frames {
        app.update();
    }

    info!("{}", app.world().resource::<CombatLedger>().summary());
}

fn spawn_player(mut commands: Commands, bounds: Res<ArenaBounds>) {
    let start = Vec2::new(bounds.min.x + 40.0, 0.0);
    commands.spawn((
        Player,
        CombatTarget,
        Team::Player,
        DemoPlayer::default(),
        BodySize(PLAYER_SIZE),
        Transform::from_xyz(start.x, start.y, 0.0),
    ));
}

fn drive_player(
    time: Res<Time>,
    bounds: Res<ArenaBounds>,
    mut escapes: MessageWriter<EscapeAttemptEvent>,
    mut players: Query<(Entity, &mut DemoPlayer, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (entity, mut player, mut transform) in &mut players {
        if player.health <= 0 {
            continue;
        }
        if player.grabbed_by.is_some() {
            if player.mash.tick(dt) || player.mash.is_finished() {
                escapes.write(EscapeAttemptEvent { player: entity });
                player.mash.start(MASH_INTERVAL);
            }
            continue;
        }
        let x = (transform.translation.x + WALK_SPEED * dt).min(bounds.max.x - bounds.margin);
        transform.translation.x = x;
    }
}

fn swing_weapon(
    mut commands: Commands,
    time: Res<Time>,
    mut contacts: MessageWriter<ContactEvent>,
    mut players: Query<(Entity, &mut DemoPlayer, &Transform)>,
    mut hitboxes: Query<(Entity, &mut DemoHitbox)>,
    victims: Query<(Entity, &Team, &Transform, &BodySize), With<Combatant>>,
) {
    let dt = time.delta_secs();
    for (entity, mut hitbox) in &mut hitboxes {
        if hitbox.life.tick(dt) || hitbox.life.is_finished() {
            commands.entity(entity).despawn();
        }
    }

    for (owner, mut player, transform) in &mut players {
        if player.health <= 0 || player.grabbed_by.is_some() {
            continue;
        }
        if !(player.swing.tick(dt) || player.swing.is_finished()) {
            continue;
        }
        player.swing.start(SWING_INTERVAL);

        let center = transform.translation.truncate() + Vec2::new(SWING_REACH * 0.5, 0.0);
        let hitbox = commands
            .spawn((
                PlayerAttackHitbox::new(1, 260.0, owner),
                DemoHitbox {
                    life: Countdown::new(HITBOX_LIFETIME),
                },
                Transform::from_xyz(center.x, center.y, 0.0),
            ))
            .id();

        for (victim, team, victim_transform, size) in &victims {
            if !team.opposes(Team::Player) {
                continue;
            }
            let offset = victim_transform.translation.truncate() - center;
            if overlaps(offset, Vec2::splat(SWING_REACH), size.0) {
                contacts.write(ContactEvent {
                    subject: hitbox,
                    other: victim,
                    normal: offset.try_normalize().unwrap_or(Vec2::X),
                });
            }
        }
    }
}

/// Body overlaps begin a contact once, like a physics collision start.
fn touch_bodies(
    mut touching: Local<HashSet<Entity>>,
    mut contacts: MessageWriter<ContactEvent>,
    players: Query<(Entity, &Transform, &BodySize), With<DemoPlayer>>,
    bodies: Query<(Entity, &Team, &Transform, &BodySize), (With<Combatant>, Without<DemoPlayer>)>,
) {
    let Some((player, player_transform, player_size)) = players.iter().next() else {
        return;
    };
    let position = player_transform.translation.truncate();
    let mut now_touching = HashSet::new();

    for (entity, team, transform, size) in &bodies {
        if !team.opposes(Team::Player) {
            continue;
        }
        let offset = transform.translation.truncate() - position;
        if !overlaps(offset, player_size.0, size.0) {
            continue;
        }
        now_touching.insert(entity);
        if !touching.contains(&entity) {
            contacts.write(ContactEvent {
                subject: player,
                other: entity,
                normal: offset.try_normalize().unwrap_or(Vec2::NEG_Y),
            });
        }
    }
    *touching = now_touching;
}

fn react_to_combat(
    mut hits: MessageReader<PlayerHitEvent>,
    mut bounces: MessageReader<PlayerBounceEvent>,
    mut grabs: MessageReader<GrabEvent>,
    mut defeats: MessageReader<BossDefeatedEvent>,
    mut players: Query<(&mut DemoPlayer, &mut Transform)>,
) {
    for hit in hits.read() {
        let Ok((mut player, mut transform)) = players.get_mut(hit.target) else {
            continue;
        };
        player.health -= hit.hit.damage as i32;
        transform.translation.x += hit.hit.knockback_direction.sign() * 12.0;
        info!(
            "Player took {} damage ({} left)",
            hit.hit.damage,
            player.health.max(0)
        );
    }
    for bounce in bounces.read() {
        debug!("Player bounced with impulse {}", bounce.impulse);
    }
    for grab in grabs.read() {
        match *grab {
            GrabEvent::Grabbed { grabber, target } => {
                if let Ok((mut player, _)) = players.get_mut(target) {
                    player.grabbed_by = Some(grabber);
                    info!("Player grabbed by {:?}", grabber);
                }
            }
            GrabEvent::Carried { target, position, .. } => {
                if let Ok((_, mut transform)) = players.get_mut(target) {
                    transform.translation.x = position.x;
                    transform.translation.y = position.y;
                }
            }
            GrabEvent::Released { target, escaped, .. } => {
                if let Ok((mut player, _)) = players.get_mut(target) {
                    player.grabbed_by = None;
                    info!("Player released (escaped: {})", escaped);
                }
            }
        }
    }
    for defeat in defeats.read() {
        info!(
            "Boss {:?} defeated for {} points, unlocks {:?}",
            defeat.boss, defeat.score, defeat.unlocks
        );
    }
}

fn overlaps(offset: Vec2, a: Vec2, b: Vec2) -> bool {
    let reach = (a + b) * 0.5;
    offset.x.abs() <= reach.x && offset.y.abs() <= reach.y
}
