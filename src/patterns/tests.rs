//! Patterns domain: tests for cooldowns, stage sequencing and each pattern kind.

use bevy::prelude::*;

use super::*;
use crate::combat::TargetView;
use crate::core::{CombatOutbound, CombatOutbox};

const DT: f32 = 1.0 / 60.0;

fn actor(world: &mut World, position: Vec2) -> PatternActor {
    PatternActor {
        entity: world.spawn_empty().id(),
        position,
        facing: 1.0,
    }
}

fn advance(
    run: &mut PatternRun,
    actor: PatternActor,
    targets: &[TargetView],
    outbox: &mut CombatOutbox,
) -> PatternStep {
    let mut ctx = PatternContext {
        actor,
        targets,
        bus: outbox,
    };
    run.advance(DT, &mut ctx)
}

fn quick_volley() -> PatternKind {
    PatternKind::ProjectileVolley(VolleyParams {
        windup: 0.1,
        count: 3,
        wait: 0.2,
        ..default()
    })
}

// -----------------------------------------------------------------------------
// Cooldown tests
// -----------------------------------------------------------------------------

#[test]
fn test_cooldown_measured_from_start() {
    let mut world = World::new();
    let actor = actor(&mut world, Vec2::ZERO);
    let mut pattern = AttackPattern::new("slam", 1.0, PatternKind::Melee(MeleeParams::default()));
    assert!(pattern.can_execute(0.0));

    pattern.start(0.0, &actor, None);
    assert_eq!(pattern.last_execution(), Some(0.0));
    assert!(!pattern.can_execute(0.5));
    assert!(pattern.can_execute(1.0));
}

#[test]
fn test_negative_cooldown_is_zero() {
    let mut pattern = AttackPattern::new("spam", -3.0, quick_volley());
    assert_eq!(pattern.cooldown, 0.0);
    pattern.scale_cooldown(2.0);
    assert_eq!(pattern.cooldown, 0.0);
}

#[test]
fn test_scale_cooldown_multiplies() {
    let mut pattern = AttackPattern::new("volley", 2.0, quick_volley());
    pattern.scale_cooldown(0.5);
    assert_eq!(pattern.cooldown, 1.0);
}

#[test]
fn test_duration_sums_stage_times() {
    let melee = MeleeParams {
        windup: 0.5,
        dash_time: 0.25,
        recover: 0.25,
        ..default()
    };
    assert_eq!(PatternKind::Melee(melee).duration(), 1.0);
    assert!((AttackPattern::new("v", 1.0, quick_volley()).duration() - 0.3).abs() < 1e-6);
}

// -----------------------------------------------------------------------------
// Run lifecycle tests
// -----------------------------------------------------------------------------

#[test]
fn test_completion_delivered_exactly_once() {
    let mut world = World::new();
    let actor = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let mut run = AttackPattern::new("volley", 1.0, quick_volley()).start(0.0, &actor, None);

    let mut completions = Vec::new();
    for _ in 0..60 {
        if let Some(done) = advance(&mut run, actor, &[], &mut outbox).completion {
            completions.push(done);
        }
    }
    assert_eq!(
        completions,
        vec![PatternCompletion {
            name: "volley".to_string(),
            interrupted: false,
        }]
    );
    assert!(run.is_complete());
    assert_eq!(run.stage(), None);
    assert!(run.cancel().is_none());
}

#[test]
fn test_cancel_is_idempotent() {
    let mut world = World::new();
    let actor = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let mut run = AttackPattern::new("volley", 1.0, quick_volley()).start(0.0, &actor, None);
    advance(&mut run, actor, &[], &mut outbox);

    let first = run.cancel().expect("first cancel completes");
    assert!(first.interrupted);
    assert!(run.cancel().is_none());
    for _ in 0..60 {
        assert_eq!(advance(&mut run, actor, &[], &mut outbox), PatternStep::default());
    }
    // cancelled during windup, so nothing was fired
    assert_eq!(outbox.projectiles().count(), 0);
}

#[test]
fn test_zero_length_stages_pass_through_in_one_tick() {
    let mut world = World::new();
    let actor = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let kind = PatternKind::ProjectileVolley(VolleyParams {
        windup: 0.0,
        wait: 0.0,
        count: 1,
        ..default()
    });
    let mut run = AttackPattern::new("snap", 0.0, kind).start(0.0, &actor, None);

    let step = advance(&mut run, actor, &[], &mut outbox);
    assert!(step.completion.is_some());
    assert_eq!(outbox.projectiles().count(), 1);
}

#[test]
fn test_run_lasts_its_duration_when_ticks_straddle_stages() {
    let mut world = World::new();
    let actor = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let kind = PatternKind::Melee(MeleeParams {
        windup: 0.375,
        dash_time: 0.375,
        recover: 0.25,
        ..default()
    });
    assert_eq!(kind.duration(), 1.0);
    let mut run = AttackPattern::new("lunge", 1.0, kind).start(0.0, &actor, None);

    let mut ctx = PatternContext {
        actor,
        targets: &[],
        bus: &mut outbox,
    };
    // 0.25 s ticks: the windup ends mid-tick and its leftover starts the dash
    for tick in 1..4 {
        let step = run.advance(0.25, &mut ctx);
        assert!(step.completion.is_none(), "finished early on tick {}", tick);
    }
    assert!(run.advance(0.25, &mut ctx).completion.is_some());
}

// -----------------------------------------------------------------------------
// Melee tests
// -----------------------------------------------------------------------------

#[test]
fn test_melee_dashes_toward_target_and_strikes() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let player = world.spawn_empty().id();
    let mut outbox = CombatOutbox::default();
    let kind = PatternKind::Melee(MeleeParams {
        windup: 0.0,
        dash_time: 0.1,
        recover: 0.1,
        range: 56.0,
        ..default()
    });
    let target = TargetView::new(player, Vec2::new(-100.0, 0.0));
    let mut run = AttackPattern::new("lunge", 1.0, kind).start(0.0, &me, Some(&target));

    let step = advance(&mut run, me, &[target], &mut outbox);
    assert_eq!(run.stage(), Some(PatternStage::Dash));
    assert_eq!(step.velocity, Vec2::new(-420.0, 0.0));

    // the dash closed the gap; the strike tests from the current position
    let closer = PatternActor {
        position: Vec2::new(-60.0, 0.0),
        ..me
    };
    for _ in 0..10 {
        advance(&mut run, closer, &[target], &mut outbox);
    }
    let hits: Vec<_> = outbox.hits().collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, player);
    assert_eq!(hits[0].1.knockback_direction.sign(), -1.0);
}

#[test]
fn test_melee_strike_misses_out_of_range() {
    let mut world = World::new();
    let player = world.spawn_empty().id();
    let mut outbox = CombatOutbox::default();
    let me = world.spawn_empty().id();
    let target = TargetView::new(player, Vec2::new(200.0, 0.0));
    assert!(!MeleeParams::default().strike(me, Vec2::ZERO, Some(&target), &mut outbox));
    assert!(outbox.is_empty());
    assert_eq!(MeleeParams::dash_direction(Vec2::ZERO, None, -1.0), -1.0);
}

// -----------------------------------------------------------------------------
// Volley tests
// -----------------------------------------------------------------------------

#[test]
fn test_fan_is_centered_on_aim() {
    let params = VolleyParams {
        count: 3,
        spread_angle: 90.0,
        ..default()
    };
    let fan = params.fan_directions(Vec2::new(5.0, 0.0));
    assert_eq!(fan.len(), 3);
    assert!((fan[1] - Vec2::X).length() < 1e-5);
    let half = std::f32::consts::FRAC_1_SQRT_2;
    assert!((fan[0] - Vec2::new(half, -half)).length() < 1e-5);
    assert!((fan[2] - Vec2::new(half, half)).length() < 1e-5);
}

#[test]
fn test_fan_edge_counts() {
    let none = VolleyParams {
        count: 0,
        ..default()
    };
    assert!(none.fan_directions(Vec2::X).is_empty());
    let single = VolleyParams {
        count: 1,
        ..default()
    };
    assert_eq!(single.fan_directions(Vec2::ZERO), vec![Vec2::X]);
}

#[test]
fn test_volley_fires_at_target() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let player = world.spawn_empty().id();
    let mut outbox = CombatOutbox::default();
    let target = TargetView::new(player, Vec2::new(0.0, -100.0));
    let mut run = AttackPattern::new("volley", 1.0, quick_volley()).start(0.0, &me, Some(&target));

    for _ in 0..10 {
        advance(&mut run, me, &[target], &mut outbox);
    }
    let shots: Vec<_> = outbox.projectiles().collect();
    assert_eq!(shots.len(), 3);
    assert!(shots.iter().all(|s| s.owner == Some(me.entity) && s.target == Some(player)));
    assert!((shots[1].direction - Vec2::NEG_Y).length() < 1e-5);
}

// -----------------------------------------------------------------------------
// Area denial tests
// -----------------------------------------------------------------------------

fn quick_area() -> PatternKind {
    PatternKind::AreaDenial(AreaParams {
        warning_duration: 0.1,
        radius: 64.0,
        linger: 0.1,
        ..default()
    })
}

#[test]
fn test_area_point_frozen_at_invocation() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let player = world.spawn_empty().id();
    let mut outbox = CombatOutbox::default();
    let start = TargetView::new(player, Vec2::new(100.0, 0.0));
    let mut run = AttackPattern::new("quake", 1.0, quick_area()).start(0.0, &me, Some(&start));
    assert_eq!(run.frozen_point(), Some(Vec2::new(100.0, 0.0)));

    // the target walks away during the warning
    let moved = TargetView::new(player, Vec2::new(300.0, 0.0));
    for _ in 0..20 {
        advance(&mut run, me, &[moved], &mut outbox);
    }

    let telegraph = outbox
        .pending()
        .iter()
        .find_map(|event| match event {
            CombatOutbound::Telegraph(t) => Some(t.clone()),
            _ => None,
        })
        .expect("telegraph shown");
    assert_eq!(telegraph.position, Vec2::new(100.0, 0.0));
    assert_eq!(telegraph.duration, 0.1);
    assert_eq!(outbox.hits().count(), 0);
    assert!(run.is_complete());
}

#[test]
fn test_area_hits_targets_inside_radius() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let inside = world.spawn_empty().id();
    let outside = world.spawn_empty().id();
    let mut outbox = CombatOutbox::default();
    let targets = [
        TargetView::new(inside, Vec2::new(130.0, 0.0)),
        TargetView::new(outside, Vec2::new(200.0, 0.0)),
    ];
    let anchor = TargetView::new(inside, Vec2::new(100.0, 0.0));
    let mut run = AttackPattern::new("quake", 1.0, quick_area()).start(0.0, &me, Some(&anchor));

    for _ in 0..20 {
        advance(&mut run, me, &targets, &mut outbox);
    }
    let hit: Vec<_> = outbox.hits().map(|(target, _)| target).collect();
    assert_eq!(hit, vec![inside]);
}

#[test]
fn test_area_without_target_freezes_on_actor() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::new(40.0, 8.0));
    let run = AttackPattern::new("quake", 1.0, quick_area()).start(0.0, &me, None);
    assert_eq!(run.frozen_point(), Some(Vec2::new(40.0, 8.0)));
}

// -----------------------------------------------------------------------------
// Summon tests
// -----------------------------------------------------------------------------

fn summon_kind(interrupt_damage: u32) -> PatternKind {
    PatternKind::Summon(SummonParams {
        cast_time: 0.5,
        kind: "imp".to_string(),
        count: 2,
        interrupt_damage,
        ..default()
    })
}

#[test]
fn test_summon_requests_minions_after_cast() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let mut run = AttackPattern::new("call", 5.0, summon_kind(0)).start(0.0, &me, None);
    advance(&mut run, me, &[], &mut outbox);
    assert!(run.is_exposing());

    for _ in 0..40 {
        advance(&mut run, me, &[], &mut outbox);
    }
    let requests: Vec<_> = outbox
        .pending()
        .iter()
        .filter_map(|event| match event {
            CombatOutbound::Spawn(request) => Some(request.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, "imp");
    assert_eq!(requests[0].count, 2);
    assert_eq!(requests[0].requester, Some(me.entity));
    assert!(!run.is_exposing());
}

#[test]
fn test_summon_cast_breaks_at_damage_threshold() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let mut run = AttackPattern::new("call", 5.0, summon_kind(2)).start(0.0, &me, None);
    advance(&mut run, me, &[], &mut outbox);

    assert!(!run.register_damage(1));
    assert!(run.register_damage(1));
}

#[test]
fn test_uninterruptible_summon_ignores_damage() {
    let mut world = World::new();
    let me = actor(&mut world, Vec2::ZERO);
    let mut outbox = CombatOutbox::default();
    let mut run = AttackPattern::new("call", 5.0, summon_kind(0)).start(0.0, &me, None);
    advance(&mut run, me, &[], &mut outbox);
    assert!(!run.register_damage(100));
}
