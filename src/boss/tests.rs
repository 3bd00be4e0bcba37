//! Boss domain: tests for phases, damage gating, scripts and the defeat sequence.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::*;
use crate::combat::{ContactOutcome, HitInfo, TargetView};
use crate::core::{BossNotice, CombatOutbound, CombatOutbox, DoorSignal};
use crate::patterns::{
    AreaParams, AttackPattern, MeleeParams, PatternActor, PatternKind, SummonParams,
};

const DT: f32 = 1.0 / 60.0;

struct Arena {
    world: World,
    outbox: CombatOutbox,
    now: f64,
}

impl Arena {
    fn new() -> Self {
        Self {
            world: World::new(),
            outbox: CombatOutbox::default(),
            now: 0.0,
        }
    }

    fn boss(&mut self, config: BossConfig, phases: Vec<BossPhase>, script: Box<dyn BossScript>) -> BossEngine {
        let id = self.world.spawn_empty().id();
        BossEngine::new(id, config, PhaseTable::new(phases), script, 7, Vec2::ZERO)
    }

    fn hit(&mut self, boss: &mut BossEngine, damage: u32) -> BossDamageOutcome {
        let mut ctx = BossContext {
            now: self.now,
            targets: &[],
            bus: &mut self.outbox,
        };
        boss.take_damage(&HitInfo::new(damage, 0.0, 0.0, None), &mut ctx)
    }

    fn run(&mut self, boss: &mut BossEngine, ticks: usize, targets: &[TargetView]) {
        for _ in 0..ticks {
            self.now += f64::from(DT);
            let mut ctx = BossContext {
                now: self.now,
                targets,
                bus: &mut self.outbox,
            };
            boss.update(DT, &mut ctx);
        }
    }

    fn notices(&self) -> Vec<BossNotice> {
        self.outbox.boss_notices().cloned().collect()
    }

    fn phase_changes(&self) -> Vec<(usize, usize)> {
        self.outbox
            .boss_notices()
            .filter_map(|notice| match notice {
                BossNotice::PhaseChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    fn spawn_requests(&self) -> usize {
        self.outbox
            .pending()
            .iter()
            .filter(|event| matches!(event, CombatOutbound::Spawn(_)))
            .count()
    }
}

fn slam(cooldown: f32) -> AttackPattern {
    AttackPattern::new("slam", cooldown, PatternKind::Melee(MeleeParams::default()))
}

fn two_phases() -> Vec<BossPhase> {
    vec![
        BossPhase::new("calm", 1.0, vec![slam(2.0)]),
        BossPhase::new("angry", 0.5, vec![slam(2.0)]),
    ]
}

fn health_100() -> BossConfig {
    BossConfig {
        name: "Warden".to_string(),
        max_health: 100,
        ..default()
    }
}

// -----------------------------------------------------------------------------
// Phase transition tests
// -----------------------------------------------------------------------------

#[test]
fn test_crossing_threshold_transitions_once() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    boss.engage(&mut arena.outbox);

    assert_eq!(arena.hit(&mut boss, 51), BossDamageOutcome::Applied);
    assert_eq!(boss.health(), 49);
    assert_eq!(boss.state(), BossState::Transitioning);

    assert_eq!(arena.hit(&mut boss, 10), BossDamageOutcome::Discarded);
    assert_eq!(boss.health(), 49);

    arena.run(&mut boss, 100, &[]);
    assert_eq!(boss.phase_index(), 1);
    assert_eq!(arena.phase_changes(), vec![(0, 1)]);
    let started = arena
        .notices()
        .into_iter()
        .filter(|n| matches!(n, BossNotice::TransitionStarted { .. }))
        .count();
    assert_eq!(started, 1);
}

#[test]
fn test_threshold_is_inclusive() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    boss.engage(&mut arena.outbox);
    arena.hit(&mut boss, 50);
    assert_eq!(boss.state(), BossState::Transitioning);
}

#[test]
fn test_big_hit_walks_phases_in_order() {
    let mut arena = Arena::new();
    let phases = vec![
        BossPhase::new("one", 1.0, vec![slam(1.0)]),
        BossPhase::new("two", 0.6, vec![slam(1.0)]),
        BossPhase::new("three", 0.3, vec![slam(1.0)]),
    ];
    let mut boss = arena.boss(health_100(), phases, Box::new(StandardScript));
    boss.engage(&mut arena.outbox);

    arena.hit(&mut boss, 80);
    let mut seen = vec![boss.phase_index()];
    for _ in 0..300 {
        arena.run(&mut boss, 1, &[]);
        let index = boss.phase_index();
        assert!(index >= *seen.last().unwrap_or(&0));
        seen.push(index);
    }
    assert_eq!(boss.phase_index(), 2);
    assert_eq!(arena.phase_changes(), vec![(0, 1), (1, 2)]);
}

#[test]
fn test_phase_table_sorts_descending() {
    let table = PhaseTable::new(vec![
        BossPhase::new("low", 0.2, vec![]),
        BossPhase::new("high", 1.0, vec![]),
        BossPhase::new("mid", 0.5, vec![]),
    ]);
    let names: Vec<_> = table.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["high", "mid", "low"]);
    assert_eq!(table.next_crossed(0, 0.4), Some(1));
    assert_eq!(table.next_crossed(2, 0.0), None);
}

#[test]
fn test_force_phase_requests() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    boss.engage(&mut arena.outbox);

    assert_eq!(boss.force_phase(5, &mut arena.outbox), TransitionRequest::OutOfRange);
    assert_eq!(boss.force_phase(0, &mut arena.outbox), TransitionRequest::AlreadyInPhase);
    assert_eq!(boss.force_phase(1, &mut arena.outbox), TransitionRequest::Started);
    assert_eq!(boss.force_phase(0, &mut arena.outbox), TransitionRequest::Busy);

    arena.run(&mut boss, 100, &[]);
    assert_eq!(boss.phase_index(), 1);
    // an explicit override may go back
    assert_eq!(boss.force_phase(0, &mut arena.outbox), TransitionRequest::Started);
}

#[test]
fn test_forced_earlier_phase_holds_below_threshold() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    boss.engage(&mut arena.outbox);

    arena.hit(&mut boss, 60);
    arena.run(&mut boss, 100, &[]);
    assert_eq!(boss.phase_index(), 1);

    assert_eq!(boss.force_phase(0, &mut arena.outbox), TransitionRequest::Started);
    arena.run(&mut boss, 1000, &[]);
    assert_eq!(boss.phase_index(), 0);
    assert_eq!(arena.phase_changes(), vec![(0, 1), (1, 0)]);

    // the next hit runs the usual threshold check again
    assert_eq!(arena.hit(&mut boss, 1), BossDamageOutcome::Applied);
    assert_eq!(boss.state(), BossState::Transitioning);
    arena.run(&mut boss, 100, &[]);
    assert_eq!(boss.phase_index(), 1);
}

#[test]
fn test_empty_phase_table_only_pursues() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(
        BossConfig {
            decision_delay: 0.0,
            ..health_100()
        },
        vec![],
        Box::new(StandardScript),
    );
    let player = arena.world.spawn_empty().id();
    let targets = [TargetView::new(player, Vec2::new(100.0, 0.0))];
    arena.run(&mut boss, 2, &targets);

    assert!(boss.current_phase().is_none());
    assert_eq!(boss.state(), BossState::Idle);
    assert!(boss.velocity.x > 0.0);
}

// -----------------------------------------------------------------------------
// Selection tests
// -----------------------------------------------------------------------------

fn pool(cooldown: f32) -> Vec<AttackPattern> {
    ["a", "b", "c"]
        .into_iter()
        .map(|name| AttackPattern::new(name, cooldown, PatternKind::Melee(MeleeParams::default())))
        .collect()
}

#[test]
fn test_round_robin_cycles() {
    let mut phase = BossPhase::new("p", 1.0, pool(0.0)).with_selection(SelectionPolicy::RoundRobin);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let picks: Vec<_> = (0..4).filter_map(|_| phase.select(0.0, &mut rng, |_| true)).collect();
    assert_eq!(picks, vec![0, 1, 2, 0]);
}

#[test]
fn test_priority_takes_first_ready() {
    let mut world = World::new();
    let actor = PatternActor {
        entity: world.spawn_empty().id(),
        position: Vec2::ZERO,
        facing: 1.0,
    };
    let mut phase = BossPhase::new("p", 1.0, pool(5.0)).with_selection(SelectionPolicy::Priority);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(phase.select(0.0, &mut rng, |_| true), Some(0));
    phase.patterns[0].start(0.0, &actor, None);
    assert_eq!(phase.select(1.0, &mut rng, |_| true), Some(1));
}

#[test]
fn test_all_cooling_down_selects_none() {
    let mut world = World::new();
    let actor = PatternActor {
        entity: world.spawn_empty().id(),
        position: Vec2::ZERO,
        facing: 1.0,
    };
    let mut phase = BossPhase::new("p", 1.0, pool(10.0));
    for pattern in &mut phase.patterns {
        pattern.start(0.0, &actor, None);
    }
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(phase.select(5.0, &mut rng, |_| true), None);
}

#[test]
fn test_random_selection_is_seeded() {
    let picks = |seed: u64| {
        let mut phase = BossPhase::new("p", 1.0, pool(0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..16)
            .filter_map(|_| phase.select(0.0, &mut rng, |_| true))
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(42), picks(42));
    assert!(picks(42).iter().all(|&i| i < 3));
}

// -----------------------------------------------------------------------------
// Damage gate tests
// -----------------------------------------------------------------------------

fn gated() -> BossConfig {
    BossConfig {
        damage_gate: DamageGate::VulnerableOnly,
        ..health_100()
    }
}

#[test]
fn test_gate_refuses_hits_outside_vulnerability() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(gated(), two_phases(), Box::new(StandardScript));
    boss.engage(&mut arena.outbox);

    assert_eq!(arena.hit(&mut boss, 5), BossDamageOutcome::Gated);
    assert_eq!(boss.health(), 100);

    boss.open_vulnerability(1.0, &mut arena.outbox);
    assert_eq!(boss.state(), BossState::Vulnerable);
    assert_eq!(arena.hit(&mut boss, 5), BossDamageOutcome::Applied);
    assert_eq!(boss.health(), 95);

    arena.run(&mut boss, 61, &[]);
    assert_eq!(boss.state(), BossState::Idle);
    assert_eq!(arena.hit(&mut boss, 5), BossDamageOutcome::Gated);
}

#[test]
fn test_damaging_a_summon_cast_interrupts_it() {
    let mut arena = Arena::new();
    let phases = vec![BossPhase::new(
        "brood",
        1.0,
        vec![AttackPattern::new(
            "call",
            5.0,
            PatternKind::Summon(SummonParams {
                cast_time: 1.0,
                kind: "imp".to_string(),
                interrupt_damage: 3,
                stun_time: 2.0,
                ..default()
            }),
        )],
    )];
    let mut boss = arena.boss(
        BossConfig {
            decision_delay: 0.0,
            ..gated()
        },
        phases,
        Box::new(StandardScript),
    );
    boss.engage(&mut arena.outbox);
    arena.run(&mut boss, 1, &[]);
    assert_eq!(boss.state(), BossState::Attacking);
    assert!(boss.active_run().is_some_and(|run| run.is_exposing()));

    assert_eq!(arena.hit(&mut boss, 3), BossDamageOutcome::Interrupted);
    assert_eq!(boss.state(), BossState::Vulnerable);
    assert!(boss.active_run().is_none());
    assert!(arena.notices().contains(&BossNotice::VulnerabilityOpened {
        boss: boss.id(),
        duration: 2.0,
    }));
    assert_eq!(arena.spawn_requests(), 0);
}

// -----------------------------------------------------------------------------
// Encounter tests
// -----------------------------------------------------------------------------

#[test]
fn test_target_in_range_starts_encounter() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(
        BossConfig {
            arena_doors: vec!["gate".to_string()],
            ..health_100()
        },
        two_phases(),
        Box::new(StandardScript),
    );
    let player = arena.world.spawn_empty().id();

    arena.run(&mut boss, 5, &[TargetView::new(player, Vec2::new(1000.0, 0.0))]);
    assert_eq!(boss.encounter(), EncounterStage::Dormant);

    arena.run(&mut boss, 1, &[TargetView::new(player, Vec2::new(100.0, 0.0))]);
    assert_eq!(boss.encounter(), EncounterStage::Engaged);
    assert!(arena.notices().contains(&BossNotice::EncounterStarted {
        boss: boss.id(),
        name: "Warden".to_string(),
    }));
    assert!(arena.outbox.pending().contains(&CombatOutbound::Door(DoorSignal::Lock(
        "gate".to_string()
    ))));
    assert!(!boss.engage(&mut arena.outbox));
}

#[test]
fn test_hit_on_dormant_boss_engages() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    assert_eq!(arena.hit(&mut boss, 1), BossDamageOutcome::Applied);
    assert_eq!(boss.encounter(), EncounterStage::Engaged);
}

#[test]
fn test_body_contact_needs_engagement() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    let player = arena.world.spawn_empty().id();
    let view = TargetView::new(player, Vec2::new(-20.0, 0.0));

    assert_eq!(boss.resolve_body_contact(&view, &mut arena.outbox), ContactOutcome::Ignored);
    boss.engage(&mut arena.outbox);
    assert_eq!(boss.resolve_body_contact(&view, &mut arena.outbox), ContactOutcome::PlayerHurt);
    let (target, hit) = arena.outbox.hits().next().expect("contact hit");
    assert_eq!(target, player);
    assert_eq!(hit.knockback_direction.sign(), -1.0);
}

#[test]
fn test_area_pattern_frozen_on_boss_target() {
    let mut arena = Arena::new();
    let phases = vec![BossPhase::new(
        "quake",
        1.0,
        vec![AttackPattern::new(
            "quake",
            5.0,
            PatternKind::AreaDenial(AreaParams::default()),
        )],
    )];
    let mut boss = arena.boss(
        BossConfig {
            decision_delay: 0.0,
            ..health_100()
        },
        phases,
        Box::new(StandardScript),
    );
    let player = arena.world.spawn_empty().id();
    arena.run(&mut boss, 1, &[TargetView::new(player, Vec2::new(80.0, 0.0))]);
    assert_eq!(
        boss.active_run().and_then(|run| run.frozen_point()),
        Some(Vec2::new(80.0, 0.0))
    );
}

// -----------------------------------------------------------------------------
// Defeat tests
// -----------------------------------------------------------------------------

#[test]
fn test_defeat_plays_stages_then_reports_once() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(
        BossConfig {
            arena_doors: vec!["gate".to_string()],
            unlocks: vec!["double_jump".to_string()],
            score_value: 500,
            ..health_100()
        },
        two_phases(),
        Box::new(StandardScript),
    );
    boss.engage(&mut arena.outbox);

    let mut ctx = BossContext {
        now: 0.0,
        targets: &[],
        bus: &mut arena.outbox,
    };
    assert_eq!(
        boss.take_damage(&HitInfo::lethal(None), &mut ctx),
        BossDamageOutcome::Defeated
    );
    assert!(boss.is_defeated());
    assert!(!boss.collision_enabled());
    assert_eq!(arena.hit(&mut boss, 1), BossDamageOutcome::Rejected);

    arena.run(&mut boss, 200, &[]);
    assert!(boss.defeat_reported());

    let stages: Vec<_> = arena
        .notices()
        .into_iter()
        .filter_map(|n| match n {
            BossNotice::DefeatStage { stage, .. } => Some(stage),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec!["collapse", "shatter", "fade"]);

    let defeats: Vec<_> = arena
        .notices()
        .into_iter()
        .filter(|n| matches!(n, BossNotice::Defeated { .. }))
        .collect();
    assert_eq!(
        defeats,
        vec![BossNotice::Defeated {
            boss: boss.id(),
            score: 500,
            unlocks: vec!["double_jump".to_string()],
        }]
    );
    assert!(arena.outbox.pending().contains(&CombatOutbound::Door(DoorSignal::Unlock(
        "gate".to_string()
    ))));
}

#[test]
fn test_killing_blow_skips_pending_transition() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(StandardScript));
    boss.engage(&mut arena.outbox);
    assert_eq!(arena.hit(&mut boss, 100), BossDamageOutcome::Defeated);
    arena.run(&mut boss, 200, &[]);
    assert_eq!(boss.phase_index(), 0);
    assert!(arena.phase_changes().is_empty());
}

// -----------------------------------------------------------------------------
// Script tests
// -----------------------------------------------------------------------------

#[test]
fn test_summoner_waits_for_minions_to_die() {
    let mut arena = Arena::new();
    let summon = AttackPattern::new(
        "call",
        0.0,
        PatternKind::Summon(SummonParams {
            cast_time: 0.0,
            wait: 0.0,
            kind: "imp".to_string(),
            count: 2,
            ..default()
        }),
    );
    let mut boss = arena.boss(
        BossConfig {
            decision_delay: 0.0,
            ..health_100()
        },
        vec![BossPhase::new("brood", 1.0, vec![summon]).with_selection(SelectionPolicy::Priority)],
        Box::new(SummonerScript { max_minions: 2 }),
    );
    boss.engage(&mut arena.outbox);

    arena.run(&mut boss, 1, &[]);
    assert_eq!(arena.spawn_requests(), 1);
    // the world reports both minions alive
    boss.set_live_minions(2);
    arena.run(&mut boss, 10, &[]);
    assert_eq!(arena.spawn_requests(), 1);

    boss.set_live_minions(1);
    arena.run(&mut boss, 1, &[]);
    assert_eq!(arena.spawn_requests(), 2);
    assert_eq!(boss.script_name(), "summoner");
}

#[test]
fn test_berserk_scales_final_phase_once() {
    let mut arena = Arena::new();
    let mut boss = arena.boss(health_100(), two_phases(), Box::new(BerserkScript::new(0.5)));
    boss.engage(&mut arena.outbox);

    boss.force_phase(1, &mut arena.outbox);
    arena.run(&mut boss, 100, &[]);
    let cooldown = |boss: &BossEngine, index: usize| {
        boss.phases()
            .get(index)
            .map(|phase| phase.patterns[0].cooldown)
    };
    assert_eq!(cooldown(&boss, 1), Some(1.0));
    assert_eq!(cooldown(&boss, 0), Some(2.0));

    boss.force_phase(0, &mut arena.outbox);
    arena.run(&mut boss, 100, &[]);
    boss.force_phase(1, &mut arena.outbox);
    arena.run(&mut boss, 100, &[]);
    assert_eq!(cooldown(&boss, 1), Some(1.0));
}

#[test]
fn test_script_defs_build() {
    assert_eq!(ScriptDef::default().build().name(), "standard");
    assert_eq!(ScriptDef::Summoner { max_minions: 3 }.build().name(), "summoner");
    assert_eq!(ScriptDef::Berserk { cooldown_scale: 0.5 }.build().name(), "berserk");
}

// -----------------------------------------------------------------------------
// Stage sequence tests
// -----------------------------------------------------------------------------

#[test]
fn test_stage_sequence_announces_each_stage() {
    let mut sequence = StageSequence::new(vec![
        ScriptedStage::new("a", 0.1),
        ScriptedStage::new("b", 0.0),
        ScriptedStage::new("c", 0.1),
    ]);
    assert!((sequence.total_duration() - 0.2).abs() < 1e-6);
    let mut seen = Vec::new();
    let mut ticks = 0;
    while !sequence.advance(DT, |stage| seen.push(stage.name.clone())) {
        ticks += 1;
        assert!(ticks < 100);
    }
    assert_eq!(seen, vec!["a", "b", "c"]);
    assert!(sequence.is_finished());
}

#[test]
fn test_stage_sequence_carries_leftover_time() {
    let mut sequence = StageSequence::new(vec![
        ScriptedStage::new("roar", 0.375),
        ScriptedStage::new("reform", 0.375),
        ScriptedStage::new("settle", 0.25),
    ]);
    let mut seen = Vec::new();
    for _ in 0..3 {
        assert!(!sequence.advance(0.25, |stage| seen.push(stage.name.clone())));
    }
    assert!(sequence.advance(0.25, |stage| seen.push(stage.name.clone())));
    assert_eq!(seen, vec!["roar", "reform", "settle"]);
}

// -----------------------------------------------------------------------------
// Minion tally tests
// -----------------------------------------------------------------------------

fn minion_app() -> App {
    use crate::combat::CombatPlugin;
    use crate::content::{ContentRegistry, EnemyDef};
    use crate::core::CorePlugin;
    use crate::enemies::{ArchetypeDef, EnemiesPlugin, EnemyConfig};
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    let mut registry = ContentRegistry::default();
    registry.insert_enemy(EnemyDef::new("imp", ArchetypeDef::Walker, EnemyConfig::default()));

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / 60.0,
        )))
        .insert_resource(registry)
        .add_plugins((CorePlugin, CombatPlugin, EnemiesPlugin, BossPlugin));
    app
}

fn spawn_dormant_boss(app: &mut App) -> Entity {
    let world = app.world_mut();
    let id = world.spawn_empty().id();
    let engine = BossEngine::new(
        id,
        health_100(),
        PhaseTable::new(two_phases()),
        Box::new(SummonerScript { max_minions: 2 }),
        7,
        Vec2::ZERO,
    );
    world.entity_mut(id).insert((engine, Transform::default()));
    id
}

fn request_minions(app: &mut App, boss: Entity, kind: &str, count: u32) {
    use crate::core::{SpawnRequest, SpawnRequestEvent};

    app.world_mut().write_message(SpawnRequestEvent {
        request: SpawnRequest {
            requester: Some(boss),
            kind: kind.to_string(),
            count,
            position: Vec2::new(50.0, 0.0),
            spacing: 20.0,
        },
    });
}

fn live_minions(app: &App, boss: Entity) -> u32 {
    app.world()
        .get::<BossEngine>(boss)
        .map_or(0, BossEngine::live_minions)
}

#[test]
fn test_unknown_summon_kind_counts_no_minions() {
    let mut app = minion_app();
    let boss = spawn_dormant_boss(&mut app);
    app.update();

    request_minions(&mut app, boss, "ghost", 2);
    app.update();
    app.update();
    assert_eq!(live_minions(&app, boss), 0);
}

#[test]
fn test_minion_tally_follows_spawned_entities() {
    use crate::combat::SummonedBy;

    let mut app = minion_app();
    let boss = spawn_dormant_boss(&mut app);
    app.update();

    request_minions(&mut app, boss, "imp", 2);
    app.update();
    app.update();
    assert_eq!(live_minions(&app, boss), 2);

    let world = app.world_mut();
    let minion = world
        .query_filtered::<Entity, With<SummonedBy>>()
        .iter(world)
        .next()
        .expect("minion spawned");
    // removed without a death notification
    assert!(world.despawn(minion));
    app.update();
    assert_eq!(live_minions(&app, boss), 1);
}
