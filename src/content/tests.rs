//! Content domain: tests for RON parsing, validation and level placement.

use bevy::prelude::*;
use std::path::Path;

use super::loader::ron_options;
use super::*;
use crate::boss::{BossConfig, BossEngine, ScriptDef, SelectionPolicy};
use crate::combat::ArenaBounds;
use crate::core::CombatTuning;
use crate::enemies::{ArchetypeDef, EnemyConfig, EnemyEngine, PatrolMode};
use crate::patterns::{PatternKind, SummonParams, VolleyParams};

const ENEMIES_RON: &str = include_str!("../../assets/data/enemies.ron");
const BOSSES_RON: &str = include_str!("../../assets/data/bosses.ron");
const TUNING_RON: &str = include_str!("../../assets/data/combat_tuning.ron");
const DEMO_LEVEL: &str = include_str!("../../assets/levels/demo.json");

fn shipped_registry() -> ContentRegistry {
    let mut registry = ContentRegistry::default();
    for def in parse_data_file::<EnemyDef>("enemies.ron", ENEMIES_RON).expect("enemies parse") {
        registry.insert_enemy(def);
    }
    for def in parse_data_file::<BossDef>("bosses.ron", BOSSES_RON).expect("bosses parse") {
        registry.insert_boss(def);
    }
    registry
}

fn boss_def(id: &str, phases: Vec<PhaseDef>) -> BossDef {
    BossDef {
        id: id.to_string(),
        config: BossConfig::default(),
        phases,
        script: ScriptDef::Standard,
        body_size: [64.0, 80.0],
    }
}

fn phase_def(threshold: f32, patterns: Vec<PatternDef>) -> PhaseDef {
    PhaseDef {
        name: "phase".to_string(),
        health_threshold: threshold,
        selection: SelectionPolicy::Random,
        speed_scale: 1.0,
        patterns,
    }
}

fn pattern_def(name: &str, kind: PatternKind) -> PatternDef {
    PatternDef {
        name: name.to_string(),
        cooldown: 1.0,
        kind,
    }
}

// -----------------------------------------------------------------------------
// Shipped content tests
// -----------------------------------------------------------------------------

#[test]
fn test_shipped_content_parses_and_validates() {
    let registry = shipped_registry();
    for id in [
        "slime",
        "imp",
        "bat",
        "spitter",
        "blinker",
        "shieldbearer",
        "wraith",
        "grappler",
    ] {
        assert!(registry.enemies.contains_key(id), "missing enemy {}", id);
    }
    assert!(registry.bosses.contains_key("stone_warden"));
    assert!(registry.bosses.contains_key("hive_mother"));

    let errors = validate_content(&registry);
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn test_shipped_tuning_parses() {
    let tuning: CombatTuning = ron_options().from_str(TUNING_RON).expect("tuning parses");
    assert_eq!(tuning, CombatTuning::default());
}

#[test]
fn test_shipped_bosses_build() {
    let registry = shipped_registry();
    let warden = &registry.bosses["stone_warden"];
    assert_eq!(warden.script_label(), "berserk");
    let table = warden.phase_table();
    assert_eq!(table.len(), 2);
    let thresholds: Vec<_> = table.iter().map(|p| p.health_threshold).collect();
    assert_eq!(thresholds, vec![1.0, 0.5]);
    assert_eq!(registry.bosses["hive_mother"].script_label(), "summoner");
}

#[test]
fn test_load_all_content_from_assets() {
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/data");
    let (registry, tuning) = load_all_content(&base).expect("assets load");
    assert_eq!(registry.enemies.len(), 8);
    assert_eq!(registry.bosses.len(), 2);
    assert_eq!(tuning, CombatTuning::default());
    assert!(registry.summary().contains("Bosses: 2"));
}

#[test]
fn test_missing_directory_reports_each_file() {
    let errors = load_all_content(Path::new("does/not/exist")).expect_err("nothing to load");
    assert_eq!(errors.len(), 2);
    assert!(errors[0].file.ends_with("enemies.ron"));
    assert!(errors[1].file.ends_with("bosses.ron"));
}

// -----------------------------------------------------------------------------
// RON parsing tests
// -----------------------------------------------------------------------------

#[test]
fn test_enemy_defaults_fill_missing_fields() {
    let items = parse_data_file::<EnemyDef>(
        "inline.ron",
        r#"(schema_version: 1, items: [(id: "blob", name: "Blob")])"#,
    )
    .expect("parses");
    assert_eq!(items.len(), 1);
    let blob = &items[0];
    assert_eq!(blob.archetype, ArchetypeDef::Walker);
    assert_eq!(blob.config, EnemyConfig::default());
    assert_eq!(blob.body_size(), Vec2::new(28.0, 28.0));
}

#[test]
fn test_archetype_parameters_parse() {
    let items = parse_data_file::<EnemyDef>(
        "inline.ron",
        r#"(
            schema_version: 1,
            items: [(
                id: "ghost",
                name: "Ghost",
                archetype: Wraith(tangible_time: 1.5, intangible_time: 0.5),
                config: (health: 4),
            )],
        )"#,
    )
    .expect("parses");
    assert_eq!(
        items[0].archetype,
        ArchetypeDef::Wraith {
            tangible_time: 1.5,
            intangible_time: 0.5,
        }
    );
    assert_eq!(items[0].config.health, 4);
    assert_eq!(items[0].config.move_speed, EnemyConfig::default().move_speed);
}

#[test]
fn test_parse_error_names_the_file() {
    let error = parse_data_file::<EnemyDef>("broken.ron", "(schema_version: 1, items: [")
        .expect_err("truncated file");
    assert_eq!(error.file, "broken.ron");
    assert!(error.to_string().starts_with("Failed to load broken.ron"));
}

// -----------------------------------------------------------------------------
// Validation tests
// -----------------------------------------------------------------------------

#[test]
fn test_summon_of_unknown_enemy_is_reported() {
    let mut registry = ContentRegistry::default();
    registry.insert_boss(boss_def(
        "queen",
        vec![phase_def(
            1.0,
            vec![pattern_def(
                "call",
                PatternKind::Summon(SummonParams {
                    kind: "ghost".to_string(),
                    ..default()
                }),
            )],
        )],
    ));

    let errors = validate_content(&registry);
    assert_eq!(
        errors,
        vec![ValidationError {
            source_type: "Boss",
            source_id: "queen".to_string(),
            field: "kind",
            problem: ValidationProblem::MissingRef {
                target_type: "Enemy",
                missing_id: "ghost".to_string(),
            },
        }]
    );
    assert_eq!(
        errors[0].to_string(),
        "Boss 'queen' references missing Enemy 'ghost' in field 'kind'"
    );
}

#[test]
fn test_bad_values_are_reported() {
    let mut registry = ContentRegistry::default();
    let mut weak = EnemyDef::new("weak", ArchetypeDef::Walker, EnemyConfig::default());
    weak.config.health = 0;
    weak.body_size = [0.0, 10.0];
    registry.insert_enemy(weak);
    registry.insert_boss(boss_def(
        "broken",
        vec![
            phase_def(1.5, vec![]),
            phase_def(
                0.5,
                vec![pattern_def(
                    "dud",
                    PatternKind::ProjectileVolley(VolleyParams {
                        count: 0,
                        ..default()
                    }),
                )],
            ),
        ],
    ));
    registry.insert_boss(boss_def("empty", vec![]));

    let fields: Vec<_> = validate_content(&registry)
        .into_iter()
        .map(|e| (e.source_id, e.field))
        .collect();
    for expected in [
        ("weak", "health"),
        ("weak", "body_size"),
        ("broken", "health_threshold"),
        ("broken", "patterns"),
        ("broken", "count"),
        ("empty", "phases"),
    ] {
        assert!(
            fields.iter().any(|(id, field)| id == expected.0 && *field == expected.1),
            "expected {:?} in {:?}",
            expected,
            fields
        );
    }
}

// -----------------------------------------------------------------------------
// Level placement tests
// -----------------------------------------------------------------------------

#[test]
fn test_demo_level_parses() {
    let level = parse_level_placement("demo.json", DEMO_LEVEL).expect("demo level parses");
    assert_eq!(level.enemies.len(), 7);
    assert_eq!(level.bosses.len(), 2);
    let bounds = level.arena_bounds().expect("bounds given");
    assert_eq!(bounds.min, Vec2::new(-200.0, -100.0));

    let slime = &level.enemies[0];
    assert_eq!(slime.patrol.mode, PatrolMode::PingPong);
    assert_eq!(slime.patrol.to_path().points.len(), 2);

    let registry = shipped_registry();
    for enemy in &level.enemies {
        assert!(registry.enemies.contains_key(&enemy.kind), "{}", enemy.kind);
    }
}

#[test]
fn test_placement_defaults() {
    let level = parse_level_placement(
        "tiny.json",
        r#"{ "enemies": [{ "kind": "slime", "position": [1.0, 2.0] }] }"#,
    )
    .expect("parses");
    assert!(level.bounds.is_none());
    assert!(level.bosses.is_empty());
    assert!(level.enemies[0].patrol.points.is_empty());
    assert_eq!(level.enemies[0].patrol.mode, PatrolMode::Loop);
}

#[test]
fn test_spawn_level_skips_unknown_kinds() {
    let registry = shipped_registry();
    let placement = parse_level_placement(
        "mixed.json",
        r#"{
            "bounds": { "min": [0.0, 0.0], "max": [500.0, 200.0] },
            "enemies": [
                { "kind": "slime", "position": [50.0, 0.0] },
                { "kind": "dragon", "position": [90.0, 0.0] }
            ],
            "bosses": [{ "kind": "stone_warden", "position": [400.0, 0.0] }]
        }"#,
    )
    .expect("parses");

    let mut world = World::new();
    let spawned = {
        let mut commands = world.commands();
        spawn_level(&mut commands, &registry, &placement, 11)
    };
    world.flush();

    assert_eq!(spawned.enemies.len(), 1);
    assert_eq!(spawned.bosses.len(), 1);
    assert_eq!(world.query::<&EnemyEngine>().iter(&world).count(), 1);
    let boss = world
        .get::<BossEngine>(spawned.bosses[0])
        .expect("boss spawned");
    assert_eq!(boss.config().name, "Stone Warden");
    assert_eq!(
        world.resource::<ArenaBounds>().max,
        Vec2::new(500.0, 200.0)
    );
}
