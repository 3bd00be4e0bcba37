//! Core domain: tests for timers, the clock and the outbox.

use bevy::prelude::*;

use super::{CombatEventBus, CombatOutbox, CombatSet, CorePlugin, Countdown, DoorSignal, SimClock};
use crate::combat::HitInfo;

// -----------------------------------------------------------------------------
// Countdown tests
// -----------------------------------------------------------------------------

#[test]
fn test_countdown_default_is_finished() {
    let countdown = Countdown::default();
    assert!(countdown.is_finished());
    assert_eq!(countdown.remaining(), 0.0);
}

#[test]
fn test_countdown_clamps_at_zero() {
    let mut countdown = Countdown::new(0.5);
    assert!(countdown.tick(2.0));
    assert_eq!(countdown.remaining(), 0.0);
    assert!(!countdown.tick(1.0));
    assert_eq!(countdown.remaining(), 0.0);
}

#[test]
fn test_countdown_reports_finish_once() {
    let mut countdown = Countdown::new(0.3);
    assert!(!countdown.tick(0.1));
    assert!(!countdown.tick(0.1));
    assert!(countdown.tick(0.1));
    assert!(!countdown.tick(0.1));
}

#[test]
fn test_countdown_absorbs_frame_drift() {
    let mut countdown = Countdown::new(3.0);
    let dt = 1.0 / 60.0;
    for _ in 0..179 {
        assert!(!countdown.tick(dt));
    }
    assert!(countdown.tick(dt));
}

#[test]
fn test_countdown_carry_returns_leftover() {
    let mut countdown = Countdown::new(0.375);
    assert_eq!(countdown.tick_carry(0.25), None);
    assert_eq!(countdown.tick_carry(0.25), Some(0.125));
    assert!(countdown.is_finished());
    assert_eq!(countdown.tick_carry(0.5), Some(0.5));
}

#[test]
fn test_countdown_negative_start_is_finished() {
    let countdown = Countdown::new(-1.0);
    assert!(countdown.is_finished());
}

#[test]
fn test_countdown_ignores_negative_delta() {
    let mut countdown = Countdown::new(1.0);
    countdown.tick(-5.0);
    assert_eq!(countdown.remaining(), 1.0);
}

// -----------------------------------------------------------------------------
// SimClock tests
// -----------------------------------------------------------------------------

#[test]
fn test_sim_clock_accumulates() {
    let mut clock = SimClock::default();
    clock.advance(0.5);
    clock.advance(0.25);
    assert!((clock.now - 0.75).abs() < 1e-9);
    assert_eq!(clock.delta, 0.25);
}

// -----------------------------------------------------------------------------
// Outbox tests
// -----------------------------------------------------------------------------

#[test]
fn test_outbox_buffers_and_drains() {
    let mut world = World::new();
    let target = world.spawn_empty().id();

    let mut outbox = CombatOutbox::default();
    outbox.hit_target(target, HitInfo::new(2, 100.0, 1.0, None));
    outbox.notify_door(DoorSignal::Lock("gate".to_string()));

    assert_eq!(outbox.len(), 2);
    assert_eq!(outbox.hits().count(), 1);

    let drained = outbox.drain();
    assert_eq!(drained.len(), 2);
    assert!(outbox.is_empty());
}

// -----------------------------------------------------------------------------
// Schedule tests
// -----------------------------------------------------------------------------

#[derive(Resource, Default)]
struct RunOrder(Vec<&'static str>);

#[test]
fn test_collisions_are_forwarded_before_contacts_resolve() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, CorePlugin))
        .init_resource::<RunOrder>()
        .add_systems(
            Update,
            (|mut order: ResMut<RunOrder>| order.0.push("contacts")).in_set(CombatSet::Contacts),
        )
        .add_systems(
            Update,
            (|mut order: ResMut<RunOrder>| order.0.push("collisions"))
                .in_set(CombatSet::Collisions),
        );
    app.update();
    assert_eq!(app.world().resource::<RunOrder>().0, vec!["collisions", "contacts"]);
}
