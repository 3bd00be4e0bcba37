//! Physics domain: tests for the pure helpers behind the avian bridge.

use avian2d::prelude::RigidBody;
use bevy::prelude::Vec2;

use super::{contact_normal, enemy_body_kind, ledge_probe_origin};

// -----------------------------------------------------------------------------
// Contact normal tests
// -----------------------------------------------------------------------------

#[test]
fn test_normal_points_from_subject_to_other() {
    let n = contact_normal(Vec2::ZERO, Vec2::new(0.0, 10.0));
    assert!((n - Vec2::Y).length() < 1e-6);
    let n = contact_normal(Vec2::new(5.0, 0.0), Vec2::ZERO);
    assert!((n - Vec2::NEG_X).length() < 1e-6);
}

#[test]
fn test_coincident_positions_fall_back_to_up() {
    assert_eq!(contact_normal(Vec2::ONE, Vec2::ONE), Vec2::Y);
}

// -----------------------------------------------------------------------------
// Body tests
// -----------------------------------------------------------------------------

#[test]
fn test_planar_enemies_ignore_gravity() {
    let (body, gravity) = enemy_body_kind(true);
    assert_eq!(body, RigidBody::Kinematic);
    assert_eq!(gravity.0, 0.0);

    let (body, gravity) = enemy_body_kind(false);
    assert_eq!(body, RigidBody::Dynamic);
    assert_eq!(gravity.0, 1.0);
}

#[test]
fn test_ledge_probe_sits_at_front_foot() {
    let size = Vec2::new(20.0, 30.0);
    assert_eq!(ledge_probe_origin(Vec2::ZERO, size, 1.0), Vec2::new(10.0, -15.0));
    assert_eq!(
        ledge_probe_origin(Vec2::new(100.0, 0.0), size, -1.0),
        Vec2::new(90.0, -15.0)
    );
}
