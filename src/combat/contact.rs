//! Combat domain: classification of body contacts between the player and enemies.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyContact {
    /// Player landed on the enemy from above
    Stomp,
    /// Any other touch
    Touch,
}

/// Classify a player/enemy touch. `normal` points from the enemy toward the
/// player; a stomp needs the player clearly above and not rising.
pub fn classify_body_contact(normal: Vec2, player_velocity: Vec2, tolerance: f32) -> BodyContact {
    let normal = normal.normalize_or_zero();
    if normal.y >= tolerance && player_velocity.y <= 0.0 {
        BodyContact::Stomp
    } else {
        BodyContact::Touch
    }
}

/// Result of handing a contact to an engine. Callers may ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Engine is dead, intangible, or has collision disabled
    Ignored,
    /// Enemy took the stomp and the player bounced
    Stomped,
    /// Stomp on a non-stompable enemy hurt the player instead
    StompPunished,
    /// Contact damage went to the player
    PlayerHurt,
}
