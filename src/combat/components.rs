//! Combat domain: components shared by every combatant.

use bevy::prelude::*;

/// Marks an entity as a combat participant
#[derive(Component, Debug)]
pub struct Combatant;

/// Team affiliation to prevent friendly fire
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Team {
    Player,
    #[default]
    Enemy,
}

impl Team {
    pub fn opposes(self, other: Team) -> bool {
        self != other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Facing for a horizontal delta; zero keeps `current`.
    pub fn toward(current: Facing, dx: f32) -> Facing {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            current
        }
    }

    pub fn flipped(self) -> Facing {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}

/// Something enemies may detect and pursue. The player locomotion system owns
/// its position and velocity; the core only reads them.
#[derive(Component, Debug, Default)]
pub struct CombatTarget;

/// Player body marker (contacts with enemies resolve stomps and contact damage)
#[derive(Component, Debug)]
pub struct Player;

/// Hitbox spawned by the player's weapon system.
#[derive(Component, Debug)]
pub struct PlayerAttackHitbox {
    pub damage: u32,
    pub knockback: f32,
    pub owner: Entity,
    pub hit_entities: Vec<Entity>,
}

impl PlayerAttackHitbox {
    pub fn new(damage: u32, knockback: f32, owner: Entity) -> Self {
        Self {
            damage,
            knockback,
            owner,
            hit_entities: Vec::new(),
        }
    }
}

/// Static level geometry that destroys projectiles on contact
#[derive(Component, Debug)]
pub struct Wall;

/// Entity created by a boss summon; links minion deaths back to the summoner.
#[derive(Component, Debug, Clone, Copy)]
pub struct SummonedBy(pub Entity);

/// Corpse waiting for its death animation to finish before removal
#[derive(Component, Debug)]
pub struct Corpse {
    pub timer: crate::core::Countdown,
}

/// Collision box extents used by the physics bridge
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BodySize(pub Vec2);
