//! Projectiles domain: straight and guided shots with a capped lifetime.

use bevy::prelude::*;

use crate::combat::{HitInfo, Team, TargetView};
use crate::core::{CombatEventBus, CombatOutbound, Countdown};
use crate::enemies::ProjectileProfile;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProjectileMotion {
    #[default]
    Straight,
    /// Rotates toward the tracked target by at most `turn_rate * dt` radians per tick
    Guided { turn_rate: f32 },
}

/// Everything needed to spawn one projectile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec2,
    pub direction: Vec2,
    pub speed: f32,
    pub damage: u32,
    pub knockback: f32,
    pub lifetime: f32,
    pub owner: Option<Entity>,
    pub team: Team,
    pub motion: ProjectileMotion,
    /// Tracked by guided shots
    pub target: Option<Entity>,
}

impl ProjectileSpec {
    pub fn from_profile(
        profile: &ProjectileProfile,
        origin: Vec2,
        direction: Vec2,
        owner: Option<Entity>,
        team: Team,
        target: Option<Entity>,
    ) -> Self {
        let motion = match profile.guided_turn_rate {
            Some(turn_rate) => ProjectileMotion::Guided { turn_rate },
            None => ProjectileMotion::Straight,
        };
        Self {
            origin,
            direction,
            speed: profile.speed,
            damage: profile.damage,
            knockback: profile.knockback,
            lifetime: profile.lifetime,
            owner,
            team,
            motion,
            target,
        }
    }
}

/// What a projectile touched this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileContact {
    Wall,
    /// A combatant body. `tangible` is false for phased-out bodies.
    Body {
        entity: Entity,
        team: Team,
        position: Vec2,
        tangible: bool,
    },
    /// The player's attack hitbox
    AttackHitbox { owner: Entity },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOutcome {
    /// Hit a wall
    Destroyed,
    /// Damaged an opposing body
    Hit,
    Parried,
    /// Friendly, intangible, or already spent
    Ignored,
}

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    direction: Vec2,
    speed: f32,
    damage: u32,
    knockback: f32,
    lifetime: Countdown,
    owner: Option<Entity>,
    team: Team,
    motion: ProjectileMotion,
    target: Option<Entity>,
    alive: bool,
}

impl Projectile {
    pub fn new(spec: &ProjectileSpec) -> Self {
        let direction = spec.direction.normalize_or_zero();
        Self {
            direction: if direction == Vec2::ZERO { Vec2::X } else { direction },
            speed: spec.speed.max(0.0),
            damage: spec.damage,
            knockback: spec.knockback,
            lifetime: Countdown::new(spec.lifetime),
            owner: spec.owner,
            team: spec.team,
            motion: spec.motion,
            target: spec.target,
            alive: spec.lifetime > 0.0,
        }
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn velocity(&self) -> Vec2 {
        if self.alive {
            self.direction * self.speed
        } else {
            Vec2::ZERO
        }
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub fn team(&self) -> Team {
        self.team
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn remaining_lifetime(&self) -> f32 {
        self.lifetime.remaining()
    }

    pub fn destroy(&mut self) {
        self.alive = false;
    }

    /// Steer and age by one tick. Returns the velocity to hand the integrator,
    /// which is zero once the projectile has expired.
    pub fn tick(&mut self, dt: f32, position: Vec2, target: Option<&TargetView>) -> Vec2 {
        if !self.alive {
            return Vec2::ZERO;
        }
        if let (ProjectileMotion::Guided { turn_rate }, Some(target)) = (self.motion, target) {
            self.steer_toward(target.position - position, turn_rate * dt);
        }
        if self.lifetime.tick(dt) || self.lifetime.is_finished() {
            self.alive = false;
            return Vec2::ZERO;
        }
        self.velocity()
    }

    fn steer_toward(&mut self, desired: Vec2, max_angle: f32) {
        let desired = desired.normalize_or_zero();
        if desired == Vec2::ZERO || max_angle <= 0.0 {
            return;
        }
        let angle = self.direction.angle_to(desired);
        let turn = angle.clamp(-max_angle, max_angle);
        self.direction = Vec2::from_angle(turn).rotate(self.direction).normalize_or_zero();
        if self.direction == Vec2::ZERO {
            self.direction = desired;
        }
    }

    /// Resolve a contact reported by the collision layer.
    pub fn resolve_contact(
        &mut self,
        self_entity: Entity,
        position: Vec2,
        contact: ProjectileContact,
        bus: &mut dyn CombatEventBus,
    ) -> ProjectileOutcome {
        if !self.alive {
            return ProjectileOutcome::Ignored;
        }
        match contact {
            ProjectileContact::Wall => {
                self.alive = false;
                ProjectileOutcome::Destroyed
            }
            ProjectileContact::AttackHitbox { owner } => {
                if !self.team.opposes(Team::Player) {
                    return ProjectileOutcome::Ignored;
                }
                self.alive = false;
                debug!("Projectile {:?} parried by {:?}", self_entity, owner);
                bus.emit(CombatOutbound::Parried {
                    projectile: self_entity,
                    by: owner,
                });
                ProjectileOutcome::Parried
            }
            ProjectileContact::Body {
                entity,
                team,
                position: body_position,
                tangible,
            } => {
                if !tangible || !self.team.opposes(team) || Some(entity) == self.owner {
                    return ProjectileOutcome::Ignored;
                }
                self.alive = false;
                let hit = HitInfo::between(
                    self.damage,
                    self.knockback,
                    position,
                    body_position,
                    self.owner,
                );
                bus.hit_target(entity, hit);
                ProjectileOutcome::Hit
            }
        }
    }
}
