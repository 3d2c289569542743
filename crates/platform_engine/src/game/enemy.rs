//! Patrolling enemies
//!
//! An enemy walks back and forth along X around its spawn point. Its box is
//! registered like any obstacle, so the player collides with it; the patrol
//! step keeps that box in sync with the enemy's position.

use crate::foundation::math::Vec3;
use crate::game::{OverlapHandler, OverlapResponse};
use crate::physics::{CollisionRegistry, ColliderId, RegistryError};

/// Result of one patrol step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatrolReport {
    /// The enemy moved this step
    pub moved: bool,
    /// Colliders the enemy would newly overlap at its candidate position
    pub blocked_by: Vec<ColliderId>,
}

/// Patrolling enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    id: ColliderId,
    start_x: f32,
    direction: f32,
    speed: f32,
    left_limit: f32,
    right_limit: f32,
    contacts: u32,
}

impl Enemy {
    /// Create an enemy for a registered collider centered at `start`
    pub fn new(id: ColliderId, start: Vec3, speed: f32, left_limit: f32, right_limit: f32) -> Self {
        Self {
            id,
            start_x: start.x,
            direction: 1.0,
            speed,
            left_limit,
            right_limit,
            contacts: 0,
        }
    }

    /// Collider owned by this enemy
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// +1 walking right, -1 walking left
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Times the player has touched this enemy
    pub fn contacts(&self) -> u32 {
        self.contacts
    }

    /// Advance the patrol by one step
    ///
    /// The enemy does not move into a collider it is not already touching;
    /// it turns around instead. Colliders it already overlaps at its
    /// current position (a bad spawn) do not pin it in place.
    pub fn patrol(&mut self, registry: &mut CollisionRegistry, dt: f32) -> Result<PatrolReport, RegistryError> {
        let position = registry.get(self.id)?.center();
        let candidate = position + Vec3::new(self.direction * self.speed * dt, 0.0, 0.0);

        let already = registry.overlapping(self.id, position)?;
        let blocked_by: Vec<ColliderId> = registry
            .overlapping(self.id, candidate)?
            .into_iter()
            .filter(|other| !already.contains(other))
            .collect();

        if !blocked_by.is_empty() {
            self.direction = -self.direction;
            return Ok(PatrolReport {
                moved: false,
                blocked_by,
            });
        }

        registry.move_to(self.id, candidate)?;
        let transform = registry.transform(self.id)?.with_position(candidate);
        registry.set_transform(self.id, transform)?;

        if candidate.x > self.start_x + self.right_limit || candidate.x < self.start_x + self.left_limit {
            self.direction = -self.direction;
        }

        Ok(PatrolReport {
            moved: true,
            blocked_by,
        })
    }
}

impl OverlapHandler for Enemy {
    fn on_overlap(&mut self, other: ColliderId) -> OverlapResponse {
        self.contacts += 1;
        log::debug!("Enemy {} touched by {}", self.id, other);
        OverlapResponse::Keep
    }
}
