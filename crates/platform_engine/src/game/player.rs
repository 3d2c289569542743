//! Player controller
//!
//! Jump-and-run movement resolved against the collision registry one axis
//! at a time: X first, then Y from the already-resolved X. Each axis either
//! moves the whole way or not at all; there is no sliding, partial advance
//! or combined sweep. Fast falls at low step rates can therefore tunnel
//! through thin floors, which is accepted behavior.

use crate::core::config::MovementConfig;
use crate::foundation::math::Vec3;
use crate::physics::{CollisionRegistry, ColliderId, RegistryError};

/// Input sampled for one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal intent in [-1, 1]; negative is left
    pub horizontal: f32,
    /// Jump pressed this step
    pub jump: bool,
}

impl PlayerInput {
    /// No input
    pub fn idle() -> Self {
        Self::default()
    }

    /// Walk in the given direction
    pub fn walk(horizontal: f32) -> Self {
        Self {
            horizontal,
            jump: false,
        }
    }

    /// Same input with jump pressed
    pub fn with_jump(self) -> Self {
        Self { jump: true, ..self }
    }
}

/// What happened on the vertical axis this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalOutcome {
    /// Moved freely (possibly by zero)
    Moved,
    /// Falling move was blocked; now grounded
    Landed,
    /// Rising move was blocked by a ceiling
    HitCeiling,
    /// Blocked with no vertical velocity (resting contact)
    Blocked,
}

/// Result of one resolved move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveReport {
    /// Position after resolution
    pub position: Vec3,
    /// The X-only candidate overlapped something and X was kept
    pub blocked_x: bool,
    /// First collider hit by the X-only candidate
    pub x_blocker: Option<ColliderId>,
    /// First collider hit by the Y candidate
    pub y_blocker: Option<ColliderId>,
    /// Vertical resolution
    pub vertical: VerticalOutcome,
}

/// Player movement state
#[derive(Debug, Clone)]
pub struct PlayerController {
    id: ColliderId,
    config: MovementConfig,
    velocity: Vec3,
    grounded: bool,
}

impl PlayerController {
    /// Create a controller for the registered player collider
    pub fn new(id: ColliderId, config: MovementConfig) -> Self {
        Self {
            id,
            config,
            velocity: Vec3::zeros(),
            grounded: false,
        }
    }

    /// Collider driven by this controller
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// Current velocity (only Y persists between steps)
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Whether the last downward move was stopped by a collision
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Override vertical velocity, e.g. for knockback or scripted launches
    pub fn set_vertical_velocity(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    /// Apply jump and gravity for one step and return the horizontal displacement
    pub fn integrate(&mut self, input: PlayerInput, dt: f32) -> f32 {
        if self.grounded {
            self.velocity.y = 0.0;
            if input.jump {
                self.velocity.y = self.config.jump_force;
                self.grounded = false;
            }
        }

        if !self.grounded {
            let multiplier = if self.velocity.y > 0.0 {
                self.config.rise_multiplier
            } else {
                self.config.fall_multiplier
            };
            self.velocity.y -= self.config.gravity * multiplier * dt;
        }

        let mut speed = self.config.movement_speed;
        if !self.grounded {
            speed *= self.config.air_control;
        }
        self.velocity.x = input.horizontal.clamp(-1.0, 1.0) * speed;
        self.velocity.x * dt
    }

    /// Resolve a displacement axis by axis against the registry
    ///
    /// Does not commit anything; the registry is only read. Vertical
    /// velocity and the grounded flag are updated from the Y test.
    pub fn resolve(
        &mut self,
        registry: &CollisionRegistry,
        start: Vec3,
        dx: f32,
        dy: f32,
    ) -> Result<MoveReport, RegistryError> {
        let mut position = start;

        let candidate_x = Vec3::new(start.x + dx, start.y, start.z);
        let x_blocker = registry.check_collision(self.id, candidate_x)?;
        if x_blocker.is_none() {
            position.x = candidate_x.x;
        }

        let candidate_y = Vec3::new(position.x, position.y + dy, position.z);
        let y_blocker = registry.check_collision(self.id, candidate_y)?;
        let vertical = if y_blocker.is_some() {
            let outcome = if self.velocity.y < 0.0 {
                self.grounded = true;
                VerticalOutcome::Landed
            } else if self.velocity.y > 0.0 {
                VerticalOutcome::HitCeiling
            } else {
                VerticalOutcome::Blocked
            };
            self.velocity.y = 0.0;
            outcome
        } else {
            position.y = candidate_y.y;
            self.grounded = false;
            VerticalOutcome::Moved
        };

        Ok(MoveReport {
            position,
            blocked_x: x_blocker.is_some(),
            x_blocker,
            y_blocker,
            vertical,
        })
    }

    /// Run one full step: integrate, resolve, commit collider and render transform
    pub fn step(
        &mut self,
        registry: &mut CollisionRegistry,
        input: PlayerInput,
        dt: f32,
    ) -> Result<MoveReport, RegistryError> {
        let start = registry.get(self.id)?.center();
        let dx = self.integrate(input, dt);
        let dy = self.velocity.y * dt;

        let report = self.resolve(registry, start, dx, dy)?;
        if report.vertical == VerticalOutcome::Landed {
            log::debug!("Player landed at {:?}", report.position);
        }

        registry.move_to(self.id, report.position)?;
        let transform = registry.transform(self.id)?.with_position(report.position);
        registry.set_transform(self.id, transform)?;
        Ok(report)
    }
}
