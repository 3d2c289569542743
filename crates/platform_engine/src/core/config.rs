//! # Unified Configuration System
//!
//! Typed configuration for every subsystem of the platformer core: player
//! movement, world generation, the collision registry's spatial index and
//! the fixed-step simulation loop.
//!
//! ## Design Goals
//!
//! - **Centralized**: All configuration types in one place for easy discovery
//! - **Serializable**: Loadable from TOML or RON through [`Config`]
//! - **Type Safe**: Strong typing with validation and defaults
//!
//! Defaults are the shipped game tuning, so an empty file is a
//! valid configuration.

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec3;

// Loader trait and error type
pub use crate::config::{Config, ConfigError};

/// # Movement Configuration
///
/// Tuning for the player controller's integration step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed on the ground, units per second
    pub movement_speed: f32,
    /// Downward acceleration, units per second squared
    pub gravity: f32,
    /// Vertical velocity applied on jump
    pub jump_force: f32,
    /// Gravity multiplier while rising
    pub rise_multiplier: f32,
    /// Gravity multiplier while falling
    pub fall_multiplier: f32,
    /// Fraction of `movement_speed` available while airborne
    pub air_control: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            movement_speed: 5.0,
            gravity: 9.8,
            jump_force: 15.0,
            rise_multiplier: 1.0,
            fall_multiplier: 0.5,
            air_control: 0.5,
        }
    }
}

impl MovementConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.movement_speed < 0.0 || self.gravity < 0.0 || self.jump_force < 0.0 {
            return Err(ConfigError::Invalid(
                "movement speed, gravity and jump force must not be negative".to_string(),
            ));
        }
        if self.rise_multiplier < 0.0 || self.fall_multiplier < 0.0 {
            return Err(ConfigError::Invalid("gravity multipliers must not be negative".to_string()));
        }
        if !(0.0..=1.0).contains(&self.air_control) {
            return Err(ConfigError::Invalid("air control must be within [0, 1]".to_string()));
        }
        Ok(())
    }
}

/// # World Configuration
///
/// Parameters for the world initializer: ground slab, random obstacles,
/// enemy and powerup spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Total instanced boxes, including the player and the ground
    pub instance_count: usize,
    /// Base size of the unit box mesh (width, height, depth)
    pub box_size: Vec3,
    /// Depth plane every object lives on
    pub constant_z: f32,
    /// Left edge of the spawn range
    pub min_x: f32,
    /// Right edge of the spawn range
    pub max_x: f32,
    /// Bottom of the free-floating box range
    pub min_y: f32,
    /// Top of the free-floating box range
    pub max_y: f32,
    /// Center height of the ground slab
    pub ground_y: f32,
    /// Ground slab width
    pub ground_width: f32,
    /// Ground slab depth
    pub ground_depth: f32,
    /// Where the player starts
    pub player_start: Vec3,
    /// Smallest per-axis obstacle scale
    pub obstacle_scale_min: f32,
    /// Largest per-axis obstacle scale (exclusive)
    pub obstacle_scale_max: f32,
    /// Enemies spawned at startup
    pub num_enemies: usize,
    /// Powerups spawned at startup
    pub num_powerups: usize,
    /// Size of a powerup's trigger volume
    pub powerup_scale: Vec3,
    /// Enemy patrol speed, units per second
    pub enemy_patrol_speed: f32,
    /// Patrol limit left of the spawn point (negative)
    pub enemy_patrol_left: f32,
    /// Patrol limit right of the spawn point
    pub enemy_patrol_right: f32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            instance_count: 100,
            box_size: Vec3::new(1.0, 1.0, 1.0),
            constant_z: 0.0,
            min_x: -50.0,
            max_x: 50.0,
            min_y: -50.0,
            max_y: 50.0,
            ground_y: -20.0,
            ground_width: 200.0,
            ground_depth: 200.0,
            player_start: Vec3::new(0.0, 10.0, 0.0),
            obstacle_scale_min: 0.5,
            obstacle_scale_max: 3.0,
            num_enemies: 3,
            num_powerups: 3,
            powerup_scale: Vec3::new(1.0, 1.0, 1.0),
            enemy_patrol_speed: 2.0,
            enemy_patrol_left: -5.0,
            enemy_patrol_right: 5.0,
            seed: None,
        }
    }
}

impl WorldConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instance_count < 2 {
            return Err(ConfigError::Invalid(
                "instance count must cover at least the player and the ground".to_string(),
            ));
        }
        if !(self.min_x.is_finite() && self.max_x.is_finite() && self.min_x < self.max_x) {
            return Err(ConfigError::Invalid(format!(
                "spawn range is empty: min_x {} max_x {}",
                self.min_x, self.max_x
            )));
        }
        if !(self.min_y.is_finite() && self.max_y.is_finite() && self.min_y < self.max_y) {
            return Err(ConfigError::Invalid(format!(
                "vertical range is empty: min_y {} max_y {}",
                self.min_y, self.max_y
            )));
        }
        if !(self.obstacle_scale_min > 0.0 && self.obstacle_scale_min < self.obstacle_scale_max && self.obstacle_scale_max.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "obstacle scale range [{}, {}) is not positive and non-empty",
                self.obstacle_scale_min, self.obstacle_scale_max
            )));
        }
        if self.ground_width <= 0.0 || self.ground_depth <= 0.0 {
            return Err(ConfigError::Invalid("ground must have a positive footprint".to_string()));
        }
        if self.box_size.iter().any(|c| *c <= 0.0) || self.powerup_scale.iter().any(|c| *c <= 0.0) {
            return Err(ConfigError::Invalid("box and powerup sizes must be positive".to_string()));
        }
        if self.enemy_patrol_left > 0.0 || self.enemy_patrol_right < 0.0 {
            return Err(ConfigError::Invalid(
                "enemy patrol limits must bracket the spawn point".to_string(),
            ));
        }
        Ok(())
    }
}

/// Spatial index used by the collision registry's broad phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BroadPhaseKind {
    /// Test every live volume
    Linear,
    /// Uniform hash grid with cubic cells
    Grid {
        /// Edge length of one cell
        cell_size: f32,
    },
}

/// # Registry Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Broad-phase index
    pub broad_phase: BroadPhaseKind,
    /// Grid cells a single volume may occupy before it is kept in the
    /// always-tested overflow list instead
    pub grid_max_cells_per_volume: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            broad_phase: BroadPhaseKind::Linear,
            grid_max_cells_per_volume: 64,
        }
    }
}

impl RegistryConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let BroadPhaseKind::Grid { cell_size } = self.broad_phase {
            if !(cell_size.is_finite() && cell_size > 0.0) {
                return Err(ConfigError::Invalid(format!("grid cell size must be positive, got {cell_size}")));
            }
        }
        if self.grid_max_cells_per_volume == 0 {
            return Err(ConfigError::Invalid("grid cell budget must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// # Simulation Configuration
///
/// Step loop timing and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one simulation step in seconds
    pub fixed_timestep: f32,
    /// Upper bound on steps run for a single frame
    pub max_steps_per_frame: u32,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
            log_level: "info".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid("max steps per frame must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Player movement tuning
    pub movement: MovementConfig,
    /// World generation
    pub world: WorldConfig,
    /// Collision registry
    pub registry: RegistryConfig,
    /// Step loop
    pub simulation: SimulationConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()?;
        self.world.validate()?;
        self.registry.validate()?;
        self.simulation.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
