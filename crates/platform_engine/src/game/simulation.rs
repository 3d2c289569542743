//! Step loop
//!
//! One call to [`Simulation::step`] runs a whole world tick in a fixed
//! order: the player moves, then every enemy patrols, then overlaps are
//! dispatched to their owners. Overlap handlers answer with an
//! [`OverlapResponse`]; despawns are applied by the loop after dispatch, and
//! any despawn of a registered entity releases its collider.
//!
//! Picking up a fireball powerup launches a [`Fireball`] from the player in
//! the direction it is moving. Fireballs that reach an enemy destroy it.

use thiserror::Error;

use crate::core::config::{ApplicationConfig, ConfigError, MovementConfig, SimulationConfig};
use crate::foundation::math::Vec3;
use crate::foundation::time::FixedStep;
use crate::game::enemy::Enemy;
use crate::game::fireball::Fireball;
use crate::game::player::{PlayerController, PlayerInput, VerticalOutcome};
use crate::game::powerup::{Powerup, PowerupKind};
use crate::game::world_gen::{GeneratedWorld, WorldGenerator};
use crate::game::{OverlapHandler, OverlapResponse};
use crate::physics::{BoundingVolume, CollisionRegistry, ColliderId, RegistryError};

/// Step loop errors
#[derive(Error, Debug)]
pub enum SimulationError {
    /// The configuration was rejected before anything was built
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A registry call failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The id does not belong to a live enemy
    #[error("No enemy owns collider {0}")]
    UnknownEnemy(ColliderId),
}

/// Something observable that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEvent {
    /// The player's fall was stopped by a collider
    Landed,
    /// The player picked up a powerup
    PowerupCollected {
        /// Effect granted
        kind: PowerupKind,
    },
    /// The player and an enemy touched
    EnemyContact {
        /// The enemy's collider
        enemy: ColliderId,
    },
    /// An enemy was removed and its collider released
    EnemyDespawned {
        /// The released collider
        enemy: ColliderId,
    },
}

/// A running world
pub struct Simulation {
    registry: CollisionRegistry,
    player: PlayerController,
    ground: ColliderId,
    enemies: Vec<Enemy>,
    powerups: Vec<Powerup>,
    fireballs: Vec<Fireball>,
    clock: FixedStep,
    steps: u64,
}

impl Simulation {
    /// Generate a world from `config` and wrap it in a step loop
    ///
    /// The whole configuration is validated first; an invalid one builds
    /// nothing.
    pub fn new(config: &ApplicationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let mut registry = CollisionRegistry::with_config(&config.registry);
        let world = WorldGenerator::from_config(config.world.clone())?.generate(&mut registry)?;
        Self::from_world(registry, world, config.movement.clone(), &config.simulation)
    }

    /// Wrap an already generated world
    pub fn from_world(
        registry: CollisionRegistry,
        world: GeneratedWorld,
        movement: MovementConfig,
        simulation: &SimulationConfig,
    ) -> Result<Self, SimulationError> {
        movement.validate()?;
        simulation.validate()?;
        Ok(Self {
            registry,
            player: PlayerController::new(world.player, movement),
            ground: world.ground,
            enemies: world.enemies,
            powerups: world.powerups,
            fireballs: Vec::new(),
            clock: FixedStep::new(simulation.fixed_timestep, simulation.max_steps_per_frame),
            steps: 0,
        })
    }

    /// Run one tick of `dt` seconds
    pub fn step(&mut self, input: PlayerInput, dt: f32) -> Result<Vec<SimulationEvent>, SimulationError> {
        let mut events = Vec::new();
        let player_id = self.player.id();

        let report = self.player.step(&mut self.registry, input, dt)?;
        if report.vertical == VerticalOutcome::Landed {
            events.push(SimulationEvent::Landed);
        }

        // Enemies the player ran or fell into, then enemies that walked into the player
        let mut touched: Vec<ColliderId> = Vec::new();
        for blocker in [report.x_blocker, report.y_blocker].into_iter().flatten() {
            if self.is_enemy(blocker) && !touched.contains(&blocker) {
                touched.push(blocker);
            }
        }
        for enemy in &mut self.enemies {
            let patrol = enemy.patrol(&mut self.registry, dt)?;
            if patrol.blocked_by.contains(&player_id) && !touched.contains(&enemy.id()) {
                touched.push(enemy.id());
            }
        }

        let mut doomed = Vec::new();
        for enemy in self.enemies.iter_mut().filter(|e| touched.contains(&e.id())) {
            events.push(SimulationEvent::EnemyContact { enemy: enemy.id() });
            if enemy.on_overlap(player_id) == OverlapResponse::Despawn {
                doomed.push(enemy.id());
            }
        }

        let player_volume = self.registry.get(player_id)?.volume;
        let mut launched = 0;
        self.powerups.retain_mut(|powerup| {
            if !powerup.volume().overlaps(&player_volume) {
                return true;
            }
            match powerup.on_overlap(player_id) {
                OverlapResponse::Keep => true,
                OverlapResponse::Despawn => {
                    if powerup.kind() == PowerupKind::Fireball {
                        launched += 1;
                    }
                    events.push(SimulationEvent::PowerupCollected { kind: powerup.kind() });
                    false
                }
            }
        });
        for _ in 0..launched {
            self.launch_fireball(&player_volume);
        }

        for hit in self.advance_fireballs(dt)? {
            if !doomed.contains(&hit) {
                doomed.push(hit);
            }
        }
        for id in doomed {
            self.despawn_enemy(id)?;
            events.push(SimulationEvent::EnemyDespawned { enemy: id });
        }

        self.steps += 1;
        Ok(events)
    }

    /// Feed a frame's elapsed time and run as many fixed steps as it covers
    pub fn advance(&mut self, input: PlayerInput, frame_time: f32) -> Result<Vec<SimulationEvent>, SimulationError> {
        let steps = self.clock.advance(frame_time);
        let dt = self.clock.step();

        let mut events = Vec::new();
        for _ in 0..steps {
            events.extend(self.step(input, dt)?);
        }
        Ok(events)
    }

    /// Remove an enemy and release its collider
    pub fn despawn_enemy(&mut self, id: ColliderId) -> Result<Enemy, SimulationError> {
        let index = self
            .enemies
            .iter()
            .position(|enemy| enemy.id() == id)
            .ok_or(SimulationError::UnknownEnemy(id))?;

        self.registry.release(id)?;
        let enemy = self.enemies.remove(index);
        log::info!("Despawned enemy {}", id);
        Ok(enemy)
    }

    fn launch_fireball(&mut self, player_volume: &BoundingVolume) {
        let direction = if self.player.velocity().x < 0.0 { -Vec3::x() } else { Vec3::x() };
        log::debug!("Launching fireball from {:?}", player_volume.center);
        self.fireballs
            .push(Fireball::new(player_volume.center, player_volume.size() * 0.5, direction));
    }

    /// Move fireballs, drop spent ones and return the enemies they hit
    fn advance_fireballs(&mut self, dt: f32) -> Result<Vec<ColliderId>, SimulationError> {
        let mut hits = Vec::new();
        for fireball in &mut self.fireballs {
            fireball.advance(dt);
            for enemy in &self.enemies {
                if hits.contains(&enemy.id()) {
                    continue;
                }
                let volume = self.registry.get(enemy.id())?.volume;
                if volume.overlaps(fireball.volume())
                    && fireball.on_overlap(enemy.id()) == OverlapResponse::Despawn
                {
                    hits.push(enemy.id());
                    break;
                }
            }
        }
        self.fireballs.retain(|fireball| !fireball.is_spent());
        Ok(hits)
    }

    fn is_enemy(&self, id: ColliderId) -> bool {
        self.enemies.iter().any(|enemy| enemy.id() == id)
    }

    /// Current player position
    pub fn player_position(&self) -> Result<Vec3, SimulationError> {
        Ok(self.registry.get(self.player.id())?.center())
    }

    /// The collision registry
    pub fn registry(&self) -> &CollisionRegistry {
        &self.registry
    }

    /// Mutable access for spawning extra geometry
    pub fn registry_mut(&mut self) -> &mut CollisionRegistry {
        &mut self.registry
    }

    /// The player controller
    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Mutable player controller, e.g. to apply knockback
    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// The ground collider
    pub fn ground(&self) -> ColliderId {
        self.ground
    }

    /// Live enemies
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Powerups not yet collected
    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    /// Fireballs in flight
    pub fn fireballs(&self) -> &[Fireball] {
        &self.fireballs
    }

    /// Add a powerup trigger to the world
    pub fn add_powerup(&mut self, powerup: Powerup) {
        self.powerups.push(powerup);
    }

    /// Add an enemy whose collider is already registered
    pub fn add_enemy(&mut self, enemy: Enemy) -> Result<(), SimulationError> {
        self.registry.get(enemy.id())?;
        self.enemies.push(enemy);
        Ok(())
    }

    /// Ticks run so far
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
