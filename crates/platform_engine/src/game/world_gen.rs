//! World initializer
//!
//! Registers the player, the ground slab and a field of random obstacles
//! with the collision registry, then places enemies and powerups. Obstacles
//! get a random quarter-turn about Z in their render transform; their
//! collision boxes stay axis-aligned and unrotated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::config::{ConfigError, WorldConfig};
use crate::foundation::math::{rotation_z_degrees, Quat, Transform, Vec3};
use crate::game::enemy::Enemy;
use crate::game::powerup::{Powerup, PowerupKind};
use crate::physics::{BoundingVolume, CollisionRegistry, ColliderId, RegistryError};

/// Everything the initializer created
#[derive(Debug)]
pub struct GeneratedWorld {
    /// The player's collider
    pub player: ColliderId,
    /// The ground slab
    pub ground: ColliderId,
    /// Obstacles that found a free spot
    pub obstacles: Vec<ColliderId>,
    /// Enemies, already registered
    pub enemies: Vec<Enemy>,
    /// Powerup trigger volumes (not registered)
    pub powerups: Vec<Powerup>,
}

/// Seeded world generator
pub struct WorldGenerator<R: Rng = StdRng> {
    config: WorldConfig,
    rng: R,
}

impl WorldGenerator<StdRng> {
    /// Create a generator seeded from the config, or from entropy if unset
    pub fn from_config(config: WorldConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> WorldGenerator<R> {
    /// Create a generator over a caller-supplied RNG
    ///
    /// The config is validated here, so every sampling range used later is
    /// non-empty.
    pub fn with_rng(config: WorldConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    /// Build the whole world into `registry`
    ///
    /// A registration failure aborts generation; a half-built world is never
    /// returned.
    pub fn generate(&mut self, registry: &mut CollisionRegistry) -> Result<GeneratedWorld, RegistryError> {
        let player = self.create_player(registry)?;
        let ground = self.create_ground(registry)?;
        let obstacles = self.generate_obstacles(registry)?;
        let enemies = self.generate_enemies(registry)?;
        let powerups = self.generate_powerups();

        log::info!(
            "Generated world: {} obstacles, {} enemies, {} powerups ({} colliders)",
            obstacles.len(),
            enemies.len(),
            powerups.len(),
            registry.len()
        );

        Ok(GeneratedWorld {
            player,
            ground,
            obstacles,
            enemies,
            powerups,
        })
    }

    fn create_player(&mut self, registry: &mut CollisionRegistry) -> Result<ColliderId, RegistryError> {
        let position = self.config.player_start;
        registry.register_with_transform(position, self.config.box_size, true, Transform::from_position(position))
    }

    fn create_ground(&mut self, registry: &mut CollisionRegistry) -> Result<ColliderId, RegistryError> {
        let position = Vec3::new(0.0, self.config.ground_y, self.config.constant_z);
        let size = Vec3::new(self.config.ground_width, 1.0, self.config.ground_depth);
        let transform = Transform::from_trs(position, Quat::identity(), size);
        registry.register_with_transform(position, size, false, transform)
    }

    fn random_scale(&mut self) -> Vec3 {
        let (lo, hi) = (self.config.obstacle_scale_min, self.config.obstacle_scale_max);
        Vec3::new(
            self.rng.gen_range(lo..hi),
            self.rng.gen_range(lo..hi),
            self.rng.gen_range(lo..hi),
        )
    }

    /// Rest obstacles on the ground without overlapping each other in XY
    fn generate_obstacles(&mut self, registry: &mut CollisionRegistry) -> Result<Vec<ColliderId>, RegistryError> {
        let target = self.config.instance_count.saturating_sub(2);
        let max_attempts = target * 10;
        let mut placed: Vec<BoundingVolume> = Vec::with_capacity(target);
        let mut obstacles = Vec::with_capacity(target);
        let mut attempts = 0;

        while obstacles.len() < target && attempts < max_attempts {
            attempts += 1;

            let x = self.rng.gen_range(self.config.min_x..self.config.max_x);
            let scale = self.random_scale();
            let quarter_turns = self.rng.gen_range(0..4u8);
            let size = self.config.box_size.component_mul(&scale);
            let y = self.config.ground_y + 0.5 + size.y / 2.0;
            let position = Vec3::new(x, y, self.config.constant_z);

            // Footprint in the XY plane; depth is irrelevant for placement
            let footprint = BoundingVolume::from_size(Vec3::new(x, y, 0.0), Vec3::new(size.x, size.y, 1.0));
            if placed.iter().any(|other| other.overlaps(&footprint)) {
                continue;
            }
            placed.push(footprint);

            let rotation = rotation_z_degrees(90.0 * f32::from(quarter_turns));
            let transform = Transform::from_trs(position, rotation, scale);
            obstacles.push(registry.register_with_transform(position, size, false, transform)?);
        }

        if obstacles.len() < target {
            log::warn!(
                "Placed {} of {} obstacles after {} attempts",
                obstacles.len(),
                target,
                attempts
            );
        }
        Ok(obstacles)
    }

    fn generate_enemies(&mut self, registry: &mut CollisionRegistry) -> Result<Vec<Enemy>, RegistryError> {
        let mut enemies = Vec::with_capacity(self.config.num_enemies);
        for _ in 0..self.config.num_enemies {
            let x = self.rng.gen_range(self.config.min_x..self.config.max_x);
            let position = Vec3::new(x, self.config.ground_y + 1.0, self.config.constant_z);
            enemies.push(self.spawn_enemy(registry, position)?);
        }
        Ok(enemies)
    }

    /// Register one enemy at `position`
    pub fn spawn_enemy(&mut self, registry: &mut CollisionRegistry, position: Vec3) -> Result<Enemy, RegistryError> {
        let id = registry.register(position, self.config.box_size, false)?;
        Ok(Enemy::new(
            id,
            position,
            self.config.enemy_patrol_speed,
            self.config.enemy_patrol_left,
            self.config.enemy_patrol_right,
        ))
    }

    fn generate_powerups(&mut self) -> Vec<Powerup> {
        let size = self.config.powerup_scale;
        (0..self.config.num_powerups)
            .map(|_| {
                let x = self.rng.gen_range(self.config.min_x..self.config.max_x);
                let y = self.config.ground_y + 0.5 + size.y / 2.0;
                let kind = PowerupKind::random(&mut self.rng);
                Powerup::new(kind, Vec3::new(x, y, self.config.constant_z), size)
            })
            .collect()
    }

    /// Register a free-floating box anywhere in the spawn area
    ///
    /// Unlike startup obstacles it may overlap existing geometry and carries
    /// an arbitrary Z rotation in its render transform.
    pub fn add_random_box(&mut self, registry: &mut CollisionRegistry) -> Result<ColliderId, RegistryError> {
        let position = Vec3::new(
            self.rng.gen_range(self.config.min_x..self.config.max_x),
            self.rng.gen_range(self.config.min_y..self.config.max_y),
            self.config.constant_z,
        );
        let rotation = rotation_z_degrees(self.rng.gen_range(0.0..360.0));
        let scale = self.random_scale();
        let size = self.config.box_size.component_mul(&scale);
        registry.register_with_transform(position, size, false, Transform::from_trs(position, rotation, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> WorldGenerator {
        WorldGenerator::from_config(WorldConfig {
            seed: Some(seed),
            ..WorldConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut first = CollisionRegistry::new();
        let mut second = CollisionRegistry::new();
        seeded(11).generate(&mut first).unwrap();
        seeded(11).generate(&mut second).unwrap();

        let a: Vec<_> = first.entries().map(|(_, e)| *e).collect();
        let b: Vec<_> = second.entries().map(|(_, e)| *e).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_obstacles_rest_on_ground_without_overlap() {
        let mut registry = CollisionRegistry::new();
        let world = seeded(5).generate(&mut registry).unwrap();

        assert!(!world.obstacles.is_empty());
        assert!(world.obstacles.len() <= 98);
        for id in &world.obstacles {
            let entry = registry.get(*id).unwrap();
            let bottom = entry.center().y - entry.half_extents().y;
            assert!((bottom - (-19.5)).abs() < 1e-4, "bottom = {bottom}");
        }
        for (i, a) in world.obstacles.iter().enumerate() {
            for b in &world.obstacles[i + 1..] {
                assert!(!registry.overlap_between(*a, *b).unwrap());
            }
        }
    }

    #[test]
    fn test_obstacle_render_rotation_is_quarter_turn_only() {
        let mut registry = CollisionRegistry::new();
        let world = seeded(9).generate(&mut registry).unwrap();

        for id in &world.obstacles {
            let angle = registry.transform(*id).unwrap().rotation.angle().to_degrees();
            let remainder = angle % 90.0;
            assert!(remainder < 0.1 || remainder > 89.9, "angle = {angle}");
        }
    }

    #[test]
    fn test_player_ground_and_spawns() {
        let mut registry = CollisionRegistry::new();
        let world = seeded(1).generate(&mut registry).unwrap();

        let player = registry.get(world.player).unwrap();
        assert!(player.is_dynamic);
        assert_eq!(player.center(), Vec3::new(0.0, 10.0, 0.0));

        let ground = registry.get(world.ground).unwrap();
        assert!(!ground.is_dynamic);
        assert_eq!(ground.volume.size(), Vec3::new(200.0, 1.0, 200.0));

        assert_eq!(world.enemies.len(), 3);
        for enemy in &world.enemies {
            assert_eq!(registry.get(enemy.id()).unwrap().center().y, -19.0);
        }
        assert_eq!(world.powerups.len(), 3);
        for powerup in &world.powerups {
            assert_eq!(powerup.volume().center.y, -19.0);
        }
        assert_eq!(
            registry.len(),
            2 + world.obstacles.len() + world.enemies.len()
        );
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_invalid_ranges_are_rejected_up_front() {
        let flat_x = WorldConfig {
            min_x: 5.0,
            max_x: 5.0,
            ..WorldConfig::default()
        };
        assert!(matches!(WorldGenerator::from_config(flat_x), Err(ConfigError::Invalid(_))));

        let flat_y = WorldConfig {
            min_y: 1.0,
            max_y: -1.0,
            ..WorldConfig::default()
        };
        let rng = StdRng::seed_from_u64(0);
        assert!(matches!(WorldGenerator::with_rng(flat_y, rng), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_random_box_is_registered_static() {
        let mut registry = CollisionRegistry::new();
        let mut generator = seeded(2);

        let id = generator.add_random_box(&mut registry).unwrap();
        let entry = registry.get(id).unwrap();
        assert!(!entry.is_dynamic);
        assert!(entry.center().x >= -50.0 && entry.center().x < 50.0);
    }
}
