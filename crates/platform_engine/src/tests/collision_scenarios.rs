//! End-to-end collision scenarios
//!
//! Query-level and controller-level behavior on small hand-built worlds.

use crate::core::config::MovementConfig;
use crate::foundation::math::Vec3;
use crate::game::{PlayerController, VerticalOutcome};
use crate::physics::{CollisionRegistry, RegistryError};

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Vec3 {
        Vec3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_player_above_static_box() {
        let mut registry = CollisionRegistry::new();
        registry.register(Vec3::new(0.0, -0.5, 0.0), unit(), false).unwrap();
        let player = registry.register(Vec3::new(0.0, 1.0, 0.0), unit(), true).unwrap();

        assert!(registry.would_collide(player, Vec3::new(0.0, 0.0, 0.0)).unwrap());
        assert!(!registry.would_collide(player, Vec3::new(0.0, 2.0, 0.0)).unwrap());
    }

    #[test]
    fn test_x_blocked_independent_of_y() {
        let mut registry = CollisionRegistry::new();
        let player_id = registry.register(Vec3::new(0.0, 5.0, 0.0), unit(), true).unwrap();
        let obstacle = registry
            .register(Vec3::new(3.0, 5.0, 0.0), Vec3::new(2.0, 2.0, 2.0), false)
            .unwrap();
        let mut player = PlayerController::new(player_id, MovementConfig::default());

        assert_eq!(registry.check_collision(player_id, Vec3::new(3.0, 5.0, 0.0)).unwrap(), Some(obstacle));

        // Y free
        let report = player.resolve(&registry, Vec3::new(0.0, 5.0, 0.0), 3.0, -0.25).unwrap();
        assert!(report.blocked_x);
        assert_eq!(report.position, Vec3::new(0.0, 4.75, 0.0));
        assert_eq!(report.vertical, VerticalOutcome::Moved);

        // Y blocked by a floor directly underneath
        registry
            .register(Vec3::new(0.0, 4.0, 0.0), Vec3::new(1.0, 1.0, 1.0), false)
            .unwrap();
        player.set_vertical_velocity(-2.5);
        let report = player.resolve(&registry, Vec3::new(0.0, 5.0, 0.0), 3.0, -0.25).unwrap();
        assert!(report.blocked_x);
        assert_eq!(report.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(report.vertical, VerticalOutcome::Landed);
    }

    #[test]
    fn test_landing_and_ceiling() {
        let mut registry = CollisionRegistry::new();
        let player_id = registry.register(Vec3::new(0.0, 2.0, 0.0), unit(), true).unwrap();
        let ground = registry
            .register(Vec3::new(0.0, 0.5, 0.0), Vec3::new(20.0, 1.0, 20.0), false)
            .unwrap();
        let ceiling = registry
            .register(Vec3::new(0.0, 4.0, 0.0), Vec3::new(20.0, 1.0, 20.0), false)
            .unwrap();
        let mut player = PlayerController::new(player_id, MovementConfig::default());

        // Falling into the ground
        player.set_vertical_velocity(-3.0);
        let report = player.resolve(&registry, Vec3::new(0.0, 2.0, 0.0), 0.0, -0.75).unwrap();
        assert_eq!(report.vertical, VerticalOutcome::Landed);
        assert_eq!(report.y_blocker, Some(ground));
        assert!(player.is_grounded());
        assert_eq!(player.velocity().y, 0.0);
        assert_eq!(report.position.y, 2.0);

        // Rising into the ceiling from the air
        let mut player = PlayerController::new(player_id, MovementConfig::default());
        player.set_vertical_velocity(6.0);
        let report = player.resolve(&registry, Vec3::new(0.0, 2.0, 0.0), 0.0, 1.25).unwrap();
        assert_eq!(report.vertical, VerticalOutcome::HitCeiling);
        assert_eq!(report.y_blocker, Some(ceiling));
        assert!(!player.is_grounded());
        assert_eq!(player.velocity().y, 0.0);
        assert_eq!(report.position.y, 2.0);
    }

    #[test]
    fn test_separating_axis_wins_over_overlapping_axes() {
        let mut registry = CollisionRegistry::new();
        let a = registry.register(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0), true).unwrap();
        registry.register(Vec3::new(0.0, 0.0, 1.5), unit(), false).unwrap();

        // Identical X and Y, separated by exactly the extent sum on Z
        assert!(!registry.would_collide(a, Vec3::zeros()).unwrap());
        assert!(!registry.would_collide(a, Vec3::new(5.0, -3.0, 0.1)).unwrap());
        assert!(registry.would_collide(a, Vec3::new(0.0, 0.0, 0.1)).unwrap());
    }

    #[test]
    fn test_released_id_fails_everywhere() {
        let mut registry = CollisionRegistry::new();
        let id = registry.register(Vec3::zeros(), unit(), true).unwrap();
        registry.release(id).unwrap();

        let unknown = RegistryError::UnknownCollider(id);
        assert_eq!(registry.get(id).unwrap_err(), unknown);
        assert_eq!(registry.update(id, Vec3::zeros(), unit()).unwrap_err(), unknown);
        assert_eq!(registry.check_collision(id, Vec3::zeros()).unwrap_err(), unknown);
        assert_eq!(registry.release(id).unwrap_err(), unknown);
    }
}
