//! Generated world driven through the step loop

use crate::core::config::{ApplicationConfig, WorldConfig};
use crate::foundation::math::Vec3;
use crate::game::{PlayerInput, Powerup, PowerupKind, Simulation, SimulationEvent};

#[cfg(test)]
mod tests {
    use super::*;

    fn config(seed: u64) -> ApplicationConfig {
        ApplicationConfig {
            world: WorldConfig {
                seed: Some(seed),
                ..WorldConfig::default()
            },
            ..ApplicationConfig::default()
        }
    }

    #[test]
    fn test_player_falls_and_lands_in_generated_world() {
        let mut sim = Simulation::new(&config(17)).unwrap();
        let start = sim.player_position().unwrap();

        let mut landed = false;
        for _ in 0..600 {
            let events = sim.step(PlayerInput::idle(), 1.0 / 60.0).unwrap();
            if events.contains(&SimulationEvent::Landed) {
                landed = true;
                break;
            }
        }

        assert!(landed);
        let rest = sim.player_position().unwrap();
        assert_eq!(rest.x, start.x);
        assert!(rest.y < start.y);
        assert!(rest.y > -20.0);
        assert!(sim.registry().is_consistent());
    }

    #[test]
    fn test_player_never_ends_a_step_inside_geometry() {
        let mut sim = Simulation::new(&config(23)).unwrap();
        let player = sim.player().id();

        let script = [
            PlayerInput::walk(1.0),
            PlayerInput::walk(1.0).with_jump(),
            PlayerInput::idle(),
            PlayerInput::walk(-1.0),
            PlayerInput::walk(-1.0).with_jump(),
        ];
        for i in 0..1200 {
            sim.step(script[(i / 60) % script.len()], 1.0 / 60.0).unwrap();
            let position = sim.player_position().unwrap();
            assert!(
                !sim.registry().would_collide(player, position).unwrap(),
                "player inside geometry at step {i}: {position:?}"
            );
        }
        assert!(sim.registry().is_consistent());
        assert_eq!(sim.steps(), 1200);
    }

    #[test]
    fn test_pickup_does_not_release_colliders() {
        let mut sim = Simulation::new(&config(5)).unwrap();
        let start = sim.player_position().unwrap();
        sim.add_powerup(Powerup::new(PowerupKind::Invincibility, start, Vec3::new(1.0, 1.0, 1.0)));
        let before = sim.registry().ids();

        let events = sim.step(PlayerInput::idle(), 1.0 / 60.0).unwrap();

        assert!(events.contains(&SimulationEvent::PowerupCollected {
            kind: PowerupKind::Invincibility
        }));
        assert_eq!(sim.registry().ids(), before);
    }

    #[test]
    fn test_despawned_enemies_leave_registry_consistent() {
        let mut sim = Simulation::new(&config(8)).unwrap();
        let enemies: Vec<_> = sim.enemies().iter().map(|enemy| enemy.id()).collect();
        let colliders = sim.registry().len();

        for id in &enemies {
            sim.despawn_enemy(*id).unwrap();
        }

        assert!(sim.enemies().is_empty());
        assert_eq!(sim.registry().len(), colliders - enemies.len());
        assert!(sim.registry().is_consistent());
        assert_eq!(sim.registry().instance_transforms().len(), sim.registry().len());

        sim.step(PlayerInput::walk(1.0), 1.0 / 60.0).unwrap();
    }
}
