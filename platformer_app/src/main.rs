//! Headless platformer run
//!
//! Builds a world from configuration and drives it with a scripted input
//! sequence at jittered frame times, logging gameplay events and a summary.
//!
//! Usage: `platformer [config.toml|config.ron] [frames]`

use platform_engine::foundation::logging;
use platform_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Frames simulated when no count is given
const DEFAULT_FRAMES: u32 = 1800;

/// Extra free-floating boxes dropped into the world after generation
const EXTRA_BOXES: usize = 5;

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Invalid frame count '{0}'")]
    FrameCount(String),
}

/// Tallies of what happened during the run
#[derive(Debug, Default)]
struct RunStats {
    landings: u32,
    pickups: u32,
    contacts: u32,
    despawns: u32,
}

impl RunStats {
    fn record(&mut self, event: &SimulationEvent) {
        match event {
            SimulationEvent::Landed => self.landings += 1,
            SimulationEvent::PowerupCollected { kind } => {
                self.pickups += 1;
                log::info!("Picked up {}", kind);
            }
            SimulationEvent::EnemyContact { enemy } => {
                self.contacts += 1;
                log::info!("Touched enemy {}", enemy);
            }
            SimulationEvent::EnemyDespawned { enemy } => {
                self.despawns += 1;
                log::info!("Enemy {} destroyed", enemy);
            }
        }
    }
}

struct PlatformerApp {
    simulation: Simulation,
    rng: StdRng,
    frames: u32,
}

impl PlatformerApp {
    fn new(config: &ApplicationConfig, frames: u32) -> Result<Self, AppError> {
        let mut simulation = Simulation::new(config)?;

        let mut generator = WorldGenerator::from_config(config.world.clone())?;
        for _ in 0..EXTRA_BOXES {
            let id = generator.add_random_box(simulation.registry_mut())?;
            log::debug!("Added floating box {}", id);
        }

        let rng = match config.world.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            simulation,
            rng,
            frames,
        })
    }

    /// Input for a frame: walk right, hop, walk back left, hop, rest
    fn scripted_input(frame: u32) -> PlayerInput {
        match (frame / 90) % 5 {
            0 => PlayerInput::walk(1.0),
            1 => PlayerInput::walk(1.0).with_jump(),
            2 => PlayerInput::walk(-1.0),
            3 => PlayerInput::walk(-1.0).with_jump(),
            _ => PlayerInput::idle(),
        }
    }

    fn run(&mut self) -> Result<RunStats, AppError> {
        let mut stats = RunStats::default();

        for frame in 0..self.frames {
            // Frame times wander around 60 Hz like a real render loop
            let frame_time = self.rng.gen_range(0.010..0.025);
            let input = Self::scripted_input(frame);

            for event in self.simulation.advance(input, frame_time)? {
                stats.record(&event);
            }

            if frame % 300 == 0 {
                log::debug!(
                    "Frame {}: player at {:?}, grounded {}",
                    frame,
                    self.simulation.player_position()?,
                    self.simulation.player().is_grounded()
                );
            }
        }

        Ok(stats)
    }
}

struct Args {
    config_path: Option<String>,
    frames: u32,
}

fn parse_args() -> Result<Args, AppError> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next();
    let frames = match args.next() {
        Some(count) => count.parse().map_err(|_| AppError::FrameCount(count))?,
        None => DEFAULT_FRAMES,
    };
    Ok(Args { config_path, frames })
}

fn load_config(path: Option<&str>) -> Result<ApplicationConfig, AppError> {
    let config = match path {
        Some(path) => ApplicationConfig::load_from_file(path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook for better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC occurred: {:?}", panic_info);

        if let Some(location) = panic_info.location() {
            eprintln!("Panic location: {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    let args = parse_args()?;
    let config = load_config(args.config_path.as_deref())?;
    logging::init(&config.simulation.log_level);

    if let Some(path) = &args.config_path {
        log::info!("Loaded configuration from {}", path);
    }
    let frames = args.frames;
    log::info!("Starting platformer run ({} frames)", frames);
    let stopwatch = Stopwatch::start_new();

    let mut app = PlatformerApp::new(&config, frames)?;
    let stats = app.run().map_err(|e| {
        log::error!("Run failed: {}", e);
        e
    })?;

    let simulation = &app.simulation;
    log::info!(
        "Finished {} steps in {:.1} ms: {} landings, {} pickups, {} enemy contacts, {} enemies destroyed",
        simulation.steps(),
        stopwatch.elapsed_millis(),
        stats.landings,
        stats.pickups,
        stats.contacts,
        stats.despawns
    );
    log::info!(
        "{} colliders live, {} enemies, {} powerups left, player at {:?}",
        simulation.registry().len(),
        simulation.enemies().len(),
        simulation.powerups().len(),
        simulation.player_position()?
    );

    Ok(())
}
