//! Time management utilities

use std::time::{Duration, Instant};

/// Step length used when a non-positive or non-finite one is requested
pub const DEFAULT_STEP: f32 = 1.0 / 60.0;

/// Fixed-timestep accumulator
///
/// Converts variable frame times into a whole number of simulation steps of
/// `step` seconds. Leftover time carries into the next frame; frames that
/// would need more than `max_steps` steps drop the excess so a long stall
/// cannot snowball.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
    total_steps: u64,
}

impl FixedStep {
    /// Create an accumulator for the given step length (seconds)
    ///
    /// A step that is not a positive finite number is replaced by
    /// [`DEFAULT_STEP`].
    pub fn new(step: f32, max_steps: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Invalid fixed step {}s, using {}s", step, DEFAULT_STEP);
            DEFAULT_STEP
        };
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            total_steps: 0,
        }
    }

    /// Feed elapsed frame time and return how many steps to run now
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        self.accumulator += frame_time.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if steps == self.max_steps && self.accumulator >= self.step {
            log::warn!(
                "Dropping {:.3}s of simulation time after {} steps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.step;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Length of one step in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time waiting to be simulated
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Steps handed out since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let running = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + running
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
