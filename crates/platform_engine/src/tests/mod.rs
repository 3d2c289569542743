//! Cross-module scenarios
//!
//! Unit tests live next to their modules; these exercise the registry
//! together with the gameplay code that drives it.

mod collision_scenarios;
mod world_simulation;
