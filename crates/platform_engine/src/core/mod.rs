//! # Core Engine Module
//!
//! Shared abstractions used throughout the engine.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration system for all engine subsystems

pub mod config;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    BroadPhaseKind,
    MovementConfig,
    RegistryConfig,
    SimulationConfig,
    WorldConfig,
    Config,
    ConfigError,
};
