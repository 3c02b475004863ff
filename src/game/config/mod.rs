//! Config Module
//!
//! Centralized configuration for the world layout and every controller.

pub mod simulation_config;

pub use simulation_config::{ConfigError, MountConfig, SimulationConfig, WorldConfig};
