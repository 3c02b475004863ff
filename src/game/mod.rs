//! Game Module
//!
//! Game-level systems that build on top of the engine: configuration, the
//! mount/dismount coordinator and the per-frame simulation driver.

pub mod config;
pub mod coordinator;
pub mod simulation;

pub use config::{ConfigError, MountConfig, SimulationConfig, WorldConfig};
pub use coordinator::{CoordinatorReport, LocomotionCoordinator, MountState, MountTransition};
pub use simulation::{FrameReport, SceneModels, Simulation, build_world};
