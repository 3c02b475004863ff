//! Simulation Configuration
//!
//! Every tunable of the planetoid sandbox in one serde tree. Every section
//! falls back to its defaults, so a JSON file only needs the values it
//! changes:
//!
//! ```json
//! { "character": { "human": { "top_speed": 7.0, "jump_speed": 6.0 } },
//!   "camera": { "max_distance": 60.0 } }
//! ```

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::OrbitCameraConfig;
use crate::physics::{Attractor, StepConfig};
use crate::player::LocomotionConfig;
use crate::vehicle::HoverConfig;

/// Failure to load or validate a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// World layout: attractors and spawn points.
///
/// Attractor order is the gravity tie-break order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub attractors: Vec<Attractor>,
    /// Character capsule center at start
    pub character_spawn: Vec3,
    /// Vehicle chassis center at start (the crash site)
    pub vehicle_spawn: Vec3,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            attractors: vec![
                // Home planetoid
                Attractor::new(Vec3::ZERO, 500.0),
                // Moon
                Attractor::new(Vec3::new(0.0, 300.0, -1400.0), 120.0),
                // Rock
                Attractor::new(Vec3::new(1100.0, -200.0, 300.0), 60.0),
            ],
            character_spawn: Vec3::new(0.0, 501.0, 0.0),
            vehicle_spawn: Vec3::new(6.0, 502.0, 0.0),
        }
    }
}

/// Mount/dismount parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    /// Character must be closer than this to the vehicle to climb in (meters)
    pub mount_radius: f32,
    /// Seat position in vehicle-local space
    pub seat_offset: Vec3,
    /// Where the character is put back, in vehicle-local space
    pub dismount_offset: Vec3,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            mount_radius: 4.0,
            seat_offset: Vec3::new(0.0, 0.6, 0.0),
            dismount_offset: Vec3::new(2.5, 0.5, 0.0),
        }
    }
}

/// Root configuration for a [`crate::game::Simulation`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub physics: StepConfig,
    pub character: LocomotionConfig,
    pub vehicle: HoverConfig,
    pub camera: OrbitCameraConfig,
    pub mount: MountConfig,
}

impl SimulationConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::debug!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.physics.fixed_dt > 0.0) {
            return invalid(format!("physics.fixed_dt must be positive, got {}", self.physics.fixed_dt));
        }
        if self.physics.max_substeps == 0 {
            return invalid("physics.max_substeps must be at least 1".into());
        }

        for (index, attractor) in self.world.attractors.iter().enumerate() {
            if !(attractor.radius >= 0.0) {
                return invalid(format!("world.attractors[{}].radius must be non-negative", index));
            }
        }

        let camera = &self.camera;
        if !(0.0 < camera.min_phi && camera.min_phi < camera.max_phi && camera.max_phi < FRAC_PI_2) {
            return invalid(format!(
                "camera phi range must satisfy 0 < min_phi < max_phi < pi/2, got [{}, {}]",
                camera.min_phi, camera.max_phi
            ));
        }
        if !(camera.min_distance > 0.0 && camera.min_distance <= camera.max_distance) {
            return invalid(format!(
                "camera distance range [{}, {}] is invalid",
                camera.min_distance, camera.max_distance
            ));
        }

        if !(self.character.mass > 0.0) || !(self.vehicle.mass > 0.0) {
            return invalid("character and vehicle masses must be positive".into());
        }
        if !(self.vehicle.hover_height > 0.0) || self.vehicle.ray_margin < 0.0 {
            return invalid("vehicle.hover_height must be positive and ray_margin non-negative".into());
        }
        if self.vehicle.reverse_force > self.vehicle.forward_force {
            return invalid("vehicle.reverse_force must not exceed forward_force".into());
        }
        if !(self.character.ground_probe_length > 0.0) {
            return invalid("character.ground_probe_length must be positive".into());
        }
        if self.mount.mount_radius < 0.0 {
            return invalid("mount.mount_radius must be non-negative".into());
        }

        Ok(())
    }
}
