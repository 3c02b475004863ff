//! Visual Output
//!
//! Frames the simulation writes for the renderer each step, and placeholder
//! model slots that may later be swapped for loaded models.
//!
//! The simulation only writes here; nothing is read back. Models never affect
//! collision volumes, so a slot can resolve (or fail to) at any time.
//!
//! # Example
//!
//! ```rust,ignore
//! let instances = sim.visuals().instances();
//! queue.write_buffer(&instance_buffer, 0, bytemuck::cast_slice(&instances));
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use static_assertions::const_assert_eq;

/// Pose and visibility of one rendered object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualFrame {
    pub position: Vec3,
    pub orientation: Quat,
    pub visible: bool,
}

impl Default for VisualFrame {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            visible: true,
        }
    }
}

impl VisualFrame {
    pub fn new(position: Vec3, orientation: Quat, visible: bool) -> Self {
        Self {
            position,
            orientation,
            visible,
        }
    }

    /// Overwrite the pose and visibility in one go.
    pub fn write(&mut self, position: Vec3, orientation: Quat, visible: bool) {
        self.position = position;
        self.orientation = orientation;
        self.visible = visible;
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// GPU-ready instance data.
    pub fn instance(&self) -> VisualInstance {
        VisualInstance {
            model: self.model_matrix().to_cols_array_2d(),
            visible: self.visible as u32,
            _padding: [0; 3],
        }
    }
}

/// Per-instance data uploaded to the GPU (column-major model matrix).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct VisualInstance {
    pub model: [[f32; 4]; 4],
    /// 1 when visible, 0 when hidden
    pub visible: u32,
    pub _padding: [u32; 3],
}

const_assert_eq!(std::mem::size_of::<VisualInstance>(), 80);

/// Every visual the simulation drives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneVisuals {
    /// Human skeleton
    pub human: VisualFrame,
    /// Alien skeleton, shown instead of the human while disguised
    pub alien: VisualFrame,
    pub vehicle: VisualFrame,
}

impl SceneVisuals {
    /// Instances in human, alien, vehicle order.
    pub fn instances(&self) -> [VisualInstance; 3] {
        [
            self.human.instance(),
            self.alien.instance(),
            self.vehicle.instance(),
        ]
    }
}

/// Failure to resolve a model for a placeholder slot.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Failed to read model {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model {name}: {reason}")]
    Malformed { name: String, reason: String },
}

/// Description of a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub vertex_count: usize,
    /// Render-only scale, never applied to the collider
    pub scale: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ModelState {
    /// Built-in primitive shown until a model arrives
    #[default]
    Placeholder,
    Loaded(ModelInfo),
}

/// A visual slot that starts as a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSlot {
    pub name: String,
    pub state: ModelState,
}

impl ModelSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ModelState::Placeholder,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, ModelState::Loaded(_))
    }

    /// Apply the outcome of a model fetch. Failures keep the placeholder.
    ///
    /// Returns `true` when the slot now holds a loaded model.
    pub fn resolve(&mut self, result: Result<ModelInfo, AssetError>) -> bool {
        match result {
            Ok(info) => {
                log::debug!("Model slot '{}' loaded '{}'", self.name, info.name);
                self.state = ModelState::Loaded(info);
                true
            }
            Err(err) => {
                log::warn!("Model slot '{}' keeps its placeholder: {}", self.name, err);
                self.is_loaded()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        let frame = VisualFrame::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY, false);
        let instance = frame.instance();
        assert_eq!(instance.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(instance.visible, 0);
        assert_eq!(bytemuck::bytes_of(&instance).len(), 80);
    }

    #[test]
    fn test_scene_instances_cast_to_bytes() {
        let visuals = SceneVisuals::default();
        let instances = visuals.instances();
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 240);
    }

    #[test]
    fn test_failed_resolve_keeps_placeholder() {
        let mut slot = ModelSlot::new("vehicle");
        assert!(!slot.resolve(Err(AssetError::NotFound("hover_bike.glb".into()))));
        assert_eq!(slot.state, ModelState::Placeholder);
    }

    #[test]
    fn test_successful_resolve_swaps_model() {
        let mut slot = ModelSlot::new("human");
        let info = ModelInfo {
            name: "human.glb".into(),
            vertex_count: 1200,
            scale: 1.0,
        };
        assert!(slot.resolve(Ok(info.clone())));
        assert_eq!(slot.state, ModelState::Loaded(info));
    }

    #[test]
    fn test_asset_error_messages() {
        let err = AssetError::Malformed {
            name: "alien.glb".into(),
            reason: "no meshes".into(),
        };
        assert_eq!(err.to_string(), "Malformed model alien.glb: no meshes");
    }
}
