//! Camera Module
//!
//! Tracking camera for spherical worlds.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod orbit;

pub use orbit::{OrbitCamera, OrbitCameraConfig};
