//! Player Module
//!
//! Character locomotion on spherical terrain.
//!
//! # Components
//!
//! - [`SurfaceLocomotion`] - Camera-relative walking on the tangent plane of the local up
//!   - Probe-gated jumping, frame-rate independent velocity blending
//!   - Human/alien disguise with per-form speed constants
//! - [`LocomotionConfig`] - Tuning for both forms

pub mod locomotion;

pub use locomotion::{
    Form, FormStats, LocomotionConfig, StepReport, SurfaceLocomotion, surface_frame,
};
