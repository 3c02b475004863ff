//! Orbit Camera for Spherical Worlds
//!
//! A spherical-coordinate tracking camera whose vertical axis is the current
//! surface `up` instead of world +Y. Every update builds the rotation that
//! takes +Y onto `up` and pushes the local spherical offset through it, so the
//! horizon stays level while the target walks around the planetoid.
//!
//! Controls:
//! - Mouse motion while the pointer is captured: orbit (theta wraps, phi clamped)
//! - Scroll wheel: zoom in discrete steps, smoothed over time
//!
//! # Example
//!
//! ```rust,ignore
//! let mut camera = OrbitCamera::new(OrbitCameraConfig::default());
//! camera.handle_mouse_delta(raw.mouse_delta.x, raw.mouse_delta.y, raw.pointer_captured);
//! camera.zoom_steps(raw.zoom_steps);
//! camera.update(dt, target, field.compute_up(target));
//! let view = camera.view_matrix();
//! ```

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Orbit camera tuning. Angles in radians, distances in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitCameraConfig {
    /// Initial azimuth around the local up axis
    pub theta: f32,
    /// Initial polar angle measured from the local up axis
    pub phi: f32,
    /// Initial distance from the look point
    pub distance: f32,
    /// Lowest polar angle (camera nearly overhead)
    pub min_phi: f32,
    /// Highest polar angle (camera nearly on the horizon)
    pub max_phi: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per scroll step
    pub zoom_step: f32,
    /// Exponential zoom smoothing rate, per second
    pub zoom_rate: f32,
    /// Radians per pixel of mouse motion
    pub sensitivity: f32,
    /// Look point offset above the target along up
    pub look_height: f32,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            theta: 0.0,
            phi: 1.1,
            distance: 10.0,
            min_phi: 0.1,
            max_phi: 1.45,
            min_distance: 3.0,
            max_distance: 40.0,
            zoom_step: 2.0,
            zoom_rate: 8.0,
            sensitivity: 0.003,
            look_height: 1.0,
        }
    }
}

// ============================================================================
// ORBIT CAMERA
// ============================================================================

/// Tracking camera orbiting a moving target in its local surface frame.
///
/// # Coordinate System
/// - Theta: azimuth about `up`, stored wrapped into [0, 2π)
/// - Phi: angle from `up`, clamped to [min_phi, max_phi] inside (0, π/2)
/// - Distance: smoothed toward a clamped target distance
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: OrbitCameraConfig,
    theta: f32,
    phi: f32,
    distance: f32,
    target_distance: f32,

    // -- Derived each update --
    position: Vec3,
    focus: Vec3,
    up: Vec3,
}

impl OrbitCamera {
    pub fn new(config: OrbitCameraConfig) -> Self {
        let distance = config.distance.clamp(config.min_distance, config.max_distance);
        let mut camera = Self {
            config,
            theta: wrap_angle(config.theta),
            phi: config.phi.clamp(config.min_phi, config.max_phi),
            distance,
            target_distance: distance,
            position: Vec3::ZERO,
            focus: Vec3::ZERO,
            up: Vec3::Y,
        };
        camera.place(Vec3::ZERO, Vec3::Y);
        camera
    }

    pub fn config(&self) -> &OrbitCameraConfig {
        &self.config
    }

    // ========================================================================
    // INPUT HANDLING
    // ========================================================================

    /// Orbit by a mouse delta in pixels. Ignored unless the pointer is captured.
    pub fn handle_mouse_delta(&mut self, dx: f32, dy: f32, captured: bool) {
        if !captured {
            return;
        }
        self.theta = wrap_angle(self.theta - dx * self.config.sensitivity);
        self.phi = (self.phi + dy * self.config.sensitivity).clamp(self.config.min_phi, self.config.max_phi);
    }

    /// Move the zoom target by whole scroll steps. Positive zooms in.
    pub fn zoom_steps(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        self.target_distance = (self.target_distance - steps as f32 * self.config.zoom_step)
            .clamp(self.config.min_distance, self.config.max_distance);
    }

    // ========================================================================
    // UPDATE
    // ========================================================================

    /// Follow `target` using `up` as the vertical axis for this step.
    pub fn update(&mut self, dt: f32, target: Vec3, up: Vec3) {
        let blend = 1.0 - (-self.config.zoom_rate * dt.max(0.0)).exp();
        self.distance += (self.target_distance - self.distance) * blend;
        self.place(target, up);
    }

    fn place(&mut self, target: Vec3, up: Vec3) {
        let up = up.try_normalize().unwrap_or(Vec3::Y);
        let frame = Quat::from_rotation_arc(Vec3::Y, up);

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let local_offset = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.distance;

        self.up = up;
        self.focus = target + up * self.config.look_height;
        self.position = self.focus + frame * local_offset;
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    /// Current (smoothed) distance.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Distance the zoom is easing toward.
    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Point the camera looks at.
    pub fn focus(&self) -> Vec3 {
        self.focus
    }

    /// Camera up, always the surface up of the last update.
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vec3 {
        (self.focus - self.position).try_normalize().unwrap_or(-self.up)
    }

    /// Camera rotation (local -Z looks forward, local +Y leans toward up).
    pub fn orientation(&self) -> Quat {
        let forward = self.forward();
        let Some(right) = forward.cross(self.up).try_normalize() else {
            return Quat::from_rotation_arc(Vec3::Y, self.up);
        };
        let camera_up = right.cross(forward);
        Quat::from_mat3(&Mat3::from_cols(right, camera_up, -forward)).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.focus, self.up)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(OrbitCameraConfig::default())
    }
}

/// Wrap an angle into [0, 2π).
///
/// `rem_euclid` rounds tiny negative angles up to exactly 2π in f32.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

// ============================================================================
// TESTS
// ============================================================================
