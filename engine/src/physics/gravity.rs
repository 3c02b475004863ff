//! Gravity Field
//!
//! Replaces a fixed world-down gravity with a per-body pull toward the nearest
//! attracting sphere.
//!
//! # Model
//!
//! - The nearest attractor is the one whose center is closest (squared
//!   distance). Ties go to the first attractor in registry order.
//! - Strength is constant at the attractor's surface gravity (9.82 m/s²) and
//!   does not fall off with altitude.
//! - "Up" is the unit vector from the attractor center toward the body.
//!
//! With no attractors (or a body sitting exactly on a center) the field
//! degrades to the canonical vertical `+Y` and zero force.
//!
//! # Usage
//!
//! ```rust,ignore
//! use planetoid_engine::physics::gravity::{Attractor, GravityField};
//! use glam::Vec3;
//!
//! let field = GravityField::new(vec![Attractor::new(Vec3::ZERO, 500.0)]);
//!
//! // Pure query
//! let up = field.compute_up(player_position);
//!
//! // Query and apply in one call, once per step per body
//! let sample = field.resolve(&mut body);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use super::world::TerrainSphere;

/// Surface gravity of every attractor in m/s².
pub const SURFACE_GRAVITY: f32 = 9.82;

/// Up direction used when the field has nothing to say.
pub const CANONICAL_UP: Vec3 = Vec3::Y;

/// A static sphere pulling bodies toward its center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    /// World position of the sphere center
    pub center: Vec3,
    /// Surface radius in meters
    pub radius: f32,
    /// Gravity strength in m/s²
    #[serde(default = "default_surface_gravity")]
    pub surface_gravity: f32,
}

fn default_surface_gravity() -> f32 {
    SURFACE_GRAVITY
}

impl Attractor {
    /// Create an attractor with the standard surface gravity.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            surface_gravity: SURFACE_GRAVITY,
        }
    }

    /// Positive above the surface, negative below.
    pub fn height_above_surface(&self, position: Vec3) -> f32 {
        (position - self.center).length() - self.radius
    }

    /// Point on the surface directly below (or above) `position`.
    pub fn surface_point(&self, position: Vec3) -> Vec3 {
        let up = (position - self.center).try_normalize().unwrap_or(CANONICAL_UP);
        self.center + up * self.radius
    }

    /// Collider used by the physics world for this attractor.
    pub fn terrain(&self) -> TerrainSphere {
        TerrainSphere {
            center: self.center,
            radius: self.radius,
        }
    }
}

/// Result of evaluating the field for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravitySample {
    /// Gravitational acceleration (m/s²)
    pub acceleration: Vec3,
    /// Force on the body (acceleration * mass)
    pub force: Vec3,
    /// Unit vector opposite to gravity
    pub up: Vec3,
    /// Index of the attractor that won, if any
    pub attractor: Option<usize>,
}

impl GravitySample {
    fn degraded() -> Self {
        Self {
            acceleration: Vec3::ZERO,
            force: Vec3::ZERO,
            up: CANONICAL_UP,
            attractor: None,
        }
    }

    /// True when the field fell back to the canonical vertical.
    pub fn is_degraded(&self) -> bool {
        self.attractor.is_none()
    }
}

/// Ordered attractor registry. Populated once at world setup.
#[derive(Debug, Clone, Default)]
pub struct GravityField {
    attractors: Vec<Attractor>,
}

impl GravityField {
    pub fn new(attractors: Vec<Attractor>) -> Self {
        Self { attractors }
    }

    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }

    /// Nearest attractor by center distance; first minimal wins.
    pub fn nearest(&self, position: Vec3) -> Option<(usize, &Attractor)> {
        let mut best: Option<(usize, &Attractor, f32)> = None;
        for (index, attractor) in self.attractors.iter().enumerate() {
            let distance_sq = attractor.center.distance_squared(position);
            match best {
                Some((_, _, best_sq)) if distance_sq >= best_sq => {}
                _ => best = Some((index, attractor, distance_sq)),
            }
        }
        best.map(|(index, attractor, _)| (index, attractor))
    }

    /// Local up at `position`. No side effects.
    pub fn compute_up(&self, position: Vec3) -> Vec3 {
        self.sample(position, 0.0).up
    }

    /// Evaluate the field for a body of `mass` at `position`. No side effects.
    pub fn sample(&self, position: Vec3, mass: f32) -> GravitySample {
        let Some((index, attractor)) = self.nearest(position) else {
            log::trace!("No attractors, falling back to canonical up");
            return GravitySample::degraded();
        };

        let Some(down) = (attractor.center - position).try_normalize() else {
            log::trace!("Body at center of attractor {}, falling back to canonical up", index);
            return GravitySample::degraded();
        };

        let acceleration = down * attractor.surface_gravity;
        GravitySample {
            acceleration,
            force: acceleration * mass,
            up: -down,
            attractor: Some(index),
        }
    }

    /// Apply gravity to `body` and return its up vector.
    pub fn apply_gravity(&self, body: &mut RigidBody) -> Vec3 {
        self.resolve(body).up
    }

    /// Evaluate the field for `body` and apply the resulting force to it.
    ///
    /// Callers that only need orientation should use [`GravityField::compute_up`].
    pub fn resolve(&self, body: &mut RigidBody) -> GravitySample {
        let sample = self.sample(body.position, body.mass);
        body.apply_force(sample.force);
        sample
    }
}
