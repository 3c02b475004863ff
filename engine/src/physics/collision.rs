//! Collision queries
//!
//! Ray intersection primitives used by the world raycast. Terrain is a set of
//! spheres (one per attractor); body colliders are tested as oriented boxes in
//! their local frame using the slab method.
//!
//! # Example
//!
//! ```ignore
//! use planetoid_engine::physics::collision::{ray_sphere_intersect, ray_aabb_intersect};
//! use glam::Vec3;
//!
//! let origin = Vec3::new(0.0, 510.0, 0.0);
//! if let Some(t) = ray_sphere_intersect(origin, Vec3::NEG_Y, Vec3::ZERO, 500.0) {
//!     println!("Surface is {} m below", t);
//! }
//! ```

use glam::Vec3;

use super::world::BodyHandle;

/// What a ray ended up touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Static terrain sphere, by attractor index.
    Terrain(usize),
    /// A simulated body.
    Body(BodyHandle),
}

/// Closest intersection reported by a raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from ray origin to hit point
    pub distance: f32,
    /// World-space position where the ray hit
    pub point: Vec3,
    /// Surface normal at the hit point (normalized)
    pub normal: Vec3,
    /// Thing that was hit
    pub target: HitTarget,
}

impl RayHit {
    /// Returns true if the hit belongs to the given body.
    pub fn is_body(&self, handle: BodyHandle) -> bool {
        self.target == HitTarget::Body(handle)
    }
}

/// Ray-sphere intersection.
///
/// Returns the distance along `ray_dir` (normalized) to the first surface
/// crossing. A ray that starts inside the sphere reports `Some(0.0)` so that a
/// probe buried in terrain still counts as touching it.
pub fn ray_sphere_intersect(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = ray_origin - center;
    let c = to_origin.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = to_origin.dot(ray_dir);
    if b > 0.0 {
        // Outside and pointing away
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    Some(t.max(0.0))
}

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// The slab method works by finding the intersection of the ray with each pair of
/// axis-aligned planes that make up the AABB. If the ray enters and exits the AABB
/// at valid times (t_enter < t_exit and t_exit > 0), there is an intersection.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let inv = |d: f32| if d.abs() > 1e-10 { 1.0 / d } else { f32::MAX * d.signum() };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        // Inside the box counts as touching it
        Some(t_min.max(0.0))
    } else {
        None
    }
}

/// Computes the outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}
