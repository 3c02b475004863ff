//! Physics type re-exports from glam plus the collider shapes.
//!
//! Colliders are convex and fixed at construction; loaded render models never
//! change them.

pub use glam::{Quat, Vec3};

use serde::{Deserialize, Serialize};

/// Convex collision volume, expressed in the body's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { radius: f32 },
    /// Capsule aligned with local Y. `half_height` excludes the end caps.
    Capsule { radius: f32, half_height: f32 },
    Cuboid { half_extents: Vec3 },
}

impl Collider {
    /// Distance from the body origin to the farthest collider point along `dir`.
    ///
    /// All shapes are symmetric, so this is also the extent along `-dir`.
    pub fn support_extent(&self, orientation: Quat, dir: Vec3) -> f32 {
        match *self {
            Collider::Sphere { radius } => radius,
            Collider::Capsule { radius, half_height } => {
                let axis = orientation * Vec3::Y;
                radius + axis.dot(dir).abs() * half_height
            }
            Collider::Cuboid { half_extents } => {
                let x = (orientation * Vec3::X).dot(dir).abs();
                let y = (orientation * Vec3::Y).dot(dir).abs();
                let z = (orientation * Vec3::Z).dot(dir).abs();
                half_extents.x * x + half_extents.y * y + half_extents.z * z
            }
        }
    }

    /// Half extents of the local-space bounding box.
    pub fn local_half_extents(&self) -> Vec3 {
        match *self {
            Collider::Sphere { radius } => Vec3::splat(radius),
            Collider::Capsule { radius, half_height } => Vec3::new(radius, half_height + radius, radius),
            Collider::Cuboid { half_extents } => half_extents,
        }
    }

    /// Diagonal of the local inverse inertia tensor.
    ///
    /// Capsules use their bounding box, which is close enough for a shape
    /// that never rotates freely in practice.
    pub fn inverse_inertia(&self, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::ZERO;
        }
        let inertia = match *self {
            Collider::Sphere { radius } => Vec3::splat(0.4 * mass * radius * radius),
            _ => {
                let size = self.local_half_extents() * 2.0;
                let sq = size * size;
                Vec3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 12.0)
            }
        };
        Vec3::ONE / inertia.max(Vec3::splat(1e-6))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_extent_along_axis() {
        let capsule = Collider::Capsule { radius: 0.4, half_height: 0.5 };
        let extent = capsule.support_extent(Quat::IDENTITY, Vec3::Y);
        assert!((extent - 0.9).abs() < 1e-6);
        let side = capsule.support_extent(Quat::IDENTITY, Vec3::X);
        assert!((side - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_cuboid_extent_rotated() {
        let cuboid = Collider::Cuboid { half_extents: Vec3::new(1.0, 0.5, 2.0) };
        let rotated = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        // Local X now points along world Y
        let extent = cuboid.support_extent(rotated, Vec3::Y);
        assert!((extent - 1.0).abs() < 1e-5, "extent was {}", extent);
    }

    #[test]
    fn test_inverse_inertia_positive() {
        let cuboid = Collider::Cuboid { half_extents: Vec3::new(1.0, 0.4, 2.0) };
        let inv = cuboid.inverse_inertia(400.0);
        assert!(inv.min_element() > 0.0);
        // Longest axis has the smallest resistance around it
        assert!(inv.z > inv.y);
    }
}
