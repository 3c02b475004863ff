//! Rigid bodies
//!
//! A `RigidBody` is the simulated volume behind every controllable entity: the
//! player capsule and the hover vehicle chassis. Forces and torques accumulate
//! between steps and are integrated by the world.

use glam::{Mat3, Quat, Vec3};

use super::types::Collider;

/// Chassis-local forward axis. Everything that "drives" points along -Z.
pub const LOCAL_FORWARD: Vec3 = Vec3::NEG_Z;

/// Default linear damping (fraction of velocity lost per second).
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.01;

/// Default angular damping (fraction of angular velocity lost per second).
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.01;

/// Role of a body, used for diagnostics and bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Character,
    Vehicle,
    Prop,
}

/// A simulated rigid body.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub kind: BodyKind,
    /// Center of mass in world space (meters)
    pub position: Vec3,
    pub orientation: Quat,
    /// Linear velocity (m/s)
    pub linear_velocity: Vec3,
    /// Angular velocity in world space (rad/s)
    pub angular_velocity: Vec3,
    /// Mass in kilograms
    pub mass: f32,
    pub collider: Collider,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// When set, the integrator never rotates the body; controllers may still
    /// write `orientation` directly.
    pub fixed_rotation: bool,
    /// Contact friction coefficient against terrain
    pub friction: f32,
    force: Vec3,
    torque: Vec3,
}

impl RigidBody {
    /// Create a body at rest with identity orientation.
    pub fn new(kind: BodyKind, position: Vec3, mass: f32, collider: Collider) -> Self {
        Self {
            kind,
            position,
            orientation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass,
            collider,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
            fixed_rotation: false,
            friction: 0.3,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    /// Builder-style orientation setter.
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    /// Builder-style rotation lock.
    pub fn with_fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self.angular_velocity = Vec3::ZERO;
        self
    }

    /// Builder-style damping setter.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    /// Apply a force through the center of mass.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Apply a force at a world-space point, producing torque about the center of mass.
    pub fn apply_force_at(&mut self, force: Vec3, world_point: Vec3) {
        self.force += force;
        self.torque += (world_point - self.position).cross(force);
    }

    /// Apply a world-space torque.
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque += torque;
    }

    /// Forces accumulated since the last clear.
    pub fn accumulated_force(&self) -> Vec3 {
        self.force
    }

    /// Torque accumulated since the last clear.
    pub fn accumulated_torque(&self) -> Vec3 {
        self.torque
    }

    /// Drop accumulated forces and torques.
    pub fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// Velocity of a world-space point rigidly attached to the body.
    pub fn point_velocity(&self, world_point: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(world_point - self.position)
    }

    /// Transform a body-local point into world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Body-local +Y expressed in world space.
    pub fn local_up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Body-local forward expressed in world space.
    pub fn local_forward(&self) -> Vec3 {
        self.orientation * LOCAL_FORWARD
    }

    /// Inverse inertia tensor in world space.
    pub fn world_inverse_inertia(&self) -> Mat3 {
        if self.fixed_rotation {
            return Mat3::ZERO;
        }
        let rotation = Mat3::from_quat(self.orientation);
        let local = Mat3::from_diagonal(self.collider.inverse_inertia(self.mass));
        rotation * local * rotation.transpose()
    }

    /// Semi-implicit Euler integration of accumulated forces over `dt`.
    ///
    /// Forces are left in place; the caller decides when to clear them.
    pub fn integrate(&mut self, dt: f32) {
        if self.mass <= 0.0 || dt <= 0.0 {
            return;
        }

        self.linear_velocity += self.force / self.mass * dt;
        self.linear_velocity *= (1.0 - self.linear_damping).clamp(0.0, 1.0).powf(dt);
        self.position += self.linear_velocity * dt;

        if self.fixed_rotation {
            self.angular_velocity = Vec3::ZERO;
            return;
        }

        self.angular_velocity += self.world_inverse_inertia() * self.torque * dt;
        self.angular_velocity *= (1.0 - self.angular_damping).clamp(0.0, 1.0).powf(dt);

        let w = self.angular_velocity;
        let spin = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * self.orientation;
        self.orientation = (self.orientation + spin * (0.5 * dt)).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crate_body() -> RigidBody {
        RigidBody::new(
            BodyKind::Prop,
            Vec3::ZERO,
            2.0,
            Collider::Cuboid { half_extents: Vec3::splat(0.5) },
        )
        .with_damping(0.0, 0.0)
    }

    #[test]
    fn test_force_accelerates_body() {
        let mut body = crate_body();
        body.apply_force(Vec3::new(4.0, 0.0, 0.0));
        body.integrate(0.5);
        // a = 2 m/s^2, v = 1 m/s after 0.5s
        assert!((body.linear_velocity.x - 1.0).abs() < 1e-5);
        assert!((body.position.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_off_center_force_spins_body() {
        let mut body = crate_body();
        body.apply_force_at(Vec3::X, Vec3::new(0.0, 0.0, -1.0));
        assert!(body.accumulated_torque().length() > 0.0);
        body.integrate(0.1);
        assert!(body.angular_velocity.length() > 0.0);
    }

    #[test]
    fn test_fixed_rotation_ignores_torque() {
        let mut body = crate_body().with_fixed_rotation();
        body.apply_torque(Vec3::Y * 100.0);
        body.integrate(0.1);
        assert_eq!(body.angular_velocity, Vec3::ZERO);
        assert_eq!(body.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_point_velocity_includes_spin() {
        let mut body = crate_body();
        body.angular_velocity = Vec3::Y;
        let v = body.point_velocity(Vec3::X);
        // w x r = Y x X = -Z
        assert!((v - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_local_axes() {
        let body = crate_body().with_orientation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let forward = body.local_forward();
        // Rotating -Z by +90 degrees about Y yields -X
        assert!((forward - Vec3::NEG_X).length() < 1e-5, "forward was {:?}", forward);
        assert!((body.local_up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_clear_forces() {
        let mut body = crate_body();
        body.apply_force(Vec3::ONE);
        body.apply_torque(Vec3::ONE);
        body.clear_forces();
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert_eq!(body.accumulated_torque(), Vec3::ZERO);
    }
}
