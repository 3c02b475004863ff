//! Hover Suspension
//!
//! Keeps a rigid chassis floating above spherical terrain with four ray-cast
//! spring-dampers, rights it when it tilts too far from the local vertical and
//! drives it while somebody is aboard.
//!
//! # Per-step order
//!
//! 1. Resolve `up` from the gravity field (also applies gravity to the chassis)
//! 2. Probe each suspension point along `-up` and push where compressed
//! 3. Proportional uprighting torque past the tilt threshold
//! 4. Thrust along the chassis forward axis and yaw about `up` (occupied only)
//!
//! Suspension and uprighting run whether or not the vehicle is occupied, so a
//! parked vehicle keeps floating and levels itself.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut hover = HoverSuspension::new(HoverConfig::default());
//! let handle = world.insert(hover.spawn_body(spawn, field.compute_up(spawn)));
//!
//! hover.set_occupied(true);
//! hover.step(&mut world, &field, handle, DriveInput::from_controls(&controls));
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::ControlState;
use crate::physics::{BodyHandle, BodyKind, Collider, GravityField, PhysicsWorld, RigidBody};

/// Number of suspension points on the chassis.
pub const SUSPENSION_POINTS: usize = 4;

/// Hover vehicle tuning. Forces in newtons, torques in newton-meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Rest distance between a suspension point and the ground
    pub hover_height: f32,
    /// Extra probe length beyond the hover height
    pub ray_margin: f32,
    /// Spring stiffness per suspension point (N/m)
    pub stiffness: f32,
    /// Damping per suspension point (N·s/m)
    pub damping: f32,
    /// Cosine of the tilt angle beyond which uprighting kicks in
    pub upright_threshold: f32,
    /// Uprighting torque per unit of misalignment
    pub upright_strength: f32,
    pub forward_force: f32,
    /// Reverse thrust, weaker than forward
    pub reverse_force: f32,
    pub turn_torque: f32,
    /// Chassis-local suspension points (rectangle under the hull)
    pub suspension_points: [Vec3; SUSPENSION_POINTS],
    /// Half extents of the chassis box
    pub half_extents: Vec3,
    /// Chassis mass in kilograms
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            hover_height: 1.5,
            ray_margin: 0.5,
            stiffness: 6000.0,
            damping: 1200.0,
            upright_threshold: 0.98,
            upright_strength: 200_000.0,
            forward_force: 6000.0,
            reverse_force: 3000.0,
            turn_torque: 3000.0,
            suspension_points: [
                Vec3::new(-1.0, -0.3, -1.6),
                Vec3::new(1.0, -0.3, -1.6),
                Vec3::new(-1.0, -0.3, 1.6),
                Vec3::new(1.0, -0.3, 1.6),
            ],
            half_extents: Vec3::new(1.2, 0.5, 2.0),
            mass: 500.0,
            linear_damping: 0.2,
            angular_damping: 0.9,
        }
    }
}

/// Pilot commands for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl DriveInput {
    pub fn from_controls(controls: &ControlState) -> Self {
        let keys = controls.movement;
        Self {
            forward: keys.forward,
            backward: keys.backward,
            left: keys.left,
            right: keys.right,
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }
}

/// Result of probing one suspension point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionSample {
    /// Suspension point in world space
    pub point: Vec3,
    /// Distance to ground, if the probe hit within `hover_height + ray_margin`
    pub hit_distance: Option<f32>,
    /// `hover_height - hit_distance` when the hit is inside the hover height
    pub compression: f32,
    /// Spring push along up (never negative)
    pub force: f32,
}

impl SuspensionSample {
    /// True when this point is close enough to push.
    pub fn is_compressed(&self) -> bool {
        self.force > 0.0
    }
}

/// What the suspension did during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverReport {
    pub up: Vec3,
    pub samples: [SuspensionSample; SUSPENSION_POINTS],
    /// Sum of all spring forces
    pub lift: Vec3,
    /// Torque applied to straighten the chassis
    pub upright_torque: Vec3,
    /// Thrust applied along the chassis forward axis
    pub thrust: Vec3,
}

impl HoverReport {
    /// True when no probe found ground: the chassis is free-falling.
    pub fn is_airborne(&self) -> bool {
        self.samples.iter().all(|s| s.hit_distance.is_none())
    }
}

/// Spring-damper hover controller for one vehicle.
#[derive(Debug, Clone)]
pub struct HoverSuspension {
    config: HoverConfig,
    occupied: bool,
}

impl HoverSuspension {
    pub fn new(config: HoverConfig) -> Self {
        Self {
            config,
            occupied: false,
        }
    }

    pub fn config(&self) -> &HoverConfig {
        &self.config
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }

    /// Build the chassis body, level with `up`.
    pub fn spawn_body(&self, position: Vec3, up: Vec3) -> RigidBody {
        let level = Quat::from_rotation_arc(Vec3::Y, up.normalize_or(Vec3::Y));
        RigidBody::new(
            BodyKind::Vehicle,
            position,
            self.config.mass,
            Collider::Cuboid {
                half_extents: self.config.half_extents,
            },
        )
        .with_orientation(level)
        .with_damping(self.config.linear_damping, self.config.angular_damping)
    }

    /// Spring-damper push for one point. Springs push, never pull.
    pub fn spring_force(&self, compression: f32, velocity_along_up: f32) -> f32 {
        (self.config.stiffness * compression - self.config.damping * velocity_along_up).max(0.0)
    }

    /// Cast every suspension ray and evaluate its spring. No side effects.
    pub fn probe_suspension(
        &self,
        world: &PhysicsWorld,
        handle: BodyHandle,
        up: Vec3,
    ) -> [SuspensionSample; SUSPENSION_POINTS] {
        let probe_length = self.config.hover_height + self.config.ray_margin;
        let body = world.get(handle);

        self.config.suspension_points.map(|local| {
            let Some(body) = body else {
                return SuspensionSample {
                    point: local,
                    hit_distance: None,
                    compression: 0.0,
                    force: 0.0,
                };
            };

            let point = body.local_to_world(local);
            let hit_distance = world
                .raycast(point, -up, probe_length, Some(handle))
                .map(|hit| hit.distance);

            let (compression, force) = match hit_distance {
                Some(distance) if distance < self.config.hover_height => {
                    let compression = self.config.hover_height - distance;
                    let velocity_along_up = body.point_velocity(point).dot(up);
                    (compression, self.spring_force(compression, velocity_along_up))
                }
                _ => (0.0, 0.0),
            };

            SuspensionSample {
                point,
                hit_distance,
                compression,
                force,
            }
        })
    }

    /// Corrective torque for a chassis whose up is `body_up`.
    ///
    /// Zero while the tilt stays inside the threshold.
    pub fn upright_torque(&self, body_up: Vec3, up: Vec3, body_right: Vec3) -> Vec3 {
        let alignment = body_up.dot(up);
        if alignment >= self.config.upright_threshold {
            return Vec3::ZERO;
        }
        // Upside down leaves no cross product; roll about the chassis right axis
        let axis = body_up.cross(up).try_normalize().unwrap_or(body_right);
        axis * (1.0 - alignment) * self.config.upright_strength
    }

    /// Run one controller step. Must be called before the world advances.
    pub fn step(
        &mut self,
        world: &mut PhysicsWorld,
        field: &GravityField,
        handle: BodyHandle,
        drive: DriveInput,
    ) -> HoverReport {
        let up = match world.get_mut(handle) {
            Some(body) => field.apply_gravity(body),
            None => field.compute_up(Vec3::ZERO),
        };

        let samples = self.probe_suspension(world, handle, up);
        let mut report = HoverReport {
            up,
            samples,
            lift: Vec3::ZERO,
            upright_torque: Vec3::ZERO,
            thrust: Vec3::ZERO,
        };

        let Some(body) = world.get_mut(handle) else {
            return report;
        };

        for sample in samples.iter().filter(|s| s.is_compressed()) {
            let force = up * sample.force;
            body.apply_force_at(force, sample.point);
            report.lift += force;
        }
        if report.is_airborne() {
            log::trace!("Vehicle {} has no ground under any probe", handle.index());
        }

        let torque = self.upright_torque(body.local_up(), up, body.orientation * Vec3::X);
        body.apply_torque(torque);
        report.upright_torque = torque;

        if self.occupied && !drive.is_idle() {
            let forward = body.local_forward();
            if drive.forward {
                report.thrust += forward * self.config.forward_force;
            }
            if drive.backward {
                report.thrust -= forward * self.config.reverse_force;
            }
            body.apply_force(report.thrust);

            let mut yaw = 0.0;
            if drive.left {
                yaw += self.config.turn_torque;
            }
            if drive.right {
                yaw -= self.config.turn_torque;
            }
            body.apply_torque(up * yaw);
        }

        report
    }
}
