//! Surface Locomotion
//!
//! Character controller for walking on the curved surface of a planetoid.
//! Movement is relative to the camera and constrained to the tangent plane of
//! the local up vector, which is re-resolved from the gravity field every step.
//!
//! # Physics Model
//!
//! - Velocity is split into a component along `up` (gravity and jumps, left
//!   untouched) and a tangential component that is blended toward the input
//!   target with a frame-rate independent exponential factor.
//! - Jumping requires a short ground probe along `-up` to hit something other
//!   than the character itself. No coyote time, no buffering.
//! - The body is a rotation-locked capsule whose axis is kept along `up`; the
//!   visual frame is derived from the movement direction.
//!
//! # Forms
//!
//! - **Human**: 6 m/s, 6 m/s jump
//! - **Alien**: 10 m/s, 9 m/s jump
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
//! let handle = world.insert(locomotion.spawn_body(spawn, field.compute_up(spawn)));
//!
//! // Each step, before the world advances:
//! let report = locomotion.step(&mut world, &field, handle, &controls, camera.forward(), dt);
//! ```

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::ControlState;
use crate::physics::{BodyHandle, BodyKind, Collider, GravityField, PhysicsWorld, RigidBody};

/// Movement stats that change with the disguise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormStats {
    /// Tangential speed target in m/s
    pub top_speed: f32,
    /// Velocity added along up when jumping, in m/s
    pub jump_speed: f32,
}

/// Visual disguise of the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Form {
    #[default]
    Human,
    Alien,
}

impl Form {
    /// The other form.
    pub fn toggled(self) -> Self {
        match self {
            Form::Human => Form::Alien,
            Form::Alien => Form::Human,
        }
    }
}

/// Character controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub human: FormStats,
    pub alien: FormStats,
    /// Exponential blend rate toward the target velocity, per second.
    /// 13.4/s equals a 0.2 blend per 60 Hz frame.
    pub velocity_blend_rate: f32,
    /// Length of the ground probe ray measured from the body center
    pub ground_probe_length: f32,
    /// Intents shorter than this count as "no input" for orientation
    pub min_intent_length: f32,
    /// Character mass in kilograms
    pub mass: f32,
    pub capsule_radius: f32,
    /// Half height of the capsule's straight section
    pub capsule_half_height: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            human: FormStats {
                top_speed: 6.0,
                jump_speed: 6.0,
            },
            alien: FormStats {
                top_speed: 10.0,
                jump_speed: 9.0,
            },
            velocity_blend_rate: 13.4,
            ground_probe_length: 1.1,
            min_intent_length: 0.01,
            mass: 80.0,
            capsule_radius: 0.4,
            capsule_half_height: 0.5,
        }
    }
}

impl LocomotionConfig {
    pub fn stats(&self, form: Form) -> FormStats {
        match form {
            Form::Human => self.human,
            Form::Alien => self.alien,
        }
    }
}

/// What happened during one locomotion step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Up vector used this step
    pub up: Vec3,
    /// Ground probe result, only evaluated when a jump was requested
    pub ground_probe: Option<bool>,
    pub jumped: bool,
    pub form_changed: bool,
    /// Tangential speed after the velocity blend
    pub tangent_speed: f32,
}

/// Surface-walking character controller.
#[derive(Debug, Clone)]
pub struct SurfaceLocomotion {
    config: LocomotionConfig,
    form: Form,
    /// Last usable tangent forward, reused when the camera looks along up
    last_forward: Vec3,
    visual_orientation: Quat,
}

impl SurfaceLocomotion {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            form: Form::Human,
            last_forward: Vec3::NEG_Z,
            visual_orientation: Quat::IDENTITY,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn top_speed(&self) -> f32 {
        self.config.stats(self.form).top_speed
    }

    pub fn jump_speed(&self) -> f32 {
        self.config.stats(self.form).jump_speed
    }

    /// Orientation of the character's visual frame.
    pub fn visual_orientation(&self) -> Quat {
        self.visual_orientation
    }

    /// Swap the disguise. Only speed constants and the visible skeleton change.
    pub fn toggle_form(&mut self) -> Form {
        self.form = self.form.toggled();
        log::debug!("Character form is now {:?}", self.form);
        self.form
    }

    /// Build the character's capsule body, standing along `up`.
    pub fn spawn_body(&mut self, position: Vec3, up: Vec3) -> RigidBody {
        let stand = Quat::from_rotation_arc(Vec3::Y, up.normalize_or(Vec3::Y));
        self.visual_orientation = stand;
        RigidBody::new(
            BodyKind::Character,
            position,
            self.config.mass,
            Collider::Capsule {
                radius: self.config.capsule_radius,
                half_height: self.config.capsule_half_height,
            },
        )
        .with_fixed_rotation()
        .with_orientation(stand)
    }

    /// Per-step blend toward the target tangential velocity.
    pub fn blend_factor(&self, dt: f32) -> f32 {
        1.0 - (-self.config.velocity_blend_rate * dt.max(0.0)).exp()
    }

    /// Camera forward projected onto the tangent plane of `up`, plus right.
    ///
    /// Falls back to the previous forward when the camera looks along `up`.
    pub fn tangent_basis(&mut self, camera_forward: Vec3, up: Vec3) -> (Vec3, Vec3) {
        let forward = project_on_plane(camera_forward, up)
            .or_else(|| {
                log::trace!("Camera forward parallel to up, reusing previous forward");
                project_on_plane(self.last_forward, up)
            })
            .unwrap_or_else(|| up.any_orthonormal_vector());
        self.last_forward = forward;

        let right = forward.cross(up).normalize();
        (forward, right)
    }

    /// True when a ray of `ground_probe_length` along `-up` hits something
    /// other than the character.
    pub fn probe_ground(&self, world: &PhysicsWorld, handle: BodyHandle, up: Vec3) -> bool {
        let Some(body) = world.get(handle) else {
            return false;
        };
        world
            .raycast(body.position, -up, self.config.ground_probe_length, Some(handle))
            .is_some()
    }

    /// Run one controller step. Must be called before the world advances.
    ///
    /// Applies gravity to the body as part of resolving `up`.
    pub fn step(
        &mut self,
        world: &mut PhysicsWorld,
        field: &GravityField,
        handle: BodyHandle,
        controls: &ControlState,
        camera_forward: Vec3,
        dt: f32,
    ) -> StepReport {
        let form_changed = controls.disguise_requested;
        if form_changed {
            self.toggle_form();
        }

        let Some(body) = world.get_mut(handle) else {
            return StepReport {
                up: field.compute_up(Vec3::ZERO),
                ground_probe: None,
                jumped: false,
                form_changed,
                tangent_speed: 0.0,
            };
        };

        let up = field.apply_gravity(body);
        body.orientation = Quat::from_rotation_arc(Vec3::Y, up);

        let (forward, right) = self.tangent_basis(camera_forward, up);
        let intent = controls.move_intent;
        let move_dir = (forward * intent.y + right * intent.x).normalize_or_zero();
        let target = move_dir * self.top_speed();

        let vertical = up * body.linear_velocity.dot(up);
        let tangent = body.linear_velocity - vertical;
        let tangent = tangent + (target - tangent) * self.blend_factor(dt);
        body.linear_velocity = vertical + tangent;
        let tangent_speed = tangent.length();

        let mut ground_probe = None;
        let mut jumped = false;
        if controls.jump_requested {
            let grounded = self.probe_ground(world, handle, up);
            ground_probe = Some(grounded);
            if grounded {
                if let Some(body) = world.get_mut(handle) {
                    let along_up = body.linear_velocity.dot(up);
                    body.linear_velocity += up * (self.jump_speed() - along_up);
                    jumped = true;
                    log::debug!("Jump at {:?}", body.position);
                }
            }
        }

        if intent.length() > self.config.min_intent_length && move_dir != Vec3::ZERO {
            self.visual_orientation = surface_frame(move_dir, up);
        } else {
            let visual_up = self.visual_orientation * Vec3::Y;
            self.visual_orientation =
                (Quat::from_rotation_arc(visual_up, up) * self.visual_orientation).normalize();
        }

        StepReport {
            up,
            ground_probe,
            jumped,
            form_changed,
            tangent_speed,
        }
    }
}

/// Squared length below which a projected direction counts as degenerate.
const MIN_PROJECTED_LENGTH_SQ: f32 = 1e-6;

/// Component of `v` perpendicular to `normal`, normalized.
///
/// `None` when `v` is (nearly) parallel to `normal`.
fn project_on_plane(v: Vec3, normal: Vec3) -> Option<Vec3> {
    let projected = v - normal * v.dot(normal);
    if !projected.is_finite() || projected.length_squared() < MIN_PROJECTED_LENGTH_SQ {
        return None;
    }
    projected.try_normalize()
}

/// Orientation whose local -Z faces `forward` and local +Y is `up`.
///
/// Built directly from the basis instead of iterating a look-at, so there is
/// no residual roll when `up` is far from +Y.
pub fn surface_frame(forward: Vec3, up: Vec3) -> Quat {
    let Some(forward) = project_on_plane(forward, up) else {
        return Quat::from_rotation_arc(Vec3::Y, up);
    };
    let right = forward.cross(up).normalize();
    let back = right.cross(up);
    Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Attractor;
    use glam::Vec2;

    const EPSILON: f32 = 1e-4;

    fn setup(position: Vec3) -> (PhysicsWorld, GravityField, SurfaceLocomotion, BodyHandle) {
        let attractor = Attractor::new(Vec3::ZERO, 500.0);
        let field = GravityField::new(vec![attractor]);
        let mut world = PhysicsWorld::with_terrain(vec![attractor.terrain()]);
        let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        let body = locomotion.spawn_body(position, field.compute_up(position));
        let handle = world.insert(body);
        (world, field, locomotion, handle)
    }

    fn intent(x: f32, y: f32) -> ControlState {
        ControlState {
            move_intent: Vec2::new(x, y),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        assert_eq!(locomotion.form(), Form::Human);
        assert_eq!(locomotion.top_speed(), 6.0);
        assert_eq!(locomotion.jump_speed(), 6.0);
    }

    #[test]
    fn test_toggle_form_swaps_constants() {
        let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        assert_eq!(locomotion.toggle_form(), Form::Alien);
        assert_eq!(locomotion.top_speed(), 10.0);
        assert_eq!(locomotion.jump_speed(), 9.0);
        assert_eq!(locomotion.toggle_form(), Form::Human);
    }

    #[test]
    fn test_blend_factor_is_frame_rate_independent() {
        let locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        let one = locomotion.blend_factor(1.0 / 30.0);
        let two = locomotion.blend_factor(1.0 / 60.0);
        // Two half steps leave the same remainder as one full step
        assert!(((1.0 - two) * (1.0 - two) - (1.0 - one)).abs() < EPSILON);
        // Roughly 0.2 at 60 Hz
        assert!((two - 0.2).abs() < 0.01, "blend was {}", two);
    }

    #[test]
    fn test_tangent_basis_is_orthonormal() {
        let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        let up = Vec3::new(1.0, 1.0, 0.0).normalize();
        let (forward, right) = locomotion.tangent_basis(Vec3::new(0.2, -0.4, -1.0), up);
        assert!(forward.dot(up).abs() < EPSILON);
        assert!(right.dot(up).abs() < EPSILON);
        assert!(forward.dot(right).abs() < EPSILON);
        assert!((forward.length() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_degenerate_camera_reuses_previous_forward() {
        let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        let (first, _) = locomotion.tangent_basis(Vec3::new(1.0, -0.5, 0.0), Vec3::Y);
        let (second, _) = locomotion.tangent_basis(Vec3::NEG_Y, Vec3::Y);
        assert!((first - second).length() < EPSILON);
        assert!((second - Vec3::X).length() < EPSILON);
    }

    #[test]
    fn test_nearly_parallel_camera_reuses_previous_forward() {
        let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
        let (first, _) = locomotion.tangent_basis(Vec3::new(0.0, -0.5, 1.0), Vec3::Y);
        assert!((first - Vec3::Z).length() < EPSILON);
        // A tiny sideways residue must not turn into a new heading
        let (second, _) = locomotion.tangent_basis(Vec3::new(1e-6, -1.0, 0.0).normalize(), Vec3::Y);
        assert!((second - Vec3::Z).length() < EPSILON, "forward snapped to {:?}", second);
    }

    #[test]
    fn test_no_input_no_drift() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 505.0, 0.0));
        let report = locomotion.step(&mut world, &field, handle, &ControlState::default(), Vec3::NEG_Z, 1.0 / 60.0);
        assert!(report.tangent_speed < EPSILON);
        let body = world.get(handle).unwrap();
        let tangent = body.linear_velocity - report.up * body.linear_velocity.dot(report.up);
        assert!(tangent.length() < EPSILON);
    }

    #[test]
    fn test_forward_input_moves_along_camera() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 500.9, 0.0));
        for _ in 0..60 {
            locomotion.step(&mut world, &field, handle, &intent(0.0, 1.0), Vec3::NEG_Z, 1.0 / 60.0);
            world.step(1.0 / 60.0);
            world.clear_forces();
        }
        let body = world.get(handle).unwrap();
        assert!(body.linear_velocity.z < -5.0, "velocity was {:?}", body.linear_velocity);
        assert!(body.position.z < 0.0);
    }

    #[test]
    fn test_vertical_velocity_preserved_by_blend() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 520.0, 0.0));
        world.get_mut(handle).unwrap().linear_velocity = Vec3::new(3.0, -4.0, 0.0);
        locomotion.step(&mut world, &field, handle, &ControlState::default(), Vec3::NEG_Z, 1.0 / 60.0);
        let body = world.get(handle).unwrap();
        assert!((body.linear_velocity.y + 4.0).abs() < EPSILON);
        assert!(body.linear_velocity.x < 3.0);
    }

    #[test]
    fn test_jump_only_when_probe_hits() {
        let probe = LocomotionConfig::default().ground_probe_length;
        let jump = ControlState {
            jump_requested: true,
            ..Default::default()
        };

        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 500.0 + probe - 0.01, 0.0));
        let report = locomotion.step(&mut world, &field, handle, &jump, Vec3::NEG_Z, 1.0 / 60.0);
        assert_eq!(report.ground_probe, Some(true));
        assert!(report.jumped);
        let vy = world.get(handle).unwrap().linear_velocity.y;
        assert!((vy - 6.0).abs() < EPSILON, "jump velocity was {}", vy);

        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 500.0 + probe + 0.01, 0.0));
        let report = locomotion.step(&mut world, &field, handle, &jump, Vec3::NEG_Z, 1.0 / 60.0);
        assert_eq!(report.ground_probe, Some(false));
        assert!(!report.jumped);
        assert_eq!(world.get(handle).unwrap().linear_velocity.y, 0.0);
    }

    #[test]
    fn test_jump_replaces_falling_velocity() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 500.95, 0.0));
        world.get_mut(handle).unwrap().linear_velocity = Vec3::new(0.0, -3.0, 0.0);
        let jump = ControlState {
            jump_requested: true,
            ..Default::default()
        };
        locomotion.step(&mut world, &field, handle, &jump, Vec3::NEG_Z, 1.0 / 60.0);
        let vy = world.get(handle).unwrap().linear_velocity.y;
        assert!((vy - 6.0).abs() < EPSILON);
    }

    #[test]
    fn test_visual_faces_movement_on_side_of_planet() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(500.9, 0.0, 0.0));
        locomotion.step(&mut world, &field, handle, &intent(0.0, 1.0), Vec3::NEG_Z, 1.0 / 60.0);

        let orientation = locomotion.visual_orientation();
        let visual_up = orientation * Vec3::Y;
        let visual_forward = orientation * Vec3::NEG_Z;
        assert!((visual_up - Vec3::X).length() < 1e-3, "up was {:?}", visual_up);
        assert!((visual_forward - Vec3::NEG_Z).length() < 1e-3, "forward was {:?}", visual_forward);
    }

    #[test]
    fn test_visual_keeps_heading_without_input() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 500.9, 0.0));
        locomotion.step(&mut world, &field, handle, &intent(1.0, 0.0), Vec3::NEG_Z, 1.0 / 60.0);
        let before = locomotion.visual_orientation() * Vec3::NEG_Z;
        locomotion.step(&mut world, &field, handle, &ControlState::default(), Vec3::NEG_Z, 1.0 / 60.0);
        let after = locomotion.visual_orientation() * Vec3::NEG_Z;
        assert!((before - after).length() < 1e-3);
        assert!((after - Vec3::X).length() < 1e-3, "strafing right faces +X, got {:?}", after);
    }

    #[test]
    fn test_surface_frame_orthonormal() {
        let up = Vec3::new(0.3, -0.8, 0.5).normalize();
        let q = surface_frame(Vec3::new(1.0, 0.0, 0.0), up);
        assert!(((q * Vec3::Y) - up).length() < 1e-4);
        assert!((q * Vec3::NEG_Z).dot(up).abs() < 1e-4);
    }

    #[test]
    fn test_missing_body_is_harmless() {
        let (mut world, field, mut locomotion, handle) = setup(Vec3::new(0.0, 505.0, 0.0));
        world.remove(handle);
        let report = locomotion.step(&mut world, &field, handle, &intent(0.0, 1.0), Vec3::NEG_Z, 1.0 / 60.0);
        assert!(!report.jumped);
        assert_eq!(report.tangent_speed, 0.0);
    }
}
