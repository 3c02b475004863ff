//! Locomotion Coordinator
//!
//! Decides whether the character walks or pilots the hover vehicle, and is the
//! only place bodies enter or leave the physics world.
//!
//! - **Grounded**: the character capsule is simulated and driven by
//!   [`SurfaceLocomotion`]; the empty vehicle still runs its suspension.
//! - **Piloting**: the capsule is taken out of the world and parked here, the
//!   vehicle takes the drive input and the character is drawn on its seat.
//!
//! Mounting needs the interact edge within `mount_radius` of the vehicle.
//! Dismounting always succeeds and puts the character down beside the vehicle
//! with zero velocity; the vehicle's momentum is not inherited.

use glam::{Quat, Vec3};

use crate::input::{ControlLatches, ControlState, RawInput};
use crate::physics::{BodyHandle, GravityField, PhysicsWorld, RigidBody};
use crate::player::{StepReport, SurfaceLocomotion};
use crate::vehicle::{DriveInput, HoverReport, HoverSuspension};

use super::config::MountConfig;

/// Who is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountState {
    Grounded,
    Piloting,
}

/// A mount or dismount that happened this update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountTransition {
    Mounted,
    Dismounted,
}

/// Where the character's body lives right now.
#[derive(Debug)]
enum CharacterBody {
    /// In the world and simulated
    Active(BodyHandle),
    /// Out of the world while piloting
    Parked(RigidBody),
}

/// Outcome of one coordinator update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorReport {
    pub state: MountState,
    pub transition: Option<MountTransition>,
    /// Present while grounded
    pub character: Option<StepReport>,
    pub vehicle: HoverReport,
}

/// Owns both controllers and arbitrates which one drives.
#[derive(Debug)]
pub struct LocomotionCoordinator {
    config: MountConfig,
    latches: ControlLatches,
    locomotion: SurfaceLocomotion,
    hover: HoverSuspension,
    character: CharacterBody,
    vehicle: BodyHandle,
}

impl LocomotionCoordinator {
    /// Take over a character and a vehicle that are already in the world.
    pub fn new(
        config: MountConfig,
        locomotion: SurfaceLocomotion,
        hover: HoverSuspension,
        character: BodyHandle,
        vehicle: BodyHandle,
    ) -> Self {
        Self {
            config,
            latches: ControlLatches::default(),
            locomotion,
            hover,
            character: CharacterBody::Active(character),
            vehicle,
        }
    }

    pub fn config(&self) -> &MountConfig {
        &self.config
    }

    pub fn state(&self) -> MountState {
        match self.character {
            CharacterBody::Active(_) => MountState::Grounded,
            CharacterBody::Parked(_) => MountState::Piloting,
        }
    }

    pub fn locomotion(&self) -> &SurfaceLocomotion {
        &self.locomotion
    }

    pub fn hover(&self) -> &HoverSuspension {
        &self.hover
    }

    /// Character body handle while grounded.
    pub fn character_handle(&self) -> Option<BodyHandle> {
        match self.character {
            CharacterBody::Active(handle) => Some(handle),
            CharacterBody::Parked(_) => None,
        }
    }

    /// The character body held out of the world while piloting.
    pub fn parked_character(&self) -> Option<&RigidBody> {
        match &self.character {
            CharacterBody::Active(_) => None,
            CharacterBody::Parked(body) => Some(body),
        }
    }

    pub fn vehicle_handle(&self) -> BodyHandle {
        self.vehicle
    }

    /// Build this frame's control state, updating the edge latches.
    pub fn controls(&mut self, raw: &RawInput) -> ControlState {
        ControlState::build(raw, &mut self.latches)
    }

    /// Position the camera should follow.
    pub fn camera_target(&self, world: &PhysicsWorld) -> Vec3 {
        let handle = match self.character {
            CharacterBody::Active(handle) => handle,
            CharacterBody::Parked(_) => self.vehicle,
        };
        world.get(handle).map(|body| body.position).unwrap_or(Vec3::ZERO)
    }

    /// Pose the character is drawn with: its own body, or the vehicle seat.
    pub fn character_pose(&self, world: &PhysicsWorld) -> (Vec3, Quat) {
        match self.character {
            CharacterBody::Active(handle) => {
                let position = world.get(handle).map(|body| body.position).unwrap_or(Vec3::ZERO);
                (position, self.locomotion.visual_orientation())
            }
            CharacterBody::Parked(_) => match world.get(self.vehicle) {
                Some(vehicle) => (vehicle.local_to_world(self.config.seat_offset), vehicle.orientation),
                None => (Vec3::ZERO, self.locomotion.visual_orientation()),
            },
        }
    }

    /// Handle transitions, then run the active controllers. Call once per
    /// frame before the world advances.
    pub fn update(
        &mut self,
        world: &mut PhysicsWorld,
        field: &GravityField,
        controls: &ControlState,
        camera_forward: Vec3,
        dt: f32,
    ) -> CoordinatorReport {
        let transition = if controls.interact_requested {
            match self.state() {
                MountState::Grounded => self.try_mount(world).then_some(MountTransition::Mounted),
                MountState::Piloting => {
                    self.dismount(world, field);
                    Some(MountTransition::Dismounted)
                }
            }
        } else {
            None
        };

        let character = match self.character {
            CharacterBody::Active(handle) => {
                Some(self.locomotion.step(world, field, handle, controls, camera_forward, dt))
            }
            CharacterBody::Parked(_) => {
                if controls.disguise_requested {
                    self.locomotion.toggle_form();
                }
                None
            }
        };

        let drive = if self.hover.is_occupied() {
            DriveInput::from_controls(controls)
        } else {
            DriveInput::default()
        };
        let vehicle = self.hover.step(world, field, self.vehicle, drive);

        CoordinatorReport {
            state: self.state(),
            transition,
            character,
            vehicle,
        }
    }

    /// Climb into the vehicle if close enough.
    fn try_mount(&mut self, world: &mut PhysicsWorld) -> bool {
        let CharacterBody::Active(handle) = self.character else {
            return false;
        };
        let (Some(character), Some(vehicle)) = (world.get(handle), world.get(self.vehicle)) else {
            return false;
        };

        let distance = character.position.distance(vehicle.position);
        if distance >= self.config.mount_radius {
            log::debug!(
                "Vehicle out of reach: {:.2}m (mount radius {:.2}m)",
                distance,
                self.config.mount_radius
            );
            return false;
        }

        let Some(body) = world.remove(handle) else {
            return false;
        };
        self.character = CharacterBody::Parked(body);
        self.hover.set_occupied(true);
        log::info!("Mounted vehicle at {:.2}m", distance);
        true
    }

    /// Put the character back beside the vehicle.
    fn dismount(&mut self, world: &mut PhysicsWorld, field: &GravityField) {
        let CharacterBody::Parked(parked) = &self.character else {
            return;
        };
        let mut body = parked.clone();

        let position = match world.get(self.vehicle) {
            Some(vehicle) => vehicle.local_to_world(self.config.dismount_offset),
            None => body.position,
        };
        let up = field.compute_up(position);

        body.position = position;
        body.orientation = Quat::from_rotation_arc(Vec3::Y, up);
        body.linear_velocity = Vec3::ZERO;
        body.angular_velocity = Vec3::ZERO;
        body.clear_forces();

        let handle = world.insert(body);
        self.character = CharacterBody::Active(handle);
        self.hover.set_occupied(false);
        log::info!("Dismounted at {:?}", position);
    }
}
