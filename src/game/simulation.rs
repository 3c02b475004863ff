//! Simulation
//!
//! Frame driver tying the world, the gravity field, the coordinator, the
//! camera and the visual output together. One call to [`Simulation::frame`]
//! per rendered frame, in this order:
//!
//! 1. Build the control state (edge latches live in the coordinator)
//! 2. Coordinator update: transitions, then controllers apply gravity and forces
//! 3. Fixed-step advance of the physics world
//! 4. Camera follows the active body, with `up` recomputed at the target
//! 5. Visual frames are written
//!
//! # Example
//!
//! ```rust,ignore
//! let mut sim = Simulation::new(SimulationConfig::default())?;
//! loop {
//!     let raw = input.poll();
//!     sim.frame(frame_time, &raw);
//!     renderer.upload(&sim.visuals().instances());
//! }
//! ```

use glam::Vec3;

use crate::camera::OrbitCamera;
use crate::input::RawInput;
use crate::physics::{FixedStepper, GravityField, PhysicsWorld};
use crate::player::{Form, SurfaceLocomotion};
use crate::vehicle::HoverSuspension;
use crate::visual::{ModelSlot, SceneVisuals};

use super::config::{ConfigError, SimulationConfig, WorldConfig};
use super::coordinator::{CoordinatorReport, LocomotionCoordinator, MountState};

/// Placeholder model slots for everything the simulation draws.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneModels {
    pub human: ModelSlot,
    pub alien: ModelSlot,
    pub vehicle: ModelSlot,
}

impl Default for SceneModels {
    fn default() -> Self {
        Self {
            human: ModelSlot::new("human"),
            alien: ModelSlot::new("alien"),
            vehicle: ModelSlot::new("vehicle"),
        }
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed physics steps taken
    pub substeps: u32,
    pub coordinator: CoordinatorReport,
}

/// Build the physics world and gravity field for a world layout.
///
/// Every attractor also becomes a static terrain sphere.
pub fn build_world(config: &WorldConfig) -> (PhysicsWorld, GravityField) {
    let field = GravityField::new(config.attractors.clone());
    let terrain = config.attractors.iter().map(|a| a.terrain()).collect();
    log::info!("World built with {} attractors", config.attractors.len());
    (PhysicsWorld::with_terrain(terrain), field)
}

#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    world: PhysicsWorld,
    field: GravityField,
    stepper: FixedStepper,
    coordinator: LocomotionCoordinator,
    camera: OrbitCamera,
    visuals: SceneVisuals,
    models: SceneModels,
    frames: u64,
    simulated_time: f64,
}

impl Simulation {
    /// Validate `config` and set up the world with the character and vehicle
    /// at their spawn points.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (mut world, field) = build_world(&config.world);

        let mut locomotion = SurfaceLocomotion::new(config.character);
        let character_up = field.compute_up(config.world.character_spawn);
        let character = world.insert(locomotion.spawn_body(config.world.character_spawn, character_up));

        let hover = HoverSuspension::new(config.vehicle);
        let vehicle_up = field.compute_up(config.world.vehicle_spawn);
        let vehicle = world.insert(hover.spawn_body(config.world.vehicle_spawn, vehicle_up));

        let coordinator = LocomotionCoordinator::new(config.mount, locomotion, hover, character, vehicle);

        let mut camera = OrbitCamera::new(config.camera);
        let target = coordinator.camera_target(&world);
        camera.update(0.0, target, field.compute_up(target));

        let mut sim = Self {
            stepper: FixedStepper::from_config(&config.physics),
            config,
            world,
            field,
            coordinator,
            camera,
            visuals: SceneVisuals::default(),
            models: SceneModels::default(),
            frames: 0,
            simulated_time: 0.0,
        };
        sim.write_visuals();
        Ok(sim)
    }

    /// Advance by `elapsed` seconds of wall time with this frame's input.
    pub fn frame(&mut self, elapsed: f32, raw: &RawInput) -> FrameReport {
        let elapsed = elapsed.max(0.0);
        let controls = self.coordinator.controls(raw);

        self.camera.handle_mouse_delta(raw.mouse_delta.x, raw.mouse_delta.y, raw.pointer_captured);
        self.camera.zoom_steps(raw.zoom_steps);

        // Controllers see the time the world will actually simulate this frame
        let budget = self.stepper.fixed_dt() * self.stepper.max_substeps() as f32;
        let dt = elapsed.min(budget);

        let coordinator = self.coordinator.update(
            &mut self.world,
            &self.field,
            &controls,
            self.camera.forward(),
            dt,
        );

        let substeps = self.world.advance(elapsed, &mut self.stepper);
        self.simulated_time += (substeps as f64) * self.stepper.fixed_dt() as f64;

        let target = self.coordinator.camera_target(&self.world);
        let up = self.field.compute_up(target);
        self.camera.update(elapsed, target, up);

        self.write_visuals();
        self.frames += 1;

        FrameReport {
            substeps,
            coordinator,
        }
    }

    fn write_visuals(&mut self) {
        let (position, orientation) = self.coordinator.character_pose(&self.world);
        let alien = self.coordinator.locomotion().form() == Form::Alien;
        self.visuals.human.write(position, orientation, !alien);
        self.visuals.alien.write(position, orientation, alien);

        if let Some(vehicle) = self.world.get(self.coordinator.vehicle_handle()) {
            self.visuals.vehicle.write(vehicle.position, vehicle.orientation, true);
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn field(&self) -> &GravityField {
        &self.field
    }

    pub fn coordinator(&self) -> &LocomotionCoordinator {
        &self.coordinator
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn visuals(&self) -> &SceneVisuals {
        &self.visuals
    }

    pub fn models(&self) -> &SceneModels {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut SceneModels {
        &mut self.models
    }

    pub fn mount_state(&self) -> MountState {
        self.coordinator.state()
    }

    /// Position of whatever the player currently controls.
    pub fn player_position(&self) -> Vec3 {
        self.coordinator.camera_target(&self.world)
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Physics time actually simulated (dropped hitch time excluded).
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }
}
