//! Mount Tests - Mount/Dismount Ownership Transfer
//!
//! The character body must exist in the physics world exactly once while
//! grounded and not at all while piloting.

use glam::Vec3;
use planetoid_engine::game::{
    LocomotionCoordinator, MountConfig, MountState, MountTransition, Simulation, SimulationConfig,
};
use planetoid_engine::input::{ControlState, KeyCode, InputState, RawInput};
use planetoid_engine::physics::{Attractor, BodyKind, GravityField, PhysicsWorld};
use planetoid_engine::player::{LocomotionConfig, SurfaceLocomotion};
use planetoid_engine::vehicle::{HoverConfig, HoverSuspension};

const DT: f32 = 1.0 / 60.0;

fn close_vehicle_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.vehicle_spawn = Vec3::new(2.0, 501.8, 0.0);
    config
}

fn tap(sim: &mut Simulation, input: &mut InputState, key: KeyCode) {
    input.keyboard.handle_key(key, true);
    sim.frame(DT, &input.poll());
    input.keyboard.handle_key(key, false);
    sim.frame(DT, &input.poll());
}

fn interact() -> ControlState {
    ControlState {
        interact_requested: true,
        ..Default::default()
    }
}

// ============================================================================
// Through the simulation driver
// ============================================================================

#[test]
fn test_round_trip_keeps_one_character_body() {
    let mut sim = Simulation::new(close_vehicle_config()).unwrap();
    let mut input = InputState::new();
    assert_eq!(sim.world().count_kind(BodyKind::Character), 1);

    tap(&mut sim, &mut input, KeyCode::E);
    assert_eq!(sim.mount_state(), MountState::Piloting);
    assert_eq!(sim.world().count_kind(BodyKind::Character), 0);
    assert_eq!(sim.world().count_kind(BodyKind::Vehicle), 1);

    input.keyboard.handle_key(KeyCode::W, true);
    for _ in 0..120 {
        sim.frame(DT, &input.poll());
    }
    input.keyboard.handle_key(KeyCode::W, false);

    tap(&mut sim, &mut input, KeyCode::E);
    assert_eq!(sim.mount_state(), MountState::Grounded);
    assert_eq!(sim.world().count_kind(BodyKind::Character), 1);
    assert_eq!(sim.world().len(), 2);
}

#[test]
fn test_holding_interact_does_not_flip_back() {
    let mut sim = Simulation::new(close_vehicle_config()).unwrap();
    let raw = RawInput {
        interact: true,
        ..Default::default()
    };
    for _ in 0..30 {
        sim.frame(DT, &raw);
    }
    assert_eq!(sim.mount_state(), MountState::Piloting);
}

#[test]
fn test_camera_follows_vehicle_while_piloting() {
    let mut sim = Simulation::new(close_vehicle_config()).unwrap();
    let mut input = InputState::new();
    tap(&mut sim, &mut input, KeyCode::E);

    let vehicle = sim.world().get(sim.coordinator().vehicle_handle()).unwrap().position;
    assert_eq!(sim.player_position(), vehicle);
    let focus_offset = sim.camera().focus() - vehicle;
    let up = sim.field().compute_up(vehicle);
    assert!((focus_offset - up * sim.camera().config().look_height).length() < 1e-3);

    // Character is drawn on the seat
    let seat = sim.visuals().human.position;
    assert!(seat.distance(vehicle) < 1.0);
}

#[test]
fn test_mount_refused_when_far_away() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    let mut input = InputState::new();
    tap(&mut sim, &mut input, KeyCode::E);
    assert_eq!(sim.mount_state(), MountState::Grounded);
    assert_eq!(sim.world().count_kind(BodyKind::Character), 1);
}

// ============================================================================
// Coordinator level: exact dismount placement
// ============================================================================

#[test]
fn test_dismount_places_character_at_offset_with_zero_velocity() {
    let attractor = Attractor::new(Vec3::ZERO, 500.0);
    let field = GravityField::new(vec![attractor]);
    let mut world = PhysicsWorld::with_terrain(vec![attractor.terrain()]);

    let mut locomotion = SurfaceLocomotion::new(LocomotionConfig::default());
    let hover = HoverSuspension::new(HoverConfig::default());
    let character = world.insert(locomotion.spawn_body(Vec3::new(0.0, 500.9, 0.0), Vec3::Y));
    let vehicle = world.insert(hover.spawn_body(Vec3::new(1.5, 501.6, 1.0), Vec3::Y));
    let mount = MountConfig::default();
    let mut coordinator = LocomotionCoordinator::new(mount, locomotion, hover, character, vehicle);

    let report = coordinator.update(&mut world, &field, &interact(), Vec3::NEG_Z, DT);
    assert_eq!(report.transition, Some(MountTransition::Mounted));
    assert!(!world.contains(character));

    // Give the vehicle some momentum the character must not inherit
    world.get_mut(vehicle).unwrap().linear_velocity = Vec3::new(0.0, 0.0, -15.0);
    let seat_of_dismount = world.get(vehicle).unwrap().local_to_world(mount.dismount_offset);

    let report = coordinator.update(&mut world, &field, &interact(), Vec3::NEG_Z, DT);
    assert_eq!(report.transition, Some(MountTransition::Dismounted));

    let handle = coordinator.character_handle().unwrap();
    let characters: Vec<_> = world.bodies().filter(|(_, b)| b.kind == BodyKind::Character).collect();
    assert_eq!(characters.len(), 1);
    assert_eq!(characters[0].0, handle);

    let body = world.get(handle).unwrap();
    assert!((body.position - seat_of_dismount).length() < 1e-4);
    // The only force so far is gravity; nothing has been integrated yet
    assert_eq!(body.linear_velocity, Vec3::ZERO);
    assert_eq!(body.angular_velocity, Vec3::ZERO);
}
