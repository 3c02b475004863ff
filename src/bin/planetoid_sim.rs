//! Planetoid Sim - Headless Locomotion Run
//!
//! Run with: `cargo run --bin planetoid-sim [config.json]`
//!
//! Plays a scripted session without a window: walk over to the crashed hover
//! vehicle, climb in, drive, climb out, put on the disguise and jump. Set
//! `RUST_LOG=debug` to see jumps, form changes and config loading.
//!
//! Scripted keys:
//! - D: Strafe toward the vehicle
//! - E: Mount / dismount
//! - W: Drive forward
//! - Q: Toggle disguise
//! - Space: Jump

use planetoid_engine::game::{ConfigError, MountState, Simulation, SimulationConfig};
use planetoid_engine::input::{InputState, KeyCode};

const FRAME_DT: f32 = 1.0 / 60.0;

/// Press and release a key over two frames.
fn tap(sim: &mut Simulation, input: &mut InputState, key: KeyCode) {
    input.keyboard.handle_key(key, true);
    sim.frame(FRAME_DT, &input.poll());
    input.keyboard.handle_key(key, false);
    sim.frame(FRAME_DT, &input.poll());
}

/// Run `frames` frames with the current input held.
fn hold(sim: &mut Simulation, input: &mut InputState, frames: u32) {
    for _ in 0..frames {
        sim.frame(FRAME_DT, &input.poll());
    }
}

fn report(sim: &Simulation, phase: &str) {
    let position = sim.player_position();
    let altitude = sim
        .field()
        .nearest(position)
        .map(|(_, attractor)| attractor.height_above_surface(position))
        .unwrap_or(f32::NAN);
    println!(
        "[{:>6.2}s] {:<10} {:?} at ({:.2}, {:.2}, {:.2}), altitude {:.2}m, form {:?}",
        sim.simulated_time(),
        phase,
        sim.mount_state(),
        position.x,
        position.y,
        position.z,
        altitude,
        sim.coordinator().locomotion().form(),
    );
}

fn main() -> Result<(), ConfigError> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let mount_radius = config.mount.mount_radius;

    let mut sim = Simulation::new(config)?;
    let mut input = InputState::new();
    input.mouse.set_captured(true);

    hold(&mut sim, &mut input, 60);
    report(&sim, "settled");

    // Strafe right until the vehicle is in reach
    input.keyboard.handle_key(KeyCode::D, true);
    for _ in 0..600 {
        let vehicle = sim.world().get(sim.coordinator().vehicle_handle()).map(|body| body.position);
        if vehicle.is_some_and(|v| v.distance(sim.player_position()) < mount_radius * 0.75) {
            break;
        }
        sim.frame(FRAME_DT, &input.poll());
    }
    input.keyboard.handle_key(KeyCode::D, false);
    report(&sim, "arrived");

    tap(&mut sim, &mut input, KeyCode::E);
    report(&sim, "mount");
    if sim.mount_state() != MountState::Piloting {
        log::warn!("Could not reach the vehicle, skipping the drive");
    }

    input.keyboard.handle_key(KeyCode::W, true);
    hold(&mut sim, &mut input, 180);
    input.keyboard.handle_key(KeyCode::W, false);
    report(&sim, "drive");

    // Let the vehicle coast down before climbing out
    hold(&mut sim, &mut input, 120);
    if sim.mount_state() == MountState::Piloting {
        tap(&mut sim, &mut input, KeyCode::E);
    }
    report(&sim, "dismount");

    tap(&mut sim, &mut input, KeyCode::Q);
    hold(&mut sim, &mut input, 30);
    input.keyboard.handle_key(KeyCode::Space, true);
    hold(&mut sim, &mut input, 1);
    input.keyboard.handle_key(KeyCode::Space, false);
    hold(&mut sim, &mut input, 15);
    report(&sim, "jump");

    hold(&mut sim, &mut input, 120);
    report(&sim, "landed");

    println!(
        "{} frames, {:.2}s simulated, {} bodies",
        sim.frame_count(),
        sim.simulated_time(),
        sim.world().len()
    );
    Ok(())
}
