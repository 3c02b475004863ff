//! Planetoid Engine Library
//!
//! Spherical-gravity locomotion for small worlds: a character walking on the
//! curved surface of several planetoids, a hover vehicle it can climb into and
//! an orbit camera whose vertical axis follows the local surface.
//!
//! # Modules
//!
//! - [`physics`] - Rigid bodies, terrain spheres, raycasts, nearest-attractor gravity, fixed stepping
//! - [`input`] - Platform-agnostic keyboard/mouse state and per-frame control snapshots
//! - [`player`] - Surface locomotion for the character (walk, jump, disguise)
//! - [`vehicle`] - Hover suspension, uprighting and drive
//! - [`camera`] - Surface-relative orbit camera
//! - [`visual`] - Visual frames written for the renderer, placeholder model slots
//! - [`game`] - Configuration, mount/dismount coordinator, frame driver
//!
//! # Example
//!
//! ```ignore
//! use planetoid_engine::game::{Simulation, SimulationConfig};
//! use planetoid_engine::input::{InputState, KeyCode};
//!
//! let mut sim = Simulation::new(SimulationConfig::default())?;
//! let mut input = InputState::new();
//!
//! // Walk forward for one frame
//! input.keyboard.handle_key(KeyCode::W, true);
//! let report = sim.frame(1.0 / 60.0, &input.poll());
//!
//! for instance in sim.visuals().instances() {
//!     // upload to the GPU
//! }
//! ```

pub mod camera;
pub mod input;
pub mod physics;
pub mod player;
pub mod vehicle;
pub mod visual;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export commonly used input types
pub use input::{InputState, KeyCode, KeyboardState, MouseState, RawInput};
// Re-export the controllers
pub use camera::OrbitCamera;
pub use player::SurfaceLocomotion;
pub use vehicle::HoverSuspension;
// Re-export the frame driver
pub use game::{LocomotionCoordinator, Simulation, SimulationConfig};
