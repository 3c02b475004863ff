//! Physics module for the planetoid sandbox
//!
//! Small rigid-body layer sized for a handful of bodies walking and hovering
//! over spherical terrain. Built without an external physics library.
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! # Submodules
//!
//! - [`types`] - Math re-exports and convex collider shapes
//! - [`body`] - Rigid bodies with force/torque accumulation
//! - [`collision`] - Ray intersection primitives
//! - [`world`] - Body registry, terrain spheres, raycasts, stepping
//! - [`gravity`] - Nearest-attractor gravity field and up-vector resolution
//! - [`stepper`] - Fixed-step accumulator with a sub-step cap

pub mod body;
pub mod collision;
pub mod gravity;
pub mod stepper;
pub mod types;
pub mod world;

pub use body::{BodyKind, LOCAL_FORWARD, RigidBody};
pub use collision::{HitTarget, RayHit};
pub use gravity::{Attractor, CANONICAL_UP, GravityField, GravitySample, SURFACE_GRAVITY};
pub use stepper::{FixedStepper, StepConfig};
pub use types::{Collider, Quat, Vec3};
pub use world::{BodyHandle, PhysicsWorld, TerrainSphere};
