//! Vehicle Module
//!
//! Hover vehicle suspension, uprighting and drive.

pub mod hover;

pub use hover::{
    DriveInput, HoverConfig, HoverReport, HoverSuspension, SUSPENSION_POINTS, SuspensionSample,
};
