//! Fixed-step accumulator
//!
//! Converts variable frame time into a bounded number of fixed physics steps.
//! Time beyond the sub-step cap is dropped, so a long hitch slows the
//! simulation down instead of making it spiral.

use serde::{Deserialize, Serialize};

/// Default physics step (60 Hz).
pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

/// Default cap on sub-steps per frame.
pub const DEFAULT_MAX_SUBSTEPS: u32 = 3;

/// Stepper settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Fixed step size in seconds
    pub fixed_dt: f32,
    /// Maximum sub-steps per frame
    pub max_substeps: u32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedStepper {
    fixed_dt: f32,
    max_substeps: u32,
    accumulator: f32,
    dropped: f32,
}

impl FixedStepper {
    pub fn new(fixed_dt: f32, max_substeps: u32) -> Self {
        Self {
            fixed_dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            dropped: 0.0,
        }
    }

    pub fn from_config(config: &StepConfig) -> Self {
        Self::new(config.fixed_dt, config.max_substeps)
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    pub fn max_substeps(&self) -> u32 {
        self.max_substeps
    }

    /// Leftover time carried into the next frame.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Total simulated time thrown away because of the sub-step cap.
    pub fn dropped_time(&self) -> f32 {
        self.dropped
    }

    /// Add `elapsed` seconds and return how many fixed steps to run now.
    pub fn consume(&mut self, elapsed: f32) -> u32 {
        if self.fixed_dt <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed.max(0.0);

        // Tolerance keeps exact multiples like 1/60 from losing a step to rounding
        let available = ((self.accumulator + 1e-6) / self.fixed_dt).floor() as u32;
        let steps = available.min(self.max_substeps);
        self.accumulator = (self.accumulator - steps as f32 * self.fixed_dt).max(0.0);

        if available > self.max_substeps {
            let excess = self.accumulator;
            self.dropped += excess;
            self.accumulator = 0.0;
            log::warn!(
                "Physics fell behind: dropped {:.3}s beyond {} sub-steps",
                excess,
                self.max_substeps
            );
        }

        steps
    }
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::from_config(&StepConfig::default())
    }
}
