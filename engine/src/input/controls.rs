//! Per-frame control state
//!
//! Raw input is polled once per frame into a [`RawInput`] snapshot. The
//! component that owns the edge latches turns it into a [`ControlState`]:
//! held keys stay level-triggered, action keys fire once per press.

use glam::Vec2;

use super::keyboard::MovementKeys;

/// Everything the core reads from the input source in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawInput {
    pub movement: MovementKeys,
    /// Interact key currently held
    pub interact: bool,
    /// Disguise key currently held
    pub disguise: bool,
    /// Relative mouse motion in pixels since the last frame
    pub mouse_delta: Vec2,
    /// Pointer lock active
    pub pointer_captured: bool,
    /// Whole zoom steps this frame (positive = zoom in)
    pub zoom_steps: i32,
}

/// Rising-edge detector for a held button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeLatch {
    was_pressed: bool,
}

impl EdgeLatch {
    /// Returns true only on the frame the button goes down.
    pub fn rising(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}

/// Latches for the edge-triggered actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlLatches {
    pub interact: EdgeLatch,
    pub disguise: EdgeLatch,
}

/// Derived per-frame controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlState {
    /// Camera-relative intent: x = right, y = forward. Not normalized.
    pub move_intent: Vec2,
    pub jump_requested: bool,
    /// Fires once per interact press
    pub interact_requested: bool,
    /// Fires once per disguise press
    pub disguise_requested: bool,
    /// Held keys, kept for the vehicle's drive controls
    pub movement: MovementKeys,
}

impl ControlState {
    /// Build this frame's controls, updating the latches.
    pub fn build(raw: &RawInput, latches: &mut ControlLatches) -> Self {
        let keys = raw.movement;
        Self {
            move_intent: Vec2::new(keys.right_axis() as f32, keys.forward_axis() as f32),
            jump_requested: keys.jump,
            interact_requested: latches.interact.rising(raw.interact),
            disguise_requested: latches.disguise.rising(raw.disguise),
            movement: keys,
        }
    }

    pub fn has_move_intent(&self) -> bool {
        self.move_intent != Vec2::ZERO
    }
}
