//! Input Module
//!
//! Platform-agnostic input handling for keyboard and mouse, polled once per
//! frame. Decoupled from any windowing system.
//!
//! # Example
//!
//! ```rust,ignore
//! use planetoid_engine::input::{InputState, KeyCode};
//!
//! let mut input = InputState::new();
//! input.keyboard.handle_key(KeyCode::W, true);
//! input.mouse.set_captured(true);
//! input.mouse.add_motion(12.0, -3.0);
//!
//! // Once per frame
//! let raw = input.poll();
//! ```

pub mod controls;
pub mod keyboard;
pub mod mouse;

pub use controls::{ControlLatches, ControlState, EdgeLatch, RawInput};
pub use keyboard::{KeyCode, KeyboardState, MovementKeys};
pub use mouse::{MouseState, ScrollDelta};

/// Combined input state for both keyboard and mouse.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
}

impl InputState {
    /// Create a new input state with all inputs in their default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current input and drain per-frame accumulators.
    pub fn poll(&mut self) -> RawInput {
        RawInput {
            movement: self.keyboard.movement,
            interact: self.keyboard.interact,
            disguise: self.keyboard.disguise,
            mouse_delta: self.mouse.take_delta(),
            pointer_captured: self.mouse.is_captured(),
            zoom_steps: self.mouse.take_zoom_steps(),
        }
    }

    /// Reset all input state to defaults.
    pub fn reset(&mut self) {
        self.keyboard.reset();
        self.mouse.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_drains_mouse() {
        let mut input = InputState::new();
        input.keyboard.handle_key(KeyCode::W, true);
        input.mouse.set_captured(true);
        input.mouse.add_motion(3.0, 4.0);

        let raw = input.poll();
        assert!(raw.movement.forward);
        assert!(raw.pointer_captured);
        assert_eq!(raw.mouse_delta, glam::Vec2::new(3.0, 4.0));

        let raw = input.poll();
        assert_eq!(raw.mouse_delta, glam::Vec2::ZERO);
        assert!(raw.movement.forward, "held keys survive polling");
    }
}
