//! Mouse Input Module
//!
//! Accumulates relative mouse motion and zoom steps between frames. Motion is
//! only recorded while the pointer is captured (pointer lock), matching how
//! the orbit camera consumes it.

use glam::Vec2;

/// Scroll wheel delta, can be line-based or pixel-based.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDelta {
    /// Vertical scroll (positive = up/forward)
    pub y: f32,
}

impl ScrollDelta {
    /// Create from line delta (common for mouse wheels).
    pub fn from_lines(y: f32) -> Self {
        Self { y }
    }

    /// Create from pixel delta (common for trackpads).
    /// Normalizes by dividing by 100 to get approximate line equivalents.
    pub fn from_pixels(y: f64) -> Self {
        Self { y: (y / 100.0) as f32 }
    }
}

/// Mouse state accumulated between two polls.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Relative motion in pixels since the last poll
    delta: Vec2,
    /// Whether the pointer is captured
    captured: bool,
    /// Fractional scroll lines not yet turned into zoom steps
    scroll_lines: f32,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record relative motion. Ignored unless the pointer is captured.
    pub fn add_motion(&mut self, dx: f32, dy: f32) {
        if self.captured {
            self.delta += Vec2::new(dx, dy);
        }
    }

    /// Capture or release the pointer. Releasing discards pending motion.
    pub fn set_captured(&mut self, captured: bool) {
        self.captured = captured;
        if !captured {
            self.delta = Vec2::ZERO;
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Handle a scroll wheel event.
    pub fn add_scroll(&mut self, delta: ScrollDelta) {
        self.scroll_lines += delta.y;
    }

    /// Take the accumulated motion, resetting it.
    pub fn take_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.delta)
    }

    /// Take whole zoom steps (positive = zoom in), keeping the remainder.
    pub fn take_zoom_steps(&mut self) -> i32 {
        let steps = self.scroll_lines.trunc();
        self.scroll_lines -= steps;
        steps as i32
    }

    /// Reset all mouse state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_ignored_without_capture() {
        let mut mouse = MouseState::new();
        mouse.add_motion(10.0, 5.0);
        assert_eq!(mouse.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_motion_accumulates_and_resets() {
        let mut mouse = MouseState::new();
        mouse.set_captured(true);
        mouse.add_motion(10.0, 5.0);
        mouse.add_motion(-4.0, 1.0);
        assert_eq!(mouse.take_delta(), Vec2::new(6.0, 6.0));
        assert_eq!(mouse.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_release_discards_motion() {
        let mut mouse = MouseState::new();
        mouse.set_captured(true);
        mouse.add_motion(10.0, 5.0);
        mouse.set_captured(false);
        assert_eq!(mouse.take_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_zoom_steps_keep_remainder() {
        let mut mouse = MouseState::new();
        mouse.add_scroll(ScrollDelta::from_pixels(250.0));
        assert_eq!(mouse.take_zoom_steps(), 2);
        mouse.add_scroll(ScrollDelta::from_lines(0.5));
        assert_eq!(mouse.take_zoom_steps(), 1);
        mouse.add_scroll(ScrollDelta::from_lines(-1.0));
        assert_eq!(mouse.take_zoom_steps(), -1);
    }
}
