use cgmath::Matrix4;

// -----------------------------------------------------------------------------
// Logical design space: screens lay out in a fixed 800x600 world, origin at the
// top-left. The window letterboxes it.
// -----------------------------------------------------------------------------
#[inline(always)]
pub const fn design_width() -> f32 {
    800.0
}
#[inline(always)]
pub const fn design_height() -> f32 {
    600.0
}

// -----------------------------------------------------------------------------
// StepMania-style globals (design space, origin at top-left)
// Usage:
//   use crate::core::space::globals::*;
//   let w = screen_width();
// -----------------------------------------------------------------------------
#[allow(dead_code)]
pub mod globals {
    use super::{design_height, design_width};

    #[inline(always)]
    pub fn screen_width() -> f32 {
        design_width()
    }
    #[inline(always)]
    pub fn screen_height() -> f32 {
        design_height()
    }
    #[inline(always)]
    pub fn screen_left() -> f32 {
        0.0
    }
    #[inline(always)]
    pub fn screen_top() -> f32 {
        0.0
    }
    #[inline(always)]
    pub fn screen_right() -> f32 {
        screen_width()
    }
    #[inline(always)]
    pub fn screen_bottom() -> f32 {
        screen_height()
    }
    #[inline(always)]
    pub fn screen_center_x() -> f32 {
        0.5 * screen_width()
    }
    #[inline(always)]
    pub fn screen_center_y() -> f32 {
        0.5 * screen_height()
    }
}

pub use globals::*;

/// Projection for the design space. The letterbox lives in the viewport, so
/// this never changes with the window.
#[inline(always)]
pub fn ortho_projection() -> Matrix4<f32> {
    cgmath::ortho(0.0, design_width(), design_height(), 0.0, -1.0, 1.0)
}

/// Largest 4:3 rect centered in the window, in physical pixels
/// (`x, y, width, height`).
pub fn viewport_for_window(px_w: u32, px_h: u32) -> (i32, i32, u32, u32) {
    if px_w == 0 || px_h == 0 {
        return (0, 0, px_w, px_h);
    }
    let scale = (px_w as f32 / design_width()).min(px_h as f32 / design_height());
    let vw = (design_width() * scale).round() as u32;
    let vh = (design_height() * scale).round() as u32;
    let x = ((px_w - vw) / 2) as i32;
    let y = ((px_h - vh) / 2) as i32;
    (x, y, vw, vh)
}

/// Maps a window-space position (physical pixels, origin top-left) into the
/// design space. Returns `None` inside the letterbox bars.
pub fn window_to_design(px: f32, py: f32, win_w: u32, win_h: u32) -> Option<(f32, f32)> {
    let (vx, vy, vw, vh) = viewport_for_window(win_w, win_h);
    if vw == 0 || vh == 0 {
        return None;
    }
    let local_x = px - vx as f32;
    let local_y = py - vy as f32;
    if local_x < 0.0 || local_y < 0.0 || local_x > vw as f32 || local_y > vh as f32 {
        return None;
    }
    Some((
        local_x / vw as f32 * design_width(),
        local_y / vh as f32 * design_height(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fills_a_native_window() {
        assert_eq!(viewport_for_window(800, 600), (0, 0, 800, 600));
    }

    #[test]
    fn viewport_pillarboxes_a_wide_window() {
        assert_eq!(viewport_for_window(1600, 600), (400, 0, 800, 600));
    }

    #[test]
    fn viewport_letterboxes_a_tall_window() {
        assert_eq!(viewport_for_window(800, 1200), (0, 300, 800, 600));
    }

    #[test]
    fn window_to_design_round_trips_at_native_size() {
        let (x, y) = window_to_design(400.0, 300.0, 800, 600).unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn window_to_design_rejects_letterbox_bars() {
        // 1600x600 window pillarboxes; x=100 is inside the left bar.
        assert!(window_to_design(100.0, 300.0, 1600, 600).is_none());
        // Center of the same window maps to the design center.
        let (x, y) = window_to_design(800.0, 300.0, 1600, 600).unwrap();
        assert!((x - 400.0).abs() < 1.0);
        assert!((y - 300.0).abs() < 1.0);
    }

    #[test]
    fn window_to_design_scales_a_double_size_window() {
        let (x, y) = window_to_design(800.0, 600.0, 1600, 1200).unwrap();
        assert!((x - 400.0).abs() < 1.0);
        assert!((y - 300.0).abs() < 1.0);
    }
}
