//! Window front-end for `softrast` applications.
//!
//! The core renderer owns its framebuffer and knows nothing about
//! windows; this crate puts its RGBA8 output on screen and feeds input
//! back to the application.

use std::time::Duration;

pub mod minifb;

/// Per-frame state passed to the main-loop callback.
pub struct Frame<'a, Win> {
    /// Elapsed time since the start of the first frame.
    pub t: Duration,
    /// Elapsed time since the start of the previous frame.
    pub dt: Duration,
    /// Reference to the window object.
    pub win: &'a mut Win,
}
