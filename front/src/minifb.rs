//! Frontend using the `minifb` crate for window creation and input.

use std::ops::ControlFlow::{self, Break};
use std::time::{Duration, Instant};

use minifb::{Key, WindowOptions};

use crate::Frame;

/// A lightweight wrapper of a `minifb` window.
pub struct Window {
    /// The wrapped minifb window.
    pub imp: minifb::Window,
    /// The width and height of the window.
    pub size: (u32, u32),
    // Scratch buffer for the RGBA8 -> 0RGB conversion minifb wants.
    present_buf: Vec<u32>,
}

/// Builder for creating [`Window`]s.
pub struct Builder<'title> {
    pub size: (u32, u32),
    pub title: &'title str,
    pub max_fps: Option<f32>,
    pub opts: WindowOptions,
}

impl Default for Builder<'_> {
    fn default() -> Self {
        Self {
            size: (800, 600),
            title: "// softrast application //",
            max_fps: Some(60.0),
            opts: WindowOptions::default(),
        }
    }
}

impl<'t> Builder<'t> {
    /// Sets the width and height of the window.
    pub fn size(mut self, w: u32, h: u32) -> Self {
        self.size = (w, h);
        self
    }
    /// Sets the title of the window.
    pub fn title(mut self, title: &'t str) -> Self {
        self.title = title;
        self
    }
    /// Sets the frame rate cap of the window. `None` means the main loop
    /// runs as fast as possible.
    pub fn max_fps(mut self, fps: Option<f32>) -> Self {
        self.max_fps = fps;
        self
    }
    /// Sets other `minifb` options.
    pub fn options(mut self, opts: WindowOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Creates the window.
    pub fn build(self) -> Window {
        let Self { size, title, max_fps, opts } = self;
        let mut imp =
            minifb::Window::new(title, size.0 as usize, size.1 as usize, opts)
                .expect("failed to create window");
        imp.set_target_fps(max_fps.map_or(0, |fps| fps as usize));
        Window {
            imp,
            size,
            present_buf: vec![0; (size.0 * size.1) as usize],
        }
    }
}

impl Window {
    /// Returns a window builder.
    pub fn builder() -> Builder<'static> {
        Builder::default()
    }

    /// Updates the window content with RGBA8 pixel data, as produced by
    /// the renderer's color buffer.
    ///
    /// # Panics
    /// If `rgba.len() < 4 * self.size.0 * self.size.1`.
    pub fn present(&mut self, rgba: &[u8]) {
        let (w, h) = self.size;
        for (dst, src) in
            self.present_buf.iter_mut().zip(rgba.chunks_exact(4))
        {
            *dst = (src[0] as u32) << 16
                | (src[1] as u32) << 8
                | src[2] as u32;
        }
        self.imp
            .update_with_buffer(&self.present_buf, w as usize, h as usize)
            .expect("failed to present frame");
    }

    /// Returns whether `key` is currently held down.
    pub fn is_key_down(&self, key: Key) -> bool {
        self.imp.is_key_down(key)
    }

    /// Returns the keys pressed since the previous frame.
    pub fn keys_pressed(&self) -> Vec<Key> {
        self.imp.get_keys_pressed(minifb::KeyRepeat::No)
    }

    /// Runs the main loop, invoking the callback on each iteration to
    /// compute and present the next frame.
    ///
    /// The loop stops when the window is closed, Esc is pressed, or the
    /// callback returns `ControlFlow::Break`.
    pub fn run<F>(&mut self, mut frame_fn: F)
    where
        F: FnMut(&mut Frame<Self>) -> ControlFlow<()>,
    {
        let start = Instant::now();
        let mut last = Instant::now();
        loop {
            if self.should_quit() {
                break;
            }
            let frame = &mut Frame {
                t: start.elapsed(),
                dt: last.elapsed(),
                win: self,
            };
            last = Instant::now();
            if let Break(_) = frame_fn(frame) {
                break;
            }
        }
    }

    fn should_quit(&self) -> bool {
        !self.imp.is_open() || self.imp.is_key_down(Key::Escape)
    }
}

impl Frame<'_, Window> {
    /// Shorthand for presenting through the wrapped window.
    pub fn present(&mut self, rgba: &[u8]) {
        self.win.present(rgba);
    }

    /// Returns the seconds elapsed since the previous frame.
    pub fn dt_secs(&self) -> f32 {
        self.dt.as_secs_f32()
    }
}
