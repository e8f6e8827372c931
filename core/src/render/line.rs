//! The 2D line engine: Cohen–Sutherland clipping and Bresenham stepping.
//!
//! Used by the wireframe mode to draw triangle edges, with the shaded
//! line rasterization itself living next to the fill backends.

use crate::geom::Vertex;
use crate::math::vec::Vec2;

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

/// Returns the 4-bit region mask of `p` relative to the rectangle
/// `min..=max`.
fn outcode(p: Vec2, min: Vec2, max: Vec2) -> u8 {
    let x = if p.x() < min.x() {
        LEFT
    } else if p.x() > max.x() {
        RIGHT
    } else {
        INSIDE
    };
    let y = if p.y() < min.y() {
        BOTTOM
    } else if p.y() > max.y() {
        TOP
    } else {
        INSIDE
    };
    x | y
}

/// Clips the segment `p1`–`p2` against the rectangle `min..=max` using
/// Cohen–Sutherland.
///
/// Returns `None` iff both endpoints share an outside region; otherwise
/// the fully inside segment. Each iteration clears at least one outside
/// bit, so the loop runs at most four times.
pub fn clip_line(
    p1: Vec2,
    p2: Vec2,
    min: Vec2,
    max: Vec2,
) -> Option<(Vec2, Vec2)> {
    let (mut p1, mut p2) = (p1, p2);
    let mut oc1 = outcode(p1, min, max);
    let mut oc2 = outcode(p2, min, max);

    loop {
        if oc1 & oc2 != 0 {
            // Both endpoints outside the same edge
            return None;
        }
        if oc1 | oc2 == 0 {
            return Some((p1, p2));
        }

        // Refine the endpoint with the larger outcode against the violated
        // edge, in priority order TOP, BOTTOM, RIGHT, LEFT.
        let oc = oc1.max(oc2);
        let p = if oc & TOP != 0 {
            Vec2::new([
                p1.x() + (p2.x() - p1.x()) * (max.y() - p1.y())
                    / (p2.y() - p1.y()),
                max.y(),
            ])
        } else if oc & BOTTOM != 0 {
            Vec2::new([
                p1.x() + (p2.x() - p1.x()) * (min.y() - p1.y())
                    / (p2.y() - p1.y()),
                min.y(),
            ])
        } else if oc & RIGHT != 0 {
            Vec2::new([
                max.x(),
                p1.y() + (p2.y() - p1.y()) * (max.x() - p1.x())
                    / (p2.x() - p1.x()),
            ])
        } else {
            Vec2::new([
                min.x(),
                p1.y() + (p2.y() - p1.y()) * (min.x() - p1.x())
                    / (p2.x() - p1.x()),
            ])
        };

        if oc == oc1 {
            p1 = p;
            oc1 = outcode(p1, min, max);
        } else {
            p2 = p;
            oc2 = outcode(p2, min, max);
        }
    }
}

/// Integer line stepping along the major axis.
///
/// Construction clips the segment to the given rectangle first. The
/// iterator emits each point *before* advancing and finishes when the
/// major-axis coordinate reaches the endpoint's, so the final endpoint
/// itself is not emitted.
pub struct Bresenham {
    x: i32,
    y: i32,
    final_x: i32,
    e: i32,
    step: i32,
    desc: i32,
    sx: i32,
    sy: i32,
    steep: bool,
}

impl Bresenham {
    /// Returns an iterator over the clipped segment `p0`–`p1`, or `None`
    /// if the segment lies entirely outside `min..=max`.
    pub fn new(p0: Vec2, p1: Vec2, min: Vec2, max: Vec2) -> Option<Self> {
        let (v0, v1) = clip_line(p0, p1, min, max)?;

        let (x0, y0) = (v0.x() as i32, v0.y() as i32);
        let (x1, y1) = (v1.x() as i32, v1.y() as i32);

        let mut dx = (x1 - x0).abs();
        let mut dy = (y1 - y0).abs();
        let mut sx = if x1 > x0 { 1 } else { -1 };
        let mut sy = if y1 > y0 { 1 } else { -1 };
        let mut x = x0;
        let mut y = y0;
        let steep = dx < dy;

        let final_x = if steep { y1 } else { x1 };
        if steep {
            core::mem::swap(&mut dx, &mut dy);
            core::mem::swap(&mut x, &mut y);
            core::mem::swap(&mut sx, &mut sy);
        }

        Some(Self {
            x,
            y,
            final_x,
            e: -dx,
            step: 2 * dy,
            desc: -2 * dx,
            sx,
            sy,
            steep,
        })
    }

    /// Returns whether the endpoint has been reached.
    #[inline]
    pub fn finished(&self) -> bool {
        self.x == self.final_x
    }

    /// Emits the current point and advances, or returns `None` when
    /// finished. Points are in the original (un-swapped) orientation.
    pub fn step(&mut self) -> Option<(i32, i32)> {
        if self.finished() {
            return None;
        }
        let out = if self.steep {
            (self.y, self.x)
        } else {
            (self.x, self.y)
        };
        self.e += self.step;
        if self.e >= 0 {
            self.y += self.sy;
            self.e += self.desc;
        }
        self.x += self.sx;
        Some(out)
    }
}

/// A screen-space line between two shaded vertices, with the per-pixel
/// stride precomputed.
///
/// `step` advances position and attributes by one major-axis pixel:
/// `(end − start) / max(|dx|, |dy|)`.
pub struct Line {
    pub start: Vertex,
    pub end: Vertex,
    pub step: Vertex,
}

impl Line {
    /// Returns a line from `start` to `end`.
    pub fn new(start: Vertex, end: Vertex) -> Self {
        let dx = (end.pos.x() - start.pos.x()).abs();
        let dy = (end.pos.y() - start.pos.y()).abs();
        let t = 1.0 / dx.max(dy);
        let step = Vertex {
            pos: (end.pos - start.pos) * t,
            attrib: start.attrib.diff_scaled(&end.attrib, t),
        };
        Self { start, end, step }
    }
}
