//! Trapezoid decomposition and scanline generation.
//!
//! The scanline backend splits each triangle into at most two trapezoids
//! with horizontal bases, then walks them row by row:
//!
//! ```text
//!                 X  <-- v0
//!               ****
//!             ********                 upper trapezoid
//!           ************
//! v1 -->  X*****************X  <-- split point on the long edge
//!            ***************
//!               ***********            lower trapezoid
//!                  *******
//!                     ***
//!                       X  <-- v2
//! ```
//!
//! Each [`Scanline`] carries an interpolated left vertex and a per-pixel
//! step, so walking a row is nothing but repeated addition.

use crate::geom::Vertex;

/// One non-horizontal side of a trapezoid, from `v1` down to `v2`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub v1: Vertex,
    pub v2: Vertex,
}

/// A triangle sub-region bounded by two horizontal scanlines and two
/// edges. Both edges span the full `top..bottom` range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trapezoid {
    pub top: f32,
    pub bottom: f32,
    pub left: Edge,
    pub right: Edge,
}

impl Trapezoid {
    /// Decomposes a triangle into 0, 1, or 2 trapezoids.
    ///
    /// Returns no trapezoid for degenerate input (all three vertices
    /// sharing an x or a y coordinate), one for a flat-top or flat-bottom
    /// triangle, and two otherwise.
    pub fn from_triangle(
        mut verts: [Vertex; 3],
    ) -> (Option<Trapezoid>, Option<Trapezoid>) {
        verts.sort_by(|a, b| a.pos.y().total_cmp(&b.pos.y()));
        let [v0, v1, v2] = verts;

        let all_x = v0.pos.x() == v1.pos.x() && v0.pos.x() == v2.pos.x();
        let all_y = v0.pos.y() == v1.pos.y() && v0.pos.y() == v2.pos.y();
        if all_x || all_y {
            return (None, None);
        }

        // Flat top: one trapezoid from the shared top edge to v2.
        if v0.pos.y() == v1.pos.y() {
            let (l, r) = if v0.pos.x() < v1.pos.x() {
                (v0, v1)
            } else {
                (v1, v0)
            };
            let trap = Trapezoid {
                top: v0.pos.y(),
                bottom: v2.pos.y(),
                left: Edge { v1: l, v2 },
                right: Edge { v1: r, v2 },
            };
            return (Some(trap), None);
        }

        // Flat bottom: one trapezoid from v0 to the shared bottom edge.
        if v1.pos.y() == v2.pos.y() {
            let (l, r) = if v1.pos.x() < v2.pos.x() {
                (v1, v2)
            } else {
                (v2, v1)
            };
            let trap = Trapezoid {
                top: v0.pos.y(),
                bottom: v2.pos.y(),
                left: Edge { v1: v0, v2: l },
                right: Edge { v1: v0, v2: r },
            };
            return (Some(trap), None);
        }

        // General case: split at v1's height. The long edge v0-v2 crosses
        // that scanline at x*; whichever side v1 falls on decides the
        // left/right assignment of the two trapezoids.
        let t = (v1.pos.y() - v0.pos.y()) / (v2.pos.y() - v0.pos.y());
        let x_split = v0.pos.x() + t * (v2.pos.x() - v0.pos.x());

        if x_split > v1.pos.x() {
            // v1 on the left
            let upper = Trapezoid {
                top: v0.pos.y(),
                bottom: v1.pos.y(),
                left: Edge { v1: v0, v2: v1 },
                right: Edge { v1: v0, v2 },
            };
            let lower = Trapezoid {
                top: v1.pos.y(),
                bottom: v2.pos.y(),
                left: Edge { v1, v2 },
                right: Edge { v1: v0, v2 },
            };
            (Some(upper), Some(lower))
        } else {
            // v1 on the right
            let upper = Trapezoid {
                top: v0.pos.y(),
                bottom: v1.pos.y(),
                left: Edge { v1: v0, v2 },
                right: Edge { v1: v0, v2: v1 },
            };
            let lower = Trapezoid {
                top: v1.pos.y(),
                bottom: v2.pos.y(),
                left: Edge { v1: v0, v2 },
                right: Edge { v1, v2 },
            };
            (Some(upper), Some(lower))
        }
    }
}

/// A single row of a trapezoid: a starting vertex, a per-pixel step, and
/// the number of pixels left to cover.
#[derive(Clone, Debug)]
pub struct Scanline {
    pub vertex: Vertex,
    pub step: Vertex,
    pub y: i32,
    pub width: f32,
}

impl Scanline {
    /// Interpolates both edges of `trap` at row `y`, producing the left
    /// endpoint vertex, the per-pixel stride towards the right endpoint,
    /// and the width `right.x − left.x`.
    pub fn from_trapezoid(trap: &Trapezoid, y: f32) -> Scanline {
        let t_l = (y - trap.left.v1.pos.y())
            / (trap.left.v2.pos.y() - trap.left.v1.pos.y());
        let t_r = (y - trap.right.v1.pos.y())
            / (trap.right.v2.pos.y() - trap.right.v1.pos.y());

        let left = trap.left.v1.lerp(&trap.left.v2, t_l);
        let right = trap.right.v1.lerp(&trap.right.v2, t_r);

        let width = right.pos.x() - left.pos.x();
        let inv_w = 1.0 / width;
        let step = Vertex {
            pos: (right.pos - left.pos) * inv_w,
            attrib: left.attrib.diff_scaled(&right.attrib, inv_w),
        };

        Scanline { vertex: left, step, y: y as i32, width }
    }
}

#[cfg(test)]
mod tests {
    use crate::geom::vertex3;
    use crate::math::{vary::Attributes, vec3};

    use super::*;

    fn vtx(x: f32, y: f32) -> Vertex {
        vertex3(vec3(x, y, -1.0), Attributes::new())
    }

    #[test]
    fn degenerate_triangles_produce_nothing() {
        // All sharing x
        let t = Trapezoid::from_triangle([
            vtx(1.0, 0.0),
            vtx(1.0, 2.0),
            vtx(1.0, 5.0),
        ]);
        assert_eq!(t, (None, None));
        // All sharing y
        let t = Trapezoid::from_triangle([
            vtx(0.0, 3.0),
            vtx(2.0, 3.0),
            vtx(5.0, 3.0),
        ]);
        assert_eq!(t, (None, None));
    }

    #[test]
    fn flat_top_is_single_trapezoid() {
        let (t1, t2) = Trapezoid::from_triangle([
            vtx(4.0, 0.0),
            vtx(0.0, 0.0),
            vtx(2.0, 4.0),
        ]);
        let t1 = t1.unwrap();
        assert!(t2.is_none());
        assert_eq!(t1.top, 0.0);
        assert_eq!(t1.bottom, 4.0);
        assert_eq!(t1.left.v1.pos.x(), 0.0);
        assert_eq!(t1.right.v1.pos.x(), 4.0);
    }

    #[test]
    fn flat_bottom_is_single_trapezoid() {
        let (t1, t2) = Trapezoid::from_triangle([
            vtx(2.0, 0.0),
            vtx(4.0, 4.0),
            vtx(0.0, 4.0),
        ]);
        let t1 = t1.unwrap();
        assert!(t2.is_none());
        assert_eq!(t1.top, 0.0);
        assert_eq!(t1.bottom, 4.0);
        // Both edges start at the apex and end at the ordered base.
        assert_eq!(t1.left.v1.pos.x(), 2.0);
        assert_eq!(t1.left.v2.pos.x(), 0.0);
        assert_eq!(t1.right.v2.pos.x(), 4.0);
    }

    #[test]
    fn general_triangle_splits_at_middle_vertex() {
        let (t1, t2) = Trapezoid::from_triangle([
            vtx(2.0, 0.0),
            vtx(0.0, 2.0),
            vtx(4.0, 6.0),
        ]);
        let (upper, lower) = (t1.unwrap(), t2.unwrap());

        assert_eq!(upper.top, 0.0);
        assert_eq!(upper.bottom, 2.0);
        assert_eq!(lower.top, 2.0);
        assert_eq!(lower.bottom, 6.0);

        // The split vertex (0, 2) lies left of the long edge, so the
        // upper-left and lower-left edges meet there.
        assert_eq!(upper.left.v2.pos.x(), 0.0);
        assert_eq!(lower.left.v1.pos.x(), 0.0);
        // The long edge is shared on the right of both halves.
        assert_eq!(upper.right, lower.right);
    }

    #[test]
    fn halves_partition_the_y_range() {
        let (t1, t2) = Trapezoid::from_triangle([
            vtx(0.0, 1.0),
            vtx(5.0, 3.5),
            vtx(2.0, 7.0),
        ]);
        let (upper, lower) = (t1.unwrap(), t2.unwrap());
        assert_eq!(upper.top, 1.0);
        assert_eq!(upper.bottom, lower.top);
        assert_eq!(lower.bottom, 7.0);
    }

    #[test]
    fn scanline_endpoints_and_width() {
        let (t1, _) = Trapezoid::from_triangle([
            vtx(0.0, 0.0),
            vtx(4.0, 0.0),
            vtx(2.0, 4.0),
        ]);
        let trap = t1.unwrap();

        // Halfway down, the triangle spans x in [1, 3].
        let sl = Scanline::from_trapezoid(&trap, 2.0);
        assert_eq!(sl.y, 2);
        crate::assert_approx_eq!(sl.vertex.pos.x(), 1.0);
        crate::assert_approx_eq!(sl.width, 2.0);
        // left.x + width reaches the right edge
        crate::assert_approx_eq!(sl.vertex.pos.x() + sl.width, 3.0);
    }

    #[test]
    fn scanline_step_spans_the_row() {
        let a = vertex3(vec3(0.0, 0.0, -1.0),
                        Attributes::new().with_float(0, 0.0));
        let b = vertex3(vec3(4.0, 0.0, -1.0),
                        Attributes::new().with_float(0, 8.0));
        let c = vertex3(vec3(0.0, 4.0, -1.0),
                        Attributes::new().with_float(0, 0.0));
        let (t1, _) = Trapezoid::from_triangle([a, b, c]);
        let sl = Scanline::from_trapezoid(&t1.unwrap(), 0.0);

        // Stepping `width` times lands on the right edge, attribute
        // included.
        let mut v = sl.vertex;
        let n = sl.width as i32;
        for _ in 0..n {
            v.pos += sl.step.pos;
            v.attrib = v.attrib.step(&sl.step.attrib);
        }
        crate::assert_approx_eq!(v.pos.x(), 4.0);
        crate::assert_approx_eq!(v.attrib.float(0), 8.0, eps = 1e-4);
    }
}
