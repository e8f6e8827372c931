//! Basic geometric primitives.

use crate::math::{
    vary::Attributes,
    vec::{Vec3, Vec4},
    Lerp,
};

/// A vertex: a homogeneous position plus a bundle of varying attributes.
///
/// Vertices entering the pipeline have `pos.w == 1`; the pipeline itself
/// repurposes `pos.z` and `pos.w` at various stages (view depth, reciprocal
/// depth) as a triangle travels towards the framebuffer.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec4,
    pub attrib: Attributes,
}

/// Returns a vertex with the given position and attributes.
#[inline]
pub const fn vertex(pos: Vec4, attrib: Attributes) -> Vertex {
    Vertex { pos, attrib }
}

/// Returns a vertex at a 3D position (w = 1) with the given attributes.
#[inline]
pub const fn vertex3(pos: Vec3, attrib: Attributes) -> Vertex {
    Vertex { pos: pos.to_vec4(1.0), attrib }
}

impl Vertex {
    /// Linearly interpolates position and all attributes together.
    #[inline]
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            pos: self.pos.lerp(&other.pos, t),
            attrib: self.attrib.lerp(&other.attrib, t),
        }
    }
}
