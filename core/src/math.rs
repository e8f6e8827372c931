//! Vectors, matrices, angles, colors, and interpolation support.
//!
//! The types here are deliberately concrete: the whole pipeline works in
//! `f32`, and the dimensions that occur (2, 3, 4) are fixed at the type
//! level by const generics. [`vary`] holds the fixed-slot attribute bundle
//! that is interpolated across primitives.

pub use {
    angle::{degs, rads, Angle},
    approx::ApproxEq,
    color::{rgba, rgba_f, Color4, Color4f},
    mat::{
        perspective, rotate_euler, rotate_x, rotate_y, rotate_z, scale,
        scale3, translate, translate3, Mat2, Mat3, Mat4, Matrix,
    },
    vec::{
        barycentric, is_barycentric_valid, splat, vec2, vec3, vec4, Vec2,
        Vec3, Vec4, Vector,
    },
};

pub mod angle;
pub mod approx;
pub mod color;
pub mod mat;
pub mod vary;
pub mod vec;

/// Trait for linear interpolation between two values.
///
/// If `t` = 0 the result equals `self`; if `t` = 1 it equals `other`.
/// Out-of-range and non-finite `t` values do not panic but the result is
/// unspecified.
pub trait Lerp {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + t * (other - self)
    }
}
