//! Varyings: per-vertex data interpolated across a primitive.
//!
//! Attributes live in fixed-width slot arrays rather than a key-value map.
//! Slot lookups are plain array indexing with compile-time-known keys, so
//! the per-pixel inner loops never hash. Unused slots interpolate zeroes,
//! which costs a handful of adds per pixel and keeps the bookkeeping
//! branch-free.

use core::array;

use super::{
    vec::{Vec2, Vec3, Vec4, Vector},
    Lerp,
};

/// Number of attribute slots per component type.
pub const ATTR_SLOTS: usize = 4;

/// A fixed-width bundle of varying values: [`ATTR_SLOTS`] slots each of
/// `f32`, [`Vec2`], [`Vec3`], and [`Vec4`], addressed by integer keys.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    floats: [f32; ATTR_SLOTS],
    vec2s: [Vec2; ATTR_SLOTS],
    vec3s: [Vec3; ATTR_SLOTS],
    vec4s: [Vec4; ATTR_SLOTS],
}

impl Attributes {
    /// Returns an empty (all-zero) bundle.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the float in slot `key`.
    #[inline]
    pub fn float(&self, key: usize) -> f32 {
        self.floats[key]
    }
    /// Returns the 2-vector in slot `key`.
    #[inline]
    pub fn vec2(&self, key: usize) -> Vec2 {
        self.vec2s[key]
    }
    /// Returns the 3-vector in slot `key`.
    #[inline]
    pub fn vec3(&self, key: usize) -> Vec3 {
        self.vec3s[key]
    }
    /// Returns the 4-vector in slot `key`.
    #[inline]
    pub fn vec4(&self, key: usize) -> Vec4 {
        self.vec4s[key]
    }

    /// Stores a float in slot `key`.
    #[inline]
    pub fn set_float(&mut self, key: usize, v: f32) {
        self.floats[key] = v;
    }
    /// Stores a 2-vector in slot `key`.
    #[inline]
    pub fn set_vec2(&mut self, key: usize, v: Vec2) {
        self.vec2s[key] = v;
    }
    /// Stores a 3-vector in slot `key`.
    #[inline]
    pub fn set_vec3(&mut self, key: usize, v: Vec3) {
        self.vec3s[key] = v;
    }
    /// Stores a 4-vector in slot `key`.
    #[inline]
    pub fn set_vec4(&mut self, key: usize, v: Vec4) {
        self.vec4s[key] = v;
    }

    /// Builder-style variant of [`set_float`][Self::set_float].
    #[inline]
    pub fn with_float(mut self, key: usize, v: f32) -> Self {
        self.floats[key] = v;
        self
    }
    /// Builder-style variant of [`set_vec2`][Self::set_vec2].
    #[inline]
    pub fn with_vec2(mut self, key: usize, v: Vec2) -> Self {
        self.vec2s[key] = v;
        self
    }
    /// Builder-style variant of [`set_vec3`][Self::set_vec3].
    #[inline]
    pub fn with_vec3(mut self, key: usize, v: Vec3) -> Self {
        self.vec3s[key] = v;
        self
    }
    /// Builder-style variant of [`set_vec4`][Self::set_vec4].
    #[inline]
    pub fn with_vec4(mut self, key: usize, v: Vec4) -> Self {
        self.vec4s[key] = v;
        self
    }

    /// Returns a bundle obtained by applying `f` to every stored scalar.
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(f32) -> f32) -> Self {
        Self {
            floats: array::from_fn(|i| f(self.floats[i])),
            vec2s: array::from_fn(|i| self.vec2s[i].map(&mut f)),
            vec3s: array::from_fn(|i| self.vec3s[i].map(&mut f)),
            vec4s: array::from_fn(|i| self.vec4s[i].map(&mut f)),
        }
    }

    /// Combines `self` with `other` scalar by scalar.
    #[must_use]
    pub fn zip_map(
        &self,
        other: &Self,
        mut f: impl FnMut(f32, f32) -> f32,
    ) -> Self {
        Self {
            floats: array::from_fn(|i| f(self.floats[i], other.floats[i])),
            vec2s: array::from_fn(|i| {
                Vector(array::from_fn(|c| {
                    f(self.vec2s[i].0[c], other.vec2s[i].0[c])
                }))
            }),
            vec3s: array::from_fn(|i| {
                Vector(array::from_fn(|c| {
                    f(self.vec3s[i].0[c], other.vec3s[i].0[c])
                }))
            }),
            vec4s: array::from_fn(|i| {
                Vector(array::from_fn(|c| {
                    f(self.vec4s[i].0[c], other.vec4s[i].0[c])
                }))
            }),
        }
    }

    /// Returns every stored scalar multiplied by `s`.
    ///
    /// Used for perspective correction: multiply by `1/z` before
    /// interpolating, and by `z` again when emitting a fragment.
    #[inline]
    #[must_use]
    pub fn scale(&self, s: f32) -> Self {
        self.map(|v| v * s)
    }

    /// Returns `(other − self) · s`, the stride used to step attributes
    /// across a scanline or along a line.
    #[inline]
    #[must_use]
    pub fn diff_scaled(&self, other: &Self, s: f32) -> Self {
        self.zip_map(other, |a, b| (b - a) * s)
    }

    /// Returns `self` offset by `delta`.
    #[inline]
    #[must_use]
    pub fn step(&self, delta: &Self) -> Self {
        self.zip_map(delta, |a, d| a + d)
    }
}

impl Lerp for Attributes {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.zip_map(other, |a, b| a + (b - a) * t)
    }
}
