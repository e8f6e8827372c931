//! Programmable vertex and pixel stages, and the uniforms they read.
//!
//! The two stages are plain function values owned by the renderer. The
//! *vertex stage* may rewrite each vertex — typically projecting nothing
//! itself, but filling attribute slots and adjusting positions — while the
//! *pixel stage* computes the color of every covered pixel from the
//! interpolated attributes. Both close over nothing but their inputs:
//! uniforms and the texture store are passed in on every call.

use std::collections::HashMap;

use crate::geom::Vertex;
use crate::math::{
    color::Color4f,
    mat::Mat4,
    vary::Attributes,
    vec::{Vec2, Vec3, Vec4},
};

use super::tex::{TextureId, TextureStore};

/// A value bindable to a uniform key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Uniform {
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Texture(TextureId),
}

/// Per-draw shader inputs, keyed by small user-defined integers.
///
/// Uniforms are constant across all vertices and pixels of a draw call and
/// are meant to be mutated between draws. All getters are typed and return
/// `None` on a missing key or a type mismatch; shaders are expected to fall
/// back to a sensible default rather than fail the frame.
#[derive(Clone, Debug, Default)]
pub struct Uniforms(HashMap<u32, Uniform>);

impl Uniforms {
    /// Returns an empty uniform set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `key`, replacing any previous binding.
    pub fn set(&mut self, key: u32, value: Uniform) {
        self.0.insert(key, value);
    }

    /// Removes all bindings.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the int bound to `key`, if any.
    pub fn int(&self, key: u32) -> Option<i32> {
        match self.0.get(&key) {
            Some(&Uniform::Int(v)) => Some(v),
            _ => None,
        }
    }
    /// Returns the float bound to `key`, if any.
    pub fn float(&self, key: u32) -> Option<f32> {
        match self.0.get(&key) {
            Some(&Uniform::Float(v)) => Some(v),
            _ => None,
        }
    }
    /// Returns the 2-vector bound to `key`, if any.
    pub fn vec2(&self, key: u32) -> Option<Vec2> {
        match self.0.get(&key) {
            Some(&Uniform::Vec2(v)) => Some(v),
            _ => None,
        }
    }
    /// Returns the 3-vector bound to `key`, if any.
    pub fn vec3(&self, key: u32) -> Option<Vec3> {
        match self.0.get(&key) {
            Some(&Uniform::Vec3(v)) => Some(v),
            _ => None,
        }
    }
    /// Returns the 4-vector bound to `key`, if any.
    pub fn vec4(&self, key: u32) -> Option<Vec4> {
        match self.0.get(&key) {
            Some(&Uniform::Vec4(v)) => Some(v),
            _ => None,
        }
    }
    /// Returns the matrix bound to `key`, if any.
    pub fn mat4(&self, key: u32) -> Option<Mat4> {
        match self.0.get(&key) {
            Some(&Uniform::Mat4(v)) => Some(v),
            _ => None,
        }
    }
    /// Returns the texture id bound to `key`, if any.
    pub fn texture(&self, key: u32) -> Option<TextureId> {
        match self.0.get(&key) {
            Some(&Uniform::Texture(v)) => Some(v),
            _ => None,
        }
    }
}

/// The vertex stage: `(Vertex, Uniforms, Textures) → Vertex`.
pub type VertexStage =
    Box<dyn Fn(Vertex, &Uniforms, &TextureStore) -> Vertex>;

/// The pixel stage: `(Attributes, Uniforms, Textures) → Color`.
pub type PixelStage =
    Box<dyn Fn(&Attributes, &Uniforms, &TextureStore) -> Color4f>;

/// A vertex stage and a pixel stage, owned as a pair.
pub struct Shader {
    pub vertex_stage: VertexStage,
    pub pixel_stage: PixelStage,
}

impl Shader {
    /// Returns a shader with the given stages.
    pub fn new(
        vertex_stage: impl Fn(Vertex, &Uniforms, &TextureStore) -> Vertex
            + 'static,
        pixel_stage: impl Fn(&Attributes, &Uniforms, &TextureStore) -> Color4f
            + 'static,
    ) -> Self {
        Self {
            vertex_stage: Box::new(vertex_stage),
            pixel_stage: Box::new(pixel_stage),
        }
    }
}

impl Default for Shader {
    /// The identity vertex stage and an opaque-white pixel stage.
    fn default() -> Self {
        Self::new(|v, _, _| v, |_, _, _| Color4f::WHITE)
    }
}

#[cfg(test)]
mod tests {
    use crate::math::{rgba_f, vec3};

    use super::*;

    #[test]
    fn typed_getters() {
        let mut u = Uniforms::new();
        u.set(0, Uniform::Float(2.5));
        u.set(1, Uniform::Vec3(vec3(1.0, 2.0, 3.0)));
        u.set(2, Uniform::Texture(7));

        assert_eq!(u.float(0), Some(2.5));
        assert_eq!(u.vec3(1), Some(vec3(1.0, 2.0, 3.0)));
        assert_eq!(u.texture(2), Some(7));
        // Missing key and wrong type both come back empty.
        assert_eq!(u.float(9), None);
        assert_eq!(u.int(0), None);
    }

    #[test]
    fn rebinding_replaces() {
        let mut u = Uniforms::new();
        u.set(0, Uniform::Int(1));
        u.set(0, Uniform::Int(2));
        assert_eq!(u.int(0), Some(2));
    }

    #[test]
    fn default_shader_is_passthrough_white() {
        let shader = Shader::default();
        let store = TextureStore::new();
        let uniforms = Uniforms::new();

        let v = crate::geom::vertex3(
            vec3(1.0, 2.0, 3.0),
            Attributes::new(),
        );
        let out = (shader.vertex_stage)(v, &uniforms, &store);
        assert_eq!(out, v);

        let c = (shader.pixel_stage)(&Attributes::new(), &uniforms, &store);
        assert_eq!(c, rgba_f(1.0, 1.0, 1.0, 1.0));
    }
}
