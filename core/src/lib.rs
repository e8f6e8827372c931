//! `softrast` is a software 3D renderer: a CPU-driven graphics pipeline
//! that turns triangle lists into a color image and a depth image, with no
//! GPU involved at any point.
//!
//! The pipeline is programmable in the spirit of a hardware API: a *vertex
//! stage* may rewrite each vertex and its attributes, and a *pixel stage*
//! computes the color of every covered pixel from perspective-correctly
//! interpolated attributes. Two fill strategies are provided, selected by
//! [`render::Backend`]: a trapezoid/scanline rasterizer and an
//! AABB/barycentric rasterizer. A wireframe mode draws clipped Bresenham
//! edges instead of filling.

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

/// Re-exports of the most commonly used items.
pub mod prelude {
    pub use crate::geom::{vertex, Vertex};
    pub use crate::math::{
        degs, rads, rgba, rgba_f, vec2, vec3, vec4, Angle, Color4, Color4f,
        Lerp, Mat4, Vec2, Vec3, Vec4,
    };
    pub use crate::math::vary::Attributes;
    pub use crate::render::{
        Backend, Camera, Cull, FrontFace, Renderer, Shader, TextureStore,
        Uniform, Uniforms, Viewport,
    };
}
