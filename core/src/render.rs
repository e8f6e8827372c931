//! The rendering pipeline: from triangle lists to framebuffer writes.
//!
//! [`Renderer`] owns the color and depth attachments, the camera, the
//! shader, and the per-draw state, and drives each triangle through the
//! transform / cull / clip / project / rasterize sequence. Two fill
//! backends are available, selected by [`Backend`]: trapezoid/scanline
//! and AABB/barycentric. Wireframe mode replaces filling with clipped,
//! shaded Bresenham edges.

use core::mem;

use crate::geom::Vertex;
use crate::math::{
    barycentric, is_barycentric_valid,
    mat::Mat4,
    vec::{vec2, Vec3},
    Color4, Color4f,
};
use crate::util::rect::Rect;

pub use {
    cam::{Camera, Frustum},
    clip::clip_near,
    ctx::{depth_test, Context, Cull, FrontFace, Viewport},
    line::{clip_line, Bresenham, Line},
    raster::{Edge, Scanline, Trapezoid},
    shader::{PixelStage, Shader, Uniform, Uniforms, VertexStage},
    stats::{Stats, Throughput},
    target::{ColorAttachment, DepthAttachment},
    tex::{sample, Texture, TextureId, TextureStore},
};

pub mod cam;
pub mod clip;
pub mod ctx;
pub mod line;
pub mod raster;
pub mod shader;
pub mod stats;
pub mod target;
pub mod tex;

/// Selects how triangle interiors are filled.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Backend {
    /// Decompose into trapezoids and walk scanlines.
    #[default]
    Scanline,
    /// Test every pixel center in the bounding box by barycentrics.
    Aabb,
}

/// The outcome of pushing one triangle through the pipeline.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RasterizeResult {
    /// The triangle was rasterized (possibly covering zero pixels).
    Ok,
    /// The triangle was culled, outside the frustum, or degenerate.
    Discard,
    /// The triangle straddled the near plane and was split; the pieces
    /// are queued for one round of re-entry.
    NewFaces,
}

/// A software rasterizer with exclusive ownership of its color and depth
/// attachments.
pub struct Renderer {
    color: ColorAttachment,
    depth: DepthAttachment,
    viewport: Viewport,
    camera: Camera,
    shader: Shader,
    uniforms: Uniforms,
    ctx: Context,
    backend: Backend,
    pending: Vec<[Vertex; 3]>,
    stats: Stats,
}

impl Renderer {
    /// Returns a renderer with `w` × `h` attachments and the scanline
    /// backend. The viewport covers the full framebuffer.
    pub fn new(w: u32, h: u32, camera: Camera) -> Self {
        Self {
            color: ColorAttachment::new(w, h),
            depth: DepthAttachment::new(w, h),
            viewport: Viewport::new(0, 0, w, h),
            camera,
            shader: Shader::default(),
            uniforms: Uniforms::new(),
            ctx: Context::default(),
            backend: Backend::default(),
            pending: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Returns `self` with the given fill backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Returns the width of the framebuffer in pixels.
    pub fn width(&self) -> u32 {
        self.color.width()
    }
    /// Returns the height of the framebuffer in pixels.
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Fills the color attachment with `color` and begins a new frame.
    pub fn clear(&mut self, color: Color4f) {
        self.color.clear(color);
        self.stats.frames += 1;
    }

    /// Resets every depth sample to the far value.
    pub fn clear_depth(&mut self) {
        self.depth.clear(f32::MIN);
    }

    /// Returns the rendered image as raw RGBA8 bytes, row-major.
    pub fn color_buffer(&self) -> &[u8] {
        self.color.data()
    }

    /// Returns the color at pixel (x, y).
    pub fn color_at(&self, x: u32, y: u32) -> Color4 {
        self.color.get(x, y)
    }

    /// Returns the depth at pixel (x, y).
    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depth.get(x, y)
    }

    /// Returns the active shader.
    pub fn shader(&self) -> &Shader {
        &self.shader
    }
    /// Returns the active shader for mutation.
    pub fn shader_mut(&mut self) -> &mut Shader {
        &mut self.shader
    }
    /// Replaces the active shader.
    pub fn set_shader(&mut self, shader: Shader) {
        self.shader = shader;
    }

    /// Returns the per-draw uniforms.
    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }
    /// Returns the per-draw uniforms for mutation.
    pub fn uniforms_mut(&mut self) -> &mut Uniforms {
        &mut self.uniforms
    }

    /// Returns the camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }
    /// Returns the camera for mutation.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
    /// Replaces the camera.
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Sets which winding counts as front-facing.
    pub fn set_front_face(&mut self, front_face: FrontFace) {
        self.ctx.front_face = front_face;
    }
    /// Returns which winding counts as front-facing.
    pub fn front_face(&self) -> FrontFace {
        self.ctx.front_face
    }

    /// Sets which faces to cull.
    pub fn set_cull(&mut self, cull: Cull) {
        self.ctx.cull = cull;
    }
    /// Returns which faces are culled.
    pub fn cull(&self) -> Cull {
        self.ctx.cull
    }

    /// Enables or disables wireframe drawing.
    pub fn set_wireframe(&mut self, on: bool) {
        self.ctx.wireframe = on;
    }
    /// Returns whether wireframe drawing is enabled.
    pub fn wireframe(&self) -> bool {
        self.ctx.wireframe
    }

    /// Sets the fill backend.
    pub fn set_backend(&mut self, backend: Backend) {
        self.backend = backend;
    }
    /// Returns the fill backend.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Sets the viewport rectangle.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }
    /// Returns the viewport rectangle.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the accumulated statistics.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Draws `verts` as a list of triangles (every three vertices), under
    /// the transform `model`.
    ///
    /// A triangle straddling the near plane is split and its pieces
    /// re-entered once; a piece that would split again is dropped with a
    /// logged warning.
    pub fn draw_triangles(
        &mut self,
        model: &Mat4,
        verts: &[Vertex],
        textures: &TextureStore,
    ) {
        for chunk in verts.chunks_exact(3) {
            let tri = [chunk[0], chunk[1], chunk[2]];
            if self.raster_triangle(model, tri, textures)
                == RasterizeResult::NewFaces
            {
                for tri in mem::take(&mut self.pending) {
                    let res = self.raster_view_triangle(tri, textures, true);
                    if res == RasterizeResult::NewFaces {
                        log::warn!(
                            "triangle split again at the near plane after \
                             clipping; dropped"
                        );
                    }
                }
            }
        }
    }

    /// Steps 1–3 of the pipeline: vertex stage, model transform, facing
    /// cull, view transform. Hands off to [`Self::raster_view_triangle`].
    fn raster_triangle(
        &mut self,
        model: &Mat4,
        mut tri: [Vertex; 3],
        textures: &TextureStore,
    ) -> RasterizeResult {
        self.stats.tris.i += 1;

        for v in &mut tri {
            *v = (self.shader.vertex_stage)(*v, &self.uniforms, textures);
        }

        for v in &mut tri {
            v.pos = model.apply(&v.pos);
        }

        let positions = [
            tri[0].pos.xyz(),
            tri[1].pos.xyz(),
            tri[2].pos.xyz(),
        ];
        if self.should_cull(positions) {
            return RasterizeResult::Discard;
        }

        for v in &mut tri {
            v.pos = self.camera.view_mat.apply(&v.pos);
        }

        self.raster_view_triangle(tri, textures, false)
    }

    /// Steps 4–7 for a triangle already in view space: frustum test,
    /// near-plane clip, projection, viewport map, and the selected fill.
    ///
    /// Triangles produced by the near-plane clipper re-enter here (with
    /// `reentry` set) rather than at the vertex stage: they are already
    /// transformed, and running them through the model and view matrices
    /// again would displace them.
    fn raster_view_triangle(
        &mut self,
        mut tri: [Vertex; 3],
        textures: &TextureStore,
        reentry: bool,
    ) -> RasterizeResult {
        let outside = tri
            .iter()
            .all(|v| !self.camera.frustum.contains(v.pos.xyz()));
        if outside {
            return RasterizeResult::Discard;
        }

        let near = self.camera.frustum.near;
        if tri.iter().any(|v| v.pos.z() > -near) {
            if !reentry {
                let (a, b) = clip_near(tri, near);
                self.pending.push(a);
                if let Some(b) = b {
                    self.pending.push(b);
                }
            }
            return RasterizeResult::NewFaces;
        }

        // Project, recover true view-space depth, divide, map to pixels.
        let vp = self.viewport;
        for v in &mut tri {
            let mut pos = self.camera.frustum.proj.apply(&v.pos);
            let w = pos.w();
            pos[2] = -w;
            pos[0] /= w;
            pos[1] /= w;
            pos[3] = 1.0;
            pos[0] =
                (pos[0] + 1.0) * 0.5 * (vp.w as f32 - 1.0) + vp.x as f32;
            pos[1] = vp.h as f32
                - (pos[1] + 1.0) * 0.5 * (vp.h as f32 - 1.0)
                + vp.y as f32;
            v.pos = pos;
        }

        // Zero-area triangles have nothing to fill.
        let ab = tri[1].pos.xy() - tri[0].pos.xy();
        let bc = tri[2].pos.xy() - tri[1].pos.xy();
        if ab.cross(&bc) == 0.0 {
            return RasterizeResult::Discard;
        }

        if self.ctx.wireframe {
            self.draw_wireframe(tri, textures);
        } else {
            match self.backend {
                Backend::Scanline => self.fill_scanline(tri, textures),
                Backend::Aabb => self.fill_aabb(tri, textures),
            }
        }
        self.stats.tris.o += 1;
        RasterizeResult::Ok
    }

    /// Returns whether the triangle with the given world-space corner
    /// positions should be discarded based on its facing.
    fn should_cull(&self, positions: [Vec3; 3]) -> bool {
        let normal = (positions[1] - positions[0])
            .cross(&(positions[2] - positions[1]));
        let dot = normal.dot(&self.camera.view_dir);
        let is_front = match self.ctx.front_face {
            FrontFace::Cw => dot > 0.0,
            FrontFace::Ccw => dot <= 0.0,
        };
        match self.ctx.cull {
            Cull::Front => is_front,
            Cull::Back => !is_front,
            Cull::None => false,
        }
    }

    fn fill_scanline(&mut self, tri: [Vertex; 3], textures: &TextureStore) {
        let (t1, t2) = Trapezoid::from_triangle(tri);
        for trap in [t1, t2].into_iter().flatten() {
            self.fill_trapezoid(trap, textures);
        }
    }

    fn fill_trapezoid(
        &mut self,
        mut trap: Trapezoid,
        textures: &TextureStore,
    ) {
        rhw_init(&mut trap.left.v1);
        rhw_init(&mut trap.left.v2);
        rhw_init(&mut trap.right.v1);
        rhw_init(&mut trap.right.v2);

        let top = (trap.top.ceil() as i32).max(0);
        let bottom = (trap.bottom.ceil() as i32 - 1)
            .min(self.color.height() as i32 - 1);
        for y in top..=bottom {
            let sl = Scanline::from_trapezoid(&trap, y as f32);
            self.draw_scanline(sl, textures);
        }
    }

    fn draw_scanline(&mut self, sl: Scanline, textures: &TextureStore) {
        let w = self.color.width();
        let y = sl.y as u32;

        let x0 = sl.vertex.pos.x().floor() as i32;
        let x1 = (sl.vertex.pos.x() + sl.width).floor() as i32;

        let mut vertex = sl.vertex;
        for x in x0..=x1 {
            if x >= 0 && (x as u32) < w {
                let rhw = vertex.pos.z();
                let z = 1.0 / rhw;
                self.stats.frags.i += 1;
                if depth_test(z, self.depth.get(x as u32, y)) {
                    let attr = vertex.attrib.scale(z);
                    let color = (self.shader.pixel_stage)(
                        &attr,
                        &self.uniforms,
                        textures,
                    );
                    self.color.set(x as u32, y, color);
                    self.depth.set(x as u32, y, z);
                    self.stats.frags.o += 1;
                }
            }
            vertex.pos += sl.step.pos;
            vertex.attrib = vertex.attrib.step(&sl.step.attrib);
        }
    }

    fn fill_aabb(&mut self, tri: [Vertex; 3], textures: &TextureStore) {
        let pts =
            [tri[0].pos.xy(), tri[1].pos.xy(), tri[2].pos.xy()];
        let screen = Rect::new(
            0,
            0,
            self.color.width() as i32,
            self.color.height() as i32,
        );
        let bounds = Rect::bound_of(&pts).intersect(&screen);
        if bounds.is_empty() {
            return;
        }

        let rhws = [
            1.0 / tri[0].pos.z(),
            1.0 / tri[1].pos.z(),
            1.0 / tri[2].pos.z(),
        ];

        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let p = vec2(x as f32 + 0.5, y as f32 + 0.5);
                let bc = barycentric(p, pts);
                if !is_barycentric_valid(bc) {
                    continue;
                }

                let inv_z =
                    bc.x() * rhws[0] + bc.y() * rhws[1] + bc.z() * rhws[2];
                if inv_z == 0.0 {
                    continue;
                }
                let z = 1.0 / inv_z;

                self.stats.frags.i += 1;
                if !depth_test(z, self.depth.get(x as u32, y as u32)) {
                    continue;
                }

                // Perspective-corrected weights: αᵢ' = αᵢ · z / zᵢ.
                let w = [
                    bc.x() * rhws[0] * z,
                    bc.y() * rhws[1] * z,
                    bc.z() * rhws[2] * z,
                ];
                let attr = tri[0]
                    .attrib
                    .scale(w[0])
                    .step(&tri[1].attrib.scale(w[1]))
                    .step(&tri[2].attrib.scale(w[2]));

                let color = (self.shader.pixel_stage)(
                    &attr,
                    &self.uniforms,
                    textures,
                );
                self.color.set(x as u32, y as u32, color);
                self.depth.set(x as u32, y as u32, z);
                self.stats.frags.o += 1;
            }
        }
    }

    fn draw_wireframe(&mut self, tri: [Vertex; 3], textures: &TextureStore) {
        for i in 0..3 {
            let mut a = tri[i];
            let mut b = tri[(i + 1) % 3];
            rhw_init(&mut a);
            rhw_init(&mut b);
            self.raster_line(Line::new(a, b), textures);
        }
    }

    /// Rasterizes a shaded line: clip to the framebuffer, walk Bresenham,
    /// depth-test and shade each emitted pixel.
    fn raster_line(&mut self, line: Line, textures: &TextureStore) {
        let (w, h) = (self.color.width(), self.color.height());
        let min = vec2(0.0, 0.0);
        let max = vec2((w - 1) as f32, (h - 1) as f32);

        let Some(mut bres) =
            Bresenham::new(line.start.pos.xy(), line.end.pos.xy(), min, max)
        else {
            return;
        };

        let mut vertex = line.start;
        while let Some((x, y)) = bres.step() {
            if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
                let rhw = vertex.pos.z();
                let z = 1.0 / rhw;
                self.stats.frags.i += 1;
                if depth_test(z, self.depth.get(x as u32, y as u32)) {
                    let attr = vertex.attrib.scale(z);
                    let color = (self.shader.pixel_stage)(
                        &attr,
                        &self.uniforms,
                        textures,
                    );
                    self.color.set(x as u32, y as u32, color);
                    self.depth.set(x as u32, y as u32, z);
                    self.stats.frags.o += 1;
                }
            }
            vertex.pos += line.step.pos;
            vertex.attrib = vertex.attrib.step(&line.step.attrib);
        }
    }
}

/// Switches a screen-space vertex to reciprocal depth: `pos.z` becomes
/// `1/z` and every attribute is premultiplied by it, so that linear
/// interpolation in screen space becomes perspective-correct.
fn rhw_init(v: &mut Vertex) {
    let rhw = 1.0 / v.pos.z();
    v.pos[2] = rhw;
    v.attrib = v.attrib.scale(rhw);
}
