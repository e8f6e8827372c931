//! End-to-end pipeline scenarios, driven through the public API only.

use std::cell::RefCell;
use std::rc::Rc;

use softrast_core::assert_approx_eq;
use softrast_core::geom::vertex3;
use softrast_core::math::{barycentric, vec2};
use softrast_core::prelude::*;
use softrast_core::render::{sample, Uniform};
use softrast_core::util::buf::Buf2;

const UNIFORM_COLOR: u32 = 0;
const UNIFORM_TEXTURE: u32 = 1;
const ATTR_TEXCOORD: usize = 0;

fn camera() -> Camera {
    Camera::new(1.0, 100.0, 1.0, degs(90.0))
}

/// A pixel stage that modulates the color uniform (white if unset) with
/// the bound texture, if any.
fn material_shader() -> Shader {
    Shader::new(
        |v, _, _| v,
        |attr, uniforms, textures| {
            let base: Color4f = uniforms
                .vec4(UNIFORM_COLOR)
                .map(Into::into)
                .unwrap_or(Color4f::WHITE);
            let Some(tex) = uniforms
                .texture(UNIFORM_TEXTURE)
                .and_then(|id| textures.get(id))
            else {
                return base;
            };
            base * sample(tex, attr.vec2(ATTR_TEXCOORD))
        },
    )
}

/// A triangle at constant view depth `z`, scaled so that both renderers
/// see the same screen footprint regardless of `z`.
fn triangle_at(z: f32) -> Vec<Vertex> {
    // NDC footprint (±0.75, -0.75) .. (0, +0.75)
    let s = -z * 0.75;
    [
        vec3(-s, -s, z),
        vec3(s, -s, z),
        vec3(0.0, s, z),
    ]
    .map(|p| vertex3(p, Attributes::new()))
    .to_vec()
}

#[test]
fn clear_fills_every_pixel_with_rounded_bytes() {
    let mut r = Renderer::new(4, 4, camera());
    r.clear(rgba_f(0.1, 0.1, 0.1, 1.0));

    let buf = r.color_buffer();
    assert_eq!(buf.len(), 4 * 4 * 4);
    for px in buf.chunks_exact(4) {
        assert_eq!(px, &[26, 26, 26, 255]);
    }
}

#[test]
fn nearer_triangle_wins_depth_test() {
    for backend in [Backend::Scanline, Backend::Aabb] {
        // Red at z = -2, green at z = -1.2, same footprint. Drawn in
        // both orders, the nearer green triangle must own the overlap.
        for flip_order in [false, true] {
            let mut r = Renderer::new(8, 8, camera()).with_backend(backend);
            r.set_shader(material_shader());
            r.clear(rgba_f(0.0, 0.0, 0.0, 1.0));
            r.clear_depth();

            let textures = TextureStore::new();
            let model = Mat4::identity();

            let mut draws = [
                (triangle_at(-2.0), vec4(1.0, 0.0, 0.0, 1.0)),
                (triangle_at(-1.2), vec4(0.0, 1.0, 0.0, 1.0)),
            ];
            if flip_order {
                draws.swap(0, 1);
            }
            for (verts, color) in &draws {
                r.uniforms_mut().set(UNIFORM_COLOR, Uniform::Vec4(*color));
                r.draw_triangles(&model, verts, &textures);
            }

            assert_eq!(
                r.color_at(3, 4),
                rgba(0, 255, 0, 255),
                "backend {backend:?}, flipped {flip_order}"
            );
            assert_approx_eq!(r.depth_at(3, 4), -1.2, eps = 1e-3);
        }
    }
}

#[test]
fn interpolation_is_perspective_correct() {
    // A triangle with strongly varying depth, covering exactly one pixel
    // center, so the captured varying can be checked analytically.
    let captured = Rc::new(RefCell::new(Vec::new()));
    let sink = captured.clone();

    let mut r = Renderer::new(9, 9, camera()).with_backend(Backend::Aabb);
    r.set_shader(Shader::new(
        |v, _, _| v,
        move |attr, _, _| {
            sink.borrow_mut().push(attr.vec2(ATTR_TEXCOORD));
            Color4f::WHITE
        },
    ));
    r.clear_depth();

    let verts = [
        (vec3(0.05, 0.45, -2.0), vec2(0.0, 0.0)),
        (vec3(0.9, 0.8, -4.0), vec2(1.0, 0.0)),
        (vec3(0.6, 0.2, -8.0), vec2(0.0, 1.0)),
    ]
    .map(|(p, uv)| {
        vertex3(p, Attributes::new().with_vec2(ATTR_TEXCOORD, uv))
    });

    let textures = TextureStore::new();
    r.draw_triangles(&Mat4::identity(), &verts, &textures);

    let captured = captured.borrow();
    assert_eq!(captured.len(), 1, "expected exactly one covered pixel");
    let got = captured[0];

    // Reproduce the projection analytically: screen position of a view
    // point is ((x/−z + 1)/2·(w−1), h − (y/−z + 1)/2·(h−1)).
    let screen = |p: Vec3| {
        vec2(
            (p.x() / -p.z() + 1.0) * 0.5 * 8.0,
            9.0 - (p.y() / -p.z() + 1.0) * 0.5 * 8.0,
        )
    };
    let pts = [
        screen(verts[0].pos.xyz()),
        screen(verts[1].pos.xyz()),
        screen(verts[2].pos.xyz()),
    ];
    let bc = barycentric(vec2(4.5, 4.5), pts);

    let zs = [-2.0f32, -4.0, -8.0];
    let inv_z = bc.x() / zs[0] + bc.y() / zs[1] + bc.z() / zs[2];
    let z = 1.0 / inv_z;
    let expect = vec2(
        z * (bc.y() * 1.0 / zs[1]),
        z * (bc.z() * 1.0 / zs[2]),
    );

    assert_approx_eq!(got, expect, eps = 1e-3);

    // The screen-linear value differs noticeably; perspective division
    // must have happened.
    let linear = vec2(bc.y(), bc.z());
    assert!((got.y() - linear.y()).abs() > 0.1);
}

#[test]
fn near_plane_split_draws_two_clipped_triangles() {
    // A triangle straddling the near plane (near = 1) with view-space
    // z in {-0.5, -2, -2} is split in two, and everything drawn lies on
    // the in-front side of the plane.
    for backend in [Backend::Scanline, Backend::Aabb] {
        let mut r = Renderer::new(16, 16, camera()).with_backend(backend);
        r.set_shader(material_shader());
        r.clear(rgba_f(0.0, 0.0, 0.0, 1.0));
        r.clear_depth();

        let verts = [
            vec3(0.0, 0.5, -0.5),
            vec3(-1.5, -0.5, -2.0),
            vec3(1.5, -0.5, -2.0),
        ]
        .map(|p| vertex3(p, Attributes::new()));

        let textures = TextureStore::new();
        r.draw_triangles(&Mat4::identity(), &verts, &textures);

        // One triangle in, two clipped pieces out, with visible
        // coverage.
        assert_eq!(r.stats().tris.i, 1, "backend {backend:?}");
        assert_eq!(r.stats().tris.o, 2, "backend {backend:?}");
        assert!(r.stats().frags.o > 0, "backend {backend:?}");

        // Every depth sample that was written satisfies z <= -near + ε.
        for y in 0..16 {
            for x in 0..16 {
                let z = r.depth_at(x, y);
                if z > f32::MIN {
                    assert!(
                        z <= -1.0 + 1e-4,
                        "backend {backend:?}: pixel ({x}, {y}) was \
                         written behind the near plane, z = {z}"
                    );
                }
            }
        }
    }
}

#[test]
fn textured_triangle_samples_nearest() {
    let mut store = TextureStore::new();
    let texels = Buf2::new_with(2, 2, |x, y| {
        if (x, y) == (0, 0) {
            rgba(255, 0, 0, 255)
        } else {
            rgba(0, 0, 255, 255)
        }
    });
    let id = store.load_from_pixels(texels, "checker");

    let mut r = Renderer::new(8, 8, camera());
    r.set_shader(material_shader());
    r.clear(rgba_f(0.0, 0.0, 0.0, 1.0));
    r.clear_depth();
    r.uniforms_mut().set(UNIFORM_TEXTURE, Uniform::Texture(id));

    // All texture coordinates at the origin: every covered pixel reads
    // the single red texel.
    let verts: Vec<_> = triangle_at(-2.0)
        .into_iter()
        .map(|mut v| {
            v.attrib.set_vec2(ATTR_TEXCOORD, vec2(0.0, 0.0));
            v
        })
        .collect();
    r.draw_triangles(&Mat4::identity(), &verts, &store);

    assert_eq!(r.color_at(3, 4), rgba(255, 0, 0, 255));
}

#[test]
fn missing_uniforms_fall_back_to_white() {
    let mut r = Renderer::new(8, 8, camera());
    r.set_shader(material_shader());
    r.clear(rgba_f(0.0, 0.0, 0.0, 1.0));
    r.clear_depth();

    let textures = TextureStore::new();
    r.draw_triangles(&Mat4::identity(), &triangle_at(-2.0), &textures);

    assert_eq!(r.color_at(3, 4), rgba(255, 255, 255, 255));
}

#[test]
fn wireframe_leaves_the_interior_unwritten() {
    let mut r = Renderer::new(32, 32, camera());
    r.set_shader(material_shader());
    r.clear(rgba_f(0.0, 0.0, 0.0, 1.0));
    r.clear_depth();
    r.set_wireframe(true);

    let textures = TextureStore::new();
    r.draw_triangles(&Mat4::identity(), &triangle_at(-2.0), &textures);

    // The centroid of a large triangle is far from all three edges.
    assert_eq!(r.color_at(16, 18), rgba(0, 0, 0, 255));
    // But some pixels were written.
    assert!(r.stats().frags.o > 0);
}
