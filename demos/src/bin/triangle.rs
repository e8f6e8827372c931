//! A single spinning triangle with interpolated vertex colors.
//!
//! Keys: `t` toggles wireframe, `b` switches the fill backend.

use std::ops::ControlFlow::Continue;

use minifb::Key;

use sr::prelude::*;
use sr::math::rotate_euler;
use sr_front::minifb::Window;

const ATTR_COLOR: usize = 0;

fn main() {
    env_logger::init();

    let (w, h) = (640, 480);
    let mut win = Window::builder()
        .title("softrast//triangle")
        .size(w, h)
        .build();

    let camera = Camera::new(1.0, 1000.0, w as f32 / h as f32, degs(60.0));
    let mut renderer = Renderer::new(w, h, camera);
    renderer.set_shader(Shader::new(
        |v, _, _| v,
        |attr, _, _| attr.vec4(ATTR_COLOR).into(),
    ));

    let verts = [
        (vec3(-1.0, -0.8, 0.0), vec4(1.0, 0.0, 0.0, 1.0)),
        (vec3(1.0, -0.8, 0.0), vec4(0.0, 1.0, 0.0, 1.0)),
        (vec3(0.0, 1.0, 0.0), vec4(0.0, 0.0, 1.0, 1.0)),
    ]
    .map(|(p, color)| {
        vertex(
            vec4(p.x(), p.y(), p.z(), 1.0),
            Attributes::new().with_vec4(ATTR_COLOR, color),
        )
    });

    let textures = TextureStore::new();
    let mut rotation = 0.0f32;

    win.run(|frame| {
        for key in frame.win.keys_pressed() {
            match key {
                Key::T => {
                    let on = renderer.wireframe();
                    renderer.set_wireframe(!on);
                }
                Key::B => {
                    let next = match renderer.backend() {
                        Backend::Scanline => Backend::Aabb,
                        Backend::Aabb => Backend::Scanline,
                    };
                    renderer.set_backend(next);
                }
                _ => {}
            }
        }

        renderer.clear(rgba_f(0.12, 0.12, 0.15, 1.0));
        renderer.clear_depth();

        rotation += frame.dt_secs();
        let model = sr::math::translate(vec3(0.0, 0.0, -3.0))
            .compose(&rotate_euler(vec3(0.0, rotation, 0.0)));
        renderer.draw_triangles(&model, &verts, &textures);

        frame.present(renderer.color_buffer());
        Continue(())
    });

    println!("{}", renderer.stats());
}
