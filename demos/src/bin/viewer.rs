//! An OBJ model viewer.
//!
//! Pass model paths on the command line (up to four). Keys:
//! `w`/`a`/`s`/`d` move the camera, `q`/`e` raise and lower it,
//! `t` toggles wireframe, `1`–`4` switch models.

use std::env;
use std::ops::ControlFlow::{Break, Continue};
use std::path::{Path, PathBuf};

use minifb::Key;

use sr::math::{rotate_euler, translate};
use sr::prelude::*;
use sr::render::sample;
use sr_front::minifb::Window;
use sr_geom::{load_from_file, Mesh, Mtllib, PreOp, ATTR_TEXCOORD};

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 720;

const UNIFORM_TEXTURE: u32 = 0;
const UNIFORM_COLOR: u32 = 1;

/// One loaded model: meshes pre-flattened to pipeline vertices, plus the
/// material libraries and diffuse textures they reference.
struct ModelData {
    draws: Vec<(Vec<Vertex>, Option<u32>, Option<String>)>,
    mtllibs: Vec<Mtllib>,
    textures: TextureStore,
}

fn load_model(path: &Path) -> Option<ModelData> {
    let (meshes, mtllibs) = load_from_file(path, PreOp::empty())?;
    let dir = path.parent().unwrap_or(Path::new("."));

    let mut textures = TextureStore::new();
    for lib in &mtllibs {
        for material in lib.materials.values() {
            if let Some(map) = &material.maps.diffuse {
                textures.load(dir.join(map), map.clone());
            }
        }
    }

    let draws = meshes
        .iter()
        .map(|m: &Mesh| (m.to_vertices(), m.mtllib, m.material.clone()))
        .collect();
    Some(ModelData { draws, mtllibs, textures })
}

/// Binds the mesh's material to the uniforms: ambient color and diffuse
/// texture, when present.
fn bind_material(
    renderer: &mut Renderer,
    data: &ModelData,
    mtllib: Option<u32>,
    material: Option<&str>,
) {
    renderer.uniforms_mut().clear();
    let Some(lib) = mtllib.and_then(|i| data.mtllibs.get(i as usize)) else {
        return;
    };
    let Some(material) = material.and_then(|m| lib.materials.get(m)) else {
        return;
    };
    if let Some(ambient) = material.ambient {
        renderer.uniforms_mut().set(
            UNIFORM_COLOR,
            Uniform::Vec4(ambient.to_vec4(1.0)),
        );
    }
    if let Some(map) = &material.maps.diffuse {
        if let Some(id) = data.textures.id_of(map) {
            renderer
                .uniforms_mut()
                .set(UNIFORM_TEXTURE, Uniform::Texture(id));
        }
    }
}

fn main() {
    env_logger::init();

    let paths: Vec<PathBuf> =
        env::args().skip(1).take(4).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("usage: viewer <model.obj> [more.obj ...]");
        return;
    }

    let mut win = Window::builder()
        .title("softrast//viewer")
        .size(WIDTH, HEIGHT)
        .build();

    let mut camera = Camera::new(
        1.0,
        1000.0,
        WIDTH as f32 / HEIGHT as f32,
        degs(60.0),
    );
    camera.move_to(vec3(0.0, 1.0, 0.0));
    camera.set_rotation(vec3(degs(1.0).to_rads(), 0.0, 0.0));

    let mut renderer = Renderer::new(WIDTH, HEIGHT, camera);
    renderer.set_front_face(FrontFace::Ccw);
    renderer.set_cull(Cull::Back);
    renderer.set_shader(Shader::new(
        |v, _, _| v,
        |attr, uniforms, textures| {
            let base: Color4f = uniforms
                .vec4(UNIFORM_COLOR)
                .map(Into::into)
                .unwrap_or(Color4f::WHITE);
            let tex = uniforms
                .texture(UNIFORM_TEXTURE)
                .and_then(|id| textures.get(id));
            match tex {
                Some(tex) => base * sample(tex, attr.vec2(ATTR_TEXCOORD)),
                None => base,
            }
        },
    ));

    let mut model = load_model(&paths[0]);
    let mut rotation = 0.0f32;

    win.run(|frame| {
        let dt = frame.dt_secs();
        let keys = frame.win.keys_pressed();

        let camera = renderer.camera_mut();
        let speed = 2.0 * dt;
        if frame.win.is_key_down(Key::W) {
            camera.move_offset(vec3(0.0, 0.0, -speed));
        }
        if frame.win.is_key_down(Key::S) {
            camera.move_offset(vec3(0.0, 0.0, speed));
        }
        if frame.win.is_key_down(Key::A) {
            camera.move_offset(vec3(-speed, 0.0, 0.0));
        }
        if frame.win.is_key_down(Key::D) {
            camera.move_offset(vec3(speed, 0.0, 0.0));
        }
        if frame.win.is_key_down(Key::Q) {
            camera.move_offset(vec3(0.0, speed, 0.0));
        }
        if frame.win.is_key_down(Key::E) {
            camera.move_offset(vec3(0.0, -speed, 0.0));
        }

        for key in keys {
            match key {
                Key::T => {
                    let on = renderer.wireframe();
                    renderer.set_wireframe(!on);
                }
                Key::Key1 | Key::Key2 | Key::Key3 | Key::Key4 => {
                    let i = key as usize - Key::Key1 as usize;
                    if let Some(path) = paths.get(i) {
                        model = load_model(path);
                    }
                }
                _ => {}
            }
        }

        let Some(data) = &model else {
            log::error!("no model loaded");
            return Break(());
        };

        renderer.clear(rgba_f(0.2, 0.2, 0.2, 1.0));
        renderer.clear_depth();

        rotation += dt * 60.0;
        let transform = translate(vec3(0.0, 0.0, -4.0))
            .compose(&rotate_euler(vec3(0.0, degs(rotation).to_rads(), 0.0)));

        for (verts, mtllib, material) in &data.draws {
            bind_material(&mut renderer, data, *mtllib, material.as_deref());
            renderer.draw_triangles(&transform, verts, &data.textures);
        }

        frame.present(renderer.color_buffer());
        Continue(())
    });

    println!("{}", renderer.stats());
}
