//! Reading Wavefront OBJ files and the MTL material libraries they
//! reference.
//!
//! OBJ is a line-oriented text format. The subset understood here:
//!
//! ```plain
//! ## Comments and unknown statements are skipped.
//!
//! ## Vertex data, referenced by faces one-based:
//! v  1.0 2.0 3.0
//! vt 0.25 0.75
//! vn 0.0 1.0 0.0
//!
//! ## Groups/objects start a new model:
//! o teapot
//!
//! ## Faces reference position[/texcoord][/normal] triples:
//! f 1 2 3
//! f 1/4 2/5 3/6
//! f 1//7 2//8 3//9
//! f 1/4/7 2/5/8 3/6/9
//!
//! ## Material libraries and bindings:
//! mtllib teapot.mtl
//! usemtl porcelain
//! s 1
//! ```
//!
//! A malformed line is skipped with a logged warning and parsing
//! continues; only failing to read the file at all is an error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use sr::math::{vec2, vec3, Vec2, Vec3};

/// Why a file could not be loaded at all.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// One corner of a face: a position index plus optional texcoord and
/// normal indices, all zero-based.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FaceVertex {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

/// A polygonal face; triangulated downstream if it has more than three
/// corners.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Face {
    pub vertices: Vec<FaceVertex>,
}

/// A named group of faces with an optional material binding.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub name: Option<String>,
    pub faces: Vec<Face>,
    /// Index into [`SceneData::materials`] of the library in effect when
    /// this model started.
    pub mtllib: Option<u32>,
    pub material: Option<String>,
    pub smooth: u8,
}

/// File paths of the texture maps a material references.
#[derive(Clone, Debug, Default)]
pub struct MtlTextureMaps {
    pub ambient: Option<String>,
    pub diffuse: Option<String>,
    pub specular_color: Option<String>,
    pub specular_highlight: Option<String>,
    pub alpha: Option<String>,
    pub refl: Option<String>,
    pub bump: Option<String>,
}

/// A material from an MTL library. Every property is optional; absent
/// ones fall back to renderer defaults.
#[derive(Clone, Debug, Default)]
pub struct Material {
    pub name: String,
    pub ambient: Option<Vec3>,
    pub diffuse: Option<Vec3>,
    pub specular: Option<Vec3>,
    pub emissive: Option<Vec3>,
    pub specular_exponent: Option<f32>,
    pub dissolve: Option<f32>,
    pub transmission_filter: Option<Vec3>,
    pub optical_density: Option<f32>,
    pub illum: Option<u8>,
    pub maps: MtlTextureMaps,
}

/// A material library: materials by name.
#[derive(Clone, Debug, Default)]
pub struct Mtllib {
    pub materials: HashMap<String, Material>,
}

/// Everything parsed out of one OBJ file.
#[derive(Clone, Debug, Default)]
pub struct SceneData {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub models: Vec<Model>,
    pub materials: Vec<Mtllib>,
}

/// Loads and parses the OBJ file at `path`. Referenced MTL files are
/// looked up relative to the OBJ's directory.
pub fn load_obj(path: impl AsRef<Path>) -> Result<SceneData, Error> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    Ok(parse_obj(&text, path.parent()))
}

/// Parses OBJ text. `dir` is the directory used to resolve `mtllib`
/// references; with `None`, material libraries are skipped.
pub fn parse_obj(src: &str, dir: Option<&Path>) -> SceneData {
    let mut scene = SceneData::default();

    for (n, line) in src.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        let ok = match keyword {
            _ if keyword.starts_with('#') => true,
            "v" => parse_vec3(&mut tokens)
                .map(|v| scene.vertices.push(v))
                .is_some(),
            "vt" => parse_vec2(&mut tokens)
                .map(|v| scene.texcoords.push(v))
                .is_some(),
            "vn" => parse_vec3(&mut tokens)
                .map(|v| scene.normals.push(v))
                .is_some(),
            "g" | "o" => {
                let model = Model {
                    name: tokens.next().map(String::from),
                    mtllib: scene
                        .materials
                        .len()
                        .checked_sub(1)
                        .map(|i| i as u32),
                    ..Model::default()
                };
                scene.models.push(model);
                true
            }
            "f" => parse_face(&mut tokens)
                .map(|f| current_model(&mut scene).faces.push(f))
                .is_some(),
            "mtllib" => match (tokens.next(), dir) {
                (Some(file), Some(dir)) => {
                    match fs::read_to_string(dir.join(file)) {
                        Ok(text) => {
                            scene.materials.push(parse_mtl(&text));
                            true
                        }
                        Err(e) => {
                            log::warn!("cannot read mtllib {file}: {e}");
                            true
                        }
                    }
                }
                _ => true,
            },
            "usemtl" => {
                current_model(&mut scene).material =
                    tokens.next().map(String::from);
                true
            }
            "s" => {
                let v = match tokens.next() {
                    Some("off") => Some(0),
                    Some(tok) => tok.parse().ok(),
                    None => None,
                };
                match v {
                    Some(v) => {
                        current_model(&mut scene).smooth = v;
                        true
                    }
                    None => false,
                }
            }
            _ => {
                log::debug!("skipping unsupported statement {keyword:?}");
                true
            }
        };

        if !ok {
            log::warn!("skipping malformed line {}: {line:?}", n + 1);
        }
    }
    scene
}

/// Parses MTL text into a material library.
pub fn parse_mtl(src: &str) -> Mtllib {
    let mut lib = Mtllib::default();
    let mut mtl: Option<Material> = None;

    for line in src.lines() {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        if keyword.starts_with('#') {
            continue;
        }

        if keyword == "newmtl" {
            if let Some(prev) = mtl.take() {
                lib.materials.insert(prev.name.clone(), prev);
            }
            if let Some(name) = tokens.next() {
                mtl = Some(Material {
                    name: name.into(),
                    ..Material::default()
                });
            }
            continue;
        }

        let Some(m) = mtl.as_mut() else {
            continue;
        };
        let tokens = &mut tokens;
        match keyword {
            "Ka" => m.ambient = parse_vec3(tokens),
            "Kd" => m.diffuse = parse_vec3(tokens),
            "Ks" => m.specular = parse_vec3(tokens),
            "Ke" => m.emissive = parse_vec3(tokens),
            "Ns" => m.specular_exponent = parse_float(tokens),
            "Ni" => m.optical_density = parse_float(tokens),
            "d" => m.dissolve = parse_float(tokens),
            "Tr" => m.dissolve = parse_float(tokens).map(|tr| 1.0 - tr),
            "Tf" => m.transmission_filter = parse_vec3(tokens),
            "illum" => {
                m.illum = tokens.next().and_then(|t| t.parse().ok())
            }
            "map_Ka" => m.maps.ambient = tokens.next().map(String::from),
            "map_Kd" => m.maps.diffuse = tokens.next().map(String::from),
            "map_Ks" => {
                m.maps.specular_color = tokens.next().map(String::from)
            }
            "map_Ns" => {
                m.maps.specular_highlight = tokens.next().map(String::from)
            }
            "map_d" => m.maps.alpha = tokens.next().map(String::from),
            "map_refl" => m.maps.refl = tokens.next().map(String::from),
            "map_Bump" => m.maps.bump = tokens.next().map(String::from),
            _ => log::debug!("skipping unsupported mtl statement {keyword:?}"),
        }
    }
    if let Some(prev) = mtl.take() {
        lib.materials.insert(prev.name.clone(), prev);
    }
    lib
}

/// Returns the model currently being built, starting an anonymous one if
/// the file declares faces before any `g`/`o` statement.
fn current_model(scene: &mut SceneData) -> &mut Model {
    if scene.models.is_empty() {
        scene.models.push(Model::default());
    }
    scene.models.last_mut().unwrap()
}

fn parse_float<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<f32> {
    tokens.next()?.parse().ok()
}

fn parse_vec2<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<Vec2> {
    let x = parse_float(tokens)?;
    let y = parse_float(tokens)?;
    Some(vec2(x, y))
}

fn parse_vec3<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<Vec3> {
    let x = parse_float(tokens)?;
    let y = parse_float(tokens)?;
    let z = parse_float(tokens)?;
    Some(vec3(x, y, z))
}

/// Parses `pos`, `pos/tex`, `pos//norm`, or `pos/tex/norm`, converting
/// the one-based file indices to zero-based.
fn parse_indices(s: &str) -> Option<FaceVertex> {
    let mut parts = s.split('/');
    let position = parts.next()?.parse::<usize>().ok()?.checked_sub(1)?;
    let texcoord = match parts.next() {
        None | Some("") => None,
        Some(t) => Some(t.parse::<usize>().ok()?.checked_sub(1)?),
    };
    let normal = match parts.next() {
        None | Some("") => None,
        Some(t) => Some(t.parse::<usize>().ok()?.checked_sub(1)?),
    };
    Some(FaceVertex { position, texcoord, normal })
}

fn parse_face<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
) -> Option<Face> {
    let vertices = tokens
        .map(parse_indices)
        .collect::<Option<Vec<_>>>()?;
    (vertices.len() >= 3).then_some(Face { vertices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_file() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            None,
        );
        assert_eq!(scene.vertices.len(), 3);
        assert_eq!(scene.models.len(), 1);
        assert_eq!(scene.models[0].faces.len(), 1);
        assert_eq!(
            scene.models[0].faces[0].vertices[2],
            FaceVertex { position: 2, texcoord: None, normal: None }
        );
    }

    #[test]
    fn face_index_forms() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n\
             f 1//1 2//1 3//1\n\
             f 1/1 2/2 3/3\n",
            None,
        );
        let faces = &scene.models[0].faces;
        assert_eq!(faces.len(), 3);
        assert_eq!(
            faces[0].vertices[1],
            FaceVertex { position: 1, texcoord: Some(1), normal: Some(0) }
        );
        assert_eq!(
            faces[1].vertices[0],
            FaceVertex { position: 0, texcoord: None, normal: Some(0) }
        );
        assert_eq!(
            faces[2].vertices[2],
            FaceVertex { position: 2, texcoord: Some(2), normal: None }
        );
    }

    #[test]
    fn comments_and_malformed_lines_are_skipped() {
        let scene = parse_obj(
            "# a comment\n\
             v 0 0 0\n\
             v not a number here\n\
             v 1 0 0\n\
             v 0 1 0\n\
             curve 1 2 3\n\
             f 1 2 3\n",
            None,
        );
        assert_eq!(scene.vertices.len(), 3);
        assert_eq!(scene.models[0].faces.len(), 1);
    }

    #[test]
    fn groups_start_models() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             o first\nf 1 2 3\n\
             o second\nusemtl stone\nf 3 2 1\n",
            None,
        );
        assert_eq!(scene.models.len(), 2);
        assert_eq!(scene.models[0].name.as_deref(), Some("first"));
        assert_eq!(scene.models[1].material.as_deref(), Some("stone"));
        assert_eq!(scene.models[1].faces.len(), 1);
    }

    #[test]
    fn mtl_properties() {
        let lib = parse_mtl(
            "newmtl stone\n\
             Ka 0.2 0.2 0.2\n\
             Kd 0.8 0.7 0.6\n\
             Ns 96.0\n\
             d 0.9\n\
             illum 2\n\
             map_Kd stone_diffuse.png\n\
             newmtl glass\n\
             Tr 0.25\n",
        );
        let stone = &lib.materials["stone"];
        assert_eq!(stone.ambient, Some(vec3(0.2, 0.2, 0.2)));
        assert_eq!(stone.diffuse, Some(vec3(0.8, 0.7, 0.6)));
        assert_eq!(stone.specular_exponent, Some(96.0));
        assert_eq!(stone.dissolve, Some(0.9));
        assert_eq!(stone.illum, Some(2));
        assert_eq!(
            stone.maps.diffuse.as_deref(),
            Some("stone_diffuse.png")
        );

        // Tr is stored as its dissolve complement.
        let glass = &lib.materials["glass"];
        assert_eq!(glass.dissolve, Some(0.75));
    }
}
