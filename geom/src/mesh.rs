//! Flattening parsed scenes into pipeline-ready meshes.

use std::path::Path;

use bitflags::bitflags;

use sr::geom::{vertex3, Vertex};
use sr::math::{vary::Attributes, vec4, Vec2, Vec3, Vec4};

use crate::io::{self, Mtllib, SceneData};

/// Attribute slot carrying the texture coordinate ([`Vec2`]).
pub const ATTR_TEXCOORD: usize = 0;
/// Attribute slot carrying the normal ([`Vec3`]).
pub const ATTR_NORMAL: usize = 0;
/// Attribute slot carrying the vertex color ([`Vec4`]).
pub const ATTR_COLOR: usize = 0;

bitflags! {
    /// Operations applied to mesh data after loading.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
    pub struct PreOp: u8 {
        /// Recompute each face's normal from its winding and copy it to
        /// all three vertices, overriding any normals from the file.
        const RECALC_NORMAL = 0x01;
    }
}

/// A fully resolved mesh vertex.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub color: Vec4,
}

/// A triangulated mesh: a flat vertex list, three vertices per face.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub name: Option<String>,
    pub mtllib: Option<u32>,
    pub material: Option<String>,
}

impl Mesh {
    /// Converts the mesh into pipeline vertices, with texcoord, normal,
    /// and color in the [`ATTR_TEXCOORD`], [`ATTR_NORMAL`], and
    /// [`ATTR_COLOR`] slots.
    pub fn to_vertices(&self) -> Vec<Vertex> {
        self.vertices
            .iter()
            .map(|v| {
                let attrib = Attributes::new()
                    .with_vec2(ATTR_TEXCOORD, v.texcoord)
                    .with_vec3(ATTR_NORMAL, v.normal)
                    .with_vec4(ATTR_COLOR, v.color);
                vertex3(v.position, attrib)
            })
            .collect()
    }
}

/// Loads an OBJ file and assembles its models into meshes.
///
/// Returns `None`, with the cause logged, if the file cannot be read;
/// malformed content degrades to fewer faces, never to a failure.
pub fn load_from_file(
    path: impl AsRef<Path>,
    pre: PreOp,
) -> Option<(Vec<Mesh>, Vec<Mtllib>)> {
    let path = path.as_ref();
    match io::load_obj(path) {
        Ok(scene) => Some(assemble(scene, pre)),
        Err(e) => {
            log::error!("failed to load model {}: {e}", path.display());
            None
        }
    }
}

/// Flattens `scene` into one mesh per model, fan-triangulating faces
/// with more than three corners.
pub fn assemble(scene: SceneData, pre: PreOp) -> (Vec<Mesh>, Vec<Mtllib>) {
    let mut meshes = Vec::with_capacity(scene.models.len());

    for model in &scene.models {
        let mut mesh = Mesh {
            name: model.name.clone(),
            mtllib: model.mtllib,
            material: model.material.clone(),
            ..Mesh::default()
        };

        for face in &model.faces {
            for i in 1..face.vertices.len() - 1 {
                let corners =
                    [face.vertices[0], face.vertices[i], face.vertices[i + 1]];
                let tri: Option<Vec<_>> = corners
                    .iter()
                    .map(|c| resolve(&scene, c))
                    .collect();
                match tri {
                    Some(tri) => mesh.vertices.extend(tri),
                    None => {
                        log::warn!(
                            "face with out-of-range vertex index skipped \
                             in model {:?}",
                            model.name
                        );
                        break;
                    }
                }
            }
        }

        if pre.contains(PreOp::RECALC_NORMAL) {
            recalc_normals(&mut mesh);
        }
        meshes.push(mesh);
    }
    (meshes, scene.materials)
}

/// Resolves one face corner against the scene's index pools. A missing
/// position is an error; missing or out-of-range texcoords and normals
/// fall back to zero.
fn resolve(scene: &SceneData, c: &io::FaceVertex) -> Option<MeshVertex> {
    let position = *scene.vertices.get(c.position)?;
    let normal = c
        .normal
        .and_then(|i| scene.normals.get(i))
        .copied()
        .unwrap_or(Vec3::ZERO);
    let texcoord = c
        .texcoord
        .and_then(|i| scene.texcoords.get(i))
        .copied()
        .unwrap_or(Vec2::ZERO);
    Some(MeshVertex {
        position,
        normal,
        texcoord,
        color: vec4(1.0, 1.0, 1.0, 1.0),
    })
}

/// Overwrites vertex normals with per-face normals computed as
/// `normalize((v3 − v2) × (v2 − v1))`.
fn recalc_normals(mesh: &mut Mesh) {
    for tri in mesh.vertices.chunks_exact_mut(3) {
        let [v1, v2, v3] = [tri[0].position, tri[1].position, tri[2].position];
        let normal = (v3 - v2).cross(&(v2 - v1)).normalize();
        for v in tri {
            v.normal = normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use sr::assert_approx_eq;
    use sr::math::{vec2, vec3};

    use crate::io::parse_obj;

    use super::*;

    #[test]
    fn minimal_obj_yields_one_mesh_one_face() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            None,
        );
        let (meshes, libs) = assemble(scene, PreOp::empty());
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].vertices.len(), 3);
        assert!(libs.is_empty());

        assert_eq!(meshes[0].vertices[1].position, vec3(1.0, 0.0, 0.0));
        // Unreferenced attributes default to zero, color to white.
        assert_eq!(meshes[0].vertices[0].normal, Vec3::ZERO);
        assert_eq!(meshes[0].vertices[0].color, vec4(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
            None,
        );
        let (meshes, _) = assemble(scene, PreOp::empty());
        assert_eq!(meshes[0].vertices.len(), 6);
        // Second triangle of the fan is (v0, v2, v3).
        assert_eq!(meshes[0].vertices[3].position, vec3(0.0, 0.0, 0.0));
        assert_eq!(meshes[0].vertices[4].position, vec3(1.0, 1.0, 0.0));
        assert_eq!(meshes[0].vertices[5].position, vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn out_of_range_position_skips_face() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\nf 1 2 3\n",
            None,
        );
        let (meshes, _) = assemble(scene, PreOp::empty());
        assert_eq!(meshes[0].vertices.len(), 3);
    }

    #[test]
    fn recalc_normal_uses_winding() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            None,
        );
        let (meshes, _) = assemble(scene, PreOp::RECALC_NORMAL);
        // (v3 − v2) × (v2 − v1) for this winding points down -z.
        let n = meshes[0].vertices[0].normal;
        assert_approx_eq!(n, vec3(0.0, 0.0, -1.0));
        assert!(meshes[0]
            .vertices
            .iter()
            .all(|v| v.normal == n));
    }

    #[test]
    fn to_vertices_fills_attribute_slots() {
        let scene = parse_obj(
            "v 0 0 0\nv 1 0 0\nv 0 1 0\n\
             vt 0.5 0.25\nvt 0 0\nvt 1 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n",
            None,
        );
        let (meshes, _) = assemble(scene, PreOp::empty());
        let verts = meshes[0].to_vertices();
        assert_eq!(verts.len(), 3);
        assert_eq!(verts[0].attrib.vec2(ATTR_TEXCOORD), vec2(0.5, 0.25));
        assert_eq!(verts[0].attrib.vec3(ATTR_NORMAL), vec3(0.0, 0.0, 1.0));
        assert_eq!(verts[0].pos.w(), 1.0);
    }
}
