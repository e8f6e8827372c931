//! Model loading for `softrast`: a Wavefront OBJ/MTL reader and the
//! assembly of its output into flat, pipeline-ready vertex lists.

pub mod io;
pub mod mesh;

pub use io::{Material, Mtllib, SceneData};
pub use mesh::{
    load_from_file, Mesh, MeshVertex, PreOp, ATTR_COLOR, ATTR_NORMAL,
    ATTR_TEXCOORD,
};
