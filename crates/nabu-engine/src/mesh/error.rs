use std::path::PathBuf;

use thiserror::Error;

/// Mesh import or validation failure. Fatal during setup.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to import mesh from {}", path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("imported scene contains no mesh")]
    Empty,

    #[error("index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("index count {0} is not a multiple of 3")]
    NotTriangleList(usize),
}
