//! Geometry loading: model import, axis remap, and immutable GPU buffers.

mod buffers;
mod error;
mod import;
mod vertex;

pub use buffers::MeshBuffers;
pub use error::MeshError;
pub use import::{load_mesh, MeshData};
pub use vertex::{remap_axis, Vertex};
