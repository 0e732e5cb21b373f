mod mesh;
mod teapot;

pub use mesh::{MeshData, Vertex};
pub use teapot::teapot;
