//! Mesh data contract.
//!
//! The renderer consumes flat arrays of 32-bit values:
//! - vertices: 4 floats each (x, y, z, pad)
//! - edges: 2 vertex indices each
//! - triangles: 4 values each (a, b, c, pad)
//!
//! Mesh generation is an injected dependency (`MeshSource`); the crate ships a
//! structured unit-square mesher as the default source.

mod data;
mod error;
mod source;
mod unit_square;

pub use data::{Edge, MeshData, Triangle, Vertex};
pub use error::MeshError;
pub use source::MeshSource;
pub use unit_square::UnitSquareMesher;
