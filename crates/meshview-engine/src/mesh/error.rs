use std::fmt;

/// Violation of the mesh data contract.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A required array is empty (`"vertices"`, `"edges"` or `"triangles"`).
    Empty(&'static str),
    /// A flat array length is not a multiple of its element stride.
    Misaligned {
        what: &'static str,
        len: usize,
        stride: usize,
    },
    /// An element references a vertex that does not exist.
    IndexOutOfRange {
        what: &'static str,
        element: usize,
        index: u32,
        vertex_count: usize,
    },
    /// A generator parameter is outside its valid domain.
    InvalidParameter(String),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(what) => write!(f, "mesh has no {what}"),
            Self::Misaligned { what, len, stride } => {
                write!(f, "{what} array length {len} is not a multiple of {stride}")
            }
            Self::IndexOutOfRange {
                what,
                element,
                index,
                vertex_count,
            } => write!(
                f,
                "{what}[{element}] references vertex {index}, but the mesh has {vertex_count} vertices"
            ),
            Self::InvalidParameter(msg) => write!(f, "invalid mesh parameter: {msg}"),
        }
    }
}

impl std::error::Error for MeshError {}
