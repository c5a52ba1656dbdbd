use super::MeshError;

/// Vertex position `(x, y, z, pad)`; the pad keeps a 16-byte stride for
/// `array<vec4<f32>>` storage reads.
pub type Vertex = [f32; 4];

/// Pair of vertex indices.
pub type Edge = [u32; 2];

/// Vertex index triple followed by an unused pad slot.
pub type Triangle = [u32; 4];

/// Immutable, validated mesh arrays.
///
/// Every edge index and every triangle corner (slots 0..3) is below the vertex
/// count. The triangle pad slot is not an index and is never checked.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    triangles: Vec<Triangle>,
}

impl MeshData {
    /// Validates and wraps mesh arrays.
    pub fn new(
        vertices: Vec<Vertex>,
        edges: Vec<Edge>,
        triangles: Vec<Triangle>,
    ) -> Result<Self, MeshError> {
        if vertices.is_empty() {
            return Err(MeshError::Empty("vertices"));
        }
        if edges.is_empty() {
            return Err(MeshError::Empty("edges"));
        }
        if triangles.is_empty() {
            return Err(MeshError::Empty("triangles"));
        }

        let vertex_count = vertices.len();
        check_indices("edges", edges.iter().map(|e| &e[..]), vertex_count)?;
        check_indices("triangles", triangles.iter().map(|t| &t[..3]), vertex_count)?;

        Ok(Self {
            vertices,
            edges,
            triangles,
        })
    }

    /// Builds a mesh from flattened arrays (4 floats per vertex, 2 indices per
    /// edge, 4 values per triangle).
    pub fn from_flat(vertices: &[f32], edges: &[u32], triangles: &[u32]) -> Result<Self, MeshError> {
        Self::new(
            chunk("vertices", vertices)?,
            chunk("edges", edges)?,
            chunk("triangles", triangles)?,
        )
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of scalars in the flattened edge array (`2 * E`).
    pub fn edge_index_count(&self) -> usize {
        self.edges.len() * 2
    }

    /// Number of scalars in the flattened triangle array, pad included (`4 * T`).
    pub fn triangle_index_count(&self) -> usize {
        self.triangles.len() * 4
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn edge_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.edges)
    }

    pub fn triangle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}

fn check_indices<'a>(
    what: &'static str,
    elements: impl Iterator<Item = &'a [u32]>,
    vertex_count: usize,
) -> Result<(), MeshError> {
    for (element, indices) in elements.enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                what,
                element,
                index,
                vertex_count,
            });
        }
    }
    Ok(())
}

fn chunk<T: Copy, const N: usize>(what: &'static str, flat: &[T]) -> Result<Vec<[T; N]>, MeshError> {
    if flat.len() % N != 0 {
        return Err(MeshError::Misaligned {
            what,
            len: flat.len(),
            stride: N,
        });
    }
    Ok(flat
        .chunks_exact(N)
        .map(|c| std::array::from_fn(|i| c[i]))
        .collect())
}
