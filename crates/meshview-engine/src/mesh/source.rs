use super::{MeshData, MeshError};

/// Produces the mesh the renderer uploads at setup.
///
/// Called exactly once, after the GPU device has been acquired.
pub trait MeshSource {
    fn generate(&self) -> Result<MeshData, MeshError>;
}

impl MeshSource for MeshData {
    fn generate(&self) -> Result<MeshData, MeshError> {
        Ok(self.clone())
    }
}
