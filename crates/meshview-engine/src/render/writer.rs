use super::bindings::BufferRole;
use super::frame::FrameUniform;
use crate::mesh::MeshData;

/// Host-to-device copy seam.
///
/// The renderer implements this over `wgpu::Queue::write_buffer`; every write
/// the renderer performs (mesh upload at setup, uniform each tick) goes through it.
pub trait BufferWriter {
    fn write(&mut self, role: BufferRole, bytes: &[u8]);
}

/// One copy per storage buffer. Runs once, at setup.
pub fn upload_mesh<W: BufferWriter + ?Sized>(writer: &mut W, mesh: &MeshData) {
    writer.write(BufferRole::Vertices, mesh.vertex_bytes());
    writer.write(BufferRole::Edges, mesh.edge_bytes());
    writer.write(BufferRole::Triangles, mesh.triangle_bytes());
}

/// Full 4-byte overwrite of the uniform buffer.
pub fn write_uniform<W: BufferWriter + ?Sized>(writer: &mut W, uniform: FrameUniform) {
    writer.write(BufferRole::Uniform, bytemuck::bytes_of(&uniform));
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// Captures every write in order.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingWriter {
        pub(crate) writes: Vec<(BufferRole, Vec<u8>)>,
    }

    impl RecordingWriter {
        pub(crate) fn roles(&self) -> Vec<BufferRole> {
            self.writes.iter().map(|(r, _)| *r).collect()
        }

        pub(crate) fn last(&self, role: BufferRole) -> Option<&[u8]> {
            self.writes
                .iter()
                .rev()
                .find(|(r, _)| *r == role)
                .map(|(_, b)| b.as_slice())
        }
    }

    impl BufferWriter for RecordingWriter {
        fn write(&mut self, role: BufferRole, bytes: &[u8]) {
            self.writes.push((role, bytes.to_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::RecordingWriter;
    use super::*;
    use crate::mesh::{MeshSource, UnitSquareMesher};

    #[test]
    fn upload_writes_each_storage_buffer_once() {
        let mesh = UnitSquareMesher::new(0.5).generate().unwrap();
        let mut w = RecordingWriter::default();
        upload_mesh(&mut w, &mesh);

        assert_eq!(
            w.roles(),
            vec![BufferRole::Vertices, BufferRole::Edges, BufferRole::Triangles]
        );
        assert_eq!(w.last(BufferRole::Vertices).unwrap().len(), mesh.vertex_count() * 16);
        assert_eq!(w.last(BufferRole::Edges).unwrap().len(), mesh.edge_count() * 8);
        assert_eq!(w.last(BufferRole::Triangles).unwrap().len(), mesh.triangle_count() * 16);
    }

    #[test]
    fn uniform_write_is_four_bytes() {
        let mut w = RecordingWriter::default();
        write_uniform(&mut w, FrameUniform::from_timestamp_ms(1500.0));
        assert_eq!(w.roles(), vec![BufferRole::Uniform]);
        assert_eq!(w.last(BufferRole::Uniform).unwrap(), &1.5f32.to_ne_bytes());
    }
}
