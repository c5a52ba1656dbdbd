use super::bindings::{self, BufferRole};
use super::frame::FrameUniform;
use super::writer::{self, BufferWriter};
use crate::error::SetupError;
use crate::mesh::MeshData;

/// Byte sizes of the four buffers for one mesh.
///
/// Each storage buffer holds the flattened 32-bit array: `V*16`, `E*8`, `T*16`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferLayout {
    pub uniform: u64,
    pub vertices: u64,
    pub edges: u64,
    pub triangles: u64,
}

impl BufferLayout {
    pub fn for_mesh(mesh: &MeshData) -> Self {
        const SCALAR: u64 = 4;
        Self {
            uniform: std::mem::size_of::<FrameUniform>() as u64,
            vertices: mesh.vertex_count() as u64 * 4 * SCALAR,
            edges: mesh.edge_index_count() as u64 * SCALAR,
            triangles: mesh.triangle_index_count() as u64 * SCALAR,
        }
    }

    pub fn size(&self, role: BufferRole) -> u64 {
        match role {
            BufferRole::Uniform => self.uniform,
            BufferRole::Vertices => self.vertices,
            BufferRole::Edges => self.edges,
            BufferRole::Triangles => self.triangles,
        }
    }

    /// Rejects sizes the device would refuse, before anything is allocated.
    pub fn check_limits(&self, limits: &wgpu::Limits) -> Result<(), SetupError> {
        let max_buffer = u64::from(limits.max_buffer_size);
        let max_storage = u64::from(limits.max_storage_buffer_binding_size);
        let max_uniform = u64::from(limits.max_uniform_buffer_binding_size);

        for role in BufferRole::ALL {
            let size = self.size(role);
            let binding_max = match role {
                BufferRole::Uniform => max_uniform,
                _ => max_storage,
            };
            if size == 0 {
                return Err(SetupError::resource(format!("{} would be empty", role.label())));
            }
            if size > max_buffer || size > binding_max {
                return Err(SetupError::resource(format!(
                    "{} needs {size} bytes; device allows {} per binding",
                    role.label(),
                    binding_max.min(max_buffer)
                )));
            }
        }
        Ok(())
    }
}

/// Vertex counts for the two non-indexed draws.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCounts {
    /// Flattened edge index count (`2 * E`).
    pub edge_vertices: u32,
    /// Flattened triangle index count, pad included (`4 * T`).
    pub triangle_vertices: u32,
}

impl DrawCounts {
    pub fn for_mesh(mesh: &MeshData) -> Result<Self, SetupError> {
        let count = |n: usize, what: &str| {
            u32::try_from(n)
                .map_err(|_| SetupError::resource(format!("{what} draw of {n} vertices exceeds u32")))
        };
        Ok(Self {
            edge_vertices: count(mesh.edge_index_count(), "edge")?,
            triangle_vertices: count(mesh.triangle_index_count(), "triangle")?,
        })
    }
}

/// The four GPU buffers.
pub struct MeshBuffers {
    pub uniform: wgpu::Buffer,
    pub vertices: wgpu::Buffer,
    pub edges: wgpu::Buffer,
    pub triangles: wgpu::Buffer,
}

impl MeshBuffers {
    pub fn get(&self, role: BufferRole) -> &wgpu::Buffer {
        match role {
            BufferRole::Uniform => &self.uniform,
            BufferRole::Vertices => &self.vertices,
            BufferRole::Edges => &self.edges,
            BufferRole::Triangles => &self.triangles,
        }
    }
}

/// `BufferWriter` over the device queue.
pub struct QueueWriter<'a> {
    pub queue: &'a wgpu::Queue,
    pub buffers: &'a MeshBuffers,
}

impl BufferWriter for QueueWriter<'_> {
    fn write(&mut self, role: BufferRole, bytes: &[u8]) {
        self.queue.write_buffer(self.buffers.get(role), 0, bytes);
    }
}

/// Output of the resource builder: buffers, bind-group layout and bind group.
///
/// The bind group is created once and reused for every frame.
pub struct MeshResources {
    buffers: MeshBuffers,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    counts: DrawCounts,
}

impl MeshResources {
    /// Allocates the buffers, declares the layout and uploads `mesh`.
    ///
    /// The uniform buffer is left unwritten; its first write happens in the
    /// first frame tick.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        mesh: &MeshData,
    ) -> Result<Self, SetupError> {
        let layout = BufferLayout::for_mesh(mesh);
        layout.check_limits(&device.limits())?;
        let counts = DrawCounts::for_mesh(mesh)?;

        let create = |role: BufferRole| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(role.label()),
                size: layout.size(role),
                usage: role.usage(),
                mapped_at_creation: false,
            })
        };

        let buffers = MeshBuffers {
            uniform: create(BufferRole::Uniform),
            vertices: create(BufferRole::Vertices),
            edges: create(BufferRole::Edges),
            triangles: create(BufferRole::Triangles),
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("meshview bgl"),
            entries: &bindings::bind_group_layout_entries(),
        });

        let entries = BufferRole::ALL.map(|role| wgpu::BindGroupEntry {
            binding: role.binding(),
            resource: buffers.get(role).as_entire_binding(),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meshview bind group"),
            layout: &bind_group_layout,
            entries: &entries,
        });

        writer::upload_mesh(&mut QueueWriter { queue, buffers: &buffers }, mesh);

        log::info!(
            "mesh uploaded: {} vertices ({} B), {} edges ({} B), {} triangles ({} B)",
            mesh.vertex_count(),
            layout.vertices,
            mesh.edge_count(),
            layout.edges,
            mesh.triangle_count(),
            layout.triangles
        );

        Ok(Self {
            buffers,
            bind_group_layout,
            bind_group,
            counts,
        })
    }

    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn counts(&self) -> DrawCounts {
        self.counts
    }

    pub(crate) fn destroy(&self) {
        for role in BufferRole::ALL {
            self.buffers.get(role).destroy();
        }
    }
}
