//! Bind-group contract shared by the resource builder and the shader.
//!
//! Slot | resource            | stage
//! -----|---------------------|---------
//! 0    | uniform time (f32)  | fragment
//! 1    | vertex storage      | vertex
//! 2    | edge storage        | vertex
//! 3    | triangle storage    | vertex

pub const UNIFORM_BINDING: u32 = 0;
pub const VERTEX_BINDING: u32 = 1;
pub const EDGE_BINDING: u32 = 2;
pub const TRIANGLE_BINDING: u32 = 3;

/// Identifies one of the four GPU buffers owned by the renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferRole {
    Uniform,
    Vertices,
    Edges,
    Triangles,
}

impl BufferRole {
    pub const ALL: [BufferRole; 4] = [
        BufferRole::Uniform,
        BufferRole::Vertices,
        BufferRole::Edges,
        BufferRole::Triangles,
    ];

    pub fn binding(self) -> u32 {
        match self {
            BufferRole::Uniform => UNIFORM_BINDING,
            BufferRole::Vertices => VERTEX_BINDING,
            BufferRole::Edges => EDGE_BINDING,
            BufferRole::Triangles => TRIANGLE_BINDING,
        }
    }

    pub fn visibility(self) -> wgpu::ShaderStages {
        match self {
            BufferRole::Uniform => wgpu::ShaderStages::FRAGMENT,
            _ => wgpu::ShaderStages::VERTEX,
        }
    }

    pub fn binding_type(self) -> wgpu::BufferBindingType {
        match self {
            BufferRole::Uniform => wgpu::BufferBindingType::Uniform,
            _ => wgpu::BufferBindingType::Storage { read_only: true },
        }
    }

    pub fn usage(self) -> wgpu::BufferUsages {
        match self {
            BufferRole::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            _ => wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BufferRole::Uniform => "meshview uniform buffer",
            BufferRole::Vertices => "meshview vertex buffer",
            BufferRole::Edges => "meshview edge buffer",
            BufferRole::Triangles => "meshview triangle buffer",
        }
    }
}

/// Layout entries in binding order.
pub fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 4] {
    BufferRole::ALL.map(|role| wgpu::BindGroupLayoutEntry {
        binding: role.binding(),
        visibility: role.visibility(),
        ty: wgpu::BindingType::Buffer {
            ty: role.binding_type(),
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_slots_are_contiguous_from_zero() {
        let entries = bind_group_layout_entries();
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2, 3]);
    }

    #[test]
    fn uniform_is_fragment_only_and_storage_is_vertex_read_only() {
        let entries = bind_group_layout_entries();

        assert_eq!(entries[0].visibility, wgpu::ShaderStages::FRAGMENT);
        assert!(matches!(
            entries[0].ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                ..
            }
        ));

        for entry in &entries[1..] {
            assert_eq!(entry.visibility, wgpu::ShaderStages::VERTEX);
            assert!(matches!(
                entry.ty,
                wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    ..
                }
            ));
        }
    }

    #[test]
    fn storage_buffers_are_never_uniform() {
        for role in [BufferRole::Vertices, BufferRole::Edges, BufferRole::Triangles] {
            assert!(role.usage().contains(wgpu::BufferUsages::STORAGE));
            assert!(!role.usage().contains(wgpu::BufferUsages::UNIFORM));
        }
        assert!(BufferRole::Uniform.usage().contains(wgpu::BufferUsages::COPY_DST));
    }
}
