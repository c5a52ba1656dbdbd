use super::depth::DEPTH_FORMAT;
use super::shader::{
    FRAGMENT_EDGE_ENTRY, FRAGMENT_TRIG_ENTRY, VERTEX_EDGE_ENTRY, VERTEX_TRIG_ENTRY,
};

/// The two mesh pipelines. Both use the same shader module, pipeline layout
/// and depth state; they differ in entry points and topology.
pub struct MeshPipelines {
    pub edges: wgpu::RenderPipeline,
    pub triangles: wgpu::RenderPipeline,
}

/// Stage/topology selection for one pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PipelineVariant {
    pub label: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub topology: wgpu::PrimitiveTopology,
}

pub const EDGE_VARIANT: PipelineVariant = PipelineVariant {
    label: "meshview edge pipeline",
    vertex_entry: VERTEX_EDGE_ENTRY,
    fragment_entry: FRAGMENT_EDGE_ENTRY,
    topology: wgpu::PrimitiveTopology::LineList,
};

pub const TRIANGLE_VARIANT: PipelineVariant = PipelineVariant {
    label: "meshview triangle pipeline",
    vertex_entry: VERTEX_TRIG_ENTRY,
    fragment_entry: FRAGMENT_TRIG_ENTRY,
    topology: wgpu::PrimitiveTopology::TriangleList,
};

/// Write-enabled, `LessEqual`: a fill at the same depth as an already drawn
/// edge still passes, so both passes composite the same way.
pub fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::LessEqual,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

pub fn create_pipeline_layout(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("meshview pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    })
}

impl MeshPipelines {
    pub fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            edges: create_pipeline(device, shader, layout, format, EDGE_VARIANT),
            triangles: create_pipeline(device, shader, layout, format, TRIANGLE_VARIANT),
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    variant: PipelineVariant,
) -> wgpu::RenderPipeline {
    log::debug!(
        "creating {} ({} / {}, {:?})",
        variant.label,
        variant.vertex_entry,
        variant.fragment_entry,
        variant.topology
    );

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(variant.label),
        layout: Some(layout),

        // No vertex buffers: positions are pulled from storage by vertex id.
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(variant.vertex_entry),
            compilation_options: Default::default(),
            buffers: &[],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(variant.fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: variant.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(depth_stencil_state()),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_pick_distinct_entry_points_and_topologies() {
        assert_eq!(EDGE_VARIANT.vertex_entry, "mainVertexEdge");
        assert_eq!(EDGE_VARIANT.fragment_entry, "mainFragmentEdge");
        assert_eq!(EDGE_VARIANT.topology, wgpu::PrimitiveTopology::LineList);

        assert_eq!(TRIANGLE_VARIANT.vertex_entry, "mainVertexTrig");
        assert_eq!(TRIANGLE_VARIANT.fragment_entry, "mainFragmentTrig");
        assert_eq!(TRIANGLE_VARIANT.topology, wgpu::PrimitiveTopology::TriangleList);
    }

    #[test]
    fn depth_state_is_less_equal_with_writes() {
        let ds = depth_stencil_state();
        assert_eq!(ds.format, wgpu::TextureFormat::Depth24Plus);
        assert!(ds.depth_write_enabled);
        assert_eq!(ds.depth_compare, wgpu::CompareFunction::LessEqual);
    }
}
