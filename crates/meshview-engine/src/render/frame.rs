//! Per-frame data: the uniform value and the render pass description.
//!
//! `FramePlan` is fixed at setup (surface size and draw counts never change)
//! and replayed into a fresh encoder every tick by `encode_pass`.

use bytemuck::{Pod, Zeroable};

/// Upper end of the viewport depth range. Keeps 1.0 reserved for the depth
/// clear value so no drawn fragment ties with the cleared far plane.
pub const VIEWPORT_MAX_DEPTH: f32 = 0.9999;
pub const VIEWPORT_MIN_DEPTH: f32 = 0.0;
pub const CLEAR_DEPTH: f32 = 1.0;
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::WHITE;

/// Contents of the uniform buffer: elapsed time in seconds.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub time: f32,
}

impl FrameUniform {
    /// Converts a frame timestamp in milliseconds to seconds.
    pub fn from_timestamp_ms(timestamp_ms: f64) -> Self {
        Self {
            time: (timestamp_ms * 0.001) as f32,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Whole surface, depth range `[0.0, 0.9999]`.
    pub fn full_surface(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: VIEWPORT_MIN_DEPTH,
            max_depth: VIEWPORT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawTarget {
    Edges,
    Triangles,
}

/// One non-indexed draw; the shader pulls indices from storage by vertex id.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub target: DrawTarget,
    pub vertex_count: u32,
}

/// Everything a tick records into its render pass, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear_color: wgpu::Color,
    pub clear_depth: f32,
    pub viewport: Viewport,
    /// Edges first, then triangles.
    pub draws: [DrawCall; 2],
}

impl FramePlan {
    pub fn new(edge_vertices: u32, triangle_vertices: u32, width: u32, height: u32) -> Self {
        Self {
            clear_color: CLEAR_COLOR,
            clear_depth: CLEAR_DEPTH,
            viewport: Viewport::full_surface(width, height),
            draws: [
                DrawCall {
                    target: DrawTarget::Edges,
                    vertex_count: edge_vertices,
                },
                DrawCall {
                    target: DrawTarget::Triangles,
                    vertex_count: triangle_vertices,
                },
            ],
        }
    }

    pub fn draw_count(&self, target: DrawTarget) -> Option<u32> {
        self.draws
            .iter()
            .find(|d| d.target == target)
            .map(|d| d.vertex_count)
    }
}

/// GPU handles a pass needs; borrowed from the renderer for one tick.
pub struct PassResources<'a> {
    pub edges: &'a wgpu::RenderPipeline,
    pub triangles: &'a wgpu::RenderPipeline,
    pub bind_group: &'a wgpu::BindGroup,
    pub depth_view: &'a wgpu::TextureView,
}

/// Records `plan` as a single render pass into `encoder`.
pub fn encode_pass(
    plan: &FramePlan,
    encoder: &mut wgpu::CommandEncoder,
    color_view: &wgpu::TextureView,
    res: &PassResources<'_>,
) {
    let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("meshview mesh pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(plan.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: res.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(plan.clear_depth),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });

    let vp = plan.viewport;
    rpass.set_viewport(vp.x, vp.y, vp.width, vp.height, vp.min_depth, vp.max_depth);

    // Bound once; both pipelines share the layout.
    rpass.set_bind_group(0, res.bind_group, &[]);

    for draw in &plan.draws {
        let pipeline = match draw.target {
            DrawTarget::Edges => res.edges,
            DrawTarget::Triangles => res.triangles,
        };
        rpass.set_pipeline(pipeline);
        rpass.draw(0..draw.vertex_count, 0..1);
    }
}
