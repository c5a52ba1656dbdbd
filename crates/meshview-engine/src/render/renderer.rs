use super::depth::DepthTarget;
use super::frame::{FramePlan, PassResources};
use super::pipelines::{self, MeshPipelines};
use super::resources::MeshResources;
use super::shader::{self, ShaderAsset};
use crate::device::Gpu;
use crate::error::SetupError;
use crate::mesh::MeshData;

/// Every setup-phase output, bundled.
///
/// Built once after device acquisition and handed to each tick through
/// `RenderContext`. Buffers and the depth texture are destroyed when the
/// renderer is dropped, which must happen before the owning device goes away.
pub struct MeshRenderer {
    resources: MeshResources,
    pipelines: MeshPipelines,
    depth: DepthTarget,
    plan: FramePlan,
}

impl MeshRenderer {
    /// Resource builder, pipeline builder and depth target, in that order.
    pub fn new(gpu: &Gpu<'_>, mesh: &MeshData, shader: &ShaderAsset) -> Result<Self, SetupError> {
        let source = shader.load()?;

        let device = gpu.device();

        let resources = MeshResources::new(device, gpu.queue(), mesh)?;

        let module = shader::create_module(device, &source)?;
        let layout = pipelines::create_pipeline_layout(device, resources.bind_group_layout());
        let pipelines = MeshPipelines::new(device, &module, &layout, gpu.surface_format());
        log::info!("pipelines ready for {:?}", gpu.surface_format());

        let size = gpu.size();
        let depth = DepthTarget::new(device, size.width, size.height);
        log::debug!("depth target {}x{}", size.width, size.height);

        let counts = resources.counts();
        let plan = FramePlan::new(
            counts.edge_vertices,
            counts.triangle_vertices,
            size.width,
            size.height,
        );

        Ok(Self {
            resources,
            pipelines,
            depth,
            plan,
        })
    }

    pub fn plan(&self) -> &FramePlan {
        &self.plan
    }

    pub fn resources(&self) -> &MeshResources {
        &self.resources
    }

    pub(crate) fn pass_resources(&self) -> PassResources<'_> {
        PassResources {
            edges: &self.pipelines.edges,
            triangles: &self.pipelines.triangles,
            bind_group: self.resources.bind_group(),
            depth_view: self.depth.view(),
        }
    }
}

impl Drop for MeshRenderer {
    fn drop(&mut self) {
        log::debug!("releasing mesh renderer GPU resources");
        self.resources.destroy();
        self.depth.destroy();
    }
}
