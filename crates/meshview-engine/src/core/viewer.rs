use std::future::Future;

use winit::window::Window;

use crate::device::{Gpu, GpuInit};
use crate::error::SetupError;
use crate::mesh::{MeshData, MeshSource};
use crate::render::{MeshRenderer, RenderContext, ShaderAsset};

/// Device plus everything built on it, for one window.
///
/// Field order matters: `renderer` is dropped before `gpu`, so buffers and
/// the depth texture are destroyed while their device is still alive.
pub struct MeshViewer<'w> {
    renderer: MeshRenderer,
    gpu: Gpu<'w>,
}

impl<'w> MeshViewer<'w> {
    /// Runs the setup chain for `window`.
    ///
    /// The mesh source is only consulted once the device is acquired; any
    /// failure aborts the chain and nothing later runs.
    pub async fn new(
        window: &'w Window,
        init: GpuInit,
        shader: &ShaderAsset,
        source: &dyn MeshSource,
    ) -> Result<Self, SetupError> {
        let (gpu, renderer) = assemble(Gpu::new(window, init), source, |gpu, mesh| {
            MeshRenderer::new(gpu, &mesh, shader)
        })
        .await?;

        Ok(Self { renderer, gpu })
    }

    /// Per-tick context handed to the frame scheduler.
    pub fn context(&mut self) -> RenderContext<'_, 'w> {
        RenderContext::new(&mut self.gpu, &self.renderer)
    }
}

/// Device acquisition, then mesh generation, then `build`.
pub(crate) async fn assemble<G, R, F>(
    acquire: F,
    source: &dyn MeshSource,
    build: impl FnOnce(&G, MeshData) -> Result<R, SetupError>,
) -> Result<(G, R), SetupError>
where
    F: Future<Output = Result<G, SetupError>>,
{
    let device = acquire.await?;

    let mesh = source.generate()?;
    log::debug!(
        "mesh generated: {} vertices, {} edges, {} triangles",
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.triangle_count()
    );

    let built = build(&device, mesh)?;
    Ok((device, built))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshError;
    use std::cell::Cell;

    struct CountingSource {
        calls: Cell<usize>,
        fail: bool,
    }

    impl CountingSource {
        fn new(fail: bool) -> Self {
            Self {
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl MeshSource for CountingSource {
        fn generate(&self) -> Result<MeshData, MeshError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(MeshError::Empty("vertices"));
            }
            MeshData::from_flat(
                &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
                &[0, 1, 1, 2, 2, 0],
                &[0, 1, 2, 0],
            )
        }
    }

    #[test]
    fn capability_failure_stops_the_chain() {
        let source = CountingSource::new(false);
        let built = Cell::new(false);

        let result = pollster::block_on(assemble(
            async { Err::<(), _>(SetupError::Capability("no adapter".into())) },
            &source,
            |_, _| {
                built.set(true);
                Ok(())
            },
        ));

        assert_eq!(
            result.unwrap_err(),
            SetupError::Capability("no adapter".into())
        );
        assert_eq!(source.calls.get(), 0);
        assert!(!built.get());
    }

    #[test]
    fn mesh_failure_skips_build() {
        let source = CountingSource::new(true);
        let built = Cell::new(false);

        let result = pollster::block_on(assemble(async { Ok(7u32) }, &source, |_, _| {
            built.set(true);
            Ok(())
        }));

        assert!(matches!(result, Err(SetupError::Mesh(MeshError::Empty(_)))));
        assert_eq!(source.calls.get(), 1);
        assert!(!built.get());
    }

    #[test]
    fn success_hands_device_and_mesh_to_build() {
        let source = CountingSource::new(false);

        let (device, counts) = pollster::block_on(assemble(async { Ok(7u32) }, &source, |d, mesh| {
            assert_eq!(*d, 7);
            Ok((mesh.edge_index_count(), mesh.triangle_index_count()))
        }))
        .unwrap();

        assert_eq!(device, 7);
        assert_eq!(counts, (6, 4));
        assert_eq!(source.calls.get(), 1);
    }
}
