/// Depth format shared by the depth target and both pipelines.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Depth attachment sized to the surface at setup.
///
/// Not recreated afterwards; the surface size is fixed for the process lifetime.
pub struct DepthTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&descriptor(width, height));
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("meshview depth view"),
            format: Some(DEPTH_FORMAT),
            aspect: wgpu::TextureAspect::All,
            ..Default::default()
        });
        Self { texture, view }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub(crate) fn destroy(&self) {
        self.texture.destroy();
    }
}

fn descriptor(width: u32, height: u32) -> wgpu::TextureDescriptor<'static> {
    wgpu::TextureDescriptor {
        label: Some("meshview depth texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_matches_surface() {
        let d = descriptor(1280, 720);
        assert_eq!(d.size.width, 1280);
        assert_eq!(d.size.height, 720);
        assert_eq!(d.size.depth_or_array_layers, 1);
        assert_eq!(d.format, wgpu::TextureFormat::Depth24Plus);
        assert_eq!(d.usage, wgpu::TextureUsages::RENDER_ATTACHMENT);
    }

    #[test]
    fn zero_extent_is_clamped() {
        let d = descriptor(0, 0);
        assert_eq!((d.size.width, d.size.height), (1, 1));
    }
}
