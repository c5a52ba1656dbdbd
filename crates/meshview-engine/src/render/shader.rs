//! Shader source loading and up-front validation.
//!
//! wgpu reports shader errors through its uncaptured-error handler, which
//! panics by default. The WGSL is therefore parsed and validated with naga
//! first so failures surface as `SetupError::ShaderCompile` with naga's
//! diagnostic text.

use std::borrow::Cow;
use std::path::PathBuf;

use super::bindings::BufferRole;
use crate::error::SetupError;

pub const VERTEX_EDGE_ENTRY: &str = "mainVertexEdge";
pub const FRAGMENT_EDGE_ENTRY: &str = "mainFragmentEdge";
pub const VERTEX_TRIG_ENTRY: &str = "mainVertexTrig";
pub const FRAGMENT_TRIG_ENTRY: &str = "mainFragmentTrig";

const REQUIRED_ENTRY_POINTS: [(&str, naga::ShaderStage); 4] = [
    (VERTEX_EDGE_ENTRY, naga::ShaderStage::Vertex),
    (FRAGMENT_EDGE_ENTRY, naga::ShaderStage::Fragment),
    (VERTEX_TRIG_ENTRY, naga::ShaderStage::Vertex),
    (FRAGMENT_TRIG_ENTRY, naga::ShaderStage::Fragment),
];

const EMBEDDED_WGSL: &str = include_str!("shaders/mesh.wgsl");

/// Where the WGSL text comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ShaderAsset {
    /// The bundled `mesh.wgsl`.
    #[default]
    Embedded,
    /// A WGSL file read once at setup.
    File(PathBuf),
    /// Caller-supplied source text.
    Inline(String),
}

impl ShaderAsset {
    pub fn load(&self) -> Result<Cow<'_, str>, SetupError> {
        match self {
            ShaderAsset::Embedded => Ok(Cow::Borrowed(EMBEDDED_WGSL)),
            ShaderAsset::Inline(src) => Ok(Cow::Borrowed(src.as_str())),
            ShaderAsset::File(path) => {
                log::info!("loading shader from {}", path.display());
                std::fs::read_to_string(path).map(Cow::Owned).map_err(|e| {
                    SetupError::shader(format!("cannot read {}: {e}", path.display()))
                })
            }
        }
    }
}

/// Parses and validates `source`, then checks the four entry points and the
/// group 0 binding contract.
pub fn validate_wgsl(source: &str) -> Result<naga::Module, SetupError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| SetupError::shader(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    let info = validator
        .validate(&module)
        .map_err(|e| SetupError::shader(e.emit_to_string(source)))?;

    for (name, stage) in REQUIRED_ENTRY_POINTS {
        let found = module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage);
        if !found {
            return Err(SetupError::shader(format!(
                "entry point '{name}' not found for stage {stage:?}"
            )));
        }
    }

    for role in BufferRole::ALL {
        check_binding(&module, &info, role)?;
    }

    Ok(module)
}

fn check_binding(
    module: &naga::Module,
    info: &naga::valid::ModuleInfo,
    role: BufferRole,
) -> Result<(), SetupError> {
    let binding = role.binding();
    let global = module.global_variables.iter().find(|(_, var)| {
        var.binding
            .as_ref()
            .is_some_and(|b| b.group == 0 && b.binding == binding)
    });

    // Unused slots are allowed; the layout still declares them.
    let Some((handle, var)) = global else { return Ok(()) };

    let matches = match (role, var.space) {
        (BufferRole::Uniform, naga::AddressSpace::Uniform) => true,
        (BufferRole::Uniform, _) => false,
        (_, naga::AddressSpace::Storage { access }) => !access.contains(naga::StorageAccess::STORE),
        _ => false,
    };

    if !matches {
        return Err(SetupError::shader(format!(
            "@group(0) @binding({binding}) is declared as {:?}, expected {:?}",
            var.space,
            role.binding_type()
        )));
    }

    // The layout only exposes each slot to `role.visibility()`; any other
    // stage touching it fails pipeline creation inside wgpu.
    for (index, ep) in module.entry_points.iter().enumerate() {
        let Some(stage) = pipeline_stage(ep) else { continue };
        if info.get_entry_point(index)[handle].is_empty() {
            continue;
        }
        if !role.visibility().contains(stage) {
            return Err(SetupError::shader(format!(
                "entry point '{}' uses @group(0) @binding({binding}), which is only visible to {:?}",
                ep.name,
                role.visibility()
            )));
        }
    }

    Ok(())
}

/// Stage of `ep` if it is one of the pipeline entry points.
fn pipeline_stage(ep: &naga::EntryPoint) -> Option<wgpu::ShaderStages> {
    REQUIRED_ENTRY_POINTS
        .iter()
        .find(|(name, stage)| ep.name == *name && ep.stage == *stage)
        .map(|(_, stage)| match stage {
            naga::ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            naga::ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
            _ => wgpu::ShaderStages::empty(),
        })
}

/// Validates and creates the shared shader module.
pub fn create_module(device: &wgpu::Device, source: &str) -> Result<wgpu::ShaderModule, SetupError> {
    validate_wgsl(source)?;
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("meshview mesh shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded() -> String {
        ShaderAsset::Embedded.load().unwrap().into_owned()
    }

    #[test]
    fn embedded_shader_is_valid() {
        let module = validate_wgsl(&embedded()).unwrap();
        assert_eq!(module.entry_points.len(), 4);
    }

    #[test]
    fn syntax_error_reports_diagnostic() {
        let err = validate_wgsl("fn broken( {").unwrap_err();
        assert!(matches!(err, SetupError::ShaderCompile(ref msg) if !msg.is_empty()));
    }

    #[test]
    fn missing_entry_point_is_rejected() {
        let src = embedded().replace("mainFragmentTrig", "mainFragmentTriangle");
        let err = validate_wgsl(&src).unwrap_err();
        match err {
            SetupError::ShaderCompile(msg) => assert!(msg.contains("mainFragmentTrig")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn uniform_slot_declared_as_storage_is_rejected() {
        let src = r#"
            @group(0) @binding(0) var<storage, read> stamps: array<f32>;

            @vertex fn mainVertexEdge(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
                return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
            }
            @fragment fn mainFragmentEdge() -> @location(0) vec4<f32> { return vec4<f32>(stamps[0]); }
            @vertex fn mainVertexTrig(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
                return vec4<f32>(f32(i), 0.0, 0.0, 1.0);
            }
            @fragment fn mainFragmentTrig() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
        "#;
        let err = validate_wgsl(src).unwrap_err();
        assert!(matches!(err, SetupError::ShaderCompile(ref msg) if msg.contains("binding(0)")));
    }

    #[test]
    fn uniform_read_from_vertex_stage_is_rejected() {
        let src = embedded().replace(
            "result.position = vec4<f32>(to_clip(p), EDGE_DEPTH, 1.0);",
            "result.position = vec4<f32>(to_clip(p), EDGE_DEPTH + 0.0 * uniforms.time, 1.0);",
        );
        assert_ne!(src, embedded());
        let err = validate_wgsl(&src).unwrap_err();
        match err {
            SetupError::ShaderCompile(msg) => {
                assert!(msg.contains("mainVertexEdge"));
                assert!(msg.contains("binding(0)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn storage_read_from_fragment_stage_is_rejected() {
        let src = embedded().replace(
            "return vec4<f32>(0.0, 0.0, 0.0, 1.0);",
            "return vec4<f32>(0.0, 0.0, 0.0, vertices[0].w + 1.0);",
        );
        assert_ne!(src, embedded());
        let err = validate_wgsl(&src).unwrap_err();
        assert!(matches!(err, SetupError::ShaderCompile(ref msg) if msg.contains("mainFragmentEdge")));
    }

    #[test]
    fn missing_file_is_a_shader_error() {
        let asset = ShaderAsset::File(PathBuf::from("/nonexistent/meshview/mesh.wgsl"));
        assert!(matches!(asset.load(), Err(SetupError::ShaderCompile(_))));
    }

    #[test]
    fn inline_source_is_passed_through() {
        let asset = ShaderAsset::Inline("// empty".into());
        assert_eq!(asset.load().unwrap(), "// empty");
    }
}
