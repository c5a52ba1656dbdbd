use std::fmt;

use crate::mesh::MeshError;

/// Failure during one-shot setup.
///
/// Every variant is fatal: the runtime logs it and terminates. There is no
/// partial mode (e.g. triangles without edges).
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// No usable GPU: surface, adapter or device negotiation was refused.
    Capability(String),
    /// Shader source failed to parse/validate or lacks a required entry point.
    ShaderCompile(String),
    /// A buffer, layout, texture or pipeline cannot be created on this device.
    ResourceCreation(String),
    /// The mesh source produced data that violates the mesh contract.
    Mesh(MeshError),
}

impl SetupError {
    pub(crate) fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
    }

    pub(crate) fn shader(msg: impl Into<String>) -> Self {
        Self::ShaderCompile(msg.into())
    }

    pub(crate) fn resource(msg: impl Into<String>) -> Self {
        Self::ResourceCreation(msg.into())
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capability(msg) => write!(f, "GPU capability error: {msg}"),
            Self::ShaderCompile(msg) => write!(f, "shader compile error: {msg}"),
            Self::ResourceCreation(msg) => write!(f, "resource creation error: {msg}"),
            Self::Mesh(err) => write!(f, "invalid mesh: {err}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Mesh(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MeshError> for SetupError {
    fn from(err: MeshError) -> Self {
        Self::Mesh(err)
    }
}
