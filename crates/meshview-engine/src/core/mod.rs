//! Setup orchestration.
//!
//! Sequences the one-shot setup chain (device, mesh, renderer) and owns its
//! results for the lifetime of the window.

mod viewer;

pub use viewer::MeshViewer;
