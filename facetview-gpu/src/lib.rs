//! # Facetview GPU
//!
//! wgpu rendering for facetview scenes.
//!
//! [`GpuContext`] owns the device and queue, [`RenderSurface`] wraps a
//! configured window surface and [`SceneRenderer`] draws every material
//! mesh of a [`facetview_core::Scene`] together with its edge overlay.

pub mod device;
pub mod mesh;

pub use device::{GpuContext, RenderSurface};
pub use mesh::{
    edge_geometry, surface_geometry, CameraUniform, EdgeVertex, GpuMaterialMesh, LightingUniform, MaterialUniform,
    MeshLightingParams, MeshRenderConfig, SceneRenderer, SurfaceVertex,
};
