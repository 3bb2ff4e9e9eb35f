//! Viewer configuration

use std::path::PathBuf;

use facetview_core::MaterialDefaults;
use facetview_gpu::MeshRenderConfig;

use crate::camera::CameraSetup;

/// Everything the viewer needs before the first frame
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    /// Initial window size in logical pixels
    pub width: u32,
    pub height: u32,
    /// Model loaded at startup; without one the viewer waits for a file
    pub model_path: Option<PathBuf>,
    pub materials: MaterialDefaults,
    pub camera: CameraSetup,
    pub render: MeshRenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "facetview".to_string(),
            width: 1200,
            height: 800,
            model_path: None,
            materials: MaterialDefaults::default(),
            camera: CameraSetup::default(),
            render: MeshRenderConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn with_model(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }
}
