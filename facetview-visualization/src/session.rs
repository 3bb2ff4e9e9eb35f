//! Everything the viewer edits between frames, kept apart from the window and GPU

use std::path::Path;

use facetview_core::{BoundingBox, MaterialDefaults, Result, Scene};
use facetview_io::read_model;
use tracing::{error, info, warn};

use crate::camera::{Camera, CameraSetup};
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::panel::{ControlPanel, PanelEdit};

/// Scene, camera, controls and panel state of one viewer session.
///
/// Only one model is drawn per session. Once a load succeeds, file
/// selection is disabled and later loads are ignored.
#[derive(Debug, Clone)]
pub struct Session {
    pub scene: Scene,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub panel: ControlPanel,
    materials: MaterialDefaults,
    camera_setup: CameraSetup,
    width: u32,
    height: u32,
}

impl Session {
    /// Start a session on a `width` x `height` surface, loading the
    /// configured model if there is one.
    pub fn new(config: &ViewerConfig, width: u32, height: u32) -> Self {
        let aspect_ratio = width as f32 / height.max(1) as f32;
        let camera = Camera::frame_bounds(&BoundingBox::empty(), aspect_ratio, &config.camera);
        let mut panel = ControlPanel::new();
        let scene = Scene::default();
        panel.bind(&scene, &camera);

        let mut session = Self {
            scene,
            camera,
            controls: OrbitControls::new(width, height),
            panel,
            materials: config.materials.clone(),
            camera_setup: config.camera.clone(),
            width,
            height,
        };
        if let Some(path) = &config.model_path {
            session.load_model(path);
        }
        session
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Read, build and frame a model.
    ///
    /// Returns true when a new scene replaced the current one and needs
    /// uploading. Failures are logged and listed in the panel.
    pub fn load_model(&mut self, path: &Path) -> bool {
        if !self.panel.file_selection_enabled() {
            warn!("ignoring {}: a model is already loaded", path.display());
            return false;
        }

        self.panel.push_info(format!("Found {}", path.display()));
        let built = read_model(path).and_then(|bundle| Scene::build(&bundle, &self.materials));
        let scene = match built {
            Ok(scene) => scene,
            Err(e) => {
                error!("failed to load {}: {}", path.display(), e);
                self.panel.push_info(format!("Error: {}", e));
                return false;
            }
        };

        self.panel.push_info("drawing model..");
        info!(
            "drawing model: {} materials, {} points, {} triangles",
            scene.len(),
            scene.vertex_count(),
            scene.face_count()
        );

        self.camera = Camera::frame_bounds(scene.bounds(), self.aspect_ratio(), &self.camera_setup);
        self.panel.bind(&scene, &self.camera);
        self.panel.disable_file_selection();
        self.scene = scene;
        true
    }

    /// Apply one panel edit. `OpenFile` is left to the caller.
    pub fn apply(&mut self, edit: &PanelEdit) -> Result<()> {
        self.panel.apply(edit, &mut self.scene, &mut self.camera)
    }

    /// Track a new surface size; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.width = width;
        self.height = height;
        self.camera.resize(width, height);
        self.controls.resize(width, height);
    }
}
