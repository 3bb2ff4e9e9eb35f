//! Camera placement for facetview scenes

use facetview_core::{sph2cart, BoundingBox, Point3f, Vector3f};
use nalgebra::{Matrix4, Perspective3};
use tracing::debug;

/// Maps the OpenGL clip depth range `[-1, 1]` produced by nalgebra onto the
/// `[0, 1]` range wgpu expects.
#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// How a freshly loaded model is framed
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSetup {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub azimuth_degrees: f32,
    pub elevation_degrees: f32,
    /// Near plane as a fraction of the model scale
    pub near_factor: f32,
    /// Far plane as a multiple of the model scale
    pub far_factor: f32,
}

impl Default for CameraSetup {
    fn default() -> Self {
        Self {
            fov_degrees: 70.0,
            azimuth_degrees: -37.5,
            elevation_degrees: 30.0,
            near_factor: 0.1,
            far_factor: 10.0,
        }
    }
}

/// A perspective camera looking at an orbit target
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3f,
    pub target: Point3f,
    pub up: Vector3f,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(
        position: Point3f,
        target: Point3f,
        up: Vector3f,
        fov_degrees: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self {
            position,
            target,
            up,
            fov_degrees,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Frame `bounds` from the configured direction.
    ///
    /// The eye sits one model scale away from the bounds center. Bounds
    /// with no extent use a unit scale, and empty bounds center on the origin.
    pub fn frame_bounds(bounds: &BoundingBox, aspect_ratio: f32, setup: &CameraSetup) -> Self {
        let center = bounds.center();
        let scale = match bounds.scale() {
            s if s > 0.0 => s,
            _ => 1.0,
        };

        let eye = center + sph2cart(setup.azimuth_degrees, setup.elevation_degrees) * scale;
        debug!("camera eye={:?} target={:?} scale={}", eye, center, scale);

        Self::new(
            eye,
            center,
            Vector3f::z(),
            setup.fov_degrees,
            aspect_ratio,
            scale * setup.near_factor,
            scale * setup.far_factor,
        )
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix in wgpu clip space
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov_degrees.to_radians(), self.near, self.far);
        opengl_to_wgpu() * perspective.into_inner()
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Distance from the eye to the orbit target
    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Update the aspect ratio from a framebuffer size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::frame_bounds(&BoundingBox::empty(), 16.0 / 9.0, &CameraSetup::default())
    }
}
