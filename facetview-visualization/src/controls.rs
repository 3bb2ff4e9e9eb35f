//! Orbit controls around the camera target
//!
//! Left drag orbits about the +Z axis through the target, right or middle
//! drag pans target and eye together in the screen plane, and the wheel
//! dollies towards the target. Every change recomputes the eye from the
//! spherical offset to the target.

use std::f32::consts::TAU;

use facetview_core::{Spherical, Vector3f};
use nalgebra::{vector, Vector2};
use winit::event::MouseButton;

use crate::camera::Camera;

/// Smallest angle kept between the view direction and the poles
const POLE_MARGIN: f32 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq)]
enum ControlInputMode {
    None,
    Rotate { last: Vector2<f64> },
    Pan { last: Vector2<f64> },
}

/// Mouse-driven orbit, pan and dolly for a [`Camera`]
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    /// Dolly never brings the eye closer than this or the camera near plane
    pub min_distance: f32,
    screen_size: Vector2<f64>,
    cursor_pos: Option<Vector2<f64>>,
    input_mode: ControlInputMode,
}

impl OrbitControls {
    /// Creates the controller for a `width` x `height` framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            screen_size: vector![width.max(1) as f64, height.max(1) as f64],
            cursor_pos: None,
            input_mode: ControlInputMode::None,
        }
    }

    /// Call when the size of the screen changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.screen_size = vector![width as f64, height as f64];
        }
    }

    /// True while a drag is in progress
    pub fn is_active(&self) -> bool {
        self.input_mode != ControlInputMode::None
    }

    /// Call when receiving mouse button input.
    pub fn mouse_input(&mut self, button: MouseButton, pressed: bool) {
        if !pressed {
            self.input_mode = ControlInputMode::None;
            return;
        }
        let Some(pos) = self.cursor_pos else {
            return;
        };
        self.input_mode = match button {
            MouseButton::Left => ControlInputMode::Rotate { last: pos },
            MouseButton::Right | MouseButton::Middle => ControlInputMode::Pan { last: pos },
            _ => self.input_mode,
        };
    }

    /// Call when receiving cursor events.
    pub fn cursor_moved(&mut self, camera: &mut Camera, position: Vector2<f64>) {
        self.cursor_pos = Some(position);
        match self.input_mode {
            ControlInputMode::Rotate { last } => {
                let delta = position - last;
                self.rotate(camera, delta.x as f32, delta.y as f32);
                self.input_mode = ControlInputMode::Rotate { last: position };
            }
            ControlInputMode::Pan { last } => {
                let delta = position - last;
                self.pan(camera, delta.x as f32, delta.y as f32);
                self.input_mode = ControlInputMode::Pan { last: position };
            }
            ControlInputMode::None => {}
        }
    }

    /// Call with the wheel delta in lines; positive values move towards the target.
    pub fn mouse_wheel(&mut self, camera: &mut Camera, delta: f32) {
        let scale = 0.95f32.powf(self.zoom_speed * delta);
        self.dolly(camera, scale);
    }

    /// Orbit by a drag of `dx`, `dy` pixels. A full screen height turns once around.
    pub fn rotate(&self, camera: &mut Camera, dx: f32, dy: f32) {
        let height = self.screen_size.y as f32;
        let mut spherical = Spherical::from_offset(&(camera.position - camera.target));
        spherical.azimuth -= TAU * dx / height * self.rotate_speed;
        spherical.elevation += TAU * dy / height * self.rotate_speed;
        spherical.clamp_elevation(POLE_MARGIN);
        camera.position = camera.target + spherical.to_offset();
    }

    /// Move target and eye so that the point under the cursor follows a drag of `dx`, `dy` pixels.
    pub fn pan(&self, camera: &mut Camera, dx: f32, dy: f32) {
        let offset = camera.position - camera.target;
        let half_fov = 0.5 * camera.fov_degrees.to_radians();
        let target_distance = offset.norm() * half_fov.tan();
        let height = self.screen_size.y as f32;

        let forward = -offset.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::x);
        let right = forward.cross(&camera.up).try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::x);
        let up = right.cross(&forward);

        let shift = right * (-2.0 * dx * target_distance / height * self.pan_speed)
            + up * (2.0 * dy * target_distance / height * self.pan_speed);
        camera.position += shift;
        camera.target += shift;
    }

    /// Scale the eye distance to the target by `1 / scale`.
    pub fn dolly(&self, camera: &mut Camera, scale: f32) {
        if scale <= 0.0 {
            return;
        }
        let mut spherical = Spherical::from_offset(&(camera.position - camera.target));
        if spherical.radius == 0.0 {
            return;
        }
        spherical.radius = (spherical.radius * scale).max(self.min_distance.max(camera.near));
        camera.position = camera.target + spherical.to_offset();
    }
}
