//! Spherical coordinate utilities for camera placement and orbiting
//!
//! Angles follow the MATLAB convention used by the exporter: azimuth is
//! measured in the XY plane from +X towards +Y, elevation from the XY plane
//! towards +Z.

use serde::{Deserialize, Serialize};

use crate::point::*;

/// Convert azimuth/elevation in degrees to a unit direction vector
pub fn sph2cart(azimuth_deg: f32, elevation_deg: f32) -> Vector3f {
    let az = azimuth_deg.to_radians();
    let el = elevation_deg.to_radians();
    Vector3f::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
}

/// Inverse of [`sph2cart`]: returns `(azimuth_deg, elevation_deg)` of `dir`.
pub fn cart2sph(dir: &Vector3f) -> (f32, f32) {
    let horizontal = (dir.x * dir.x + dir.y * dir.y).sqrt();
    (dir.y.atan2(dir.x).to_degrees(), dir.z.atan2(horizontal).to_degrees())
}

/// An offset from an orbit target in Z-up spherical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    pub radius: f32,
    /// Azimuth in radians
    pub azimuth: f32,
    /// Elevation in radians, in `[-pi/2, pi/2]`
    pub elevation: f32,
}

impl Spherical {
    pub fn new(radius: f32, azimuth: f32, elevation: f32) -> Self {
        Self { radius, azimuth, elevation }
    }

    pub fn from_offset(offset: &Vector3f) -> Self {
        let radius = offset.norm();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        let (az, el) = cart2sph(offset);
        Self::new(radius, az.to_radians(), el.to_radians())
    }

    pub fn to_offset(&self) -> Vector3f {
        sph2cart(self.azimuth.to_degrees(), self.elevation.to_degrees()) * self.radius
    }

    /// Keep the elevation `margin` radians away from the poles
    pub fn clamp_elevation(&mut self, margin: f32) {
        let limit = std::f32::consts::FRAC_PI_2 - margin;
        self.elevation = self.elevation.clamp(-limit, limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sph2cart_default_view() {
        let v = sph2cart(-37.5, 30.0);
        let (az, el) = (-37.5f32.to_radians(), 30f32.to_radians());

        assert_relative_eq!(v.x, el.cos() * az.cos(), epsilon = 1e-6);
        assert_relative_eq!(v.y, el.cos() * az.sin(), epsilon = 1e-6);
        assert_relative_eq!(v.z, 0.5, epsilon = 1e-6);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-6);
        // Negative azimuth puts the camera on the -Y side
        assert!(v.x > 0.0 && v.y < 0.0);
    }

    #[test]
    fn test_sph2cart_axes() {
        assert_relative_eq!(sph2cart(0.0, 0.0), Vector3f::x(), epsilon = 1e-6);
        assert_relative_eq!(sph2cart(90.0, 0.0), Vector3f::y(), epsilon = 1e-6);
        assert_relative_eq!(sph2cart(123.0, 90.0), Vector3f::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_cart2sph_inverts_sph2cart() {
        let (az, el) = cart2sph(&sph2cart(-37.5, 30.0));
        assert_relative_eq!(az, -37.5, epsilon = 1e-4);
        assert_relative_eq!(el, 30.0, epsilon = 1e-4);
    }

    #[test]
    fn test_spherical_offset() {
        let offset = Vector3f::new(3.0, -4.0, 5.0);
        let s = Spherical::from_offset(&offset);
        assert_relative_eq!(s.radius, offset.norm());
        assert_relative_eq!(s.to_offset(), offset, epsilon = 1e-5);
    }

    #[test]
    fn test_clamp_elevation() {
        let mut s = Spherical::new(1.0, 0.0, 2.0);
        s.clamp_elevation(0.01);
        assert_relative_eq!(s.elevation, std::f32::consts::FRAC_PI_2 - 0.01);
    }
}
