//! Surface and edge materials

use serde::{Deserialize, Serialize};

use crate::Color;

/// Which faces of a surface are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    #[default]
    Back,
    #[serde(alias = "double")]
    Both,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Front, Side::Back, Side::Both];

    /// Selector index used by the control panel: Front 0, Back 1, Both 2
    pub fn index(self) -> usize {
        match self {
            Side::Front => 0,
            Side::Back => 1,
            Side::Both => 2,
        }
    }

    /// Inverse of [`Side::index`]. Anything past 1 means both sides.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Side::Front,
            1 => Side::Back,
            _ => Side::Both,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Front => "Front",
            Side::Back => "Back",
            Side::Both => "Both",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Side {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "front" => Ok(Side::Front),
            "back" => Ok(Side::Back),
            "both" | "double" => Ok(Side::Both),
            other => Err(crate::Error::Parse(format!("unknown side '{}'", other))),
        }
    }
}

/// Lit, optionally transparent material of a surface mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
}

impl SurfaceMaterial {
    pub fn new(color: Color, defaults: &MaterialDefaults) -> Self {
        Self {
            color,
            opacity: defaults.opacity,
            transparent: defaults.transparent,
            side: defaults.side,
        }
    }

    /// Color and opacity packed for upload
    pub fn rgba(&self) -> [f32; 4] {
        let alpha = if self.transparent { self.opacity } else { 1.0 };
        [self.color.r, self.color.g, self.color.b, alpha]
    }
}

/// Unlit line material of an edge overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMaterial {
    pub color: Color,
}

impl Default for EdgeMaterial {
    fn default() -> Self {
        Self { color: Color::WHITE }
    }
}

/// Material settings applied to every group when a scene is built
#[derive(Debug, Clone)]
pub struct MaterialDefaults {
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    pub edge_color: Color,
    /// Minimum angle between neighbouring faces for their shared edge to be drawn
    pub edge_threshold_degrees: f32,
}

impl Default for MaterialDefaults {
    fn default() -> Self {
        Self {
            opacity: 0.95,
            transparent: true,
            side: Side::Back,
            edge_color: Color::WHITE,
            edge_threshold_degrees: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_index_mapping() {
        for side in Side::ALL {
            assert_eq!(Side::from_index(side.index()), side);
        }
        assert_eq!(Side::from_index(0), Side::Front);
        assert_eq!(Side::from_index(1), Side::Back);
        assert_eq!(Side::from_index(2), Side::Both);
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("front".parse::<Side>().unwrap(), Side::Front);
        assert_eq!("BACK".parse::<Side>().unwrap(), Side::Back);
        assert_eq!("double".parse::<Side>().unwrap(), Side::Both);
        assert!("sideways".parse::<Side>().is_err());
    }

    #[test]
    fn test_defaults() {
        let m = SurfaceMaterial::new(Color::WHITE, &MaterialDefaults::default());
        assert_eq!(m.side, Side::Back);
        assert!(m.transparent);
        assert_eq!(m.rgba(), [1.0, 1.0, 1.0, 0.95]);
    }

    #[test]
    fn test_opaque_material_ignores_opacity() {
        let defaults = MaterialDefaults {
            transparent: false,
            opacity: 0.3,
            ..Default::default()
        };
        let m = SurfaceMaterial::new(Color::new(0.5, 0.5, 0.5), &defaults);
        assert_eq!(m.rgba()[3], 1.0);
    }
}
