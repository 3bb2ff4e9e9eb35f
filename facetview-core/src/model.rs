//! The on-disk geometry description: named material groups of points and triangles

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Color, Error, Point3f, Result};

/// One material group as stored in a model file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialGroup {
    /// Vertex positions
    pub pts: Vec<[f64; 3]>,
    /// Triangles as indices into `pts`
    pub tris: Vec<[usize; 3]>,
    /// 8-bit RGB color
    pub color: [u8; 3],
}

impl MaterialGroup {
    pub fn new(pts: Vec<[f64; 3]>, tris: Vec<[usize; 3]>, color: [u8; 3]) -> Self {
        Self { pts, tris, color }
    }

    pub fn points(&self) -> impl Iterator<Item = Point3f> + '_ {
        self.pts
            .iter()
            .map(|p| Point3f::new(p[0] as f32, p[1] as f32, p[2] as f32))
    }

    pub fn color(&self) -> Color {
        Color::from_rgb8(self.color)
    }

    /// Check that every triangle references a point of this group.
    pub fn validate(&self, name: &str) -> Result<()> {
        let count = self.pts.len();
        for (t, tri) in self.tris.iter().enumerate() {
            if let Some(&bad) = tri.iter().find(|&&i| i >= count) {
                return Err(Error::InvalidData(format!(
                    "material '{}': triangle {} references point {} but only {} points exist",
                    name, t, bad, count
                )));
            }
        }
        Ok(())
    }
}

/// Mapping from material name to its group, iterated in sorted name order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryBundle {
    pub groups: BTreeMap<String, MaterialGroup>,
}

impl GeometryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, group: MaterialGroup) {
        self.groups.insert(name.into(), group);
    }

    pub fn get(&self, name: &str) -> Option<&MaterialGroup> {
        self.groups.get(name)
    }

    /// Material names in sorted order
    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MaterialGroup)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.groups.values().map(|g| g.pts.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.values().map(|g| g.tris.len()).sum()
    }

    pub fn validate(&self) -> Result<()> {
        self.iter().try_for_each(|(name, group)| group.validate(name))
    }
}

/// Top-level layout of a model file: `{ "mats_hash": { ... } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub mats_hash: GeometryBundle,
}

impl From<GeometryBundle> for ModelFile {
    fn from(mats_hash: GeometryBundle) -> Self {
        Self { mats_hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(color: [u8; 3]) -> MaterialGroup {
        MaterialGroup::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
            color,
        )
    }

    #[test]
    fn test_names_are_sorted() {
        let mut bundle = GeometryBundle::new();
        bundle.insert("wall", triangle([255, 0, 0]));
        bundle.insert("floor", triangle([0, 255, 0]));
        bundle.insert("ceiling", triangle([0, 0, 255]));

        let names: Vec<_> = bundle.material_names().collect();
        assert_eq!(names, vec!["ceiling", "floor", "wall"]);
        assert_eq!(bundle.point_count(), 9);
        assert_eq!(bundle.triangle_count(), 3);
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut bundle = GeometryBundle::new();
        bundle.insert("ok", triangle([1, 2, 3]));
        bundle.insert(
            "broken",
            MaterialGroup::new(vec![[0.0; 3], [1.0, 0.0, 0.0]], vec![[0, 1, 2]], [0, 0, 0]),
        );

        match bundle.validate() {
            Err(Error::InvalidData(msg)) => {
                assert!(msg.contains("broken"));
                assert!(msg.contains("point 2"));
            }
            other => panic!("expected InvalidData, got {:?}", other),
        }
    }

    #[test]
    fn test_points_and_color_conversion() {
        let group = triangle([10, 20, 30]);
        let points: Vec<_> = group.points().collect();
        assert_eq!(points[1], Point3f::new(1.0, 0.0, 0.0));
        assert_eq!(group.color(), Color::from_rgb8([10, 20, 30]));
    }
}
