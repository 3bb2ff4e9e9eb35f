//! Core traits for facetview

use crate::{bounds::BoundingBox, mesh::TriangleMesh, point::*, scene::Scene};

/// Trait for objects with spatial extent
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> BoundingBox;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.vertices)
    }
}

impl Drawable for Scene {
    fn bounding_box(&self) -> BoundingBox {
        *self.bounds()
    }
}
