//! Axis-aligned bounding extents

use crate::point::*;

/// Running axis-aligned bounds. Starts empty (`min = +inf`, `max = -inf`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3f,
    pub max: Point3f,
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points<'a, I: IntoIterator<Item = &'a Point3f>>(points: I) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.extend(p);
        }
        bounds
    }

    /// True until at least one point has been added
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow the bounds to include `p`
    pub fn extend(&mut self, p: &Point3f) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);

        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        if other.is_empty() {
            return *self;
        }
        let mut out = *self;
        out.extend(&other.min);
        out.extend(&other.max);
        out
    }

    /// Midpoint of min/max per axis, or the origin when empty
    pub fn center(&self) -> Point3f {
        if self.is_empty() {
            return Point3f::origin();
        }
        Point3f::new(
            0.5 * (self.max.x + self.min.x),
            0.5 * (self.max.y + self.min.y),
            0.5 * (self.max.z + self.min.z),
        )
    }

    pub fn size(&self) -> Vector3f {
        if self.is_empty() {
            return Vector3f::zeros();
        }
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn scale(&self) -> f32 {
        self.size().norm()
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_bounds() {
        let bounds = BoundingBox::empty();
        assert!(bounds.is_empty());
        assert_eq!(bounds.center(), Point3f::origin());
        assert_eq!(bounds.scale(), 0.0);
    }

    #[test]
    fn test_center_is_midpoint() {
        let points = [
            Point3f::new(-1.0, 2.0, 0.5),
            Point3f::new(3.0, -4.0, 1.5),
            Point3f::new(0.0, 0.0, 10.0),
        ];
        let bounds = BoundingBox::from_points(&points);

        assert_eq!(bounds.min, Point3f::new(-1.0, -4.0, 0.5));
        assert_eq!(bounds.max, Point3f::new(3.0, 2.0, 10.0));
        let c = bounds.center();
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, -1.0);
        assert_relative_eq!(c.z, 5.25);
    }

    #[test]
    fn test_scale_is_diagonal() {
        let bounds = BoundingBox::from_points(&[
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(3.0, 4.0, 12.0),
        ]);
        assert_relative_eq!(bounds.scale(), 13.0);
    }

    #[test]
    fn test_single_point_has_zero_scale() {
        let bounds = BoundingBox::from_points(&[Point3f::new(1.0, 2.0, 3.0)]);
        assert!(!bounds.is_empty());
        assert_eq!(bounds.center(), Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.scale(), 0.0);
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::from_points(&[Point3f::new(0.0, 0.0, 0.0)]);
        let b = BoundingBox::from_points(&[Point3f::new(2.0, 2.0, 2.0)]);
        let u = a.union(&b);
        assert_eq!(u.center(), Point3f::new(1.0, 1.0, 1.0));
        assert_eq!(a.union(&BoundingBox::empty()), a);
    }
}
