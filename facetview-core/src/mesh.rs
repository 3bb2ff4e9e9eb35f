//! Triangle mesh data structure, normals and edge extraction

use std::collections::HashMap;

use crate::point::*;
use crate::{Error, Result};

/// Quantization used to match coincident vertices when extracting edges
const EDGE_PRECISION: f32 = 1e4;

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    pub face_normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            face_normals: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Check that all face indices are in range
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        for (f, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&i| i >= count) {
                return Err(Error::InvalidData(format!(
                    "face {} references vertex {} but the mesh has {} vertices",
                    f, bad, count
                )));
            }
        }
        Ok(())
    }

    fn face_cross(&self, face: &[usize; 3]) -> Vector3f {
        let v0 = self.vertices[face[0]];
        let v1 = self.vertices[face[1]];
        let v2 = self.vertices[face[2]];
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Calculate unit face normals. Degenerate faces get a zero normal.
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| normalize_or_zero(self.face_cross(face)))
            .collect()
    }

    /// Calculate area-weighted vertex normals.
    ///
    /// Each vertex accumulates the unnormalized cross product of every face
    /// touching it, so larger faces pull harder. Unreferenced vertices end up
    /// with a zero normal.
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for face in &self.faces {
            let n = self.face_cross(face);
            for &i in face {
                normals[i] += n;
            }
        }
        normals.into_iter().map(normalize_or_zero).collect()
    }

    /// Compute and store both face and vertex normals
    pub fn compute_normals(&mut self) -> Result<()> {
        self.validate()?;
        self.face_normals = Some(self.calculate_face_normals());
        self.normals = Some(self.calculate_vertex_normals());
        Ok(())
    }

    /// Extract feature edges as line segments.
    ///
    /// An edge is kept when it borders a single face, or when the normals of
    /// the two faces sharing it differ by more than `threshold_degrees`.
    /// Vertices are matched by quantized position, not by index.
    pub fn feature_edges(&self, threshold_degrees: f32) -> Vec<[Point3f; 2]> {
        let threshold_dot = threshold_degrees.to_radians().cos();
        let mut open: HashMap<(PositionKey, PositionKey), Option<OpenEdge>> = HashMap::new();
        let mut segments = Vec::new();

        for face in &self.faces {
            let keys = face.map(|i| PositionKey::new(&self.vertices[i]));
            if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
                continue;
            }
            let normal = normalize_or_zero(self.face_cross(face));

            for j in 0..3 {
                let (a, b) = (face[j], face[(j + 1) % 3]);
                let (ka, kb) = (keys[j], keys[(j + 1) % 3]);

                if let Some(other) = open.get_mut(&(kb, ka)).and_then(Option::take) {
                    if normal.dot(&other.normal) <= threshold_dot {
                        segments.push([self.vertices[other.a], self.vertices[other.b]]);
                    }
                    continue;
                }
                open.entry((ka, kb)).or_insert(Some(OpenEdge { a, b, normal }));
            }
        }

        // Edges that never found a partner face
        let mut boundary: Vec<OpenEdge> = open.into_values().flatten().collect();
        boundary.sort_by_key(|e| (e.a, e.b));
        segments.extend(boundary.into_iter().map(|e| [self.vertices[e.a], self.vertices[e.b]]));
        segments
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PositionKey([i64; 3]);

impl PositionKey {
    fn new(p: &Point3f) -> Self {
        let q = |c: f32| (c * EDGE_PRECISION).round() as i64;
        Self([q(p.x), q(p.y), q(p.z)])
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenEdge {
    a: usize,
    b: usize,
    normal: Vector3f,
}

fn normalize_or_zero(v: Vector3f) -> Vector3f {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros)
}
