//! Per-material renderable meshes built from a geometry bundle
//!
//! A [`Scene`] is built once per loaded model and owns one [`MaterialMesh`]
//! per material group, in sorted name order. Each material mesh carries its
//! surface (with face and vertex normals), a white edge overlay and the live
//! material state that the control panel writes to.

use tracing::debug;

use crate::bounds::BoundingBox;
use crate::dirty::Dirty;
use crate::material::*;
use crate::mesh::TriangleMesh;
use crate::model::{GeometryBundle, MaterialGroup};
use crate::point::*;
use crate::{Error, Result};

/// Line segments drawn on top of a surface
#[derive(Debug, Clone)]
pub struct EdgeOverlay {
    pub segments: Vec<[Point3f; 2]>,
    pub material: EdgeMaterial,
}

impl EdgeOverlay {
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// The renderable state of one material group
#[derive(Debug, Clone)]
pub struct MaterialMesh {
    pub name: String,
    pub mesh: TriangleMesh,
    pub edges: EdgeOverlay,
    pub material: Dirty<SurfaceMaterial>,
    pub visible: bool,
}

impl MaterialMesh {
    /// Build the surface, normals and edge overlay of a single group.
    pub fn build(name: &str, group: &MaterialGroup, defaults: &MaterialDefaults) -> Result<Self> {
        group.validate(name)?;

        let mut mesh = TriangleMesh::from_vertices_and_faces(group.points().collect(), group.tris.clone());
        mesh.compute_normals()?;

        let edges = EdgeOverlay {
            segments: mesh.feature_edges(defaults.edge_threshold_degrees),
            material: EdgeMaterial {
                color: defaults.edge_color,
            },
        };

        debug!(
            "built material '{}': {} points, {} triangles, {} edge segments",
            name,
            mesh.vertex_count(),
            mesh.face_count(),
            edges.segment_count()
        );

        Ok(Self {
            name: name.to_string(),
            mesh,
            edges,
            material: Dirty::new(SurfaceMaterial::new(group.color(), defaults)),
            visible: true,
        })
    }
}

/// All material meshes of a loaded model plus their combined bounds
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: Vec<MaterialMesh>,
    bounds: BoundingBox,
}

impl Scene {
    /// Build every material group of `bundle`.
    ///
    /// All triangle indices are checked before any geometry is built; the
    /// first bad index fails the whole build. Bounds cover every point,
    /// referenced or not.
    pub fn build(bundle: &GeometryBundle, defaults: &MaterialDefaults) -> Result<Self> {
        bundle.validate()?;

        let mut bounds = BoundingBox::empty();
        let mut meshes = Vec::with_capacity(bundle.len());
        for (name, group) in bundle.iter() {
            let built = MaterialMesh::build(name, group, defaults)?;
            for v in &built.mesh.vertices {
                bounds.extend(v);
            }
            meshes.push(built);
        }

        debug!(
            "scene bounds min={:?} max={:?} center={:?} scale={}",
            bounds.min,
            bounds.max,
            bounds.center(),
            bounds.scale()
        );

        Ok(Self { meshes, bounds })
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn center(&self) -> Point3f {
        self.bounds.center()
    }

    pub fn scale(&self) -> f32 {
        self.bounds.scale()
    }

    pub fn meshes(&self) -> &[MaterialMesh] {
        &self.meshes
    }

    pub fn meshes_mut(&mut self) -> &mut [MaterialMesh] {
        &mut self.meshes
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn material_names(&self) -> impl Iterator<Item = &str> {
        self.meshes.iter().map(|m| m.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&MaterialMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MaterialMesh> {
        self.meshes.iter_mut().find(|m| m.name == name)
    }

    fn get_mut_or_err(&mut self, name: &str) -> Result<&mut MaterialMesh> {
        self.get_mut(name)
            .ok_or_else(|| Error::InvalidData(format!("no material named '{}'", name)))
    }

    pub fn visible_count(&self) -> usize {
        self.meshes.iter().filter(|m| m.visible).count()
    }

    pub fn set_color(&mut self, name: &str, color: Color) -> Result<()> {
        let mesh = self.get_mut_or_err(name)?;
        Dirty::modify(&mut mesh.material, |m| m.color = color);
        Ok(())
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<()> {
        self.get_mut_or_err(name)?.visible = visible;
        Ok(())
    }

    /// Apply one opacity to every material
    pub fn set_opacity(&mut self, opacity: f32) {
        for mesh in &mut self.meshes {
            Dirty::modify(&mut mesh.material, |m| m.opacity = opacity);
        }
    }

    /// Apply one sidedness to every material
    pub fn set_side(&mut self, side: Side) {
        for mesh in &mut self.meshes {
            Dirty::modify(&mut mesh.material, |m| m.side = side);
        }
    }

    /// Opacity of the first material, which all share unless edited directly
    pub fn opacity(&self) -> Option<f32> {
        self.meshes.first().map(|m| m.material.opacity)
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.vertex_count()).sum()
    }

    pub fn face_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.face_count()).sum()
    }
}
