//! Core data structures for facetview
//!
//! This crate provides the in-memory model of a per-material boundary mesh:
//! the geometry bundle read from disk, triangle meshes with normals and edge
//! extraction, bounding extents, materials, and the [`Scene`] that the viewer
//! renders and the control panel mutates.

pub mod point;
pub mod model;
pub mod bounds;
pub mod mesh;
pub mod material;
pub mod scene;
pub mod spherical;
pub mod dirty;
pub mod traits;
pub mod error;

pub use point::*;
pub use model::*;
pub use bounds::*;
pub use mesh::*;
pub use material::*;
pub use scene::*;
pub use spherical::*;
pub use dirty::Dirty;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3, Matrix4};
