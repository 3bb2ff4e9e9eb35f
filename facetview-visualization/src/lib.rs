//! Interactive viewing of per-material boundary meshes
//!
//! This crate ties the facetview pieces into a window:
//! - Camera placement from the model bounds
//! - Orbit, pan and dolly controls
//! - An egui control panel bound to material color, visibility, opacity,
//!   sidedness and the camera field of view
//! - The winit event loop driving the GPU renderer

pub mod camera;
pub mod config;
pub mod controls;
pub mod panel;
pub mod session;
pub mod stats;
pub mod viewer;

pub use camera::*;
pub use config::ViewerConfig;
pub use controls::OrbitControls;
pub use panel::*;
pub use session::Session;
pub use stats::FrameStats;
pub use viewer::Viewer;
