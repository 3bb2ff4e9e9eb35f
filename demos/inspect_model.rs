//! Print a summary of a facetview JSON model without opening a window

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use facetview_core::{MaterialDefaults, Scene};
use facetview_visualization::{Camera, CameraSetup};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inspect_model")]
#[command(about = "Summarise materials, bounds and camera placement of a model", long_about = None)]
struct Cli {
    /// JSON model to inspect
    path: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let bundle = facetview_io::read_model(&cli.path)
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let scene = Scene::build(&bundle, &MaterialDefaults::default())
        .with_context(|| format!("failed to build {}", cli.path.display()))?;

    println!("Model: {}", cli.path.display());
    println!("{}", "=".repeat(50));
    println!("{:<24} {:>8} {:>10} {:>8}  color", "material", "points", "triangles", "edges");
    for mesh in scene.meshes() {
        println!(
            "{:<24} {:>8} {:>10} {:>8}  {}",
            mesh.name,
            mesh.mesh.vertex_count(),
            mesh.mesh.face_count(),
            mesh.edges.segment_count(),
            mesh.material.color.to_hex()
        );
    }
    println!();

    let bounds = scene.bounds();
    if bounds.is_empty() {
        println!("Bounds: empty");
    } else {
        println!("Bounds: min {:?} max {:?}", bounds.min.coords.as_slice(), bounds.max.coords.as_slice());
    }
    println!("Center: {:?}", scene.center().coords.as_slice());
    println!("Scale:  {:.4}", scene.scale());

    let camera = Camera::frame_bounds(bounds, 1.0, &CameraSetup::default());
    println!();
    println!("Camera eye:    {:?}", camera.position.coords.as_slice());
    println!("Camera target: {:?}", camera.target.coords.as_slice());
    println!("Near / far:    {:.4} / {:.4}", camera.near, camera.far);
    Ok(())
}
