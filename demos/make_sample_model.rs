//! Write a small two-material box model for trying out the viewer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use facetview_core::{GeometryBundle, MaterialGroup};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "make_sample_model")]
#[command(about = "Write a sample facetview JSON model", long_about = None)]
struct Cli {
    /// Output path, must end in .json
    path: PathBuf,
}

/// A 4 x 3 x 2.5 box with walls and floor/ceiling in separate materials
fn sample_box() -> GeometryBundle {
    let (sx, sy, sz) = (4.0, 3.0, 2.5);
    let corners = vec![
        [0.0, 0.0, 0.0],
        [sx, 0.0, 0.0],
        [sx, sy, 0.0],
        [0.0, sy, 0.0],
        [0.0, 0.0, sz],
        [sx, 0.0, sz],
        [sx, sy, sz],
        [0.0, sy, sz],
    ];

    let walls = vec![
        [0, 1, 5], [0, 5, 4],
        [1, 2, 6], [1, 6, 5],
        [2, 3, 7], [2, 7, 6],
        [3, 0, 4], [3, 4, 7],
    ];
    let caps = vec![[0, 2, 1], [0, 3, 2], [4, 5, 6], [4, 6, 7]];

    let mut bundle = GeometryBundle::new();
    bundle.insert("walls", MaterialGroup::new(corners.clone(), walls, [200, 190, 170]));
    bundle.insert("floor_ceiling", MaterialGroup::new(corners, caps, [70, 110, 160]));
    bundle
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let bundle = sample_box();
    facetview_io::write_model(&bundle, &cli.path)
        .with_context(|| format!("failed to write {}", cli.path.display()))?;

    tracing::info!(
        "wrote {} materials, {} triangles to {}",
        bundle.len(),
        bundle.triangle_count(),
        cli.path.display()
    );
    Ok(())
}
