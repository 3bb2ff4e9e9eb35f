//! Interactive viewer for facetview JSON models
//!
//! Controls:
//! - Left drag: orbit around the model
//! - Right or middle drag: pan
//! - Scroll: dolly towards the target
//! - Drop a `.json` file on the window or use "Open model…" when started
//!   without a path

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use facetview_core::Side;
use facetview_visualization::{Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "view_model")]
#[command(about = "View a per-material boundary mesh", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON model to load at startup
    path: Option<PathBuf>,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 70.0)]
    fov: f32,

    /// Initial opacity of every material
    #[arg(long, default_value_t = 0.95)]
    opacity: f32,

    /// Faces drawn: front, back or both
    #[arg(long, default_value = "back")]
    side: Side,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 1200)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Disable 4x multisampling
    #[arg(long)]
    no_msaa: bool,
}

impl Cli {
    fn into_config(self) -> ViewerConfig {
        let mut config = ViewerConfig {
            width: self.width,
            height: self.height,
            model_path: self.path,
            ..Default::default()
        };
        config.camera.fov_degrees = self.fov.clamp(5.0, 90.0);
        config.materials.opacity = self.opacity.clamp(0.0, 1.0);
        config.materials.side = self.side;
        config.render.enable_multisampling = !self.no_msaa;
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Cli::parse().into_config();
    if config.model_path.is_none() {
        tracing::info!("no model given, waiting for a file");
    }

    Viewer::new(config).run().context("viewer failed")?;
    Ok(())
}
