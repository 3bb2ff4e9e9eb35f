//! I/O operations for facetview models
//!
//! Models are JSON files holding one group of points, triangles and a color
//! per material. This crate reads them into a [`GeometryBundle`] and writes
//! bundles back out in the same layout.

pub mod json;
pub mod error;

pub use error::*;
pub use json::{parse_model, read_model_from, write_model_to, JsonModelReader, JsonModelWriter};

use facetview_core::{Error, GeometryBundle, Result};
use std::path::Path;

/// Trait for reading models from files
pub trait ModelReader {
    fn read_model<P: AsRef<Path>>(path: P) -> Result<GeometryBundle>;
}

/// Trait for writing models to files
pub trait ModelWriter {
    fn write_model<P: AsRef<Path>>(bundle: &GeometryBundle, path: P) -> Result<()>;
}

/// File extensions accepted by [`read_model`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// Auto-detect format and read a model
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<GeometryBundle> {
    let path = path.as_ref();
    match extension_of(path).as_deref() {
        Some("json") => JsonModelReader::read_model(path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported model format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write a model
pub fn write_model<P: AsRef<Path>>(bundle: &GeometryBundle, path: P) -> Result<()> {
    let path = path.as_ref();
    match extension_of(path).as_deref() {
        Some("json") => JsonModelWriter::write_model(bundle, path),
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported model format: {:?}",
            path.extension()
        ))),
    }
}
