//! JSON model format: `{ "mats_hash": { name: { "pts", "tris", "color" } } }`

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use facetview_core::{GeometryBundle, ModelFile, Result};
use tracing::{debug, info};

use crate::{IoError, ModelReader, ModelWriter};

pub struct JsonModelReader;
pub struct JsonModelWriter;

/// Parse a model from a JSON string
pub fn parse_model(text: &str) -> Result<GeometryBundle> {
    parse_named(text.as_bytes(), "<string>")
}

/// Parse a model from any reader. `source_name` only labels errors.
pub fn read_model_from<R: Read>(reader: R, source_name: &str) -> Result<GeometryBundle> {
    parse_named(reader, source_name)
}

fn parse_named<R: Read>(reader: R, source_name: &str) -> Result<GeometryBundle> {
    let file: ModelFile = serde_json::from_reader(reader).map_err(|e| IoError::ParseError {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    let bundle = file.mats_hash;
    debug!(
        "parsed {} materials, {} points, {} triangles from {}",
        bundle.len(),
        bundle.point_count(),
        bundle.triangle_count(),
        source_name
    );
    Ok(bundle)
}

/// Serialize a model to any writer
pub fn write_model_to<W: Write>(writer: W, bundle: &GeometryBundle, pretty: bool) -> Result<()> {
    #[derive(serde::Serialize)]
    struct ModelFileRef<'a> {
        mats_hash: &'a GeometryBundle,
    }

    let file = ModelFileRef { mats_hash: bundle };
    let result = if pretty {
        serde_json::to_writer_pretty(writer, &file)
    } else {
        serde_json::to_writer(writer, &file)
    };
    result.map_err(|e| IoError::WriteError {
        message: e.to_string(),
    })?;
    Ok(())
}

impl ModelReader for JsonModelReader {
    fn read_model<P: AsRef<Path>>(path: P) -> Result<GeometryBundle> {
        let path = path.as_ref();
        info!("Found {}", path.display());

        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => IoError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => IoError::Io(e),
        })?;
        parse_named(BufReader::new(file), &path.display().to_string())
    }
}

impl ModelWriter for JsonModelWriter {
    fn write_model<P: AsRef<Path>>(bundle: &GeometryBundle, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(IoError::from)?;
        let mut writer = BufWriter::new(file);
        write_model_to(&mut writer, bundle, false)?;
        writer.flush().map_err(IoError::from)?;
        info!("wrote {} materials to {}", bundle.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetview_core::{Error, MaterialGroup};

    const TWO_MATERIALS: &str = r#"{
        "mats_hash": {
            "wall": {
                "pts": [[0, 0, 0], [1, 0, 0], [1, 0, 1]],
                "tris": [[0, 1, 2]],
                "color": [255, 128, 0]
            },
            "floor": {
                "pts": [[0.5, 0.5, 0.0], [1.5, 0.5, 0.0], [1.5, 1.5, 0.0]],
                "tris": [[0, 2, 1]],
                "color": [0, 0, 255]
            }
        }
    }"#;

    #[test]
    fn test_parse_two_materials() {
        let bundle = parse_model(TWO_MATERIALS).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.material_names().collect::<Vec<_>>(), vec!["floor", "wall"]);

        let wall = bundle.get("wall").unwrap();
        assert_eq!(wall.pts[2], [1.0, 0.0, 1.0]);
        assert_eq!(wall.tris, vec![[0, 1, 2]]);
        assert_eq!(wall.color, [255, 128, 0]);
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let text = r#"{"mats_hash": {}, "sources": [], "receivers": []}"#;
        assert!(parse_model(text).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = parse_model("{\"mats_hash\": {").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_missing_mats_hash_is_parse_error() {
        let err = parse_model(r#"{"materials": {}}"#).unwrap_err();
        match err {
            Error::Parse(msg) => assert!(msg.contains("mats_hash")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shapes_are_parse_errors() {
        let short_point = r#"{"mats_hash": {"a": {"pts": [[0, 0]], "tris": [], "color": [0, 0, 0]}}}"#;
        let bad_color = r#"{"mats_hash": {"a": {"pts": [], "tris": [], "color": [0, 0, 300]}}}"#;
        let negative_index = r#"{"mats_hash": {"a": {"pts": [], "tris": [[0, -1, 2]], "color": [0, 0, 0]}}}"#;

        for text in [short_point, bad_color, negative_index] {
            assert!(matches!(parse_model(text), Err(Error::Parse(_))), "accepted {}", text);
        }
    }

    #[test]
    fn test_write_then_parse() {
        let mut bundle = GeometryBundle::new();
        bundle.insert(
            "panel",
            MaterialGroup::new(vec![[0.25, -1.0, 3.5], [1.0, 2.0, 3.0], [0.0, 0.0, 0.0]], vec![[2, 1, 0]], [9, 8, 7]),
        );

        let mut buf = Vec::new();
        write_model_to(&mut buf, &bundle, true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"mats_hash\""));
        assert_eq!(parse_model(&text).unwrap(), bundle);
    }
}
