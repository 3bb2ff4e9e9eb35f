//! File-level tests for model reading and writing

use facetview_core::{Error, GeometryBundle, MaterialDefaults, MaterialGroup, Scene};
use facetview_io::{read_model, write_model};
use std::fs;
use tempfile::tempdir;

fn sample_bundle() -> GeometryBundle {
    let mut bundle = GeometryBundle::new();
    bundle.insert(
        "absorber",
        MaterialGroup::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2], [0, 2, 3]],
            [120, 60, 30],
        ),
    );
    bundle.insert(
        "diffuser",
        MaterialGroup::new(
            vec![[0.0, 0.0, 2.0], [1.0, 0.0, 2.0], [0.0, 1.0, 2.0]],
            vec![[0, 1, 2]],
            [30, 200, 90],
        ),
    );
    bundle
}

#[test]
fn test_write_and_read_back_through_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("room.json");

    write_model(&sample_bundle(), &path).unwrap();
    let loaded = read_model(&path).unwrap();
    assert_eq!(loaded, sample_bundle());

    let scene = Scene::build(&loaded, &MaterialDefaults::default()).unwrap();
    assert_eq!(scene.len(), 2);
}

#[test]
fn test_extension_is_case_insensitive() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ROOM.JSON");
    fs::write(&path, r#"{"mats_hash": {}}"#).unwrap();

    assert!(read_model(&path).unwrap().is_empty());
}

#[test]
fn test_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("room.obj");
    fs::write(&path, "v 0 0 0\n").unwrap();

    assert!(matches!(read_model(&path), Err(Error::UnsupportedFormat(_))));
    assert!(matches!(
        write_model(&sample_bundle(), dir.path().join("out.ply")),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    match read_model(dir.path().join("nope.json")) {
        Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected not-found error, got {:?}", other),
    }
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    match read_model(&path) {
        Err(Error::Parse(msg)) => assert!(msg.contains("broken.json")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_out_of_range_index_loads_but_fails_to_build() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"mats_hash": {"a": {"pts": [[0,0,0],[1,0,0],[0,1,0]], "tris": [[0,1,3]], "color": [1,2,3]}}}"#,
    )
    .unwrap();

    let bundle = read_model(&path).unwrap();
    assert!(matches!(
        Scene::build(&bundle, &MaterialDefaults::default()),
        Err(Error::InvalidData(_))
    ));
}
