//! A load-edit session without a window: file to scene to camera to panel

use approx::assert_relative_eq;
use facetview_core::{sph2cart, GeometryBundle, MaterialDefaults, MaterialGroup, Scene, Side};
use facetview_io::{read_model, write_model};
use facetview_visualization::{
    Camera, CameraSetup, ControlPanel, OrbitControls, PanelEdit, Session, ViewerConfig,
};
use tempfile::tempdir;

fn room() -> GeometryBundle {
    let mut bundle = GeometryBundle::new();
    bundle.insert(
        "floor",
        MaterialGroup::new(
            vec![[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 3.0, 0.0], [0.0, 3.0, 0.0]],
            vec![[0, 1, 2], [0, 2, 3]],
            [120, 90, 60],
        ),
    );
    bundle.insert(
        "ceiling",
        MaterialGroup::new(
            vec![[0.0, 0.0, 2.5], [4.0, 0.0, 2.5], [4.0, 3.0, 2.5], [0.0, 3.0, 2.5]],
            vec![[0, 2, 1], [0, 3, 2]],
            [240, 240, 240],
        ),
    );
    bundle
}

fn load() -> (Scene, Camera, ControlPanel) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("room.json");
    write_model(&room(), &path).unwrap();

    let scene = Scene::build(&read_model(&path).unwrap(), &MaterialDefaults::default()).unwrap();
    let camera = Camera::frame_bounds(scene.bounds(), 4.0 / 3.0, &CameraSetup::default());
    let mut panel = ControlPanel::new();
    panel.bind(&scene, &camera);
    (scene, camera, panel)
}

#[test]
fn test_camera_frames_loaded_model() {
    let (scene, camera, panel) = load();
    let scale = scene.scale();

    assert_relative_eq!(scale, (16.0f32 + 9.0 + 6.25).sqrt(), epsilon = 1e-5);
    assert_relative_eq!(camera.target, scene.center());
    assert_relative_eq!(
        camera.position,
        scene.center() + sph2cart(-37.5, 30.0) * scale,
        epsilon = 1e-5
    );
    assert_relative_eq!(camera.near, scale / 10.0, epsilon = 1e-5);
    assert_relative_eq!(camera.far, scale * 10.0, epsilon = 1e-4);
    assert_relative_eq!(panel.dist2target(), scale, epsilon = 1e-5);
}

#[test]
fn test_panel_edits_reach_scene_and_camera() {
    let (mut scene, mut camera, mut panel) = load();

    let edits = [
        PanelEdit::Opacity(0.4),
        PanelEdit::Side(Side::Both),
        PanelEdit::Visible {
            name: "ceiling".to_string(),
            visible: false,
        },
        PanelEdit::Fov(30.0),
    ];
    for edit in &edits {
        panel.apply(edit, &mut scene, &mut camera).unwrap();
    }

    assert!(scene.meshes().iter().all(|m| m.material.opacity == 0.4));
    assert!(scene.meshes().iter().all(|m| m.material.side == Side::Both));
    assert_eq!(scene.visible_count(), 1);
    // Hidden surfaces keep their edge overlay
    assert!(scene.get("ceiling").unwrap().edges.segment_count() > 0);
    assert_eq!(camera.fov_degrees, 30.0);
}

#[test]
fn test_dolly_updates_displayed_distance() {
    let (_, mut camera, mut panel) = load();
    let controls = OrbitControls::new(800, 600);
    let before = panel.dist2target();

    controls.dolly(&mut camera, 0.5);
    panel.update_distance(&camera);

    assert_relative_eq!(panel.dist2target(), 0.5 * before, epsilon = 1e-4);
}

#[test]
fn test_session_loads_configured_model() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("room.json");
    write_model(&room(), &path).unwrap();

    let session = Session::new(&ViewerConfig::default().with_model(&path), 800, 600);

    assert_eq!(session.scene.len(), 2);
    assert!(!session.panel.file_selection_enabled());
    assert_eq!(
        session.panel.info(),
        [format!("Found {}", path.display()), "drawing model..".to_string()]
    );
    assert_relative_eq!(session.camera.target, session.scene.center());
    assert_relative_eq!(session.camera.aspect_ratio, 800.0 / 600.0);
    assert_eq!(session.panel.materials().len(), 2);
}

#[test]
fn test_session_ignores_second_model() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("room.json");
    write_model(&room(), &first).unwrap();

    let mut other = GeometryBundle::new();
    other.insert(
        "wall",
        MaterialGroup::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]], vec![[0, 1, 2]], [1, 2, 3]),
    );
    let second = dir.path().join("wall.json");
    write_model(&other, &second).unwrap();

    let mut session = Session::new(&ViewerConfig::default(), 800, 600);
    assert!(session.load_model(&first));
    let target = session.camera.target;

    assert!(!session.load_model(&second));
    assert_eq!(session.panel.info().len(), 2);
    assert!(session.scene.get("wall").is_none());
    assert_eq!(session.scene.len(), 2);
    assert_relative_eq!(session.camera.target, target);
}

#[test]
fn test_failed_load_keeps_file_selection() {
    let dir = tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ not json").unwrap();

    let mut bad_index = GeometryBundle::new();
    bad_index.insert(
        "wall",
        MaterialGroup::new(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]], vec![[0, 1, 7]], [1, 2, 3]),
    );
    let out_of_range = dir.path().join("bad_index.json");
    write_model(&bad_index, &out_of_range).unwrap();

    let mut session = Session::new(&ViewerConfig::default(), 800, 600);
    for path in [&broken, &out_of_range, &dir.path().join("missing.json")] {
        assert!(!session.load_model(path));
        let info = session.panel.info();
        assert_eq!(info[info.len() - 2], format!("Found {}", path.display()));
        assert!(info[info.len() - 1].starts_with("Error: "));
        assert!(session.panel.file_selection_enabled());
        assert!(session.scene.is_empty());
    }

    let good = dir.path().join("room.json");
    write_model(&room(), &good).unwrap();
    assert!(session.load_model(&good));
    assert_eq!(session.panel.info().last().map(String::as_str), Some("drawing model.."));
    assert!(!session.panel.file_selection_enabled());
}

#[test]
fn test_session_edits_and_resize() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("room.json");
    write_model(&room(), &path).unwrap();
    let mut session = Session::new(&ViewerConfig::default().with_model(&path), 800, 600);

    session.apply(&PanelEdit::Opacity(0.25)).unwrap();
    assert!(session.scene.meshes().iter().all(|m| m.material.opacity == 0.25));
    assert!(session
        .apply(&PanelEdit::Visible {
            name: "attic".to_string(),
            visible: false
        })
        .is_err());

    session.resize(1000, 500);
    assert_relative_eq!(session.aspect_ratio(), 2.0);
    assert_relative_eq!(session.camera.aspect_ratio, 2.0);
    session.resize(0, 500);
    assert_relative_eq!(session.aspect_ratio(), 2.0);
}
