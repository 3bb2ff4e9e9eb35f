//! The control panel: live widgets bound to scene materials and the camera
//!
//! Widget state lives in [`ControlPanel`]; every edit is written through to
//! the [`Scene`] or [`Camera`] immediately. The egui layout mirrors the
//! folder structure of the panel: "Material Groups" with "Colours" and
//! "Visibility", then "Camera".

use egui::{Align2, Color32, Frame, Margin, Rounding};
use facetview_core::{Color, Result, Scene, Side};

use crate::camera::Camera;
use crate::stats::FrameStats;

pub const FOV_RANGE: std::ops::RangeInclusive<f32> = 5.0..=90.0;
pub const OPACITY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

/// Widget state for one material group
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialEntry {
    pub name: String,
    /// sRGB bytes, as edited by the color picker
    pub color: [u8; 3],
    pub visible: bool,
}

/// A single widget change, applied with [`ControlPanel::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEdit {
    Color { name: String, color: Color },
    Visible { name: String, visible: bool },
    Opacity(f32),
    Side(Side),
    Fov(f32),
    OpenFile,
}

/// Collapsible sections of the controls window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFolder {
    MaterialGroups,
    Colours,
    Visibility,
    Camera,
}

impl PanelFolder {
    pub const ALL: [Self; 4] = [Self::MaterialGroups, Self::Colours, Self::Visibility, Self::Camera];

    pub fn title(self) -> &'static str {
        match self {
            Self::MaterialGroups => "Material Groups",
            Self::Colours => "Colours",
            Self::Visibility => "Visibility",
            Self::Camera => "Camera",
        }
    }

    pub fn default_open(self) -> bool {
        matches!(self, Self::MaterialGroups | Self::Visibility)
    }

    fn header(self) -> egui::CollapsingHeader {
        egui::CollapsingHeader::new(self.title()).default_open(self.default_open())
    }
}

/// Live control panel state
#[derive(Debug, Clone)]
pub struct ControlPanel {
    materials: Vec<MaterialEntry>,
    opacity: f32,
    side: Side,
    fov: f32,
    dist2target: f32,
    info: Vec<String>,
    file_selection_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            materials: Vec::new(),
            opacity: 0.95,
            side: Side::Back,
            fov: 70.0,
            dist2target: 0.0,
            info: Vec::new(),
            file_selection_enabled: true,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take initial widget values from a freshly built scene and its camera.
    ///
    /// Info lines and the file selection state are kept.
    pub fn bind(&mut self, scene: &Scene, camera: &Camera) {
        self.materials = scene
            .meshes()
            .iter()
            .map(|m| MaterialEntry {
                name: m.name.clone(),
                color: m.material.color.to_rgb8(),
                visible: m.visible,
            })
            .collect();
        if let Some(opacity) = scene.opacity() {
            self.opacity = opacity;
        }
        self.side = scene.meshes().first().map(|m| m.material.side).unwrap_or_default();
        self.fov = camera.fov_degrees;
        self.dist2target = camera.distance_to_target();
    }

    pub fn materials(&self) -> &[MaterialEntry] {
        &self.materials
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut MaterialEntry> {
        self.materials.iter_mut().find(|m| m.name == name)
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn dist2target(&self) -> f32 {
        self.dist2target
    }

    pub fn set_color(&mut self, scene: &mut Scene, name: &str, color: Color) -> Result<()> {
        scene.set_color(name, color)?;
        if let Some(entry) = self.entry_mut(name) {
            entry.color = color.to_rgb8();
        }
        Ok(())
    }

    /// Same as [`ControlPanel::set_color`] with a `#rrggbb` color
    pub fn set_color_hex(&mut self, scene: &mut Scene, name: &str, hex: &str) -> Result<()> {
        let color = Color::from_hex(hex)?;
        self.set_color(scene, name, color)
    }

    pub fn set_visible(&mut self, scene: &mut Scene, name: &str, visible: bool) -> Result<()> {
        scene.set_visible(name, visible)?;
        if let Some(entry) = self.entry_mut(name) {
            entry.visible = visible;
        }
        Ok(())
    }

    /// Set one opacity on every material
    pub fn set_opacity(&mut self, scene: &mut Scene, opacity: f32) {
        self.opacity = opacity;
        scene.set_opacity(opacity);
    }

    /// Set one sidedness on every material
    pub fn set_side(&mut self, scene: &mut Scene, side: Side) {
        self.side = side;
        scene.set_side(side);
    }

    /// Selector form of [`ControlPanel::set_side`]: 0 front, 1 back, 2 both
    pub fn set_side_index(&mut self, scene: &mut Scene, index: usize) {
        self.set_side(scene, Side::from_index(index));
    }

    pub fn set_fov(&mut self, camera: &mut Camera, fov_degrees: f32) {
        self.fov = fov_degrees;
        camera.fov_degrees = fov_degrees;
    }

    /// Refresh the read-only distance display
    pub fn update_distance(&mut self, camera: &Camera) {
        self.dist2target = camera.distance_to_target();
    }

    pub fn push_info(&mut self, line: impl Into<String>) {
        self.info.push(line.into());
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    pub fn file_selection_enabled(&self) -> bool {
        self.file_selection_enabled
    }

    /// Called once a model has been drawn; later selections are ignored
    pub fn disable_file_selection(&mut self) {
        self.file_selection_enabled = false;
    }

    /// Apply one widget change. `OpenFile` is handled by the caller.
    pub fn apply(&mut self, edit: &PanelEdit, scene: &mut Scene, camera: &mut Camera) -> Result<()> {
        match edit {
            PanelEdit::Color { name, color } => self.set_color(scene, name, *color)?,
            PanelEdit::Visible { name, visible } => self.set_visible(scene, name, *visible)?,
            PanelEdit::Opacity(v) => self.set_opacity(scene, *v),
            PanelEdit::Side(side) => self.set_side(scene, *side),
            PanelEdit::Fov(fov) => self.set_fov(camera, *fov),
            PanelEdit::OpenFile => {}
        }
        Ok(())
    }

    /// Draw the panel and the stats overlay, returning the edits made this frame.
    pub fn show(&mut self, ctx: &egui::Context, stats: &FrameStats) -> Vec<PanelEdit> {
        let mut edits = Vec::new();

        egui::Window::new("Stats")
            .frame(
                Frame::default()
                    .fill(Color32::from_black_alpha(200))
                    .inner_margin(Margin::same(5.0))
                    .rounding(Rounding::same(2.0)),
            )
            .collapsible(false)
            .title_bar(false)
            .anchor(Align2::RIGHT_TOP, egui::Vec2::new(-5., 5.))
            .fixed_size(egui::Vec2::new(200., 20.))
            .show(ctx, |ui| {
                ui.label(stats.label());
            });

        egui::Window::new("Controls")
            .anchor(Align2::LEFT_TOP, egui::Vec2::new(5., 5.))
            .resizable(false)
            .show(ctx, |ui| {
                if ui
                    .add_enabled(self.file_selection_enabled, egui::Button::new("Open model…"))
                    .clicked()
                {
                    edits.push(PanelEdit::OpenFile);
                }
                for line in &self.info {
                    ui.label(line.as_str());
                }

                ui.separator();
                self.material_groups_ui(ui, &mut edits);
                self.camera_ui(ui, &mut edits);
            });

        edits
    }

    fn material_groups_ui(&mut self, ui: &mut egui::Ui, edits: &mut Vec<PanelEdit>) {
        PanelFolder::MaterialGroups.header().show(ui, |ui| {
            PanelFolder::Colours.header().show(ui, |ui| {
                for entry in &mut self.materials {
                    ui.horizontal(|ui| {
                        if ui.color_edit_button_srgb(&mut entry.color).changed() {
                            edits.push(PanelEdit::Color {
                                name: entry.name.clone(),
                                color: Color::from_rgb8(entry.color),
                            });
                        }
                        ui.label(entry.name.as_str());
                    });
                }
            });

            PanelFolder::Visibility.header().show(ui, |ui| {
                for entry in &mut self.materials {
                    if ui.checkbox(&mut entry.visible, entry.name.as_str()).changed() {
                        edits.push(PanelEdit::Visible {
                            name: entry.name.clone(),
                            visible: entry.visible,
                        });
                    }
                }

                if ui
                    .add(egui::Slider::new(&mut self.opacity, OPACITY_RANGE).text("opacity"))
                    .changed()
                {
                    edits.push(PanelEdit::Opacity(self.opacity));
                }

                let before = self.side;
                egui::ComboBox::from_label("side")
                    .selected_text(self.side.label())
                    .show_ui(ui, |ui| {
                        for side in Side::ALL {
                            ui.selectable_value(&mut self.side, side, side.label());
                        }
                    });
                if self.side != before {
                    edits.push(PanelEdit::Side(self.side));
                }
            });
        });
    }

    fn camera_ui(&mut self, ui: &mut egui::Ui, edits: &mut Vec<PanelEdit>) {
        PanelFolder::Camera.header().show(ui, |ui| {
            if ui.add(egui::Slider::new(&mut self.fov, FOV_RANGE).text("fov")).changed() {
                edits.push(PanelEdit::Fov(self.fov));
            }
            ui.label(format!("dist2target: {:.3}", self.dist2target));
        });
    }
}
