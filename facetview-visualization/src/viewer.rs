//! The viewer window and its event loop

use std::path::{Path, PathBuf};
use std::sync::Arc;

use egui::ViewportId;
use facetview_core::{Error, Result};
use facetview_gpu::{GpuContext, RenderSurface, SceneRenderer};
use nalgebra::vector;
use tracing::{debug, error, warn};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::{Window, WindowBuilder},
};

use crate::config::ViewerConfig;
use crate::panel::PanelEdit;
use crate::session::Session;
use crate::stats::FrameStats;

/// Interactive viewer for a single model
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Open the window and run until it is closed
    pub fn run(self) -> Result<()> {
        let event_loop =
            EventLoop::new().map_err(|e| Error::Visualization(format!("Failed to create event loop: {}", e)))?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(&self.config.title)
                .with_inner_size(LogicalSize::new(self.config.width as f64, self.config.height as f64))
                .build(&event_loop)
                .map_err(|e| Error::Visualization(format!("Failed to create window: {}", e)))?,
        );

        let mut state = pollster::block_on(ViewerState::new(window, self.config))?;

        event_loop
            .run(move |event, target| {
                target.set_control_flow(ControlFlow::Poll);
                match event {
                    Event::WindowEvent { event, .. } => state.window_event(event, target),
                    Event::AboutToWait => state.window.request_redraw(),
                    _ => {}
                }
            })
            .map_err(|e| Error::Visualization(format!("Event loop error: {}", e)))
    }
}

/// Window and GPU state owned by the event loop
struct ViewerState {
    window: Arc<Window>,
    context: GpuContext,
    surface: RenderSurface,
    renderer: SceneRenderer,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    session: Session,
    stats: FrameStats,
}

impl ViewerState {
    async fn new(window: Arc<Window>, config: ViewerConfig) -> Result<Self> {
        let size = window.inner_size();
        let (context, surface) = GpuContext::for_window(window.clone()).await?;
        let surface = RenderSurface::new(&context, surface, size.width, size.height);
        let (width, height) = surface.size();

        let mut renderer = SceneRenderer::new(&context, surface.format(), width, height, config.render.clone());

        let egui_state = egui_winit::State::new(
            egui::Context::default(),
            ViewportId::ROOT,
            &*window,
            Some(window.scale_factor() as f32),
            Some(context.device.limits().max_texture_dimension_2d as usize),
        );
        let egui_renderer = egui_wgpu::Renderer::new(&context.device, surface.format(), None, 1);

        let mut session = Session::new(&config, width, height);
        renderer.upload_scene(&context, &mut session.scene);

        Ok(Self {
            window,
            context,
            surface,
            renderer,
            egui_state,
            egui_renderer,
            session,
            stats: FrameStats::new(),
        })
    }

    fn load_model(&mut self, path: &Path) {
        if self.session.load_model(path) {
            self.renderer.upload_scene(&self.context, &mut self.session.scene);
        }
    }

    fn pick_file(&mut self) {
        if !self.session.panel.file_selection_enabled() {
            return;
        }
        let picked: Option<PathBuf> = rfd::FileDialog::new()
            .add_filter("JSON model", facetview_io::SUPPORTED_EXTENSIONS)
            .pick_file();
        match picked {
            Some(path) => self.load_model(&path),
            None => debug!("file dialog cancelled"),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.surface.resize(&self.context, width, height) {
            self.renderer.resize(&self.context, width, height);
            self.session.resize(width, height);
        }
    }

    fn window_event(&mut self, event: WindowEvent, target: &EventLoopWindowTarget<()>) {
        let response = self.egui_state.on_window_event(&self.window, &event);

        match event {
            WindowEvent::CloseRequested => target.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::DroppedFile(path) => self.load_model(&path),
            WindowEvent::CursorMoved { position, .. } => {
                let session = &mut self.session;
                session
                    .controls
                    .cursor_moved(&mut session.camera, vector![position.x, position.y]);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                // Drags that start over the panel belong to egui
                if !(pressed && response.consumed) {
                    self.session.controls.mouse_input(button, pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !response.consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                let session = &mut self.session;
                session.controls.mouse_wheel(&mut session.camera, lines);
            }
            WindowEvent::RedrawRequested => match self.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.surface.reconfigure(&self.context);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory, exiting");
                    target.exit();
                }
                Err(e) => warn!("dropped frame: {}", e),
            },
            _ => {}
        }
    }

    fn render(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        self.stats.tick();

        let egui_ctx = self.egui_state.egui_ctx().clone();
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let mut edits = Vec::new();
        let output = egui_ctx.run(raw_input, |ctx| {
            edits = self.session.panel.show(ctx, &self.stats);
        });
        self.egui_state
            .handle_platform_output(&self.window, output.platform_output);

        for edit in edits {
            if edit == PanelEdit::OpenFile {
                self.pick_file();
            } else if let Err(e) = self.session.apply(&edit) {
                warn!("{}", e);
            }
        }

        let session = &mut self.session;
        session.panel.update_distance(&session.camera);
        self.renderer.update_camera(
            &self.context,
            session.camera.view_projection_matrix(),
            session.camera.position,
        );
        if let Err(e) = self.renderer.sync_materials(&self.context, &mut session.scene) {
            error!("failed to update materials: {}", e);
        }

        let frame = self.surface.acquire()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.renderer.render(&mut encoder, &view, &self.session.scene);

        let (width, height) = self.surface.size();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: output.pixels_per_point,
        };
        let paint_jobs = egui_ctx.tessellate(output.shapes, output.pixels_per_point);
        for (id, delta) in &output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.context.device, &self.context.queue, *id, delta);
        }
        let egui_commands = self.egui_renderer.update_buffers(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &paint_jobs,
            &screen,
        );

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui_renderer.render(&mut pass, &paint_jobs, &screen);
        }

        for id in &output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.context
            .queue
            .submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();
        Ok(())
    }
}
