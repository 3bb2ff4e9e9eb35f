//! GPU scene rendering: lit transparent surfaces and edge overlays

use bytemuck::{Pod, Zeroable};
use facetview_core::{Color, Dirty, Drawable, Error, MaterialMesh, Point3f, Result, Scene, Side, Vector3f};
use nalgebra::Matrix4;
use tracing::debug;

use crate::GpuContext;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex data for surface rendering
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl SurfaceVertex {
    pub fn new(position: &Point3f, normal: &Vector3f) -> Self {
        Self {
            position: [position.x, position.y, position.z],
            normal: [normal.x, normal.y, normal.z],
        }
    }

    /// Vertex buffer layout descriptor
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SurfaceVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Vertex data for edge lines
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct EdgeVertex {
    pub position: [f32; 3],
}

impl EdgeVertex {
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EdgeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

/// Camera uniform data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub _padding: f32,
}

/// Lighting uniform data, intensities premultiplied into the colors
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightingUniform {
    pub ambient: [f32; 4],
    pub light_direction: [f32; 4],
    pub light_color: [f32; 4],
}

/// Per-material uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub surface_color: [f32; 4],
    pub edge_color: [f32; 4],
}

impl MaterialUniform {
    /// Colours are stored sRGB encoded and the surface re-encodes on write,
    /// so both are decoded to linear here.
    pub fn from_mesh(mesh: &MaterialMesh) -> Self {
        let surface = mesh.material.color.to_linear();
        let edge = mesh.edges.material.color.to_linear();
        Self {
            surface_color: [surface.r, surface.g, surface.b, mesh.material.rgba()[3]],
            edge_color: [edge.r, edge.g, edge.b, 1.0],
        }
    }
}

/// One ambient and one directional light
#[derive(Debug, Clone, Copy)]
pub struct MeshLightingParams {
    pub ambient_color: Color,
    pub ambient_intensity: f32,
    /// The directional light shines from here towards the origin
    pub light_position: [f32; 3],
    pub light_color: Color,
    pub light_intensity: f32,
}

impl Default for MeshLightingParams {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient_intensity: 1.0,
            light_position: [10.0, 10.0, 10.0],
            light_color: Color::WHITE,
            light_intensity: 1.0,
        }
    }
}

impl MeshLightingParams {
    pub fn to_uniform(&self) -> LightingUniform {
        let scaled = |c: Color, k: f32| {
            let c = c.to_linear();
            [c.r * k, c.g * k, c.b * k, 1.0]
        };
        let p = self.light_position;
        let dir = Vector3f::new(p[0], p[1], p[2])
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3f::z);
        LightingUniform {
            ambient: scaled(self.ambient_color, self.ambient_intensity),
            light_direction: [dir.x, dir.y, dir.z, 0.0],
            light_color: scaled(self.light_color, self.light_intensity),
        }
    }
}

/// Mesh rendering configuration
#[derive(Debug, Clone)]
pub struct MeshRenderConfig {
    pub lighting_params: MeshLightingParams,
    pub background_color: Color,
    pub enable_multisampling: bool,
}

impl Default for MeshRenderConfig {
    fn default() -> Self {
        Self {
            lighting_params: MeshLightingParams::default(),
            background_color: Color::SKY_BLUE,
            enable_multisampling: true,
        }
    }
}

impl MeshRenderConfig {
    pub fn sample_count(&self) -> u32 {
        if self.enable_multisampling {
            4
        } else {
            1
        }
    }
}

/// GPU buffers of one material mesh
pub struct GpuMaterialMesh {
    pub name: String,
    pub center: Point3f,
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub index_buffer: Option<wgpu::Buffer>,
    pub index_count: u32,
    pub edge_buffer: Option<wgpu::Buffer>,
    pub edge_vertex_count: u32,
    pub material_buffer: wgpu::Buffer,
    pub material_bind_group: wgpu::BindGroup,
}

/// Build the interleaved vertex list and flat index list of a mesh
pub fn surface_geometry(mesh: &MaterialMesh) -> (Vec<SurfaceVertex>, Vec<u32>) {
    let normals = mesh.mesh.normals.as_deref();
    let vertices = mesh
        .mesh
        .vertices
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let n = normals.and_then(|n| n.get(i)).copied().unwrap_or_else(Vector3f::zeros);
            SurfaceVertex::new(v, &n)
        })
        .collect();
    let indices = mesh
        .mesh
        .faces
        .iter()
        .flat_map(|f| [f[0] as u32, f[1] as u32, f[2] as u32])
        .collect();
    (vertices, indices)
}

/// Flatten the edge overlay of a mesh into a line list
pub fn edge_geometry(mesh: &MaterialMesh) -> Vec<EdgeVertex> {
    mesh.edges
        .segments
        .iter()
        .flat_map(|[a, b]| {
            [
                EdgeVertex { position: [a.x, a.y, a.z] },
                EdgeVertex { position: [b.x, b.y, b.z] },
            ]
        })
        .collect()
}

/// Render targets that depend on the framebuffer size
struct FrameTargets {
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

impl FrameTargets {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, width: u32, height: u32, sample_count: u32) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };

        let depth_view = device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size,
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default());

        let msaa_view = (sample_count > 1).then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("MSAA Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        Self { depth_view, msaa_view }
    }
}

/// Renders every material mesh of a [`Scene`] with its edge overlay
pub struct SceneRenderer {
    pub config: MeshRenderConfig,
    format: wgpu::TextureFormat,
    front_pipeline: wgpu::RenderPipeline,
    back_pipeline: wgpu::RenderPipeline,
    both_pipeline: wgpu::RenderPipeline,
    edge_pipeline: wgpu::RenderPipeline,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    targets: FrameTargets,
    meshes: Vec<GpuMaterialMesh>,
}

impl SceneRenderer {
    /// Create pipelines and frame resources for a `format` target
    pub fn new(context: &GpuContext, format: wgpu::TextureFormat, width: u32, height: u32, config: MeshRenderConfig) -> Self {
        let device = &context.device;
        let sample_count = config.sample_count();

        let camera_uniform = CameraUniform {
            view_proj: Matrix4::<f32>::identity().into(),
            eye: [0.0, 0.0, 0.0],
            _padding: 0.0,
        };
        let camera_buffer = context.create_buffer_init(
            "Camera Buffer",
            &[camera_uniform],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );
        let lighting_buffer = context.create_buffer_init(
            "Lighting Buffer",
            &[config.lighting_params.to_uniform()],
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        let uniform_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let frame_layout = context.create_bind_group_layout("frame_bind_group_layout", &[uniform_entry(0), uniform_entry(1)]);
        let material_layout = context.create_bind_group_layout("material_bind_group_layout", &[uniform_entry(0)]);

        let frame_bind_group = context.create_bind_group(
            "frame_bind_group",
            &frame_layout,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
        );

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        let surface_shader = context.create_shader_module("Surface Shader", include_str!("shaders/surface.wgsl"));
        let edge_shader = context.create_shader_module("Edge Shader", include_str!("shaders/edges.wgsl"));

        let surface_pipeline = |side: Side| {
            Self::create_surface_pipeline(device, &layout, &surface_shader, format, sample_count, side)
        };
        let front_pipeline = surface_pipeline(Side::Front);
        let back_pipeline = surface_pipeline(Side::Back);
        let both_pipeline = surface_pipeline(Side::Both);
        let edge_pipeline = Self::create_edge_pipeline(device, &layout, &edge_shader, format, sample_count);

        let targets = FrameTargets::new(device, format, width, height, sample_count);

        Self {
            config,
            format,
            front_pipeline,
            back_pipeline,
            both_pipeline,
            edge_pipeline,
            camera_uniform,
            camera_buffer,
            frame_bind_group,
            material_layout,
            targets,
            meshes: Vec::new(),
        }
    }

    /// Faces culled for a given sidedness
    pub fn cull_mode(side: Side) -> Option<wgpu::Face> {
        match side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Both => None,
        }
    }

    fn create_surface_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        sample_count: u32,
        side: Side,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} Surface Pipeline", side)),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[SurfaceVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Self::cull_mode(side),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    fn create_edge_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Edge Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: "vs_main",
                buffers: &[EdgeVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Upload the geometry of every material mesh, replacing anything uploaded before.
    pub fn upload_scene(&mut self, context: &GpuContext, scene: &mut Scene) {
        self.meshes = scene
            .meshes_mut()
            .iter_mut()
            .map(|mesh| {
                let (vertices, indices) = surface_geometry(mesh);
                let edges = edge_geometry(mesh);

                // wgpu rejects zero-sized buffers
                let (vertex_buffer, index_buffer) = if indices.is_empty() {
                    debug!("material '{}' has no triangles", mesh.name);
                    (None, None)
                } else {
                    (
                        Some(context.create_buffer_init("Surface Vertex Buffer", &vertices, wgpu::BufferUsages::VERTEX)),
                        Some(context.create_buffer_init("Surface Index Buffer", &indices, wgpu::BufferUsages::INDEX)),
                    )
                };
                let edge_buffer = (!edges.is_empty())
                    .then(|| context.create_buffer_init("Edge Vertex Buffer", &edges, wgpu::BufferUsages::VERTEX));

                let material_buffer = context.create_buffer_init(
                    "Material Buffer",
                    &[MaterialUniform::from_mesh(mesh)],
                    wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                );
                let material_bind_group = context.create_bind_group(
                    "material_bind_group",
                    &self.material_layout,
                    &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    }],
                );
                // The buffer was just written with the current material
                Dirty::mark_clean(&mut mesh.material);

                let center = mesh.mesh.bounding_box().center();

                GpuMaterialMesh {
                    name: mesh.name.clone(),
                    center,
                    vertex_buffer,
                    index_buffer,
                    index_count: indices.len() as u32,
                    edge_buffer,
                    edge_vertex_count: edges.len() as u32,
                    material_buffer,
                    material_bind_group,
                }
            })
            .collect();
    }

    /// Write the material uniforms of every mesh whose material changed.
    ///
    /// Returns the number of uniforms written.
    pub fn sync_materials(&mut self, context: &GpuContext, scene: &mut Scene) -> Result<usize> {
        let mut written = 0;
        for mesh in scene.meshes_mut() {
            let uniform = MaterialUniform::from_mesh(mesh);
            let gpu = self
                .meshes
                .iter()
                .find(|g| g.name == mesh.name)
                .ok_or_else(|| Error::Gpu(format!("material '{}' was never uploaded", mesh.name)))?;
            let updated = Dirty::clean(&mut mesh.material, |_| {
                context.queue.write_buffer(&gpu.material_buffer, 0, bytemuck::bytes_of(&uniform));
                Ok::<_, Error>(())
            })?;
            if updated {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Update camera matrices and eye position
    pub fn update_camera(&mut self, context: &GpuContext, view_proj: Matrix4<f32>, eye: Point3f) {
        self.camera_uniform.view_proj = view_proj.into();
        self.camera_uniform.eye = [eye.x, eye.y, eye.z];
        context
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&self.camera_uniform));
    }

    /// Recreate the size-dependent targets
    pub fn resize(&mut self, context: &GpuContext, width: u32, height: u32) {
        self.targets = FrameTargets::new(&context.device, self.format, width, height, self.config.sample_count());
    }

    fn pipeline_for(&self, side: Side) -> &wgpu::RenderPipeline {
        match side {
            Side::Front => &self.front_pipeline,
            Side::Back => &self.back_pipeline,
            Side::Both => &self.both_pipeline,
        }
    }

    /// Record the scene pass into `encoder`, clearing `target` first.
    ///
    /// Visible surfaces are drawn far to near so that transparency composes,
    /// then every edge overlay is drawn on top.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, scene: &Scene) {
        let eye = Point3f::from(self.camera_uniform.eye);
        let mut order: Vec<(&MaterialMesh, &GpuMaterialMesh)> = scene
            .meshes()
            .iter()
            .filter_map(|m| self.meshes.iter().find(|g| g.name == m.name).map(|g| (m, g)))
            .collect();
        order.sort_by(|(_, a), (_, b)| {
            let da = (a.center - eye).norm_squared();
            let db = (b.center - eye).norm_squared();
            db.total_cmp(&da)
        });

        let (view, resolve_target) = match &self.targets.msaa_view {
            Some(msaa) => (msaa, Some(target)),
            None => (target, None),
        };
        let bg = self.config.background_color.to_linear();

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: bg.r as f64,
                        g: bg.g as f64,
                        b: bg.b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (mesh, gpu) in order.iter().filter(|(m, _)| m.visible) {
            if let (Some(vb), Some(ib)) = (&gpu.vertex_buffer, &gpu.index_buffer) {
                pass.set_pipeline(self.pipeline_for(mesh.material.side));
                pass.set_bind_group(1, &gpu.material_bind_group, &[]);
                pass.set_vertex_buffer(0, vb.slice(..));
                pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }

        // Edge overlays are separate objects and stay visible when their surface is hidden
        pass.set_pipeline(&self.edge_pipeline);
        for (_, gpu) in &order {
            if let Some(eb) = &gpu.edge_buffer {
                pass.set_bind_group(1, &gpu.material_bind_group, &[]);
                pass.set_vertex_buffer(0, eb.slice(..));
                pass.draw(0..gpu.edge_vertex_count, 0..1);
            }
        }
    }
}
