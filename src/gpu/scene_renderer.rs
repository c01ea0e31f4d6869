//! Scene renderer for the viewer
//!
//! Owns every GPU resource the scene needs: lit mesh pipelines (opaque and
//! blended), the debug line pipeline, per-frame and per-draw uniforms, cached
//! vertex/index buffers per geometry and the environment cube map.

use std::collections::{HashMap, HashSet};
use std::mem;
use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use eframe::wgpu::{
    self, BindGroup, BindGroupLayout, Buffer, BufferUsages, Device, Queue, RenderPipeline, Sampler,
    ShaderStages, TextureView, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode,
};
use eframe::wgpu::util::DeviceExt;
use glam::Mat4;

use super::config::GraphicsConfig;
use crate::render::frame::{DrawItem, FrameSnapshot, LightRig, LineVertex, SPOT_DECAY};
use crate::render::frame::{MAX_DIRECTIONAL_LIGHTS, MAX_SPOT_LIGHTS};
use crate::scene::{CubeMapImage, MeshGeometry};

/// Colour of the environment used until the real cube map arrives
const FALLBACK_ENVIRONMENT: [u8; 4] = [128, 128, 128, 255];

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex3D {
    const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
            shader_location: 2,
            format: VertexFormat::Float32x2,
        },
    ];

    pub fn desc<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Interleave a geometry's attributes
    pub fn from_geometry(geometry: &MeshGeometry) -> Vec<Vertex3D> {
        geometry
            .positions
            .iter()
            .enumerate()
            .map(|(i, position)| Vertex3D {
                position: position.to_array(),
                normal: geometry.normals.get(i).map_or([0.0, 1.0, 0.0], |n| n.to_array()),
                uv: geometry.uvs.get(i).map_or([0.0, 0.0], |uv| uv.to_array()),
            })
            .collect()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct LineVertex3D {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex3D {
    const ATTRIBUTES: [VertexAttribute; 2] = [
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x3,
        },
        VertexAttribute {
            offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: 1,
            format: VertexFormat::Float32x3,
        },
    ];

    pub fn desc<'a>() -> VertexBufferLayout<'a> {
        VertexBufferLayout {
            array_stride: mem::size_of::<LineVertex3D>() as wgpu::BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&LineVertex> for LineVertex3D {
    fn from(vertex: &LineVertex) -> Self {
        Self {
            position: vertex.position.to_array(),
            color: vertex.color,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 4],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
pub struct SpotLightUniform {
    /// w: cutoff distance
    pub position: [f32; 4],
    /// w: decay exponent
    pub direction: [f32; 4],
    pub color: [f32; 4],
    /// x: outer cone cosine, y: inner cone cosine
    pub cone: [f32; 4],
}

/// Camera and light data shared by every draw in a frame
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// w: 1 when the shader must encode sRGB itself
    pub camera_position: [f32; 4],
    pub ambient: [f32; 4],
    pub counts: [u32; 4],
    pub directional: [DirectionalLightUniform; MAX_DIRECTIONAL_LIGHTS],
    pub spots: [SpotLightUniform; MAX_SPOT_LIGHTS],
}

impl FrameUniforms {
    pub fn from_frame(frame: &FrameSnapshot) -> Self {
        let position = frame.camera_position;
        let encode_srgb = if frame.settings.srgb_output { 0.0 } else { 1.0 };
        let mut uniforms = Self {
            view_proj: frame.view_proj.to_cols_array_2d(),
            camera_position: [position.x, position.y, position.z, encode_srgb],
            ambient: [0.0; 4],
            counts: [0; 4],
            directional: [DirectionalLightUniform::default(); MAX_DIRECTIONAL_LIGHTS],
            spots: [SpotLightUniform::default(); MAX_SPOT_LIGHTS],
        };
        uniforms.set_lights(&frame.lights);
        uniforms
    }

    fn set_lights(&mut self, lights: &LightRig) {
        let [r, g, b] = lights.ambient;
        self.ambient = [r, g, b, 1.0];

        for (slot, light) in self.directional.iter_mut().zip(&lights.directional) {
            let [r, g, b] = light.radiance;
            *slot = DirectionalLightUniform {
                direction: light.direction.extend(0.0).to_array(),
                color: [r, g, b, 1.0],
            };
        }
        for (slot, light) in self.spots.iter_mut().zip(&lights.spots) {
            let [r, g, b] = light.radiance;
            *slot = SpotLightUniform {
                position: light.position.extend(light.distance).to_array(),
                direction: light.direction.extend(SPOT_DECAY).to_array(),
                color: [r, g, b, 1.0],
                cone: [light.cone_cos, light.penumbra_cos, 0.0, 0.0],
            };
        }
        self.counts = [
            lights.directional.len().min(MAX_DIRECTIONAL_LIGHTS) as u32,
            lights.spots.len().min(MAX_SPOT_LIGHTS) as u32,
            0,
            0,
        ];
    }
}

/// Model transform and material for one draw
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// a: opacity
    pub base_color: [f32; 4],
    /// metalness, roughness, env map intensity, env map attached
    pub params: [f32; 4],
}

impl DrawUniforms {
    pub fn from_draw(draw: &DrawItem) -> Self {
        let material = &draw.material;
        let [r, g, b] = material.base_color;
        Self {
            model: draw.model.to_cols_array_2d(),
            normal_matrix: normal_matrix(draw.model).to_cols_array_2d(),
            base_color: [r, g, b, material.opacity],
            params: [
                material.metalness,
                material.roughness,
                material.env_map_intensity,
                if draw.env_map.is_some() { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Inverse transpose of the model matrix; singular transforms fall back to
/// the model matrix itself
pub fn normal_matrix(model: Mat4) -> Mat4 {
    if model.determinant() != 0.0 {
        model.inverse().transpose()
    } else {
        model
    }
}

/// Round `size` up to a multiple of `alignment`
fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

struct GpuMesh {
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    index_count: u32,
}

struct PreparedDraw {
    mesh_id: u64,
    transparent: bool,
    /// Dynamic offset into the draw uniform buffer
    offset: u32,
}

pub struct SceneRenderer {
    config: GraphicsConfig,
    mesh_pipeline: RenderPipeline,
    transparent_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    frame_layout: BindGroupLayout,
    frame_buffer: Buffer,
    frame_bind_group: BindGroup,
    draw_layout: BindGroupLayout,
    draw_buffer: Buffer,
    draw_bind_group: BindGroup,
    draw_capacity: usize,
    draw_stride: u64,
    sampler: Sampler,
    fallback_environment: TextureView,
    /// Id of the cube texture currently uploaded, with its view
    environment: Option<(u64, TextureView)>,
    meshes: HashMap<u64, GpuMesh>,
    draws: Vec<PreparedDraw>,
    line_buffer: Option<Buffer>,
    line_capacity: usize,
    line_count: u32,
}

impl std::fmt::Debug for SceneRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRenderer")
            .field("config", &self.config)
            .field("cached_meshes", &self.meshes.len())
            .field("draws", &self.draws.len())
            .field("draw_capacity", &self.draw_capacity)
            .field("has_environment", &self.environment.is_some())
            .field("line_count", &self.line_count)
            .finish()
    }
}

impl SceneRenderer {
    pub fn new(device: &Device, queue: &Queue, config: GraphicsConfig) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Frame Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Draw Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(mem::size_of::<DrawUniforms>() as u64),
                },
                count: None,
            }],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Frame Uniform Buffer"),
            size: mem::size_of::<FrameUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let fallback_environment = upload_cube_map(device, queue, &CubeMapImage::solid(FALLBACK_ENVIRONMENT));
        let frame_bind_group =
            create_frame_bind_group(device, &frame_layout, &frame_buffer, &fallback_environment, &sampler);

        let draw_stride = align_to(
            mem::size_of::<DrawUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let draw_capacity = 16;
        let (draw_buffer, draw_bind_group) = create_draw_buffer(device, &draw_layout, draw_stride, draw_capacity);

        let (mesh_pipeline, transparent_pipeline, line_pipeline) =
            create_pipelines(device, &config, &frame_layout, &draw_layout);

        log::debug!(
            "Scene renderer created ({:?}, {}x MSAA, draw stride {})",
            config.texture_format,
            config.sample_count,
            draw_stride
        );

        Self {
            config,
            mesh_pipeline,
            transparent_pipeline,
            line_pipeline,
            frame_layout,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity,
            draw_stride,
            sampler,
            fallback_environment,
            environment: None,
            meshes: HashMap::new(),
            draws: Vec::new(),
            line_buffer: None,
            line_capacity: 0,
            line_count: 0,
        }
    }

    pub fn config(&self) -> &GraphicsConfig {
        &self.config
    }

    /// Upload everything `frame` needs before the render pass starts
    pub fn prepare(&mut self, device: &Device, queue: &Queue, frame: &FrameSnapshot) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&FrameUniforms::from_frame(frame)));
        self.update_environment(device, queue, frame);

        if frame.draws.len() > self.draw_capacity {
            self.draw_capacity = frame.draws.len().next_power_of_two();
            let (buffer, bind_group) =
                create_draw_buffer(device, &self.draw_layout, self.draw_stride, self.draw_capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            log::debug!("Grew draw uniform buffer to {} entries", self.draw_capacity);
        }

        self.draws.clear();
        let mut live = HashSet::with_capacity(frame.draws.len());
        for draw in &frame.draws {
            if draw.geometry.indices.is_empty() {
                continue;
            }
            let id = draw.geometry.id();
            self.meshes
                .entry(id)
                .or_insert_with(|| create_gpu_mesh(device, &draw.geometry));
            live.insert(id);

            let offset = self.draws.len() as u64 * self.draw_stride;
            queue.write_buffer(&self.draw_buffer, offset, bytemuck::bytes_of(&DrawUniforms::from_draw(draw)));
            self.draws.push(PreparedDraw {
                mesh_id: id,
                transparent: draw.material.transparent,
                offset: offset as u32,
            });
        }
        self.meshes.retain(|id, _| live.contains(id));

        self.prepare_lines(device, queue, &frame.lines);
    }

    /// Upload the frame's cube map once its image is available and bind it
    /// in place of the fallback
    fn update_environment(&mut self, device: &Device, queue: &Queue, frame: &FrameSnapshot) {
        let Some(texture) = frame.environment() else {
            return;
        };
        let Some(image) = texture.image() else {
            return;
        };
        if self.environment.as_ref().is_some_and(|(id, _)| *id == texture.id()) {
            return;
        }

        log::debug!("Uploading environment cube map ({}px faces)", image.size);
        let view = upload_cube_map(device, queue, image);
        self.frame_bind_group =
            create_frame_bind_group(device, &self.frame_layout, &self.frame_buffer, &view, &self.sampler);
        self.environment = Some((texture.id(), view));
    }

    fn prepare_lines(&mut self, device: &Device, queue: &Queue, lines: &[LineVertex]) {
        self.line_count = lines.len() as u32;
        if lines.is_empty() {
            return;
        }
        let vertices: Vec<LineVertex3D> = lines.iter().map(LineVertex3D::from).collect();

        match &self.line_buffer {
            Some(buffer) if self.line_capacity >= vertices.len() => {
                queue.write_buffer(buffer, 0, bytemuck::cast_slice(&vertices));
            }
            _ => {
                self.line_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Scene Line Vertex Buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
                }));
                self.line_capacity = vertices.len();
            }
        }
    }

    /// Record the prepared frame into egui's render pass
    pub fn paint(&self, render_pass: &mut wgpu::RenderPass<'static>) {
        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for draw in &self.draws {
            let Some(mesh) = self.meshes.get(&draw.mesh_id) else {
                continue;
            };
            let pipeline = if draw.transparent {
                &self.transparent_pipeline
            } else {
                &self.mesh_pipeline
            };
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(1, &self.draw_bind_group, &[draw.offset]);
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }

        if let Some(buffer) = &self.line_buffer {
            if self.line_count > 0 {
                render_pass.set_pipeline(&self.line_pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                render_pass.draw(0..self.line_count, 0..1);
            }
        }
    }
}

fn create_pipelines(
    device: &Device,
    config: &GraphicsConfig,
    frame_layout: &BindGroupLayout,
    draw_layout: &BindGroupLayout,
) -> (RenderPipeline, RenderPipeline, RenderPipeline) {
    let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Standard Material Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/standard.wgsl").into()),
    });
    let line_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Line Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/lines.wgsl").into()),
    });

    let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Mesh Pipeline Layout"),
        bind_group_layouts: &[frame_layout, draw_layout],
        push_constant_ranges: &[],
    });
    let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Line Pipeline Layout"),
        bind_group_layouts: &[frame_layout],
        push_constant_ranges: &[],
    });

    let mesh_pipeline = |label: &'static str, blend: wgpu::BlendState, depth_write: bool| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&mesh_layout),
            cache: None,
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(config.color_target_state(blend))],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(config.depth_stencil_state(depth_write)),
            multisample: config.multisample_state(),
            multiview: None,
        })
    };
    let opaque = mesh_pipeline("Scene Mesh Pipeline", wgpu::BlendState::REPLACE, true);
    let transparent = mesh_pipeline("Scene Transparent Mesh Pipeline", wgpu::BlendState::ALPHA_BLENDING, false);

    let lines = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Scene Line Pipeline"),
        layout: Some(&line_layout),
        cache: None,
        vertex: wgpu::VertexState {
            module: &line_shader,
            entry_point: Some("vs_main"),
            buffers: &[LineVertex3D::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &line_shader,
            entry_point: Some("fs_main"),
            targets: &[Some(config.color_target_state(wgpu::BlendState::REPLACE))],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::LineList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(config.depth_stencil_state(true)),
        multisample: config.multisample_state(),
        multiview: None,
    });

    (opaque, transparent, lines)
}

fn create_frame_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    buffer: &Buffer,
    environment: &TextureView,
    sampler: &Sampler,
) -> BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Frame Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(environment),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_draw_buffer(device: &Device, layout: &BindGroupLayout, stride: u64, capacity: usize) -> (Buffer, BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Draw Uniform Buffer"),
        size: stride * capacity as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Scene Draw Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

fn create_gpu_mesh(device: &Device, geometry: &MeshGeometry) -> GpuMesh {
    let vertices = Vertex3D::from_geometry(geometry);
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Mesh Index Buffer"),
        contents: bytemuck::cast_slice(&geometry.indices),
        usage: BufferUsages::INDEX,
    });
    log::debug!(
        "Uploaded geometry {} ({} vertices, {} triangles)",
        geometry.id(),
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: geometry.indices.len() as u32,
    }
}

/// Create a six-layer sRGB texture from `image` and return a cube view of it
fn upload_cube_map(device: &Device, queue: &Queue, image: &CubeMapImage) -> TextureView {
    let size = wgpu::Extent3d {
        width: image.size,
        height: image.size,
        depth_or_array_layers: 6,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Environment Cube Map"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (layer, face) in image.faces.iter().enumerate() {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            face,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.size),
                rows_per_image: Some(image.size),
            },
            wgpu::Extent3d {
                width: image.size,
                height: image.size,
                depth_or_array_layers: 1,
            },
        );
    }

    texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("Environment Cube View"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    })
}
