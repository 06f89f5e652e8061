use crate::geometry::channel;
use crate::material::{line_ubo_min_binding_size, LineUniform, MESHLINE_WGSL};
use crate::mesh::MeshLine;
use crate::paint::{Texture, TextureId};
use crate::render::{Camera, RenderCtx, RenderTarget};

use super::channels::ChannelBuffer;

/// Vertex channels in shader location order.
const VERTEX_CHANNELS: [&str; 7] = [
    channel::POSITION,
    channel::PREVIOUS,
    channel::NEXT,
    channel::SIDE,
    channel::WIDTH,
    channel::UV,
    channel::COUNTERS,
];

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const PREVIOUS_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const NEXT_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];
const SIDE_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32];
const WIDTH_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![4 => Float32];
const UV_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![5 => Float32x2];
const COUNTERS_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![6 => Float32];

fn channel_layout(item_size: u64, attributes: &'static [wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: item_size * std::mem::size_of::<f32>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

fn vertex_layouts() -> [wgpu::VertexBufferLayout<'static>; 7] {
    [
        channel_layout(3, &POSITION_ATTRS),
        channel_layout(3, &PREVIOUS_ATTRS),
        channel_layout(3, &NEXT_ATTRS),
        channel_layout(1, &SIDE_ATTRS),
        channel_layout(1, &WIDTH_ATTRS),
        channel_layout(2, &UV_ATTRS),
        channel_layout(1, &COUNTERS_ATTRS),
    ]
}

/// GPU copy of a `Texture`, tagged with its source id.
struct GpuTexture {
    source: Option<TextureId>,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Draws one [`MeshLine`] with the extrusion shader.
///
/// Owns the GPU mirrors of the line's channels; use one renderer per line so the
/// version tracking stays meaningful. Channels are rewritten in place when their
/// element count is unchanged and reallocated otherwise.
///
/// Output is straight-alpha blended over the existing target contents.
#[derive(Default)]
pub struct MeshLineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    bound_textures: Option<(Option<TextureId>, Option<TextureId>)>,
    line_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    fallback_texture: Option<GpuTexture>,
    map: Option<GpuTexture>,
    alpha_map: Option<GpuTexture>,

    vertex_buffers: [ChannelBuffer; 7],
    index_buffer: ChannelBuffer,
}

impl MeshLineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads whatever changed in `line` and records one indexed draw into `target`.
    ///
    /// Lines without a processed path are skipped.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        line: &MeshLine,
        camera: &Camera,
    ) {
        let geometry = line.geometry.geometry();
        let Some(index) = geometry.index().filter(|i| !i.is_empty()) else { return };

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_textures(ctx, line);
        self.ensure_bindings(ctx);

        for (slot, name) in VERTEX_CHANNELS.iter().enumerate() {
            let Some(attribute) = geometry.attribute(name) else {
                log::debug!("meshline: missing channel `{name}`; skipping draw");
                return;
            };
            self.vertex_buffers[slot].sync(
                ctx.device,
                ctx.queue,
                name,
                wgpu::BufferUsages::VERTEX,
                &attribute.array,
                attribute.version(),
            );
        }
        self.index_buffer.sync(
            ctx.device,
            ctx.queue,
            "meshline index",
            wgpu::BufferUsages::INDEX,
            &index.array,
            index.version(),
        );

        let uniform = line.material.uniform(
            &camera.model_view_projection(&line.matrix_world),
            &camera.projection,
        );
        self.write_uniform(ctx, &uniform);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(index_buffer) = self.index_buffer.buffer.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("meshline pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        for (slot, channel) in self.vertex_buffers.iter().enumerate() {
            let Some(buffer) = channel.buffer.as_ref() else { return };
            rpass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_buffer.len() as u32, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return;
        }
        log::debug!("meshline: creating pipeline for {:?}", ctx.target_format);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meshline shader"),
            source: wgpu::ShaderSource::Wgsl(MESHLINE_WGSL.into()),
        });

        let texture_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("meshline bgl"),
                    entries: &[
                        wgpu::BindGroupLayoutEntry {
                            binding: 0,
                            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: Some(line_ubo_min_binding_size()),
                            },
                            count: None,
                        },
                        texture_entry(1),
                        texture_entry(2),
                        wgpu::BindGroupLayoutEntry {
                            binding: 3,
                            visibility: wgpu::ShaderStages::FRAGMENT,
                            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                            count: None,
                        },
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("meshline pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let buffers = vertex_layouts();
        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("meshline pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Ribbon winding flips with the view direction; draw both faces.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.target_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.bound_textures = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("meshline sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        }));
    }

    /// Keeps GPU copies of the material's textures in sync. Unset slots bind a 1x1
    /// white texture; the uniform flags keep the shader from using it.
    fn ensure_textures(&mut self, ctx: &RenderCtx<'_>, line: &MeshLine) {
        if self.fallback_texture.is_none() {
            self.fallback_texture = Some(upload_texture(ctx, &Texture::solid([255; 4]), None));
        }
        sync_texture(ctx, &mut self.map, line.material.map().map(|t| t.as_ref()));
        sync_texture(ctx, &mut self.alpha_map, line.material.alpha_map().map(|t| t.as_ref()));
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        let wanted = (
            self.map.as_ref().and_then(|t| t.source),
            self.alpha_map.as_ref().and_then(|t| t.source),
        );
        if self.bind_group.is_some() && self.line_ubo.is_some() && self.bound_textures == Some(wanted) {
            return;
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(fallback) = self.fallback_texture.as_ref() else { return };
        let map_view = &self.map.as_ref().unwrap_or(fallback).view;
        let alpha_map_view = &self.alpha_map.as_ref().unwrap_or(fallback).view;

        let line_ubo = match self.line_ubo.take() {
            Some(ubo) => ubo,
            None => ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("meshline line ubo"),
                size: std::mem::size_of::<LineUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        };

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("meshline bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: line_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(map_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(alpha_map_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.line_ubo = Some(line_ubo);
        self.bind_group = Some(bind_group);
        self.bound_textures = Some(wanted);
    }

    fn write_uniform(&mut self, ctx: &RenderCtx<'_>, uniform: &LineUniform) {
        let Some(ubo) = self.line_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(uniform));
    }
}

fn sync_texture(ctx: &RenderCtx<'_>, slot: &mut Option<GpuTexture>, source: Option<&Texture>) {
    match source {
        None => *slot = None,
        Some(texture) if slot.as_ref().and_then(|t| t.source) == Some(texture.id()) => {}
        Some(texture) => *slot = Some(upload_texture(ctx, texture, Some(texture.id()))),
    }
}

fn upload_texture(ctx: &RenderCtx<'_>, texture: &Texture, source: Option<TextureId>) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: texture.width(),
        height: texture.height(),
        depth_or_array_layers: 1,
    };
    let gpu = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("meshline texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &gpu,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        texture.as_bytes(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * texture.width()),
            rows_per_image: Some(texture.height()),
        },
        size,
    );

    let view = gpu.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { source, _texture: gpu, view }
}
