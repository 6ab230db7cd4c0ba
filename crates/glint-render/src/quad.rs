//! Textured screen-space quad rendering.
//!
//! [`QuadRenderer`] owns the GPU state (one pipeline per [`BlendMode`], one
//! sampler per [`QuadFilter`], and a vertex buffer with room for a fixed
//! number of quads). [`ScreenQuadPass`] borrows it together with an open
//! `wgpu::RenderPass` and implements [`QuadPass`] on top of them.
//!
//! # Example
//!
//! ```ignore
//! let quads = QuadRenderer::new(context.clone(), surface_format);
//!
//! // In render loop:
//! let mut pass = ScreenQuadPass::new(&quads, &mut render_pass, (width, height));
//! text_surface.draw(&mut pass);
//! ```

use std::sync::Arc;

use glint_core::profiling::profile_function;
use glint_test_utils::{BlendMode, GpuTexture, QuadFilter, QuadPass, TexturedQuad};

use crate::context::GraphicsContext;

/// Vertex of a screen quad, position already in clip space.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

const VERTICES_PER_QUAD: u64 = 6;
const QUAD_STRIDE: u64 = VERTICES_PER_QUAD * std::mem::size_of::<QuadVertex>() as u64;

/// Options for configuring the quad renderer.
#[derive(Debug, Clone)]
pub struct QuadRendererOptions {
    /// Quads that can be drawn through one [`ScreenQuadPass`].
    pub max_quads_per_pass: u32,
}

impl Default for QuadRendererOptions {
    fn default() -> Self {
        Self {
            max_quads_per_pass: 64,
        }
    }
}

/// GPU state for drawing textured quads.
pub struct QuadRenderer {
    replace_pipeline: wgpu::RenderPipeline,
    alpha_pipeline: wgpu::RenderPipeline,
    premultiplied_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    linear_sampler: wgpu::Sampler,
    nearest_sampler: wgpu::Sampler,
    vertex_buffer: wgpu::Buffer,
    max_quads: u32,
    context: Arc<GraphicsContext>,
}

impl QuadRenderer {
    /// Create a new quad renderer.
    ///
    /// # Arguments
    ///
    /// * `context` - The graphics context
    /// * `target_format` - The format of the render target (typically the surface format)
    pub fn new(context: Arc<GraphicsContext>, target_format: wgpu::TextureFormat) -> Self {
        Self::new_with_options(context, target_format, QuadRendererOptions::default())
    }

    pub fn new_with_options(
        context: Arc<GraphicsContext>,
        target_format: wgpu::TextureFormat,
        options: QuadRendererOptions,
    ) -> Self {
        profile_function!();
        let device = context.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let linear_sampler =
            create_sampler(device, "Quad Linear Sampler", wgpu::FilterMode::Linear);
        let nearest_sampler =
            create_sampler(device, "Quad Nearest Sampler", wgpu::FilterMode::Nearest);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Quad Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Quad Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let build = |label: &str, blend: wgpu::BlendState| {
            create_pipeline(device, label, &pipeline_layout, &shader, target_format, blend)
        };
        let replace_pipeline = build("Quad Pipeline (replace)", wgpu::BlendState::REPLACE);
        let alpha_pipeline = build("Quad Pipeline (alpha)", wgpu::BlendState::ALPHA_BLENDING);
        let premultiplied_pipeline = build(
            "Quad Pipeline (premultiplied)",
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
        );

        let max_quads = options.max_quads_per_pass.max(1);
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Quad Vertex Buffer"),
            size: QUAD_STRIDE * max_quads as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            replace_pipeline,
            alpha_pipeline,
            premultiplied_pipeline,
            bind_group_layout,
            linear_sampler,
            nearest_sampler,
            vertex_buffer,
            max_quads,
            context,
        }
    }

    fn pipeline(&self, blend: BlendMode) -> &wgpu::RenderPipeline {
        match blend {
            BlendMode::Replace => &self.replace_pipeline,
            BlendMode::Alpha => &self.alpha_pipeline,
            BlendMode::PremultipliedAlpha => &self.premultiplied_pipeline,
        }
    }

    fn sampler(&self, filter: QuadFilter) -> &wgpu::Sampler {
        match filter {
            QuadFilter::Linear => &self.linear_sampler,
            QuadFilter::Nearest => &self.nearest_sampler,
        }
    }

    /// Create a bind group for a texture.
    pub fn create_bind_group(&self, texture: &GpuTexture, filter: QuadFilter) -> wgpu::BindGroup {
        self.context
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Quad Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(texture.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(self.sampler(filter)),
                    },
                ],
            })
    }
}

fn create_sampler(device: &wgpu::Device, label: &str, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    target_format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<QuadVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
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
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

/// Build the two triangles of `quad` in clip space for a `viewport` of
/// `(width, height)` pixels. Pixel space has +y down, clip space +y up.
pub fn quad_vertices(quad: &TexturedQuad, viewport: (f32, f32)) -> [QuadVertex; 6] {
    let (vw, vh) = (viewport.0.max(1.0), viewport.1.max(1.0));
    let [x, y, w, h] = quad.rect;
    let [u0, v0, u1, v1] = quad.uv;

    let left = x / vw * 2.0 - 1.0;
    let right = (x + w) / vw * 2.0 - 1.0;
    let top = 1.0 - y / vh * 2.0;
    let bottom = 1.0 - (y + h) / vh * 2.0;

    let vertex = |position: [f32; 2], uv: [f32; 2]| QuadVertex { position, uv };
    let tl = vertex([left, top], [u0, v0]);
    let tr = vertex([right, top], [u1, v0]);
    let bl = vertex([left, bottom], [u0, v1]);
    let br = vertex([right, bottom], [u1, v1]);

    [bl, br, tr, bl, tr, tl]
}

/// A [`QuadPass`] recording into an open `wgpu::RenderPass`.
///
/// Each quad gets its own slot in the renderer's vertex buffer, so a single
/// pass must not be shared between command encoders submitted separately.
pub struct ScreenQuadPass<'a, 'p> {
    renderer: &'a QuadRenderer,
    render_pass: &'a mut wgpu::RenderPass<'p>,
    viewport: (f32, f32),
    blend: BlendMode,
    next_slot: u32,
}

impl<'a, 'p> ScreenQuadPass<'a, 'p> {
    /// Wrap `render_pass`, whose target is `viewport` pixels large.
    pub fn new(
        renderer: &'a QuadRenderer,
        render_pass: &'a mut wgpu::RenderPass<'p>,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            renderer,
            render_pass,
            viewport: (viewport.0 as f32, viewport.1 as f32),
            blend: BlendMode::default(),
            next_slot: 0,
        }
    }
}

impl QuadPass for ScreenQuadPass<'_, '_> {
    fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn draw_textured_quad(&mut self, texture: &GpuTexture, quad: TexturedQuad) {
        profile_function!();
        if self.next_slot >= self.renderer.max_quads {
            tracing::warn!(
                "Quad pass is full ({} quads), dropping draw",
                self.renderer.max_quads
            );
            return;
        }

        let vertices = quad_vertices(&quad, self.viewport);
        let offset = self.next_slot as u64 * QUAD_STRIDE;
        self.next_slot += 1;

        self.renderer.context.queue().write_buffer(
            &self.renderer.vertex_buffer,
            offset,
            bytemuck::cast_slice(&vertices),
        );

        let bind_group = self.renderer.create_bind_group(texture, quad.filter);

        self.render_pass.push_debug_group("ScreenQuadPass::draw_textured_quad");
        self.render_pass.set_pipeline(self.renderer.pipeline(self.blend));
        self.render_pass.set_bind_group(0, &bind_group, &[]);
        self.render_pass.set_vertex_buffer(
            0,
            self.renderer
                .vertex_buffer
                .slice(offset..offset + QUAD_STRIDE),
        );
        self.render_pass.draw(0..VERTICES_PER_QUAD as u32, 0..1);
        self.render_pass.pop_debug_group();
    }
}
