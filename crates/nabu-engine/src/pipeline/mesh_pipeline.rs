use crate::render::TeardownReport;
use crate::scene::SceneConstants;

use super::{CompiledShader, FixedState, InputLayout};

/// Render pipeline for the lit mesh, with its constant-buffer binding layout.
pub struct MeshPipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::PipelineLayout,
    bind_group_layout: wgpu::BindGroupLayout,
    vertex_module: wgpu::ShaderModule,
    pixel_module: wgpu::ShaderModule,
}

impl MeshPipeline {
    /// Creates the shader modules and the render pipeline.
    ///
    /// `state` is consumed: once the pipeline exists it is the only holder of
    /// the rasterizer and depth-stencil configuration.
    pub fn new(
        device: &wgpu::Device,
        vs: &CompiledShader,
        ps: &CompiledShader,
        input_layout: &InputLayout,
        state: FixedState,
        color_format: wgpu::TextureFormat,
    ) -> Self {
        let vertex_module = vs.module(device);
        let pixel_module = ps.module(device);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("nabu scene constants bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(SceneConstants::SIZE),
                },
                count: None,
            }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("nabu mesh pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let FixedState {
            primitive,
            depth_stencil,
            multisample,
        } = state;

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("nabu mesh pipeline"),
            layout: Some(&layout),

            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(vs.entry_point()),
                compilation_options: Default::default(),
                buffers: &[input_layout.buffer_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &pixel_module,
                entry_point: Some(ps.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive,
            depth_stencil: Some(depth_stencil),
            multisample,

            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "mesh pipeline ready: {} / {} -> {color_format:?}",
            vs.entry_point(),
            ps.entry_point()
        );

        Self {
            pipeline,
            layout,
            bind_group_layout,
            vertex_module,
            pixel_module,
        }
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    /// Allocates the per-frame constant buffer and its bind group.
    pub fn create_constants(&self, device: &wgpu::Device) -> ConstantBuffer {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("nabu scene constants"),
            size: SceneConstants::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("nabu scene constants bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        ConstantBuffer { bind_group, buffer }
    }

    /// Drops the pipeline, then its layouts, then the shader modules.
    pub(crate) fn release(self, report: &mut TeardownReport) {
        let Self {
            pipeline,
            layout,
            bind_group_layout,
            vertex_module,
            pixel_module,
        } = self;

        drop(pipeline);
        report.record("render pipeline");
        drop(layout);
        drop(bind_group_layout);
        report.record("pipeline layout");
        drop(pixel_module);
        drop(vertex_module);
        report.record("shader modules");
    }
}

/// Uniform buffer holding [`SceneConstants`], rewritten every frame.
pub struct ConstantBuffer {
    bind_group: wgpu::BindGroup,
    buffer: wgpu::Buffer,
}

impl ConstantBuffer {
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn write(&self, queue: &wgpu::Queue, constants: &SceneConstants) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(constants));
    }

    /// The bind group goes before the buffer it references.
    pub(crate) fn release(self, report: &mut TeardownReport) {
        let Self { bind_group, buffer } = self;
        drop(bind_group);
        report.record("constant bind group");
        buffer.destroy();
        report.record("constant buffer");
    }
}
