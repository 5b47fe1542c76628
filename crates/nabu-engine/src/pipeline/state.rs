/// Rasterizer, depth-stencil and multisample state for the mesh pipeline.
///
/// These are plain descriptors; they are consumed by
/// [`MeshPipeline::new`](super::MeshPipeline::new) and live on inside the
/// render pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedState {
    pub primitive: wgpu::PrimitiveState,
    pub depth_stencil: wgpu::DepthStencilState,
    pub multisample: wgpu::MultisampleState,
}

/// Back-face culled solid triangles, counter-clockwise front faces,
/// less-or-equal depth test with writes, pass-through stencil.
pub fn build_fixed_state(depth_format: wgpu::TextureFormat) -> FixedState {
    FixedState {
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState {
                front: wgpu::StencilFaceState::IGNORE,
                back: wgpu::StencilFaceState::IGNORE,
                read_mask: 0xFF,
                write_mask: 0xFF,
            },
            bias: wgpu::DepthBiasState::default(),
        },
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
    }
}
