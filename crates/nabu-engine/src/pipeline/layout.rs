use crate::mesh::Vertex;

use super::{CompileError, CompiledShader, ShaderStage};

/// Semantic name, byte offset into [`Vertex`], format.
const SEMANTICS: [(&str, u64, wgpu::VertexFormat); 2] = [
    ("POSITION", Vertex::POSITION_OFFSET, wgpu::VertexFormat::Float32x3),
    ("NORMAL", Vertex::NORMAL_OFFSET, wgpu::VertexFormat::Float32x3),
];

/// Binds the vertex buffer layout to a vertex shader's input signature.
#[derive(Debug, Clone, PartialEq)]
pub struct InputLayout {
    attributes: [wgpu::VertexAttribute; 2],
}

impl InputLayout {
    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: Vertex::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Matches `POSITION` and `NORMAL` to the shader inputs of the same name.
pub fn build_input_layout(vs: &CompiledShader) -> Result<InputLayout, CompileError> {
    if vs.stage() != ShaderStage::Vertex {
        return Err(CompileError::NotVertexShader(vs.stage()));
    }

    let mut attributes = [wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location: 0,
    }; 2];

    for (slot, (semantic, offset, format)) in attributes.iter_mut().zip(SEMANTICS) {
        let input = vs
            .input(semantic)
            .ok_or(CompileError::MissingInput { semantic })?;
        *slot = wgpu::VertexAttribute {
            format,
            offset,
            shader_location: input.location,
        };
    }

    Ok(InputLayout { attributes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shader::tests::STRUCT_INPUT_VS;
    use crate::pipeline::{compile_shader, compile_source};

    const VIEWER_SHADERS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../nabu-viewer/assets/shaders");

    #[test]
    fn semantics_bind_to_struct_offsets() {
        let vs = compile_source("vs", STRUCT_INPUT_VS, "VS", ShaderStage::Vertex).unwrap();
        let layout = build_input_layout(&vs).unwrap();

        let attrs = layout.attributes();
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[0].shader_location, 0);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[1].shader_location, 1);
        assert!(attrs.iter().all(|a| a.format == wgpu::VertexFormat::Float32x3));
        assert_eq!(layout.buffer_layout().array_stride, 24);
    }

    #[test]
    fn missing_normal_input_is_rejected() {
        let src = "
@vertex
fn VS(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position, 1.0);
}
";
        let vs = compile_source("vs", src, "VS", ShaderStage::Vertex).unwrap();
        assert!(matches!(
            build_input_layout(&vs),
            Err(CompileError::MissingInput { semantic: "NORMAL" })
        ));
    }

    #[test]
    fn pixel_shader_has_no_input_layout() {
        let src = "@fragment fn PS() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }";
        let ps = compile_source("ps", src, "PS", ShaderStage::Pixel).unwrap();
        assert!(matches!(
            build_input_layout(&ps),
            Err(CompileError::NotVertexShader(ShaderStage::Pixel))
        ));
    }

    #[test]
    fn shipped_viewer_shaders_compile_and_bind() {
        let vs = compile_shader(format!("{VIEWER_SHADERS}/vertex.wgsl"), "VS", ShaderStage::Vertex)
            .unwrap();
        let ps = compile_shader(format!("{VIEWER_SHADERS}/pixel.wgsl"), "PS", ShaderStage::Pixel)
            .unwrap();

        assert_eq!(vs.label(), "vertex.wgsl");
        assert_eq!(ps.label(), "pixel.wgsl");

        let layout = build_input_layout(&vs).unwrap();
        assert_eq!(layout.attributes()[0].shader_location, 0);
        assert_eq!(layout.attributes()[1].shader_location, 1);
        assert_eq!(ps.inputs().len(), 2);
    }
}
