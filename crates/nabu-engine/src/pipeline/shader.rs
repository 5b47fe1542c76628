use std::path::Path;

use super::CompileError;

/// Programmable stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Pixel => naga::ShaderStage::Fragment,
        }
    }
}

/// A user-defined stage input, as reflected from the entry point's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderInput {
    pub name: String,
    pub location: u32,
}

/// Validated WGSL plus the reflection the pipeline builder needs.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    label: String,
    source: String,
    entry_point: String,
    stage: ShaderStage,
    inputs: Vec<ShaderInput>,
}

impl CompiledShader {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// `@location` inputs of the entry point, flattened out of any input structs.
    pub fn inputs(&self) -> &[ShaderInput] {
        &self.inputs
    }

    /// Case-insensitive lookup of an input by name.
    pub fn input(&self, name: &str) -> Option<&ShaderInput> {
        self.inputs
            .iter()
            .find(|input| input.name.eq_ignore_ascii_case(name))
    }

    pub fn module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.label.as_str()),
            source: wgpu::ShaderSource::Wgsl(self.source.as_str().into()),
        })
    }
}

/// Reads and compiles the WGSL file at `path`.
pub fn compile_shader(
    path: impl AsRef<Path>,
    entry_point: &str,
    stage: ShaderStage,
) -> Result<CompiledShader, CompileError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    compile_source(label, source, entry_point, stage)
}

/// Parses and validates `source`, then checks that `entry_point` exists for `stage`.
pub fn compile_source(
    label: impl Into<String>,
    source: impl Into<String>,
    entry_point: &str,
    stage: ShaderStage,
) -> Result<CompiledShader, CompileError> {
    let label = label.into();
    let source = source.into();

    let module = naga::front::wgsl::parse_str(&source).map_err(|err| CompileError::Parse {
        diagnostic: err.emit_to_string(&source),
        label: label.clone(),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .map_err(|err| CompileError::Validation {
        diagnostic: err.emit_to_string(&source),
        label: label.clone(),
    })?;

    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.name == entry_point && ep.stage == stage.naga())
        .ok_or_else(|| CompileError::MissingEntryPoint {
            label: label.clone(),
            entry: entry_point.to_owned(),
            stage,
        })?;

    let inputs = collect_inputs(&module, &entry.function);
    log::info!(
        "compiled {label}: {stage:?} entry `{entry_point}`, {} inputs",
        inputs.len()
    );

    Ok(CompiledShader {
        label,
        source,
        entry_point: entry_point.to_owned(),
        stage,
        inputs,
    })
}

fn collect_inputs(module: &naga::Module, function: &naga::Function) -> Vec<ShaderInput> {
    let mut inputs = Vec::new();

    for arg in &function.arguments {
        if let Some(naga::Binding::Location { location, .. }) = &arg.binding {
            inputs.push(ShaderInput {
                name: arg.name.clone().unwrap_or_default(),
                location: *location,
            });
            continue;
        }

        if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
            for member in members {
                if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                    inputs.push(ShaderInput {
                        name: member.name.clone().unwrap_or_default(),
                        location: *location,
                    });
                }
            }
        }
    }

    inputs.sort_by_key(|input| input.location);
    inputs
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const STRUCT_INPUT_VS: &str = "
struct Scene {
    world_view_projection: mat4x4<f32>,
    world: mat4x4<f32>,
    light_position: vec4<f32>,
};
@group(0) @binding(0) var<uniform> scene: Scene;

struct VertexInput {
    @location(0) Position: vec3<f32>,
    @location(1) Normal: vec3<f32>,
};

@vertex
fn VS(input: VertexInput) -> @builtin(position) vec4<f32> {
    return scene.world_view_projection * vec4<f32>(input.Position + input.Normal * 0.0, 1.0);
}
";

    const ARGUMENT_INPUT_VS: &str = "
@vertex
fn VS(@location(3) normal: vec3<f32>, @location(2) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position + normal, 1.0);
}
";

    const PIXEL: &str = "
@fragment
fn PS() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 1.0, 1.0);
}
";

    // ── reflection ────────────────────────────────────────────────────────

    #[test]
    fn struct_members_are_reflected_as_inputs() {
        let vs = compile_source("vs", STRUCT_INPUT_VS, "VS", ShaderStage::Vertex).unwrap();
        assert_eq!(vs.entry_point(), "VS");
        assert_eq!(vs.stage(), ShaderStage::Vertex);
        assert_eq!(
            vs.inputs(),
            &[
                ShaderInput { name: "Position".into(), location: 0 },
                ShaderInput { name: "Normal".into(), location: 1 },
            ]
        );
    }

    #[test]
    fn plain_arguments_are_reflected_in_location_order() {
        let vs = compile_source("vs", ARGUMENT_INPUT_VS, "VS", ShaderStage::Vertex).unwrap();
        let names: Vec<_> = vs.inputs().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["position", "normal"]);
    }

    #[test]
    fn input_lookup_ignores_case() {
        let vs = compile_source("vs", STRUCT_INPUT_VS, "VS", ShaderStage::Vertex).unwrap();
        assert_eq!(vs.input("POSITION").map(|i| i.location), Some(0));
        assert_eq!(vs.input("normal").map(|i| i.location), Some(1));
        assert!(vs.input("texcoord").is_none());
    }

    #[test]
    fn pixel_entry_point_compiles() {
        let ps = compile_source("ps", PIXEL, "PS", ShaderStage::Pixel).unwrap();
        assert!(ps.inputs().is_empty());
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn unknown_entry_point_is_rejected() {
        let err = compile_source("vs", STRUCT_INPUT_VS, "main", ShaderStage::Vertex).unwrap_err();
        assert!(matches!(err, CompileError::MissingEntryPoint { ref entry, .. } if entry == "main"));
    }

    #[test]
    fn entry_point_of_the_wrong_stage_is_rejected() {
        let err = compile_source("ps", PIXEL, "PS", ShaderStage::Vertex).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MissingEntryPoint { stage: ShaderStage::Vertex, .. }
        ));
    }

    #[test]
    fn syntax_error_carries_the_diagnostic() {
        let err = compile_source("broken.wgsl", "fn VS( {", "VS", ShaderStage::Vertex).unwrap_err();
        match err {
            CompileError::Parse { label, diagnostic } => {
                assert_eq!(label, "broken.wgsl");
                assert!(!diagnostic.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = compile_shader("no/such/shader.wgsl", "VS", ShaderStage::Vertex).unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }
}
