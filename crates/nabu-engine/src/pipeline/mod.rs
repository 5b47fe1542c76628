//! Pipeline builder: shader compilation, input layout, fixed-function state
//! and the render pipeline itself.

mod error;
mod layout;
mod mesh_pipeline;
pub(crate) mod shader;
mod state;

pub use error::CompileError;
pub use layout::{build_input_layout, InputLayout};
pub use mesh_pipeline::{ConstantBuffer, MeshPipeline};
pub use shader::{compile_shader, compile_source, CompiledShader, ShaderInput, ShaderStage};
pub use state::{build_fixed_state, FixedState};
