use std::path::PathBuf;

use thiserror::Error;

use super::ShaderStage;

/// Shader compilation or reflection failure. Fatal during setup.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to read shader source {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse shader `{label}`:\n{diagnostic}")]
    Parse { label: String, diagnostic: String },

    #[error("shader `{label}` failed validation:\n{diagnostic}")]
    Validation { label: String, diagnostic: String },

    #[error("shader `{label}` has no {stage:?} entry point named `{entry}`")]
    MissingEntryPoint {
        label: String,
        entry: String,
        stage: ShaderStage,
    },

    #[error("vertex shader has no input named `{semantic}`")]
    MissingInput { semantic: &'static str },

    #[error("input layout needs a vertex shader, got {0:?}")]
    NotVertexShader(ShaderStage),
}
