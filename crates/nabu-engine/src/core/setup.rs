use std::path::PathBuf;
use std::sync::Arc;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use thiserror::Error;

use crate::device::{
    DeviceCreationError, DeviceInit, GpuDevice, RenderSurface, SurfaceCreationError, SurfaceSpec,
    DEPTH_FORMAT,
};
use crate::mesh::{load_mesh, MeshBuffers, MeshError};
use crate::pipeline::{
    build_fixed_state, build_input_layout, compile_shader, CompileError, MeshPipeline, ShaderStage,
};
use crate::render::{GpuBackend, GpuResources, Renderer};
use crate::scene::{SceneConfig, SceneInputs, SceneState};

/// WGSL sources and their entry points.
#[derive(Debug, Clone)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub vertex_entry: String,
    pub pixel: PathBuf,
    pub pixel_entry: String,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shaders/vertex.wgsl"),
            vertex_entry: "VS".to_string(),
            pixel: PathBuf::from("assets/shaders/pixel.wgsl"),
            pixel_entry: "PS".to_string(),
        }
    }
}

/// Everything the one-time surface-ready sequence needs.
#[derive(Debug, Clone)]
pub struct ViewerSetup {
    pub device: DeviceInit,
    pub surface: SurfaceSpec,
    pub mesh_path: PathBuf,
    pub shaders: ShaderPaths,
    pub scene: SceneConfig,
    pub clear_color: wgpu::Color,
}

impl Default for ViewerSetup {
    fn default() -> Self {
        Self {
            device: DeviceInit::default(),
            surface: SurfaceSpec::default(),
            mesh_path: PathBuf::from("assets/models/cube.obj"),
            shaders: ShaderPaths::default(),
            scene: SceneConfig::default(),
            clear_color: wgpu::Color::WHITE,
        }
    }
}

/// Setup failed; nothing is rendered.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("device creation failed")]
    Device(#[from] DeviceCreationError),

    #[error("surface creation failed")]
    Surface(#[from] SurfaceCreationError),

    #[error("mesh loading failed")]
    Mesh(#[from] MeshError),

    #[error("shader compilation failed")]
    Compile(#[from] CompileError),
}

/// Builds every GPU resource for `window` and wraps them in a renderer.
///
/// Order: device, surface and depth target, mesh buffers, shaders, input
/// layout, fixed state, pipeline, constant buffer.
pub fn build_renderer<W>(
    setup: &ViewerSetup,
    window: W,
    width: u32,
    height: u32,
    inputs: Arc<SceneInputs>,
) -> Result<Renderer<GpuBackend>, SetupError>
where
    W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
{
    let (gpu, surface) = pollster::block_on(GpuDevice::for_window(&setup.device, window))?;
    let surface = RenderSurface::from_surface(&gpu, surface, width, height, &setup.surface)?;

    let mesh_data = load_mesh(&setup.mesh_path)?;
    let mesh = MeshBuffers::upload(gpu.device(), &mesh_data);

    let shaders = &setup.shaders;
    let vs = compile_shader(&shaders.vertex, &shaders.vertex_entry, ShaderStage::Vertex)?;
    let ps = compile_shader(&shaders.pixel, &shaders.pixel_entry, ShaderStage::Pixel)?;
    let input_layout = build_input_layout(&vs)?;

    let pipeline = MeshPipeline::new(
        gpu.device(),
        &vs,
        &ps,
        &input_layout,
        build_fixed_state(DEPTH_FORMAT),
        surface.format(),
    );
    let constants = pipeline.create_constants(gpu.device());

    let scene = SceneState::new(&setup.scene, width, height);
    let backend = GpuBackend::new(GpuResources {
        gpu,
        surface,
        pipeline,
        mesh,
        constants,
    });

    Ok(Renderer::new(backend, scene, inputs, setup.clear_color))
}
