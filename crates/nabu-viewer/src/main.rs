use std::path::PathBuf;

use anyhow::Result;
use glam::Vec3;
use winit::dpi::LogicalSize;

use nabu_engine::core::{ShaderPaths, ViewerSetup};
use nabu_engine::logging::{init_logging, LoggingConfig};
use nabu_engine::window::{Runtime, ViewerConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let assets = assets_dir();
    log::info!("assets: {}", assets.display());

    let config = ViewerConfig {
        title: "nabu mesh viewer".to_string(),
        panel_size: LogicalSize::new(800.0, 600.0),
        setup: ViewerSetup {
            mesh_path: assets.join("models/cube.obj"),
            shaders: ShaderPaths {
                vertex: assets.join("shaders/vertex.wgsl"),
                pixel: assets.join("shaders/pixel.wgsl"),
                ..ShaderPaths::default()
            },
            ..ViewerSetup::default()
        },
        // In front of the camera, so the visible faces start lit.
        initial_light: Vec3::new(-2.0, -2.0, -6.0),
        ..ViewerConfig::default()
    };

    log::info!("keys: X/Y/Z select light axis, Up/Down move it, R resets, Esc quits");
    Runtime::run(config)
}

/// `assets/` next to the executable when packaged, else the crate's own.
fn assets_dir() -> PathBuf {
    let packaged = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets")));

    match packaged {
        Some(dir) if dir.is_dir() => dir,
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
    }
}
