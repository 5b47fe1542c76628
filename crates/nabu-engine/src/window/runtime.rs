use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glam::Vec3;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use super::controls::{command_for_key, LightControls};
use crate::core::{build_renderer, ViewerSession, ViewerSetup};
use crate::render::GpuBackend;
use crate::scene::SceneInputs;
use crate::time::SchedulerConfig;

/// How often the host checks whether the render loop stopped on its own.
const WATCHDOG_INTERVAL: Duration = Duration::from_millis(100);

/// Window and viewer configuration.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub panel_size: LogicalSize<f64>,
    pub setup: ViewerSetup,
    pub scheduler: SchedulerConfig,

    pub initial_light: Vec3,
    /// Slider increment per key press.
    pub light_step: f32,
    /// Sliders cover `[-light_range, light_range]`.
    pub light_range: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "nabu".to_string(),
            panel_size: LogicalSize::new(1280.0, 720.0),
            setup: ViewerSetup::default(),
            scheduler: SchedulerConfig::default(),
            initial_light: Vec3::ZERO,
            light_step: 0.5,
            light_range: 10.0,
        }
    }
}

/// Entry point for the viewer's platform loop.
pub struct Runtime;

impl Runtime {
    /// Runs until the window closes. Setup failures and fatal frame errors
    /// are returned once the event loop has exited.
    pub fn run(config: ViewerConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut app = ViewerApp::new(config);

        event_loop
            .run_app(&mut app)
            .context("winit event loop terminated with error")?;

        app.finish()
    }
}

struct ViewerApp {
    config: ViewerConfig,
    inputs: Arc<SceneInputs>,
    controls: LightControls,

    // Dropped after the session; the surface keeps its own handle.
    session: Option<ViewerSession<GpuBackend>>,
    window: Option<Arc<Window>>,

    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl ViewerApp {
    fn new(config: ViewerConfig) -> Self {
        let controls =
            LightControls::new(config.initial_light, config.light_step, config.light_range);
        // The render thread starts from the slider positions, clamped to range.
        let inputs = Arc::new(SceneInputs::new(controls.value()));
        Self {
            config,
            inputs,
            controls,
            session: None,
            window: None,
            failure: None,
            exit_requested: false,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.panel_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        let size = window.inner_size();

        let renderer = build_renderer(
            &self.config.setup,
            Arc::clone(&window),
            size.width,
            size.height,
            Arc::clone(&self.inputs),
        )
        .context("viewer setup failed")?;

        let session = ViewerSession::start(renderer, self.config.scheduler.clone())?;
        self.session = Some(session);
        self.window = Some(window);
        Ok(())
    }

    /// Drains the render thread and releases the GPU before the window goes.
    fn shut_down(&mut self) {
        if let Some(session) = self.session.take() {
            let report = session.shutdown();
            if let Some(err) = report.frame_error
                && self.failure.is_none()
            {
                self.failure = Some(err.context("rendering stopped"));
            }
        }
        self.window = None;
    }

    fn request_exit(&mut self, event_loop: &ActiveEventLoop) {
        self.shut_down();
        self.exit_requested = true;
        event_loop.exit();
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        if code == KeyCode::Escape {
            self.request_exit(event_loop);
            return;
        }

        let Some(command) = command_for_key(code) else {
            return;
        };
        for (axis, value) in self.controls.apply(command) {
            self.inputs.set_light_axis(axis, value);
            log::info!("light {axis:?} = {value}");
        }
    }

    fn finish(mut self) -> Result<()> {
        self.shut_down();
        match self.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.exit_requested {
            return;
        }

        if let Err(err) = self.start(event_loop) {
            log::error!("{err:#}");
            self.failure = Some(err);
            self.request_exit(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => self.request_exit(event_loop),

            WindowEvent::Resized(size) => self.inputs.request_resize(size.width, size.height),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.inputs.request_resize(size.width, size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => self.on_key(event_loop, event),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.session.as_ref().is_some_and(|s| s.has_stopped()) {
            log::warn!("render loop stopped; closing viewer");
            self.request_exit(event_loop);
            return;
        }

        // Rendering happens on its own thread; the host only wakes to watch it.
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + WATCHDOG_INTERVAL));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shut_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_initial_light_starts_clamped_on_both_threads() {
        let app = ViewerApp::new(ViewerConfig {
            initial_light: Vec3::new(25.0, -40.0, 3.0),
            light_range: 10.0,
            ..ViewerConfig::default()
        });

        assert_eq!(app.controls.value(), Vec3::new(10.0, -10.0, 3.0));
        assert_eq!(app.inputs.light(), app.controls.value());
    }
}
