//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and forwards resize, light and close
//! notifications to the running viewer session.

mod controls;
mod runtime;

pub use controls::{command_for_key, ControlCommand, LightControls};
pub use runtime::{Runtime, ViewerConfig};
