//! Nabu engine crate.
//!
//! Renders a single imported mesh with a movable point light. The GPU frame
//! lifecycle lives here: device and swapchain setup, pipeline creation, the
//! fixed-rate render thread and ordered teardown.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod mesh;
pub mod pipeline;
pub mod render;
pub mod scene;
