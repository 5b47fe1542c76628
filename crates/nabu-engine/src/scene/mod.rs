//! Scene state.
//!
//! Responsibilities:
//! - the fixed camera and the accumulating world rotation
//! - the light position shared with the host thread
//! - packing the per-frame constant buffer payload

mod camera;
mod constants;
mod inputs;
mod state;

pub use camera::Camera;
pub use constants::SceneConstants;
pub use inputs::{LightAxis, SceneInputs};
pub use state::{SceneConfig, SceneState};
