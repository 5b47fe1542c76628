//! Viewer lifecycle: one-time setup, the running session and ordered shutdown.
//!
//! The runtime (platform loop) only talks to this module; it never touches
//! GPU resources directly.

mod session;
mod setup;
pub mod shutdown;

pub use session::ViewerSession;
pub use setup::{build_renderer, SetupError, ShaderPaths, ViewerSetup};
pub use shutdown::{shutdown, ShutdownReport};
