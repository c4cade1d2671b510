use thiserror::Error;
use winit::error::{EventLoopError, OsError};

/// Why [`Runtime::run`](super::Runtime::run) stopped with a failure.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to initialize the window system: {0}")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window: {0}")]
    WindowCreation(#[source] OsError),

    #[error("failed to initialize the GPU: {0:#}")]
    GpuInit(anyhow::Error),

    #[error("application setup failed: {0:#}")]
    Setup(anyhow::Error),

    #[error("surface error: {0}")]
    Surface(#[source] wgpu::SurfaceError),
}
