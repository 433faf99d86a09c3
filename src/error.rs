//! Errors raised while bringing up the application.
//!
//! The simulation itself never fails: invalid actions are ignored. Only the host
//! side (window, GPU, configuration) reports errors.

use std::path::PathBuf;

/// Failures while starting the sandbox.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
