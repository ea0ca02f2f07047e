//! Error types for inkfield.
//!
//! Only the outer shell can fail: loading configuration and content, loading
//! fonts, bringing up the window and GPU, and writing snapshots. The particle
//! core itself degrades to "no particles" or "no repulsion" instead of failing.

use std::path::PathBuf;

/// Everything that can go wrong outside the simulation core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read or write a configuration or content file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A configuration or content file is not valid JSON for its schema.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A font file given on the command line or in the config could not be loaded.
    #[error("failed to load font {path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Failed to create a surface for the window.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; a Vulkan, Metal, DX12 or GL capable device is required")]
    NoAdapter,
    /// Failed to create the GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// Failed to create the event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// Failed to encode a snapshot image.
    #[error("failed to write snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
