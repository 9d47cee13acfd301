//=========================================================================
// Bridge Errors
//=========================================================================
//
// Precondition failures (platform, adapter, device, library) are returned
// to the caller before the native event loop starts. Failures raised
// inside a native callback are logged by the session and never cross
// back into native code.
//
//=========================================================================

use thiserror::Error;

use crate::platform::Platform;

/// Errors produced while building, spawning or driving a bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The running OS maps to no known windowing backend.
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },

    /// No GPU adapter could be acquired.
    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(String),

    /// The adapter refused to create a device.
    #[error("GPU device request failed: {0}")]
    DeviceUnavailable(String),

    /// A presentation surface could not be built from native handles.
    #[error("surface creation failed on {platform}: {reason}")]
    SurfaceCreationFailed { platform: Platform, reason: String },

    /// A draw or context operation ran before a context existed.
    #[error("canvas context is not initialized")]
    UninitializedContext,

    /// A native handle was used after its window closed.
    #[error("native handle used outside its validity window")]
    HandleExpired,

    /// The native window library could not be loaded or lacks its entry point.
    #[error("native window library unavailable: {0}")]
    LibraryUnavailable(String),

    /// The winit event loop could not be created or failed while running.
    #[error("native event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

//=========================================================================
// Unit Tests
//=========================================================================
