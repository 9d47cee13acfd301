//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use canvas_bridge::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Entry point
pub use crate::bridge::{Bridge, BridgeBuilder};

// Configuration and errors
pub use crate::core::config::{PresentationFormat, SurfaceSize, WindowConfig};
pub use crate::core::error::BridgeError;
pub use crate::core::session::SessionStats;

// GPU
pub use crate::gpu::{CanvasContext, GpuBackend, GpuDevice, WgpuBackend};

// Native window libraries
pub use crate::core::platform_bridge::NativeWindowLibrary;
pub use crate::platform::dylib::{DylibLibrary, LibraryLocator, LibrarySource};
pub use crate::platform::winit_host::WinitHost;
pub use crate::platform::Platform;
