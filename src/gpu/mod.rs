//=========================================================================
// Surface/Context Manager
//
// Turns a platform tag plus borrowed native handles into a configured,
// presentable canvas context.
//
// Components:
// - `GpuBackend`: the seam the session drives (device + context building)
// - `wgpu_backend`: wgpu implementation (adapter/device acquisition)
// - `canvas`: the configured surface handed to user callbacks
//
//=========================================================================

//=== Module Declarations =================================================

pub mod canvas;
pub mod wgpu_backend;

//=== Internal Dependencies ===============================================

use crate::core::config::{PresentationFormat, SurfaceSize};
use crate::core::error::BridgeError;
use crate::core::handles::NativeHandlePair;
use crate::platform::Platform;

//=== Public API ==========================================================

pub use canvas::CanvasContext;
pub use wgpu_backend::{GpuDevice, WgpuBackend};

//=== GpuBackend ==========================================================

/// GPU capability the bridge session builds canvases against.
///
/// The device is acquired before the native window exists and stays the
/// same for the whole session; contexts come and go with the window's
/// surface.
///
/// Backends are `'static` so the native callbacks can check which session
/// type is active before touching it.
pub trait GpuBackend: 'static {
    /// Shared device handed to user callbacks.
    type Device;

    /// Configured presentation target handed to user callbacks.
    type Context;

    fn device(&self) -> &Self::Device;

    /// Builds a fresh context for `handles` at `size`.
    ///
    /// Each call yields an independent context; the caller drops the old
    /// one when replacing it.
    ///
    /// # Errors
    ///
    /// [`BridgeError::SurfaceCreationFailed`] or [`BridgeError::HandleExpired`]
    /// when no surface can be built from `handles`.
    fn build_context(
        &self,
        platform: Platform,
        handles: &NativeHandlePair,
        format: PresentationFormat,
        size: SurfaceSize,
    ) -> Result<Self::Context, BridgeError>;

    /// Presents whatever frame the last draw rendered into `context`.
    fn present(&self, context: &mut Self::Context);
}
