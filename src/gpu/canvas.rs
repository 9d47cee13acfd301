//=========================================================================
// Canvas Context
//
// A wgpu surface configured for one window size, plus the frame the
// current draw renders into.
//
// Notes:
// The frame is acquired lazily the first time a draw asks for it and is
// presented (and released) by the backend after the draw returns. A draw
// that never asks for a frame presents nothing.
//=========================================================================

use log::{trace, warn};

use crate::core::config::SurfaceSize;

/// Presentable surface bound to the shared device.
pub struct CanvasContext {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    frame: Option<wgpu::SurfaceTexture>,
}

impl CanvasContext {
    pub(crate) fn new(
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        device: wgpu::Device,
    ) -> Self {
        surface.configure(&device, &config);
        Self { surface, config, device, frame: None }
    }

    //--- Queries ----------------------------------------------------------

    /// Texture format the surface was configured with.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Size the surface was configured with.
    ///
    /// Only changes when the context is rebuilt, so it can lag behind the
    /// window on backends that keep their context across resizes.
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.config.width, self.config.height)
    }

    //--- Frame Access -----------------------------------------------------

    /// Texture to render this frame into.
    ///
    /// Acquired once per draw. An outdated or lost surface is reconfigured
    /// with the existing configuration and acquired again.
    ///
    /// # Errors
    ///
    /// Returns the surface error if acquisition still fails.
    pub fn current_texture(&mut self) -> Result<&wgpu::SurfaceTexture, wgpu::SurfaceError> {
        if self.frame.is_none() {
            let frame = match self.surface.get_current_texture() {
                Ok(frame) => frame,
                Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                    warn!(target: "bridge::gpu", "Surface outdated, reconfiguring");
                    self.surface.configure(&self.device, &self.config);
                    self.surface.get_current_texture()?
                }
                Err(e) => return Err(e),
            };
            self.frame = Some(frame);
        }

        match self.frame.as_ref() {
            Some(frame) => Ok(frame),
            None => Err(wgpu::SurfaceError::Lost),
        }
    }

    /// Presents the acquired frame, if any.
    pub(crate) fn present(&mut self) {
        match self.frame.take() {
            Some(frame) => frame.present(),
            None => trace!(target: "bridge::gpu", "Draw acquired no frame, nothing to present"),
        }
    }
}
